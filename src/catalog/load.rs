use crate::{
    catalog::model::{Atlas, AtlasObject, Period},
    foundation::error::{AtlasError, AtlasResult},
};

/// Parses the two bulk documents of the one-time data load and validates the
/// result. A malformed top-level shape fails here with a descriptive error,
/// before the engine ever runs; per-record coordinate problems do not (those
/// are skipped at render time).
pub fn load_atlas(objects_json: &str, periods_json: &str) -> AtlasResult<Atlas> {
    let objects: Vec<AtlasObject> = serde_json::from_str(objects_json)
        .map_err(|err| AtlasError::data_load(format!("object records: {err}")))?;
    let periods: Vec<Period> = serde_json::from_str(periods_json)
        .map_err(|err| AtlasError::data_load(format!("period list: {err}")))?;

    let atlas = Atlas { objects, periods };
    atlas.validate()?;
    Ok(atlas)
}
