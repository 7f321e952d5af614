pub mod map;
pub mod panel;
pub mod recording;
pub mod style;
