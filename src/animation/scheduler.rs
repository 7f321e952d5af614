use std::collections::BTreeMap;

use crate::{
    animation::generation::{Generation, GenerationCounter},
    foundation::{
        error::{AtlasError, AtlasResult},
        geo::GeoPoint,
    },
    surface::map::{LayerId, StyleChannel},
};

/// One visual mutation produced by a scheduler tick. The scheduler never
/// touches a surface itself; the session applies these in order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum VisualUpdate {
    /// Interpolated style channels for one layer.
    Style {
        layer: LayerId,
        values: BTreeMap<StyleChannel, f64>,
    },
    /// Grown point prefix of a crawling polyline.
    CrawlPrefix {
        layer: LayerId,
        points: Vec<GeoPoint>,
    },
    /// Emitted exactly once when an animation reaches progress 1.
    Completed { layer: LayerId },
}

#[derive(Clone, Debug)]
enum AnimKind {
    Style {
        from: BTreeMap<StyleChannel, f64>,
        to: BTreeMap<StyleChannel, f64>,
    },
    Crawl {
        points: Vec<GeoPoint>,
        last_prefix: usize,
    },
}

#[derive(Clone, Debug)]
struct ScheduledAnim {
    layer: LayerId,
    kind: AnimKind,
    start_ms: f64,
    delay_ms: f64,
    duration_ms: f64,
    generation: Generation,
}

/// Drives every running interpolation from a single cooperative frame clock.
///
/// `tick` is the per-frame callback: progress is linear in wall time (linear
/// easing only, so a cancelled or late frame can never overshoot), and the
/// generation check happens before any update is produced, which is the
/// cooperative cancellation contract. Stale animations are dropped silently.
#[derive(Debug, Default)]
pub struct Scheduler {
    anims: Vec<ScheduledAnim>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.anims.len()
    }

    pub fn is_idle(&self) -> bool {
        self.anims.is_empty()
    }

    /// Linear interpolation of style channels from `from` toward `to` over
    /// `duration_ms`. Channels missing in `from` start at 0.
    pub fn animate_style(
        &mut self,
        layer: LayerId,
        from: BTreeMap<StyleChannel, f64>,
        to: BTreeMap<StyleChannel, f64>,
        duration_ms: f64,
        now_ms: f64,
        generation: Generation,
    ) -> AtlasResult<()> {
        if !(duration_ms > 0.0) || !duration_ms.is_finite() {
            return Err(AtlasError::animation("style duration must be > 0"));
        }
        if to.is_empty() {
            return Err(AtlasError::animation("style animation needs target channels"));
        }
        self.anims.push(ScheduledAnim {
            layer,
            kind: AnimKind::Style { from, to },
            start_ms: now_ms,
            delay_ms: 0.0,
            duration_ms,
            generation,
        });
        Ok(())
    }

    /// Progressive reveal of a polyline: after `delay_ms`, progress `t` maps
    /// to the prefix `max(2, floor(t * (len - 1)) + 1)`; the final tick always
    /// delivers the full sequence so the last frame is exact regardless of
    /// frame-timing rounding.
    pub fn animate_crawl(
        &mut self,
        layer: LayerId,
        points: Vec<GeoPoint>,
        duration_ms: f64,
        delay_ms: f64,
        now_ms: f64,
        generation: Generation,
    ) -> AtlasResult<()> {
        if points.len() < 2 {
            return Err(AtlasError::animation("crawl needs at least 2 points"));
        }
        if !(duration_ms > 0.0) || !duration_ms.is_finite() {
            return Err(AtlasError::animation("crawl duration must be > 0"));
        }
        if delay_ms < 0.0 || !delay_ms.is_finite() {
            return Err(AtlasError::animation("crawl delay must be finite and >= 0"));
        }
        self.anims.push(ScheduledAnim {
            layer,
            kind: AnimKind::Crawl {
                points,
                last_prefix: 0,
            },
            start_ms: now_ms,
            delay_ms,
            duration_ms,
            generation,
        });
        Ok(())
    }

    /// Removes any running style animations on `layer`, returning the channel
    /// values they had reached at `now_ms` so a superseding animation can
    /// start from there instead of jumping. Crawls on the layer are left
    /// alone.
    pub fn cancel_style(
        &mut self,
        layer: LayerId,
        now_ms: f64,
    ) -> Option<BTreeMap<StyleChannel, f64>> {
        let mut reached = None;
        self.anims.retain(|anim| {
            if anim.layer != layer {
                return true;
            }
            let AnimKind::Style { from, to } = &anim.kind else {
                return true;
            };
            let local = now_ms - anim.start_ms - anim.delay_ms;
            let t = (local / anim.duration_ms).clamp(0.0, 1.0);
            let mut values = BTreeMap::new();
            for (channel, target) in to.iter() {
                let current = from.get(channel).copied().unwrap_or(0.0);
                values.insert(*channel, current + (target - current) * t);
            }
            reached = Some(values);
            false
        });
        reached
    }

    /// Advances every animation to `now_ms`. One call per display frame.
    pub fn tick(&mut self, now_ms: f64, generations: &GenerationCounter) -> Vec<VisualUpdate> {
        let mut updates = Vec::new();
        let mut keep = Vec::with_capacity(self.anims.len());

        for mut anim in self.anims.drain(..) {
            if !generations.is_current(anim.generation) {
                // Terminal silent stop; not an error.
                continue;
            }

            let local = now_ms - anim.start_ms - anim.delay_ms;
            if local < 0.0 {
                keep.push(anim);
                continue;
            }
            let t = (local / anim.duration_ms).clamp(0.0, 1.0);

            match &mut anim.kind {
                AnimKind::Style { from, to } => {
                    let mut values = BTreeMap::new();
                    for (channel, target) in to.iter() {
                        let current = from.get(channel).copied().unwrap_or(0.0);
                        values.insert(*channel, current + (target - current) * t);
                    }
                    updates.push(VisualUpdate::Style {
                        layer: anim.layer,
                        values,
                    });
                }
                AnimKind::Crawl { points, last_prefix } => {
                    let n = if t >= 1.0 {
                        points.len()
                    } else {
                        (((t * (points.len() - 1) as f64).floor() as usize) + 1).max(2)
                    };
                    if n > *last_prefix {
                        *last_prefix = n;
                        updates.push(VisualUpdate::CrawlPrefix {
                            layer: anim.layer,
                            points: points[..n].to_vec(),
                        });
                    }
                }
            }

            if t >= 1.0 {
                updates.push(VisualUpdate::Completed { layer: anim.layer });
            } else {
                keep.push(anim);
            }
        }

        self.anims = keep;
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (Scheduler, GenerationCounter, Generation) {
        let scheduler = Scheduler::new();
        let mut generations = GenerationCounter::default();
        let generation = generations.begin_new_render();
        (scheduler, generations, generation)
    }

    fn geo(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint { lat, lng }
    }

    fn line(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| geo(i as f64, 0.0)).collect()
    }

    #[test]
    fn style_interpolates_linearly_and_completes_once() {
        let (mut scheduler, generations, generation) = fresh();
        let layer = LayerId(1);
        scheduler
            .animate_style(
                layer,
                BTreeMap::from([(StyleChannel::Opacity, 0.0)]),
                BTreeMap::from([(StyleChannel::Opacity, 0.8)]),
                400.0,
                0.0,
                generation,
            )
            .unwrap();

        let updates = scheduler.tick(200.0, &generations);
        assert_eq!(
            updates,
            vec![VisualUpdate::Style {
                layer,
                values: BTreeMap::from([(StyleChannel::Opacity, 0.4)]),
            }]
        );

        let updates = scheduler.tick(500.0, &generations);
        assert_eq!(
            updates,
            vec![
                VisualUpdate::Style {
                    layer,
                    values: BTreeMap::from([(StyleChannel::Opacity, 0.8)]),
                },
                VisualUpdate::Completed { layer },
            ]
        );
        assert!(scheduler.is_idle());

        // Nothing fires after completion.
        assert!(scheduler.tick(600.0, &generations).is_empty());
    }

    #[test]
    fn missing_from_channel_starts_at_zero() {
        let (mut scheduler, generations, generation) = fresh();
        scheduler
            .animate_style(
                LayerId(1),
                BTreeMap::new(),
                BTreeMap::from([(StyleChannel::FillOpacity, 1.0)]),
                100.0,
                0.0,
                generation,
            )
            .unwrap();
        let updates = scheduler.tick(50.0, &generations);
        let VisualUpdate::Style { values, .. } = &updates[0] else {
            panic!("expected style update");
        };
        assert_eq!(values[&StyleChannel::FillOpacity], 0.5);
    }

    #[test]
    fn crawl_waits_out_its_delay() {
        let (mut scheduler, generations, generation) = fresh();
        scheduler
            .animate_crawl(LayerId(2), line(10), 1500.0, 200.0, 0.0, generation)
            .unwrap();

        assert!(scheduler.tick(100.0, &generations).is_empty());
        assert_eq!(scheduler.active_count(), 1);

        let updates = scheduler.tick(200.0, &generations);
        assert_eq!(updates.len(), 1);
        let VisualUpdate::CrawlPrefix { points, .. } = &updates[0] else {
            panic!("expected crawl prefix");
        };
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn crawl_prefix_is_monotonic_and_full_reveal_happens_once() {
        let (mut scheduler, generations, generation) = fresh();
        let pts = line(12);
        scheduler
            .animate_crawl(LayerId(3), pts.clone(), 1000.0, 0.0, 0.0, generation)
            .unwrap();

        let mut last = 0usize;
        let mut full_reveals = 0usize;
        // Deliberately uneven frame times, overshooting the end.
        for now in [3.0, 90.0, 91.0, 250.0, 400.0, 990.0, 1004.0, 1500.0] {
            for update in scheduler.tick(now, &generations) {
                if let VisualUpdate::CrawlPrefix { points, .. } = update {
                    assert!(points.len() >= last, "prefix shrank at t={now}");
                    assert!(points.len() >= 2);
                    last = points.len();
                    if points.len() == pts.len() {
                        full_reveals += 1;
                        assert_eq!(points, pts);
                    }
                }
            }
        }
        assert_eq!(full_reveals, 1);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn unchanged_prefix_emits_nothing() {
        let (mut scheduler, generations, generation) = fresh();
        scheduler
            .animate_crawl(LayerId(4), line(3), 1000.0, 0.0, 0.0, generation)
            .unwrap();

        let first = scheduler.tick(10.0, &generations);
        assert_eq!(first.len(), 1);
        // Progress moved but the integer prefix did not.
        let second = scheduler.tick(20.0, &generations);
        assert!(second.is_empty());
    }

    #[test]
    fn stale_generation_stops_without_any_update() {
        let (mut scheduler, mut generations, generation) = fresh();
        scheduler
            .animate_style(
                LayerId(5),
                BTreeMap::from([(StyleChannel::Opacity, 1.0)]),
                BTreeMap::from([(StyleChannel::Opacity, 0.0)]),
                400.0,
                0.0,
                generation,
            )
            .unwrap();
        scheduler
            .animate_crawl(LayerId(6), line(5), 1500.0, 0.0, 0.0, generation)
            .unwrap();

        generations.begin_new_render();

        assert!(scheduler.tick(200.0, &generations).is_empty());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn newer_generation_survives_ticks_that_drop_older_ones() {
        let (mut scheduler, mut generations, old) = fresh();
        scheduler
            .animate_crawl(LayerId(7), line(5), 1000.0, 0.0, 0.0, old)
            .unwrap();
        let new = generations.begin_new_render();
        scheduler
            .animate_crawl(LayerId(8), line(5), 1000.0, 0.0, 0.0, new)
            .unwrap();

        let updates = scheduler.tick(500.0, &generations);
        assert!(updates
            .iter()
            .all(|u| matches!(u, VisualUpdate::CrawlPrefix { layer, .. } if *layer == LayerId(8))));
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn cancel_style_drops_the_animation_and_reports_midflight_values() {
        let (mut scheduler, generations, generation) = fresh();
        let layer = LayerId(9);
        scheduler
            .animate_style(
                layer,
                BTreeMap::from([(StyleChannel::Opacity, 0.0)]),
                BTreeMap::from([(StyleChannel::Opacity, 1.0)]),
                400.0,
                0.0,
                generation,
            )
            .unwrap();
        scheduler
            .animate_crawl(layer, line(5), 1000.0, 0.0, 0.0, generation)
            .unwrap();

        let reached = scheduler.cancel_style(layer, 100.0).unwrap();
        assert_eq!(reached[&StyleChannel::Opacity], 0.25);
        // The crawl on the same layer survives.
        assert_eq!(scheduler.active_count(), 1);
        let updates = scheduler.tick(200.0, &generations);
        assert!(updates
            .iter()
            .all(|u| matches!(u, VisualUpdate::CrawlPrefix { .. })));

        // Nothing to cancel on a layer with no style animation.
        assert!(scheduler.cancel_style(LayerId(10), 100.0).is_none());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let (mut scheduler, _, generation) = fresh();
        assert!(scheduler
            .animate_crawl(LayerId(1), line(1), 1000.0, 0.0, 0.0, generation)
            .is_err());
        assert!(scheduler
            .animate_crawl(LayerId(1), line(5), 0.0, 0.0, 0.0, generation)
            .is_err());
        assert!(scheduler
            .animate_style(
                LayerId(1),
                BTreeMap::new(),
                BTreeMap::new(),
                100.0,
                0.0,
                generation
            )
            .is_err());
    }
}
