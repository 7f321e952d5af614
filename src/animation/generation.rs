/// Token identifying one render pass. Totally ordered; animations hold the
/// generation active at their creation and stop silently once it is stale.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Generation(pub u64);

/// Process-wide in spirit, but owned by the session: written only when a new
/// period render begins, read by every in-flight animation.
#[derive(Clone, Debug, Default)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn current(&self) -> Generation {
        self.current
    }

    pub fn begin_new_render(&mut self) -> Generation {
        self.current.0 += 1;
        self.current
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_invalidates_older_generations() {
        let mut counter = GenerationCounter::default();
        let g1 = counter.begin_new_render();
        assert!(counter.is_current(g1));

        let g2 = counter.begin_new_render();
        assert!(counter.is_current(g2));
        assert!(!counter.is_current(g1));
        assert!(g2 > g1);
    }

    #[test]
    fn older_holder_cannot_invalidate_newer() {
        let mut counter = GenerationCounter::default();
        let g1 = counter.begin_new_render();
        let g2 = counter.begin_new_render();

        // Re-checking a stale token never disturbs the current one.
        assert!(!counter.is_current(g1));
        assert!(counter.is_current(g2));
    }
}
