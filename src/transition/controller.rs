/// Normative timing constants of the period transition, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingConfig {
    /// Wall-time suspension between accepting a request and drawing the new
    /// period. Not tied to per-element fade completion.
    pub fade_out_wait_ms: f64,
    /// Element-level fade to zero opacity when a period leaves.
    pub layer_fade_out_ms: f64,
    /// Marker fade from transparent to its category base opacity.
    pub marker_fade_in_ms: f64,
    /// One route crawl, origin to destination.
    pub route_crawl_ms: f64,
    /// Extra start delay per route drawn in a period (the "domino" reveal).
    pub crawl_stagger_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade_out_wait_ms: 400.0,
            layer_fade_out_ms: 220.0,
            marker_fade_in_ms: 400.0,
            route_crawl_ms: 1500.0,
            crawl_stagger_ms: 200.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionPhase {
    Idle,
    TransitioningOut { target: usize, ready_at_ms: f64 },
    Rendering,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Request arrived while busy (or with no periods); dropped, not queued.
    Ignored,
    /// Fade the current visuals, then render `target` once the wait elapses.
    FadeOutThenRender { target: usize },
}

/// Phase machine of one period switch. Pure decisions only; the session turns
/// them into scheduler and surface calls.
#[derive(Clone, Debug)]
pub struct PeriodTransition {
    phase: TransitionPhase,
    timing: TimingConfig,
}

impl PeriodTransition {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            timing,
        }
    }

    pub fn timing(&self) -> TimingConfig {
        self.timing
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// Last click while busy is ignored, not queued. The index is clamped to
    /// the configured period range.
    pub fn request(
        &mut self,
        index: usize,
        period_count: usize,
        now_ms: f64,
    ) -> TransitionDecision {
        if self.is_busy() {
            tracing::debug!(index, "period request dropped while transitioning");
            return TransitionDecision::Ignored;
        }
        if period_count == 0 {
            tracing::debug!(index, "period request dropped, no periods configured");
            return TransitionDecision::Ignored;
        }

        let target = index.min(period_count - 1);
        self.phase = TransitionPhase::TransitioningOut {
            target,
            ready_at_ms: now_ms + self.timing.fade_out_wait_ms,
        };
        TransitionDecision::FadeOutThenRender { target }
    }

    /// Fires at most once, when the fade-out wait has elapsed.
    pub fn due_render(&mut self, now_ms: f64) -> Option<usize> {
        let TransitionPhase::TransitioningOut { target, ready_at_ms } = self.phase else {
            return None;
        };
        if now_ms < ready_at_ms {
            return None;
        }
        self.phase = TransitionPhase::Rendering;
        Some(target)
    }

    /// Drawing is synchronous; once the draw call returns the controller is
    /// idle again, with only animations continuing under the new generation.
    pub fn finish_render(&mut self) {
        self.phase = TransitionPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_while_busy_is_ignored() {
        let mut transition = PeriodTransition::new(TimingConfig::default());
        assert_eq!(
            transition.request(1, 3, 0.0),
            TransitionDecision::FadeOutThenRender { target: 1 }
        );
        let phase = transition.phase();

        assert_eq!(transition.request(2, 3, 10.0), TransitionDecision::Ignored);
        assert_eq!(transition.phase(), phase);

        // Still busy while rendering.
        assert_eq!(transition.due_render(400.0), Some(1));
        assert_eq!(transition.request(2, 3, 410.0), TransitionDecision::Ignored);
    }

    #[test]
    fn index_is_clamped_to_period_range() {
        let mut transition = PeriodTransition::new(TimingConfig::default());
        assert_eq!(
            transition.request(99, 3, 0.0),
            TransitionDecision::FadeOutThenRender { target: 2 }
        );
    }

    #[test]
    fn no_periods_means_no_transition() {
        let mut transition = PeriodTransition::new(TimingConfig::default());
        assert_eq!(transition.request(0, 0, 0.0), TransitionDecision::Ignored);
        assert!(!transition.is_busy());
    }

    #[test]
    fn due_render_waits_for_the_fadeout_and_fires_once() {
        let mut transition = PeriodTransition::new(TimingConfig::default());
        transition.request(0, 1, 100.0);

        assert_eq!(transition.due_render(300.0), None);
        assert_eq!(transition.due_render(500.0), Some(0));
        assert_eq!(transition.due_render(600.0), None);
        assert_eq!(transition.phase(), TransitionPhase::Rendering);

        transition.finish_render();
        assert!(!transition.is_busy());
    }
}
