use tracing::{debug, warn};

use crate::{
    animation::{
        generation::{Generation, GenerationCounter},
        scheduler::{Scheduler, VisualUpdate},
    },
    catalog::model::{Atlas, CurveSide},
    foundation::{error::AtlasResult, geo::Projector},
    geometry::curve::build_curve,
    interaction::markers::{InteractionEffect, MarkerEvent, MarkerInteraction, MarkerRecord},
    surface::{
        map::{LayerId, LayerStyle, MapSurface},
        panel::{escape_html, DetailPanel},
        style::{marker_style, route_style},
    },
    transition::controller::{PeriodTransition, TimingConfig, TransitionDecision, TransitionPhase},
};

/// Samples per route curve.
pub const CURVE_STEPS: usize = 60;

/// The one owner of everything the engine mutates: surface handles, the
/// render-generation counter, the selection, the frame scheduler. Passed
/// explicitly instead of living in process-wide globals.
///
/// All of it runs on a single cooperative frame clock: the embedding calls
/// [`AtlasSession::tick`] once per display frame with the current wall time.
pub struct AtlasSession<S: MapSurface, P: DetailPanel> {
    atlas: Atlas,
    projector: Box<dyn Projector>,
    surface: S,
    panel: P,
    scheduler: Scheduler,
    generations: GenerationCounter,
    interaction: MarkerInteraction,
    transition: PeriodTransition,
    markers: Vec<(LayerId, LayerStyle)>,
    routes: Vec<(LayerId, LayerStyle)>,
    current_period: Option<usize>,
}

impl<S: MapSurface, P: DetailPanel> AtlasSession<S, P> {
    pub fn new(
        atlas: Atlas,
        projector: Box<dyn Projector>,
        surface: S,
        panel: P,
        timing: TimingConfig,
    ) -> AtlasResult<Self> {
        atlas.validate()?;
        Ok(Self {
            atlas,
            projector,
            surface,
            panel,
            scheduler: Scheduler::new(),
            generations: GenerationCounter::default(),
            interaction: MarkerInteraction::new(),
            transition: PeriodTransition::new(timing),
            markers: Vec::new(),
            routes: Vec::new(),
            current_period: None,
        })
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn current_period(&self) -> Option<usize> {
        self.current_period
    }

    pub fn generation(&self) -> Generation {
        self.generations.current()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    pub fn active_animations(&self) -> usize {
        self.scheduler.active_count()
    }

    /// Asks for a period switch. While a switch is in flight the request is
    /// dropped (not queued) and no new generation is created. On accept, the
    /// current period's visuals start fading under the still-current
    /// generation; the new period draws once the fade-out wait elapses, on a
    /// later [`tick`](Self::tick).
    pub fn request_period(&mut self, index: usize, now_ms: f64) -> AtlasResult<()> {
        let decision = self
            .transition
            .request(index, self.atlas.period_count(), now_ms);
        if decision == TransitionDecision::Ignored {
            return Ok(());
        }

        let generation = self.generations.current();
        let fade_ms = self.transition.timing().layer_fade_out_ms;
        for (layer, style) in self.markers.iter().chain(self.routes.iter()) {
            // A fade-in still running on this layer would outlive the 220 ms
            // fade-out and brighten the layer back up; supersede it, starting
            // the fade-out from whatever opacity it had reached.
            let from = self
                .scheduler
                .cancel_style(*layer, now_ms)
                .unwrap_or_else(|| style.fade_in_targets());
            self.scheduler.animate_style(
                *layer,
                from,
                LayerStyle::fade_out_targets(),
                fade_ms,
                now_ms,
                generation,
            )?;
        }
        Ok(())
    }

    /// One frame: advance animations, apply their updates, and draw a pending
    /// period once its fade-out wait has elapsed.
    pub fn tick(&mut self, now_ms: f64) -> AtlasResult<()> {
        for update in self.scheduler.tick(now_ms, &self.generations) {
            match update {
                VisualUpdate::Style { layer, values } => {
                    self.surface.set_style_values(layer, &values);
                }
                VisualUpdate::CrawlPrefix { layer, points } => {
                    self.surface.set_polyline_points(layer, &points);
                }
                VisualUpdate::Completed { layer } => {
                    debug!(?layer, "animation completed");
                }
            }
        }

        if let Some(target) = self.transition.due_render(now_ms) {
            self.render_period(target, now_ms)?;
            self.transition.finish_render();
        }
        Ok(())
    }

    /// Forwards a hover/click to the interaction state and applies the
    /// resulting style/panel effects.
    pub fn handle_marker_event(&mut self, event: MarkerEvent) {
        for effect in self.interaction.handle(event) {
            match effect {
                InteractionEffect::SetStyle { layer, style } => {
                    self.surface.set_style(layer, &style);
                }
                InteractionEffect::ShowPanel { title, body_html } => {
                    self.panel.show(&title, &body_html);
                }
            }
        }
    }

    /// Synchronous draw of one period under a fresh generation. Every prior
    /// layer is removed first; in-flight animations of the old generation die
    /// on their next tick without touching anything.
    #[tracing::instrument(skip(self))]
    fn render_period(&mut self, index: usize, now_ms: f64) -> AtlasResult<()> {
        let generation = self.generations.begin_new_render();

        for (layer, _) in self.markers.drain(..).chain(self.routes.drain(..)) {
            self.surface.remove(layer);
        }
        self.interaction.clear();
        self.current_period = Some(index);

        let timing = self.transition.timing();
        let zoom = self.projector.current_zoom();
        let period = &self.atlas.periods[index];

        if period.objects.is_empty() {
            self.panel.show(
                &period.label,
                &escape_html("No objects recorded for this period."),
            );
            return Ok(());
        }

        // Stagger index across every route drawn for this period.
        let mut period_route_index = 0usize;

        for object_id in &period.objects {
            let Some(object) = self.atlas.object(object_id) else {
                warn!(%object_id, "period references unknown object, skipping");
                continue;
            };

            let base = marker_style(&object.category);
            let body_html = escape_html(&object.summary);

            for location in &object.locations {
                if !location.position.is_valid() {
                    warn!(
                        %object_id,
                        label = %location.label,
                        "location has invalid coordinates, skipping"
                    );
                    continue;
                }

                let layer = self.surface.add_marker(location.position, &base.transparent());
                self.markers.push((layer, base.clone()));
                self.interaction.register(MarkerRecord {
                    layer,
                    title: object.title.clone(),
                    body_html: body_html.clone(),
                    base: base.clone(),
                });
                self.scheduler.animate_style(
                    layer,
                    LayerStyle::fade_out_targets(),
                    base.fade_in_targets(),
                    timing.marker_fade_in_ms,
                    now_ms,
                    generation,
                )?;

                // Fan-out side alternates per origin, over the routes that are
                // visible in this period.
                let mut origin_route_index = 0usize;
                for route in &location.routes {
                    if !route.visibility.visible_in(index) {
                        continue;
                    }
                    let from = route.from.unwrap_or(location.position);
                    let side = CurveSide::auto(origin_route_index);
                    origin_route_index += 1;

                    let opts = route.curve.unwrap_or_default();
                    let points = match build_curve(
                        self.projector.as_ref(),
                        zoom,
                        from,
                        route.to,
                        CURVE_STEPS,
                        &opts,
                        side,
                    ) {
                        Ok(points) => points,
                        Err(err) => {
                            // One bad record must not blank the period.
                            warn!(%object_id, %err, "skipping route");
                            continue;
                        }
                    };

                    let style = route_style(route.influence);
                    let layer = self.surface.add_polyline(&[], &style);
                    self.routes.push((layer, style));
                    self.scheduler.animate_crawl(
                        layer,
                        points,
                        timing.route_crawl_ms,
                        period_route_index as f64 * timing.crawl_stagger_ms,
                        now_ms,
                        generation,
                    )?;
                    period_route_index += 1;
                }
            }
        }

        debug!(
            index,
            markers = self.markers.len(),
            routes = self.routes.len(),
            "period drawn"
        );
        Ok(())
    }
}
