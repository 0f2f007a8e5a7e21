//! # Scene simulator
//!
//! The animation is a loop of three phases over the pool of sketches:
//! * [`Phase::Draw`] reveals a sketch inside the window at the world origin, point by point.
//! * [`Phase::Wait`] holds the finished sketch, showing its caption for a while.
//! * [`Phase::Move`] zooms out, pans by one cell on either axis or both, then zooms into the
//!   next window with the next sketch's background fading in.
//!
//! All state lives in one [`SimulatorState`] value, stepped by [`SimulatorState::advance`]. Every step
//! produces a [`Frame`] which renders the whole scene, nothing is carried over between frames by the sink.

pub mod select;
pub mod timing;

use std::sync::Arc;

pub use select::{SelectionPolicy, Selector};
pub use timing::{FrameClock, Timing, TimingError};

use crate::{
    geometry::{GeometryCache, GeometryHandle, SketchFit},
    pool::SketchPool,
    render::{Frame, OverlayEvent, RenderCommand},
    sketch::Sketch,
    tiler::{self, PaneTint, CELL_HEIGHT, CELL_WIDTH},
    util::{progress, remap},
    view::ViewBounds,
};

/// Move progress at which the camera stops zooming out and starts to pan.
pub const PAN_START: f32 = 0.25;
/// Move progress at which the camera stops panning and starts to zoom in.
pub const ZOOM_IN_START: f32 = 0.75;

/// A sketch picked for display, with its geometry ready.
#[derive(Clone, Debug)]
pub struct Active {
    pub sketch: Arc<Sketch>,
    pub geometry: Arc<GeometryHandle>,
}
impl Active {
    fn prepare(sketch: Arc<Sketch>, cache: &mut GeometryCache) -> Self {
        Self {
            geometry: cache.prepare(&sketch),
            sketch,
        }
    }
}

/// Progress of the caption overlay through a hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Caption {
    Pending,
    Shown,
    Done,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::AsRefStr)]
pub enum PhaseKind {
    Draw,
    Wait,
    Move,
}

#[derive(Clone, Debug, strum::AsRefStr)]
pub enum Phase {
    Draw {
        elapsed: f32,
        /// Points revealed so far.
        revealed: usize,
        /// Chosen during the preceding move, shown once this phase starts.
        queued: Option<Active>,
    },
    Wait {
        elapsed: f32,
        caption: Caption,
    },
    Move {
        elapsed: f32,
        /// Camera travel, in world units.
        offset: [f32; 2],
        next: Option<Active>,
    },
}
impl Phase {
    fn draw(queued: Option<Active>) -> Self {
        Self::Draw {
            elapsed: 0.0,
            revealed: 0,
            queued,
        }
    }
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Draw { .. } => PhaseKind::Draw,
            Self::Wait { .. } => PhaseKind::Wait,
            Self::Move { .. } => PhaseKind::Move,
        }
    }
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        match self {
            Self::Draw { elapsed, .. } | Self::Wait { elapsed, .. } | Self::Move { elapsed, .. } => {
                *elapsed
            }
        }
    }
}

/// Everything needed for a step, besides the state itself.
pub struct StepContext<'a, R: ?Sized> {
    pub pool: &'a SketchPool,
    pub cache: &'a mut GeometryCache,
    pub rng: &'a mut R,
    pub timing: &'a Timing,
    pub fit: &'a SketchFit,
}

/// The sketch stroke to draw this frame.
struct Stroke {
    geometry: Arc<GeometryHandle>,
    count: usize,
    alpha: f32,
}

/// What to draw, before it is turned into commands.
#[derive(Default)]
struct Scene {
    tint: Option<PaneTint>,
    stroke: Option<Stroke>,
}
impl Scene {
    /// The sketch in the origin window, on its background.
    fn showing(active: &Active, count: usize, alpha: f32) -> Self {
        Self {
            tint: Some(PaneTint {
                color: active.geometry.background(),
                alpha,
            }),
            stroke: Some(Stroke {
                geometry: active.geometry.clone(),
                count,
                alpha,
            }),
        }
    }
    fn assemble(self, view: ViewBounds, fit: &SketchFit) -> Frame {
        let mut frame = Frame::new(view);
        frame
            .queue
            .push(RenderCommand::triangles(tiler::generate(&view, self.tint).into()));
        if let Some(stroke) = self
            .stroke
            .filter(|stroke| stroke.count > 0 && stroke.alpha > 0.0)
        {
            frame.queue.push(RenderCommand::line_strip(
                stroke.geometry.vertices().clone(),
                stroke.count,
                stroke.geometry.pen(),
                stroke.alpha,
                fit.transform(),
            ));
        }
        frame
    }
}

/// Pick a camera travel of one cell along either axis or both, never zero.
pub fn choose_displacement<R: rand::Rng + ?Sized>(rng: &mut R) -> [f32; 2] {
    let mut x: i8 = rng.gen_range(-1..=1);
    let mut y: i8 = rng.gen_range(-1..=1);
    if x == 0 && y == 0 {
        let sign = if rng.gen_bool(0.5) { 1 } else { -1 };
        if rng.gen_bool(0.5) {
            x = sign;
        } else {
            y = sign;
        }
    }
    [f32::from(x) * CELL_WIDTH, f32::from(y) * CELL_HEIGHT]
}

#[derive(Clone, Debug)]
pub struct SimulatorState {
    phase: Phase,
    view: ViewBounds,
    active: Option<Active>,
    selector: Selector,
}
impl Default for SimulatorState {
    fn default() -> Self {
        Self::new(Selector::default())
    }
}
impl SimulatorState {
    /// Drawing, with nothing picked yet.
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            phase: Phase::draw(None),
            view: ViewBounds::SETTLED,
            active: None,
            selector,
        }
    }
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }
    #[must_use]
    pub fn view(&self) -> ViewBounds {
        self.view
    }
    /// The sketch in the origin window, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Arc<Sketch>> {
        self.active.as_ref().map(|active| &active.sketch)
    }
    /// Step the animation by `dt` milliseconds.
    ///
    /// With nothing displayable in the pool this is idle: the state is returned untouched and the frame is empty.
    pub fn advance<R: rand::Rng + ?Sized>(
        mut self,
        dt: f32,
        cx: &mut StepContext<'_, R>,
    ) -> (Self, Frame) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut overlay = smallvec::SmallVec::new();
        let scene = match self.kind() {
            PhaseKind::Draw => self.draw(dt, cx),
            PhaseKind::Wait => self.wait(dt, cx, &mut overlay),
            PhaseKind::Move => self.travel(dt, cx),
        };
        let Some(scene) = scene else {
            let idle = Frame::new(self.view);
            return (self, idle);
        };
        let mut frame = scene.assemble(self.view, cx.fit);
        frame.overlay = overlay;
        (self, frame)
    }
    fn enter(&mut self, phase: Phase) {
        log::debug!("{} -> {}", self.phase.as_ref(), phase.as_ref());
        self.phase = phase;
    }
    fn draw<R: rand::Rng + ?Sized>(
        &mut self,
        dt: f32,
        cx: &mut StepContext<'_, R>,
    ) -> Option<Scene> {
        let Phase::Draw {
            elapsed,
            revealed,
            queued,
        } = &mut self.phase
        else {
            return None;
        };
        if self.active.is_none() {
            let next = match queued.take() {
                Some(next) => next,
                None => Active::prepare(self.selector.select(cx.pool, cx.rng)?, cx.cache),
            };
            log::info!("Drawing {}", next.sketch.key());
            self.active = Some(next);
        }
        let active = self.active.as_ref()?;
        *elapsed += dt;
        let t = progress(*elapsed, cx.timing.draw_ms);
        let total = active.geometry.vertex_count();
        let count = ((t * total as f32).floor() as usize).min(total);
        *revealed = (*revealed).max(count);
        let scene = Scene::showing(active, *revealed, 1.0);

        if t >= 1.0 {
            self.enter(Phase::Wait {
                elapsed: 0.0,
                caption: Caption::Pending,
            });
        }
        Some(scene)
    }
    fn wait<R: rand::Rng + ?Sized>(
        &mut self,
        dt: f32,
        cx: &mut StepContext<'_, R>,
        overlay: &mut smallvec::SmallVec<[OverlayEvent; 2]>,
    ) -> Option<Scene> {
        let Phase::Wait { elapsed, caption } = &mut self.phase else {
            return None;
        };
        let active = self.active.as_ref()?;
        let timing = cx.timing;
        *elapsed += dt;
        let over = *elapsed >= timing.wait_ms;

        if *caption == Caption::Pending && *elapsed >= timing.caption_show_ms {
            let sketch = &active.sketch;
            if sketch.caption().is_none() && sketch.location().is_none() {
                *caption = Caption::Done;
            } else {
                log::info!(
                    "Caption for {}: {:?} at {:?}",
                    sketch.key(),
                    sketch.caption().unwrap_or_default(),
                    sketch.location().unwrap_or_default()
                );
                overlay.push(OverlayEvent::Show {
                    sketch: sketch.key().clone(),
                    caption: sketch.caption().map(ToOwned::to_owned),
                    location: sketch.location().map(ToOwned::to_owned),
                });
                *caption = Caption::Shown;
            }
        }
        // Never leave a caption up over the move.
        if *caption == Caption::Shown && (*elapsed >= timing.caption_hide_ms || over) {
            log::info!("Caption hidden");
            overlay.push(OverlayEvent::Hide);
            *caption = Caption::Done;
        }
        let scene = Scene::showing(active, active.geometry.vertex_count(), 1.0);

        if over {
            let offset = choose_displacement(cx.rng);
            log::debug!("Travelling by {offset:?}");
            self.enter(Phase::Move {
                elapsed: 0.0,
                offset,
                next: None,
            });
        }
        Some(scene)
    }
    fn travel<R: rand::Rng + ?Sized>(
        &mut self,
        dt: f32,
        cx: &mut StepContext<'_, R>,
    ) -> Option<Scene> {
        let Phase::Move {
            elapsed,
            offset,
            next,
        } = &mut self.phase
        else {
            return None;
        };
        *elapsed += dt;
        let t = progress(*elapsed, cx.timing.move_ms);

        // Picked as the pan starts, even if a long step skipped the pan entirely.
        if t >= PAN_START && next.is_none() {
            if let Some(sketch) = self.selector.select(cx.pool, cx.rng) {
                log::info!("Next up: {}", sketch.key());
                *next = Some(Active::prepare(sketch, cx.cache));
            }
        }

        let (view, scene) = if t < PAN_START {
            let s = remap(t, 0.0, PAN_START);
            let scene = self
                .active
                .as_ref()
                .map(|active| Scene::showing(active, active.geometry.vertex_count(), 1.0 - s))
                .unwrap_or_default();
            (ViewBounds::SETTLED.lerp(ViewBounds::EXPANDED, s), scene)
        } else if t < ZOOM_IN_START {
            let s = remap(t, PAN_START, ZOOM_IN_START);
            let view = ViewBounds::EXPANDED.translated([offset[0] * s, offset[1] * s]);
            (view, Scene::default())
        } else {
            // Past the pan, the view is relative to the destination window. The offset is a whole
            // number of cells, so the grid looks the same from here.
            let s = remap(t, ZOOM_IN_START, 1.0);
            let scene = Scene {
                tint: next.as_ref().map(|next| PaneTint {
                    color: next.geometry.background(),
                    alpha: s,
                }),
                stroke: None,
            };
            (ViewBounds::EXPANDED.lerp(ViewBounds::SETTLED, s), scene)
        };
        self.view = view;

        if t >= 1.0 {
            let queued = next.take();
            self.active = None;
            self.view = ViewBounds::SETTLED;
            self.enter(Phase::draw(queued));
        }
        Some(scene)
    }
}

/// Owns a [`SimulatorState`] along with everything it needs to step.
pub struct Simulator<R> {
    state: SimulatorState,
    cache: GeometryCache,
    rng: R,
    timing: Timing,
    fit: SketchFit,
    clock: FrameClock,
}
impl<R: rand::Rng> Simulator<R> {
    #[must_use]
    pub fn new(timing: Timing, fit: SketchFit, policy: SelectionPolicy, rng: R) -> Self {
        Self {
            state: SimulatorState::new(Selector::new(policy)),
            cache: GeometryCache::new(),
            rng,
            clock: FrameClock::new(timing.max_frame_ms),
            timing,
            fit,
        }
    }
    #[must_use]
    pub fn state(&self) -> &SimulatorState {
        &self.state
    }
    #[must_use]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }
    /// Step to the monotonic timestamp `now_ms`.
    pub fn tick(&mut self, now_ms: f64, pool: &SketchPool) -> Frame {
        let dt = self.clock.delta(now_ms);
        self.step(dt, pool)
    }
    /// Step by `dt` milliseconds, unclamped.
    pub fn step(&mut self, dt: f32, pool: &SketchPool) -> Frame {
        let mut cx = StepContext {
            pool,
            cache: &mut self.cache,
            rng: &mut self.rng,
            timing: &self.timing,
            fit: &self.fit,
        };
        let (state, frame) = std::mem::take(&mut self.state).advance(dt, &mut cx);
        self.state = state;
        frame
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        pool::Arrival,
        render::{RecordingSink, RenderSink, Topology},
        sketch::test::{record, sketch},
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const SQUARE: [f32; 8] = [0.0, 0.0, 400.0, 0.0, 400.0, 600.0, 0.0, 600.0];

    fn simulator(timing: Timing, policy: SelectionPolicy, seed: u64) -> Simulator<StdRng> {
        Simulator::new(
            timing,
            SketchFit::default(),
            policy,
            StdRng::seed_from_u64(seed),
        )
    }
    fn pool_of(keys: &[&str]) -> SketchPool {
        let mut pool = SketchPool::new();
        for key in keys {
            pool.insert(sketch(key, &SQUARE), Arrival::Historical)
                .unwrap();
        }
        pool
    }
    fn revealed(frame: &Frame) -> usize {
        frame.line_strip().map_or(0, |strip| strip.count)
    }
    /// Step until the phase changes to `kind`, returning the frames along the way.
    fn run_until(
        sim: &mut Simulator<StdRng>,
        pool: &SketchPool,
        kind: PhaseKind,
        dt: f32,
    ) -> Vec<Frame> {
        let mut frames = Vec::new();
        for _ in 0..100_000 {
            if sim.state().kind() == kind {
                return frames;
            }
            frames.push(sim.step(dt, pool));
        }
        panic!("never reached {}", kind.as_ref());
    }

    #[test]
    fn draw_timing_end_to_end() {
        let timing = Timing {
            draw_ms: 1000.0,
            ..Timing::default()
        };
        let pool = pool_of(&["1"]);
        let mut sim = simulator(timing, SelectionPolicy::Uniform, 0);

        assert_eq!(revealed(&sim.step(500.0, &pool)), 2);
        assert_eq!(sim.state().kind(), PhaseKind::Draw);
        assert_eq!(revealed(&sim.step(500.0, &pool)), 4);
        sim.step(1.0, &pool);
        assert_eq!(sim.state().kind(), PhaseKind::Wait);
    }
    #[test]
    fn empty_pool_idles() {
        let mut pool = SketchPool::new();
        let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, 0);
        for _ in 0..500 {
            let frame = sim.step(100.0, &pool);
            assert!(frame.queue.is_empty());
            assert_eq!(sim.state().kind(), PhaseKind::Draw);
            assert_eq!(sim.state().phase().elapsed(), 0.0);
        }
        // Degenerate sketches leave it idle too.
        pool.insert(sketch("1", &[3.0, 3.0]), Arrival::Live).unwrap();
        assert!(sim.step(100.0, &pool).queue.is_empty());
        assert!(sim.state().active().is_none());
    }
    #[test]
    fn displacement_never_zero() {
        let mut rng = StdRng::seed_from_u64(0xBEEF);
        for _ in 0..10_000 {
            let [x, y] = choose_displacement(&mut rng);
            assert!([-CELL_WIDTH, 0.0, CELL_WIDTH].contains(&x));
            assert!([-CELL_HEIGHT, 0.0, CELL_HEIGHT].contains(&y));
            assert_ne!([x, y], [0.0, 0.0]);
        }
    }
    #[test]
    fn move_keeps_view_in_bounds() {
        const EPSILON: f32 = 1e-3;
        let pool = pool_of(&["1", "2", "3"]);
        let settled = ViewBounds::SETTLED;
        for seed in 0..20 {
            let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, seed);
            let mut steps = StdRng::seed_from_u64(seed + 1000);
            for _cycle in 0..2 {
                run_until(&mut sim, &pool, PhaseKind::Move, 100.0);
                while sim.state().kind() == PhaseKind::Move {
                    let frame = sim.step(steps.gen_range(1.0..400.0), &pool);
                    let view = frame.view;
                    assert!(view.is_valid());
                    assert!(view.width() >= settled.width() - EPSILON);
                    assert!(view.width() <= 2.0 * settled.width() + EPSILON);
                    assert!(view.height() >= settled.height() - EPSILON);
                    assert!(view.height() <= 2.0 * settled.height() + EPSILON);
                }
                assert_eq!(sim.state().view(), settled);
            }
        }
    }
    #[test]
    fn reveal_is_monotonic() {
        let points: Vec<f32> = (0..200).map(|i| i as f32).collect();
        let mut pool = SketchPool::new();
        pool.insert(sketch("1", &points), Arrival::Historical)
            .unwrap();
        let mut steps = StdRng::seed_from_u64(42);
        let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, 0);

        let mut last = 0;
        let mut elapsed = 0.0;
        loop {
            let dt = steps.gen_range(0.0..250.0);
            let frame = sim.step(dt, &pool);
            elapsed += dt;
            let count = revealed(&frame);
            assert!(count >= last);
            last = count;
            if sim.state().kind() != PhaseKind::Draw {
                break;
            }
        }
        assert_eq!(last, 100);
        assert!(elapsed >= sim.timing().draw_ms);
    }
    #[test]
    fn queue_order_and_fit() {
        let pool = pool_of(&["1"]);
        let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, 0);
        let frame = sim.step(4000.0, &pool);
        assert_eq!(frame.queue.len(), 2);
        assert_eq!(frame.queue[0].topology, Topology::TriangleList);
        let strip = &frame.queue[1];
        assert_eq!(strip.topology, Topology::LineStrip);
        assert_eq!(strip.count, 2);
        assert_eq!(strip.alpha, 1.0);
        assert_eq!(strip.transform, SketchFit::default().transform());
        assert_eq!(frame.projection, ViewBounds::SETTLED.projection());
    }
    #[test]
    fn new_sketch_eligible_mid_wait() {
        let mut picked_new = 0;
        for seed in 0..200 {
            let mut pool = pool_of(&["1"]);
            let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, seed);
            run_until(&mut sim, &pool, PhaseKind::Wait, 100.0);
            pool.insert(sketch("2", &SQUARE), Arrival::Live).unwrap();
            run_until(&mut sim, &pool, PhaseKind::Draw, 100.0);
            sim.step(100.0, &pool);
            if sim.state().active().unwrap().key().as_str() == "2" {
                picked_new += 1;
            }
        }
        assert!((60..140).contains(&picked_new), "{picked_new}");
    }
    #[test]
    fn new_sketch_eligible_mid_zoom_out() {
        let mut picked_new = 0;
        for seed in 0..200 {
            let mut pool = pool_of(&["1"]);
            let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, seed);
            run_until(&mut sim, &pool, PhaseKind::Move, 100.0);
            // Still zooming out, the next sketch isn't chosen yet.
            let move_ms = sim.timing().move_ms;
            sim.step(move_ms / 8.0, &pool);
            assert_eq!(sim.state().kind(), PhaseKind::Move);
            pool.insert(sketch("2", &SQUARE), Arrival::Live).unwrap();
            run_until(&mut sim, &pool, PhaseKind::Draw, 100.0);
            sim.step(100.0, &pool);
            if sim.state().active().unwrap().key().as_str() == "2" {
                picked_new += 1;
            }
        }
        assert!((60..140).contains(&picked_new), "{picked_new}");
    }
    #[test]
    fn spotlight_shows_new_sketch_next() {
        let mut pool = pool_of(&["1", "2", "3"]);
        let mut sim = simulator(Timing::default(), SelectionPolicy::Spotlight, 9);
        run_until(&mut sim, &pool, PhaseKind::Move, 100.0);
        pool.insert(sketch("4", &SQUARE), Arrival::Live).unwrap();
        run_until(&mut sim, &pool, PhaseKind::Draw, 100.0);
        sim.step(100.0, &pool);
        assert_eq!(sim.state().active().unwrap().key().as_str(), "4");
    }
    #[test]
    fn caption_shown_then_hidden() {
        let mut raw = record(&SQUARE);
        raw.caption = Some("rain on the glass".to_owned());
        let mut pool = SketchPool::new();
        pool.insert(Sketch::from_record("1".into(), raw).unwrap(), Arrival::Historical)
            .unwrap();
        let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, 0);
        run_until(&mut sim, &pool, PhaseKind::Wait, 100.0);

        let frames = run_until(&mut sim, &pool, PhaseKind::Move, 100.0);
        let events: Vec<_> = frames
            .iter()
            .enumerate()
            .flat_map(|(idx, frame)| frame.overlay.iter().map(move |event| (idx, event)))
            .collect();
        assert_eq!(events.len(), 2);
        // 100ms steps, shown at 500ms and hidden at 5500ms into the hold.
        assert_eq!(events[0].0, 4);
        assert!(matches!(
            events[0].1,
            OverlayEvent::Show { caption: Some(c), location: None, .. } if c == "rain on the glass"
        ));
        assert_eq!(events[1].0, 54);
        assert_eq!(events[1].1, &OverlayEvent::Hide);
    }
    #[test]
    fn caption_hidden_by_end_of_hold() {
        let mut raw = record(&SQUARE);
        raw.location = Some("the harbour".to_owned());
        let mut pool = SketchPool::new();
        pool.insert(Sketch::from_record("1".into(), raw).unwrap(), Arrival::Historical)
            .unwrap();
        let wait_ms = Timing::default().wait_ms;
        // Hidden exactly as the hold ends, and scheduled past it.
        for caption_hide_ms in [wait_ms, 2.0 * wait_ms] {
            let timing = Timing {
                caption_hide_ms,
                ..Timing::default()
            };
            let mut sim = simulator(timing, SelectionPolicy::Uniform, 0);
            run_until(&mut sim, &pool, PhaseKind::Wait, 100.0);

            let mut sink = RecordingSink::default();
            while sim.state().kind() == PhaseKind::Wait {
                sink.submit(&sim.step(100.0, &pool)).unwrap();
            }
            assert_eq!(sim.state().kind(), PhaseKind::Move);
            let (last, earlier) = sink.frames.split_last().unwrap();
            assert_eq!(last.overlay.as_slice(), [OverlayEvent::Hide]);
            let shown = earlier
                .iter()
                .flat_map(|frame| frame.overlay.iter())
                .collect::<Vec<_>>();
            assert_eq!(shown.len(), 1);
            assert!(matches!(shown[0], OverlayEvent::Show { location: Some(l), .. } if l == "the harbour"));
            // No caption events once moving.
            let frame = sim.step(100.0, &pool);
            assert!(frame.overlay.is_empty());
        }
    }
    #[test]
    fn background_fades_through_move() {
        let pool = pool_of(&["1"]);
        let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, 0);
        run_until(&mut sim, &pool, PhaseKind::Move, 100.0);
        let move_ms = sim.timing().move_ms;

        // Halfway through zooming out.
        let frame = sim.step(move_ms / 8.0, &pool);
        assert_eq!(revealed(&frame), 4);
        assert!((frame.line_strip().unwrap().alpha - 0.5).abs() < 1e-5);
        // Panning, nothing but frames.
        let frame = sim.step(move_ms / 4.0, &pool);
        assert_eq!(frame.queue.len(), 1);
        assert_eq!(frame.view.width(), ViewBounds::EXPANDED.width());
        // End of move. Settled on the next window, its background fully in.
        let frame = sim.step(move_ms, &pool);
        assert_eq!(frame.view, ViewBounds::SETTLED);
        assert!(frame.line_strip().is_none());
        assert_eq!(sim.state().kind(), PhaseKind::Draw);
        assert!(sim.state().active().is_none());
    }
    #[test]
    fn first_tick_is_clamped() {
        let pool = pool_of(&["1"]);
        let mut sim = simulator(Timing::default(), SelectionPolicy::Uniform, 0);
        sim.tick(987_654.0, &pool);
        assert_eq!(sim.state().phase().elapsed(), sim.timing().max_frame_ms);
    }
}
