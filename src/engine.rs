use std::collections::HashMap;

use tracing::debug;

use crate::camera::{Camera, Circle, Point, Size};
use crate::config::{CanvasConfig, ConfigError};
use crate::consts::FRAME_MS;
use crate::hit;
use crate::input::{Effect, GestureState, PointerEvent};
use crate::layout::{LayoutEngine, LayoutOutcome, LayoutReport};
use crate::render::BubbleSprite;
use crate::sim::{Simulator, TickOutcome};
use crate::sizing::{Theme, color_of};
use crate::store::PositionStore;
use crate::task::{Task, TaskId, TaskStatus};
use crate::timer::{TimerKind, Timers};
use crate::viewport::{Bounds, ViewportController};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A tap completed on this bubble.
    Selected(TaskId),
    /// A long-press was confirmed on this bubble.
    StatusCycle(TaskId),
    /// Positions or the camera changed; redraw.
    RenderNeeded,
}

/// Host callbacks fired by [`Engine`].
pub trait BubbleHost {
    /// Fired once per completed tap.
    fn on_bubble_selected(&mut self, id: &str);

    /// Fired once when a long-press is confirmed.
    fn on_bubble_status_cycle(&mut self, id: &str);

    /// The scene changed. Hosts that redraw on their own frame clock can ignore this.
    fn on_render_needed(&mut self) {}
}

/// Core engine state: layout, simulation, gestures and viewport, with no platform ties.
///
/// Every entry point takes the current time in milliseconds, first fires any
/// timer already due at that time, then handles its own input. Handlers run to
/// completion; nothing here blocks or yields.
pub struct EngineCore {
    config: CanvasConfig,
    theme: Theme,
    tasks: Vec<Task>,
    radii: HashMap<TaskId, f64>,
    store: PositionStore,
    layout: LayoutEngine,
    last_layout: Option<LayoutReport>,
    sim: Simulator,
    viewport: ViewportController,
    gesture: GestureState,
    timers: Timers,
    /// Bubble count at the last automatic recenter.
    last_count: Option<usize>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::build(CanvasConfig::default(), 0)
    }
}

impl EngineCore {
    /// # Errors
    ///
    /// Returns the first invalid field of `config`.
    pub fn new(config: CanvasConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, 0)
    }

    /// Like [`EngineCore::new`], with an explicit seed for the simulator's tie-breaking.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field of `config`.
    pub fn with_seed(config: CanvasConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: CanvasConfig, seed: u64) -> Self {
        Self {
            config,
            theme: Theme::default(),
            tasks: Vec::new(),
            radii: HashMap::new(),
            store: PositionStore::new(),
            layout: LayoutEngine::new(),
            last_layout: None,
            sim: Simulator::new(seed),
            viewport: ViewportController::new(),
            gesture: GestureState::default(),
            timers: Timers::new(),
            last_count: None,
        }
    }

    // --- Data inputs ---

    /// Replace the task list and re-run layout.
    pub fn set_tasks(&mut self, now: f64, tasks: Vec<Task>) -> Vec<Action> {
        let mut actions = self.advance(now);
        self.tasks = tasks;
        self.radii = self
            .tasks
            .iter()
            .filter_map(|t| Some((t.layout_id()?.to_owned(), t.radius())))
            .collect();

        let lost = self.gesture.touched().is_some_and(|id| !self.radii.contains_key(id));
        if lost {
            debug!("touched task removed; cancelling gesture");
            let effects = self.gesture.cancel();
            self.apply_effects(now, effects, &mut actions);
        }

        self.run_layout(now);
        self.ensure_ticking(now);
        push_render(&mut actions);
        actions
    }

    /// Record the measured viewport size. Re-flows and recenters when it changes.
    pub fn set_viewport(&mut self, now: f64, width: f64, height: f64) -> Vec<Action> {
        let mut actions = self.advance(now);
        if !self.viewport.set_size(Size::new(width, height)) {
            return actions;
        }
        if self.viewport.is_measured() {
            self.run_layout(now);
            self.recenter(now);
        }
        self.ensure_ticking(now);
        push_render(&mut actions);
        actions
    }

    /// The user-facing recenter control.
    pub fn request_recenter(&mut self, now: f64) -> Vec<Action> {
        let mut actions = self.advance(now);
        if self.recenter(now) {
            push_render(&mut actions);
        }
        actions
    }

    /// Pinch zoom: set the scale (clamped to the configured range) about a screen anchor.
    pub fn zoom_about(&mut self, now: f64, anchor: Point, scale: f64) -> Vec<Action> {
        let mut actions = self.advance(now);
        if !self.viewport.is_measured() {
            return actions;
        }
        self.viewport.zoom_about(anchor, scale, self.config.min_scale, self.config.max_scale);
        self.timers.cancel(TimerKind::AnimationFrame);
        push_render(&mut actions);
        actions
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    // --- Input events ---

    /// Route a raw pointer event to the matching handler.
    pub fn on_pointer(&mut self, now: f64, event: PointerEvent) -> Vec<Action> {
        match event {
            PointerEvent::Down { x, y } => self.on_pointer_down(now, Point::new(x, y)),
            PointerEvent::Move { x, y } => self.on_pointer_move(now, Point::new(x, y)),
            PointerEvent::Up { x, y } => self.on_pointer_up(now, Point::new(x, y)),
            PointerEvent::Cancel => self.on_pointer_cancel(now),
        }
    }

    pub fn on_pointer_down(&mut self, now: f64, screen_pt: Point) -> Vec<Action> {
        let mut actions = self.advance(now);
        let Some(canvas_pt) = self.viewport.screen_to_canvas(screen_pt) else {
            debug!("pointer down ignored: viewport not measured");
            return actions;
        };
        let hit = hit::hit_test(canvas_pt, &self.store, &self.radii);
        let effects = self.gesture.pointer_down(screen_pt, hit);
        self.apply_effects(now, effects, &mut actions);
        actions
    }

    pub fn on_pointer_move(&mut self, now: f64, screen_pt: Point) -> Vec<Action> {
        let mut actions = self.advance(now);
        let effects = self.gesture.pointer_move(screen_pt, self.config.move_threshold_px);
        self.apply_effects(now, effects, &mut actions);
        actions
    }

    pub fn on_pointer_up(&mut self, now: f64, screen_pt: Point) -> Vec<Action> {
        let mut actions = self.advance(now);
        let effects = self.gesture.pointer_up(screen_pt, self.config.move_threshold_px);
        self.apply_effects(now, effects, &mut actions);
        actions
    }

    /// The platform terminated the gesture. Treated as a release without a tap.
    pub fn on_pointer_cancel(&mut self, now: f64) -> Vec<Action> {
        let mut actions = self.advance(now);
        let effects = self.gesture.cancel();
        self.apply_effects(now, effects, &mut actions);
        actions
    }

    // --- Time ---

    /// Fire every timer due at `now`, earliest first.
    pub fn advance(&mut self, now: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        for kind in self.timers.take_due(now) {
            match kind {
                TimerKind::LongPress => {
                    let effects = self.gesture.long_press_elapsed();
                    self.apply_effects(now, effects, &mut actions);
                }
                TimerKind::SimTick => {
                    if self.tick(now) {
                        push_render(&mut actions);
                    }
                }
                TimerKind::AnimationFrame => {
                    if let Some(bounds) = Bounds::of_circles(self.circles()) {
                        self.viewport.retarget(bounds);
                    }
                    if self.viewport.step_animation(now) {
                        self.timers.schedule(TimerKind::AnimationFrame, now + FRAME_MS);
                    }
                    push_render(&mut actions);
                }
                TimerKind::LayoutRetry => {
                    if self.run_layout(now) {
                        push_render(&mut actions);
                    }
                }
                TimerKind::RecenterRetry => {
                    if self.recenter(now) {
                        push_render(&mut actions);
                    }
                }
            }
        }
        actions
    }

    /// Repeatedly [`advance`](Self::advance) through every deadline up to `until`.
    ///
    /// Virtual-time helper for replays and tests.
    pub fn run_until(&mut self, until: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Some(deadline) = self.next_deadline()
            && deadline <= until
        {
            for action in self.advance(deadline) {
                if action != Action::RenderNeeded || !actions.contains(&Action::RenderNeeded) {
                    actions.push(action);
                }
            }
        }
        actions
    }

    /// When the host should next call [`advance`](Self::advance).
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.viewport.camera()
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The task with this id, if present.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.layout_id() == Some(id))
    }

    /// The status the default host transition would move this task to.
    #[must_use]
    pub fn next_status(&self, id: &str) -> Option<TaskStatus> {
        self.task(id).map(|t| t.status.cycled())
    }

    /// Center of a bubble in canvas space.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<Point> {
        self.store.get(id)
    }

    /// Every placed bubble's center, sorted by id.
    #[must_use]
    pub fn positions(&self) -> Vec<(TaskId, Point)> {
        let mut out: Vec<(TaskId, Point)> = self.store.iter().map(|(id, p)| (id.to_owned(), p)).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// What the most recent applied layout pass did.
    #[must_use]
    pub fn last_layout(&self) -> Option<&LayoutReport> {
        self.last_layout.as_ref()
    }

    /// Bubbles to draw, bottom first.
    #[must_use]
    pub fn scene(&self) -> Vec<BubbleSprite> {
        let by_id: HashMap<&str, &Task> = self.tasks.iter().filter_map(|t| Some((t.layout_id()?, t))).collect();
        let held = self.gesture.held();
        self.store
            .draw_order()
            .into_iter()
            .filter_map(|id| {
                let task = by_id.get(id)?;
                let center = self.store.get(id)?;
                Some(BubbleSprite::new(
                    task,
                    id,
                    Circle::new(center, task.radius()),
                    color_of(task.status, self.theme),
                    held == Some(id),
                ))
            })
            .collect()
    }

    // --- Internals ---

    /// Lay out the current tasks. Returns true if anything changed.
    fn run_layout(&mut self, now: f64) -> bool {
        match self.layout.layout(&self.tasks, &mut self.store, self.viewport.size(), &self.config) {
            LayoutOutcome::Deferred => {
                self.timers.schedule(TimerKind::LayoutRetry, now + self.config.defer_retry_ms);
                false
            }
            LayoutOutcome::Applied(report) => {
                self.timers.cancel(TimerKind::LayoutRetry);
                let changed = report.changed();
                self.last_layout = Some(report);

                let count = self.store.len();
                if self.last_count != Some(count) {
                    self.last_count = Some(count);
                    self.recenter(now);
                }
                changed
            }
        }
    }

    /// Start a recenter animation. Returns true if one started.
    fn recenter(&mut self, now: f64) -> bool {
        if !self.viewport.is_measured() {
            debug!("recenter deferred: viewport not measured");
            self.timers.schedule(TimerKind::RecenterRetry, now + self.config.defer_retry_ms);
            return false;
        }
        self.timers.cancel(TimerKind::RecenterRetry);
        let Some(bounds) = Bounds::of_circles(self.circles()) else {
            return false;
        };
        if !self.viewport.begin_recenter(bounds, now, self.config.recenter_ms) {
            return false;
        }
        self.timers.schedule(TimerKind::AnimationFrame, now + FRAME_MS);
        true
    }

    fn circles(&self) -> Vec<Circle> {
        self.store
            .iter()
            .filter_map(|(id, center)| Some(Circle::new(center, *self.radii.get(id)?)))
            .collect()
    }

    fn ensure_ticking(&mut self, now: f64) {
        if !self.timers.is_armed(TimerKind::SimTick) {
            self.timers.schedule(TimerKind::SimTick, now + self.config.tick_ms);
        }
    }

    /// One repulsion tick. Always re-arms; returns true if any bubble moved.
    fn tick(&mut self, now: f64) -> bool {
        self.timers.schedule(TimerKind::SimTick, now + self.config.tick_ms);
        if !self.viewport.is_measured() {
            return false;
        }
        let mut bodies: Vec<(&str, f64)> = self.radii.iter().map(|(id, r)| (id.as_str(), *r)).collect();
        bodies.sort_by(|a, b| a.0.cmp(b.0));
        let outcome = self.sim.step(&mut self.store, &bodies, self.gesture.held(), &self.config);
        matches!(outcome, TickOutcome::Relaxed { moved, .. } if moved > 0)
    }

    fn apply_effects(&mut self, now: f64, effects: Vec<Effect>, actions: &mut Vec<Action>) {
        for effect in effects {
            match effect {
                Effect::ArmLongPress => {
                    self.timers.schedule(TimerKind::LongPress, now + self.config.long_press_ms);
                }
                Effect::CancelLongPress => {
                    self.timers.cancel(TimerKind::LongPress);
                }
                Effect::Select(id) => actions.push(Action::Selected(id)),
                Effect::BeginDrag(id) => {
                    self.store.raise_to_top(&id);
                    actions.push(Action::StatusCycle(id));
                    push_render(actions);
                }
                Effect::DragBy { id, delta } => {
                    let delta = self.viewport.screen_delta_to_canvas(delta);
                    if self.store.translate(&id, delta) {
                        push_render(actions);
                    }
                }
                Effect::PanBy(delta) => {
                    self.viewport.pan_by(delta);
                    self.timers.cancel(TimerKind::AnimationFrame);
                    push_render(actions);
                }
            }
        }
    }
}

fn push_render(actions: &mut Vec<Action>) {
    if !actions.contains(&Action::RenderNeeded) {
        actions.push(Action::RenderNeeded);
    }
}

/// The full engine: an [`EngineCore`] plus the host that receives its callbacks.
pub struct Engine<H: BubbleHost> {
    pub core: EngineCore,
    host: H,
}

impl<H: BubbleHost> Engine<H> {
    /// # Errors
    ///
    /// Returns the first invalid field of `config`.
    pub fn new(config: CanvasConfig, host: H) -> Result<Self, ConfigError> {
        Ok(Self { core: EngineCore::new(config)?, host })
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    // --- Delegated inputs ---

    pub fn set_tasks(&mut self, now: f64, tasks: Vec<Task>) {
        let actions = self.core.set_tasks(now, tasks);
        self.dispatch(actions);
    }

    pub fn set_viewport(&mut self, now: f64, width: f64, height: f64) {
        let actions = self.core.set_viewport(now, width, height);
        self.dispatch(actions);
    }

    pub fn request_recenter(&mut self, now: f64) {
        let actions = self.core.request_recenter(now);
        self.dispatch(actions);
    }

    pub fn on_pointer(&mut self, now: f64, event: PointerEvent) {
        let actions = self.core.on_pointer(now, event);
        self.dispatch(actions);
    }

    pub fn advance(&mut self, now: f64) {
        let actions = self.core.advance(now);
        self.dispatch(actions);
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.core.next_deadline()
    }

    #[must_use]
    pub fn scene(&self) -> Vec<BubbleSprite> {
        self.core.scene()
    }

    /// Forward actions produced by the core to the host callbacks.
    pub fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Selected(id) => self.host.on_bubble_selected(&id),
                Action::StatusCycle(id) => self.host.on_bubble_status_cycle(&id),
                Action::RenderNeeded => self.host.on_render_needed(),
            }
        }
    }
}
