use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use recycler::{
    BlankAreaBus, BlankAreaEvent, BlankAreaListener, BlankAreaStats, BlankAreaTracker,
    CoordinatorOptions, LayoutCoordinator, LayoutPassOutcome, LayoutProbe, RecyclableCell, Rect,
    RenderTimeConfig, RenderTimeTracker, Velocity, VelocityEstimator, invoke_guarded,
};

/// What the tracker needs to know about the pass that produced an event.
#[derive(Debug)]
struct TrackerSlot {
    tracker: BlankAreaTracker,
    list_size: f64,
    content_size: f64,
    now_ms: u64,
}

/// A framework-neutral controller that wires the instrumentation of one list instance.
///
/// It owns the list's [`LayoutCoordinator`], an optional [`BlankAreaTracker`], a
/// [`VelocityEstimator`] and a [`RenderTimeTracker`], and holds no UI objects. Adapters drive it
/// by calling:
/// - `on_scroll` when the scroll container reports a new offset
/// - `on_layout_pass` after the host has laid out the content window
/// - `on_render_complete` when a render commits
/// - `tick(now_ms)` each frame or timer tick (momentum end and tracker warm-up)
///
/// When a tracker is attached, it is fed through the coordinator's per-instance callback, so it
/// sees exactly the events the shared bus sees.
pub struct Instrumentation {
    coordinator: LayoutCoordinator,
    tracker: Option<Rc<RefCell<TrackerSlot>>>,
    on_blank_area: Option<BlankAreaListener>,
    velocity: VelocityEstimator,
    render_time: RenderTimeTracker,
    scroll_offset: f64,
}

impl fmt::Debug for Instrumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumentation")
            .field("coordinator", &self.coordinator)
            .field("tracker", &self.tracker)
            .field("velocity", &self.velocity)
            .field("render_time", &self.render_time)
            .field("scroll_offset", &self.scroll_offset)
            .finish_non_exhaustive()
    }
}

impl Instrumentation {
    pub fn new(options: CoordinatorOptions, bus: BlankAreaBus, now_ms: u64) -> Self {
        let on_blank_area = options.on_blank_area.clone();
        Self {
            coordinator: LayoutCoordinator::new(options, bus),
            tracker: None,
            on_blank_area,
            velocity: VelocityEstimator::new(now_ms),
            render_time: RenderTimeTracker::default(),
            scroll_offset: 0.0,
        }
    }

    /// Attaches a blank-area tracker.
    ///
    /// Attaching a tracker turns instrumentation on even when the bus has no listeners.
    pub fn with_blank_area_tracker(mut self, tracker: BlankAreaTracker) -> Self {
        self.tracker = Some(Rc::new(RefCell::new(TrackerSlot {
            tracker,
            list_size: 0.0,
            content_size: 0.0,
            now_ms: 0,
        })));
        self.wire();
        self
    }

    pub fn with_render_time(mut self, config: RenderTimeConfig) -> Self {
        self.render_time = RenderTimeTracker::new(config);
        self
    }

    pub fn coordinator(&self) -> &LayoutCoordinator {
        &self.coordinator
    }

    /// Updates the coordinator options.
    ///
    /// `f` sees the host's own `on_blank_area` callback; the tracker stays wired either way.
    pub fn update_options(&mut self, f: impl FnOnce(&mut CoordinatorOptions)) {
        let own = self.on_blank_area.take();
        self.coordinator.update_options(|o| {
            o.on_blank_area = own;
            f(o);
        });
        self.on_blank_area = self.coordinator.options().on_blank_area.clone();
        self.wire();
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity.velocity()
    }

    pub fn average_render_time(&self) -> u64 {
        self.render_time.average_render_time()
    }

    /// Current tracker statistics, or `None` when no tracker is attached.
    pub fn blank_area_stats(&self) -> Option<BlankAreaStats> {
        self.tracker.as_ref().map(|slot| slot.borrow().tracker.stats())
    }

    /// Call this when the scroll container reports a new offset.
    ///
    /// Updates the velocity estimate and starts timing the render the scroll will cause.
    pub fn on_scroll(
        &mut self,
        scroll_offset: f64,
        now_ms: u64,
        on_velocity: impl FnMut(Velocity, bool),
    ) -> Velocity {
        let axis = self.coordinator.options().axis;
        let old = self.scroll_offset;
        self.scroll_offset = scroll_offset;
        self.render_time.start_tracking(now_ms);
        self.velocity.update(scroll_offset, old, axis, now_ms, on_velocity)
    }

    /// Runs a coordinator layout pass at the last reported scroll offset.
    ///
    /// `content_size` is the total scrollable size along the scroll axis; the tracker ignores
    /// events while it does not exceed the viewport.
    pub fn on_layout_pass<C, P>(
        &mut self,
        probe: &P,
        cells: &mut [C],
        viewport: Rect,
        content_size: f64,
        now_ms: u64,
    ) -> LayoutPassOutcome
    where
        C: RecyclableCell,
        P: LayoutProbe + ?Sized,
    {
        if let Some(slot) = &self.tracker {
            let mut slot = slot.borrow_mut();
            slot.list_size = viewport.main_size(self.coordinator.options().axis);
            slot.content_size = content_size;
            slot.now_ms = now_ms;
        }
        self.coordinator
            .on_layout_pass(probe, cells, viewport, self.scroll_offset)
    }

    /// Call this when a render commits. Returns the updated average render time.
    pub fn on_render_complete(&mut self, now_ms: u64) -> u64 {
        self.render_time.mark_render_complete(now_ms);
        self.render_time.average_render_time()
    }

    /// Advances timers.
    ///
    /// Returns `true` if momentum ended during this tick.
    pub fn tick(&mut self, now_ms: u64, on_velocity: impl FnMut(Velocity, bool)) -> bool {
        if let Some(slot) = &self.tracker {
            slot.borrow_mut().tracker.tick(now_ms);
        }
        self.velocity.tick(now_ms, on_velocity)
    }

    /// Drops pending timers. Call this when the list goes away.
    pub fn teardown(&mut self) {
        self.velocity.cleanup();
        adebug!("Instrumentation: teardown");
    }

    fn wire(&mut self) {
        let own = self.on_blank_area.clone();
        let listener: Option<BlankAreaListener> = match &self.tracker {
            None => own,
            Some(slot) => {
                let slot = Rc::clone(slot);
                // Tracker and host callback are guarded separately.
                Some(Rc::new(move |event: &BlankAreaEvent| {
                    invoke_guarded(
                        &|event: &BlankAreaEvent| {
                            if let Ok(mut slot) = slot.try_borrow_mut() {
                                let TrackerSlot {
                                    tracker,
                                    list_size,
                                    content_size,
                                    now_ms,
                                } = &mut *slot;
                                tracker.on_event(event, *list_size, *content_size, *now_ms);
                            }
                        },
                        event,
                    );
                    if let Some(own) = &own {
                        invoke_guarded(&**own, event);
                    }
                }))
            }
        };
        self.coordinator.update_options(|o| o.on_blank_area = listener);
    }
}
