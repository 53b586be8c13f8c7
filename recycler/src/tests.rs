use crate::*;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_f64(&mut self, max: f64) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64 * max
    }
}

const WINDOW: ViewHandle = ViewHandle(1);
const SCROLLER: ViewHandle = ViewHandle(2);

fn assert_close(a: f64, b: f64) {
    let tol = 1e-9 * a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn probe_with_window(window: Rect) -> FrameTableProbe {
    let mut probe = FrameTableProbe::new();
    probe.set_frame(SCROLLER, Rect::new(0.0, 0.0, 300.0, 500.0));
    probe.set_frame(WINDOW, window);
    probe
}

fn cell(slot: usize, index: isize, frame: Rect) -> CellContainer {
    CellContainer::new(SlotIndex(slot), ViewHandle(100 + slot as u64))
        .with_index(index)
        .with_frame(frame)
}

fn viewport() -> Rect {
    Rect::new(0.0, 0.0, 300.0, 500.0)
}

fn recording_bus() -> (BlankAreaBus, Rc<RefCell<Vec<BlankAreaEvent>>>, Subscription) {
    let bus = BlankAreaBus::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sub = bus.add_listener({
        let events = Rc::clone(&events);
        move |e: &BlankAreaEvent| events.borrow_mut().push(*e)
    });
    (bus, events, sub)
}

fn coordinator(bus: BlankAreaBus) -> LayoutCoordinator {
    LayoutCoordinator::new(CoordinatorOptions::new(WINDOW, SCROLLER), bus)
}

#[test]
fn running_average_tracks_last_n_values() {
    let mut avg = RunningAverage::new(3);
    assert!(avg.is_empty());
    avg.add_value(1.0);
    avg.add_value(2.0);
    avg.add_value(3.0);
    assert_close(avg.current_value(), 2.0);

    avg.add_value(4.0);
    assert_eq!(avg.len(), 3);
    assert_close(avg.current_value(), 3.0);
    assert_eq!(avg.values().collect::<Vec<_>>(), [2.0, 3.0, 4.0]);
}

#[test]
fn running_average_equals_recomputed_mean() {
    let mut rng = Lcg::new(0x5eed);
    for capacity in 1..=12usize {
        let mut avg = RunningAverage::new(capacity);
        let mut inserted = Vec::new();
        let total = capacity + rng.gen_range_u64(0, 40) as usize;
        for _ in 0..total {
            let v = rng.gen_f64(1000.0);
            avg.add_value(v);
            inserted.push(v);

            let window = &inserted[inserted.len().saturating_sub(capacity)..];
            let expected = window.iter().sum::<f64>() / window.len() as f64;
            assert_close(avg.current_value(), expected);
        }
    }
}

#[test]
fn running_average_coerces_capacity_and_accepts_seed() {
    let mut avg = RunningAverage::new(0);
    assert_eq!(avg.capacity(), 1);
    avg.add_value(5.0);
    avg.add_value(9.0);
    assert_close(avg.current_value(), 9.0);

    let mut seeded = RunningAverage::with_seed(2, 10.0);
    assert_eq!(seeded.len(), 1);
    assert_close(seeded.current_value(), 10.0);
    seeded.add_value(20.0);
    assert_close(seeded.current_value(), 15.0);
    seeded.add_value(30.0);
    assert_close(seeded.current_value(), 25.0);

    let mut single = RunningAverage::with_seed(1, 4.0);
    single.add_value(8.0);
    assert_eq!(single.len(), 1);
    assert_close(single.current_value(), 8.0);
}

#[test]
fn render_time_tracker_clamps_average() {
    let mut t = RenderTimeTracker::default();
    assert_eq!(t.average_render_time(), 16);

    t.start_tracking(0);
    t.start_tracking(5);
    t.mark_render_complete(24);
    assert_close(t.raw_value(), 24.0);
    assert_eq!(t.average_render_time(), 24);

    t.start_tracking(100);
    t.mark_render_complete(200);
    assert_eq!(t.average_render_time(), 32);

    // Completing without a start is ignored.
    t.mark_render_complete(300);
    assert_close(t.raw_value(), 62.0);

    let disabled = RenderTimeTracker::new(RenderTimeConfig {
        enabled: false,
        ..RenderTimeConfig::default()
    });
    assert_eq!(disabled.average_render_time(), 16);
}

#[test]
fn velocity_is_assigned_to_scroll_axis() {
    let mut v = VelocityEstimator::new(0);
    let calls = RefCell::new(Vec::new());
    let record = |vel: Velocity, end: bool| calls.borrow_mut().push((vel, end));

    v.update(0.0, 0.0, Axis::Vertical, 0, record);
    let vel = v.update(70.0, 0.0, Axis::Vertical, 10, record);
    assert_eq!(vel, Velocity { x: 0.0, y: 7.0 });

    let vel = v.update(40.0, 70.0, Axis::Horizontal, 20, record);
    assert_eq!(vel, Velocity { x: -3.0, y: 0.0 });

    // Same-millisecond updates divide by one.
    let vel = v.update(50.0, 40.0, Axis::Horizontal, 20, record);
    assert_eq!(vel.main(Axis::Horizontal), 10.0);

    assert_eq!(calls.borrow().len(), 4);
    assert!(calls.borrow().iter().all(|(_, end)| !end));
}

#[test]
fn velocity_reports_momentum_end_once() {
    let mut v = VelocityEstimator::new(0);
    let calls = RefCell::new(Vec::new());
    let record = |vel: Velocity, end: bool| calls.borrow_mut().push((vel, end));

    v.update(0.0, 0.0, Axis::Vertical, 0, record);
    v.update(70.0, 0.0, Axis::Vertical, 10, record);
    assert!(v.is_tracking());

    assert!(!v.tick(60, record));
    assert!(v.tick(160, record));
    assert!(!v.tick(200, record));
    assert!(!v.tick(1000, record));

    let calls = calls.borrow();
    let ends: Vec<_> = calls.iter().filter(|(_, end)| *end).collect();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].0, Velocity::ZERO);
    assert_eq!(v.velocity(), Velocity::ZERO);
}

#[test]
fn velocity_update_rearms_and_cleanup_cancels() {
    let mut v = VelocityEstimator::new(0);
    let ends = Cell::new(0usize);
    let record = |_: Velocity, end: bool| {
        if end {
            ends.set(ends.get() + 1);
        }
    };

    v.update(10.0, 0.0, Axis::Vertical, 0, record);
    v.update(20.0, 10.0, Axis::Vertical, 90, record);
    // The first deadline (100) was replaced by 190.
    assert!(!v.tick(150, record));
    assert!(v.tick(190, record));
    assert_eq!(ends.get(), 1);

    v.update(30.0, 20.0, Axis::Vertical, 300, record);
    v.cleanup();
    v.cleanup();
    assert!(!v.is_tracking());
    assert!(!v.tick(1000, record));
    assert_eq!(ends.get(), 1);
}

#[test]
fn tracker_ignores_lists_without_overflowing_content() {
    let changes = Rc::new(Cell::new(0usize));
    let mut t = BlankAreaTracker::new(BlankAreaTrackerConfig::default()).with_on_change({
        let changes = Rc::clone(&changes);
        move |_: &BlankAreaStats| changes.set(changes.get() + 1)
    });

    t.on_event(&BlankAreaEvent::from_raw(100.0, 0.0), 500.0, 400.0, 0);
    for now in [1000u64, 1500, 2000] {
        assert!(!t.on_event(&BlankAreaEvent::from_raw(100.0, 300.0), 500.0, 500.0, now));
    }
    assert!(t.is_active());
    assert_eq!(t.stats(), BlankAreaStats::default());
    assert_eq!(changes.get(), 0);
}

#[test]
fn tracker_waits_for_warm_up() {
    let mut t = BlankAreaTracker::default();
    let e = BlankAreaEvent::from_raw(0.0, 100.0);

    assert!(!t.on_event(&e, 500.0, 1000.0, 10));
    assert!(!t.on_event(&e, 500.0, 1000.0, 400));
    assert!(!t.on_event(&e, 500.0, 1000.0, 1009));
    assert!(!t.is_active());
    assert_eq!(t.stats(), BlankAreaStats::default());

    t.tick(1010);
    assert!(t.is_active());
    assert!(t.on_event(&e, 500.0, 1000.0, 1011));
    assert_eq!(t.stats().max_blank_area, 100.0);
}

#[test]
fn tracker_updates_stats_and_notifies_only_on_change() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut t = BlankAreaTracker::new(BlankAreaTrackerConfig::default().with_start_delay_ms(0))
        .with_on_change({
            let seen = Rc::clone(&seen);
            move |s: &BlankAreaStats| seen.borrow_mut().push(*s)
        });

    // First event only arms the (zero-length) warm-up.
    t.on_event(&BlankAreaEvent::from_raw(50.0, 0.0), 500.0, 1000.0, 0);
    assert!(t.on_event(&BlankAreaEvent::from_raw(50.0, 0.0), 500.0, 1000.0, 0));
    assert_eq!(
        t.stats(),
        BlankAreaStats {
            max_blank_area: 50.0,
            cumulative_blank_area: 50.0,
        }
    );

    // No blank area: neither statistic moves, so no notification.
    assert!(!t.on_event(&BlankAreaEvent::from_raw(0.0, -20.0), 500.0, 1000.0, 5));
    assert_eq!(seen.borrow().len(), 1);

    // A smaller blank still adds to the cumulative total.
    assert!(t.on_event(&BlankAreaEvent::from_raw(0.0, 30.0), 500.0, 1000.0, 6));
    assert_eq!(t.stats().max_blank_area, 50.0);
    assert_eq!(t.stats().cumulative_blank_area, 80.0);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn tracker_can_sum_negative_values() {
    let config = BlankAreaTrackerConfig::default()
        .with_start_delay_ms(0)
        .with_sum_negative_values(true);
    let mut t = BlankAreaTracker::new(config);
    t.on_event(&BlankAreaEvent::empty(), 500.0, 1000.0, 0);

    assert!(t.on_event(&BlankAreaEvent::from_raw(-30.0, -10.0), 500.0, 1000.0, 1));
    assert_eq!(t.stats().max_blank_area, 0.0);
    assert_eq!(t.stats().cumulative_blank_area, -10.0);

    assert!(t.on_event(&BlankAreaEvent::from_raw(25.0, -10.0), 500.0, 1000.0, 2));
    assert_eq!(t.stats().max_blank_area, 25.0);
    assert_eq!(t.stats().cumulative_blank_area, 15.0);
}

#[test]
fn blank_area_event_uses_larger_edge() {
    let e = BlankAreaEvent::from_raw(30.0, 70.0);
    assert_eq!(e.blank_area, 70.0);

    let e = BlankAreaEvent::from_raw(-30.0, 10.0);
    assert_eq!(e.offset_start, 0.0);
    assert_eq!(e.blank_area, 10.0);
    assert_eq!(e.raw_blank_area(), 10.0);

    let e = BlankAreaEvent::from_raw(-30.0, -10.0);
    assert_eq!(e.blank_area, 0.0);
    assert_eq!(e.raw_blank_area(), -10.0);
}

#[test]
fn coordinator_reports_trailing_gap() {
    let (bus, events, _sub) = recording_bus();
    let mut c = coordinator(bus);
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 1000.0));
    let mut cells = [
        cell(0, 0, Rect::new(0.0, 0.0, 300.0, 230.0)),
        cell(1, 1, Rect::new(0.0, 230.0, 300.0, 230.0)),
    ];

    let outcome = c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);
    let event = outcome.event.unwrap();
    assert_eq!(event.offset_start, 0.0);
    assert_eq!(event.offset_end, 40.0);
    assert_eq!(event.blank_area, 40.0);
    assert_eq!(*events.borrow(), [event]);
    assert_eq!(c.rendered_bounds(), (0.0, 460.0));
    assert_eq!(c.last_event(), Some(event));
}

#[test]
fn coordinator_reports_leading_gap_below_header() {
    let (bus, _events, _sub) = recording_bus();
    let mut c = coordinator(bus);
    // The window starts 100px into the scrolled content, below a header.
    let probe = probe_with_window(Rect::new(0.0, 100.0, 300.0, 2000.0));
    let mut cells = [
        cell(0, 3, Rect::new(0.0, 400.0, 300.0, 300.0)),
        cell(1, 4, Rect::new(0.0, 700.0, 300.0, 300.0)),
    ];

    let event = c
        .on_layout_pass(&probe, &mut cells, viewport(), 400.0)
        .event
        .unwrap();
    // Visible content spans [300, 800) in window space; cells start at 400.
    assert_eq!(event.offset_start, 100.0);
    assert_eq!(event.offset_end, 0.0);
    assert_eq!(event.raw_offset_end, -200.0);
}

#[test]
fn coordinator_reports_whole_viewport_when_nothing_is_rendered() {
    let (bus, _events, _sub) = recording_bus();
    let mut c = coordinator(bus);
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 5000.0));
    let mut cells = [cell(0, 20, Rect::new(0.0, 2000.0, 300.0, 100.0))];

    let event = c
        .on_layout_pass(&probe, &mut cells, viewport(), 0.0)
        .event
        .unwrap();
    assert_eq!(event.blank_area, 500.0);
}

#[test]
fn coordinator_handles_horizontal_lists() {
    let (bus, _events, _sub) = recording_bus();
    let mut c = LayoutCoordinator::new(
        CoordinatorOptions::new(WINDOW, SCROLLER).with_axis(Axis::Horizontal),
        bus,
    );
    let mut probe = FrameTableProbe::new();
    probe.set_frame(SCROLLER, Rect::new(0.0, 0.0, 400.0, 100.0));
    probe.set_frame(WINDOW, Rect::new(0.0, 0.0, 3000.0, 100.0));
    let mut cells = [
        cell(0, 0, Rect::new(0.0, 0.0, 150.0, 100.0)),
        cell(1, 1, Rect::new(170.0, 0.0, 150.0, 100.0)),
    ];

    let event = c
        .on_layout_pass(&probe, &mut cells, Rect::new(0.0, 0.0, 400.0, 100.0), 0.0)
        .event
        .unwrap();
    // The 20px gap is closed before measuring.
    assert_eq!(cells[1].frame().x, 150.0);
    assert_eq!(event.offset_end, 100.0);
}

#[test]
fn coordinator_is_silent_without_listeners() {
    let bus = BlankAreaBus::new();
    let mut c = coordinator(bus.clone());
    assert!(!c.instrumentation_enabled());
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 1000.0));
    let mut cells = [cell(0, 0, Rect::new(0.0, 0.0, 300.0, 100.0))];

    assert_eq!(c.on_layout_pass(&probe, &mut cells, viewport(), 0.0).event, None);

    let sub = bus.add_listener(|_: &BlankAreaEvent| {});
    assert!(c.instrumentation_enabled());
    assert!(c.on_layout_pass(&probe, &mut cells, viewport(), 0.0).event.is_some());

    sub.unsubscribe();
    assert!(!c.instrumentation_enabled());
}

#[test]
fn coordinator_treats_missing_geometry_as_no_blank_area() {
    let (bus, events, _sub) = recording_bus();
    let mut c = coordinator(bus);
    let probe = FnProbe(|_: ViewHandle, _: ViewHandle| -> Option<Rect> { None });
    let mut cells = [cell(0, 0, Rect::new(0.0, 300.0, 300.0, 100.0))];

    let event = c
        .on_layout_pass(&probe, &mut cells, viewport(), 0.0)
        .event
        .unwrap();
    assert_eq!(event, BlankAreaEvent::empty());
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn coordinator_broadcasts_to_bus_then_instance_callback() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let bus = BlankAreaBus::new();
    for name in ["first", "second"] {
        let order = Rc::clone(&order);
        bus.add_listener(move |_: &BlankAreaEvent| order.borrow_mut().push(name));
    }
    let options = CoordinatorOptions::new(WINDOW, SCROLLER).with_on_blank_area(Some({
        let order = Rc::clone(&order);
        move |_: &BlankAreaEvent| order.borrow_mut().push("instance")
    }));
    let mut c = LayoutCoordinator::new(options, bus);
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 1000.0));
    let mut cells = [cell(0, 0, Rect::new(0.0, 0.0, 300.0, 100.0))];

    c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);
    assert_eq!(*order.borrow(), ["first", "second", "instance"]);
}

#[test]
fn coordinator_closes_gaps_and_overlaps_between_consecutive_cells() {
    let (bus, _events, _sub) = recording_bus();
    let mut c = coordinator(bus);
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 1000.0));
    // Passed out of order; the coordinator orders by data index, not by slot.
    let mut cells = [
        cell(0, 2, Rect::new(0.0, 130.0, 100.0, 100.0)),
        cell(1, 0, Rect::new(0.0, 0.0, 50.0, 100.0)),
        cell(2, 1, Rect::new(60.0, 10.0, 50.0, 100.0)),
        cell(3, 3, Rect::new(0.0, 180.0, 100.0, 100.0)),
        cell(4, 5, Rect::new(0.0, 400.0, 100.0, 100.0)),
    ];

    c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);

    // Grid neighbour snapped flush to the right and aligned to the row.
    assert_eq!(cells[2].frame().origin(), Point::new(50.0, 0.0));
    // Gap closed below the row.
    assert_eq!(cells[0].frame().y, 100.0);
    // Overlap removed.
    assert_eq!(cells[3].frame().y, 200.0);
    // Index 4 is missing, so index 5 is left alone.
    assert_eq!(cells[4].frame().y, 400.0);
    // The pool order itself is untouched.
    let slots: Vec<_> = cells.iter().map(|c| c.slot()).collect();
    assert_eq!(slots, (0..5).map(SlotIndex).collect::<Vec<_>>());
}

#[test]
fn coordinator_skips_correction_when_auto_layout_is_off() {
    let (bus, events, _sub) = recording_bus();
    let mut c = LayoutCoordinator::new(
        CoordinatorOptions::new(WINDOW, SCROLLER).with_auto_layout(false),
        bus,
    );
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 1000.0));
    let mut cells = [
        cell(0, 0, Rect::new(0.0, 0.0, 300.0, 100.0)),
        cell(1, 1, Rect::new(0.0, 150.0, 300.0, 100.0)),
    ];

    c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);
    assert_eq!(cells[1].frame().y, 150.0);
    assert_eq!(events.borrow()[0].offset_end, 250.0);
}

#[test]
fn coordinator_corrects_around_preserved_index() {
    let (bus, _events, _sub) = recording_bus();
    let mut c = LayoutCoordinator::new(
        CoordinatorOptions::new(WINDOW, SCROLLER).with_preserved_index(Some(5)),
        bus,
    );
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 5000.0));
    let mut cells = [
        cell(0, 4, Rect::new(0.0, 300.0, 100.0, 100.0)),
        cell(1, 5, Rect::new(0.0, 500.0, 100.0, 100.0)),
        cell(2, 6, Rect::new(0.0, 640.0, 100.0, 100.0)),
    ];

    c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);
    assert_eq!(cells[0].frame().y, 400.0);
    assert_eq!(cells[1].frame().y, 500.0);
    assert_eq!(cells[2].frame().y, 600.0);
}

#[test]
fn coordinator_moves_footer_to_content_end() {
    let bus = BlankAreaBus::new();
    let mut c = coordinator(bus);
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 400.0));
    let mut cells = [
        cell(0, 0, Rect::new(0.0, 0.0, 300.0, 230.0)),
        cell(1, 1, Rect::new(0.0, 230.0, 300.0, 230.0)),
        cell(2, FOOTER_INDEX, Rect::new(0.0, 400.0, 300.0, 50.0)),
    ];

    let outcome = c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);
    assert_eq!(outcome.footer_shift, 60.0);
    assert_eq!(cells[2].frame().y, 460.0);
    assert_eq!(c.max_bound_overall(), 460.0);
}

#[test]
fn footer_position_is_stable_across_identical_passes() {
    let mut c = coordinator(BlankAreaBus::new());
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 400.0));
    let mut cells = [
        cell(0, 0, Rect::new(0.0, 0.0, 300.0, 230.0)),
        cell(1, 1, Rect::new(0.0, 230.0, 300.0, 230.0)),
        cell(2, FOOTER_INDEX, Rect::new(0.0, 400.0, 300.0, 50.0)),
    ];

    for _ in 0..3 {
        let outcome = c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);
        assert_eq!(outcome.footer_shift, 60.0);
        assert_eq!(cells[2].frame().y, 460.0);
    }

    // Once the host grows the window by the shift there is nothing left to move.
    let probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 460.0));
    let outcome = c.on_layout_pass(&probe, &mut cells, viewport(), 0.0);
    assert_eq!(outcome.footer_shift, 0.0);
    assert_eq!(cells[2].frame().y, 460.0);
}

#[test]
fn coordinator_places_and_measures_cells() {
    let c = coordinator(BlankAreaBus::new());
    let provider = |index: usize| {
        (index < 10).then(|| ItemLayout {
            view_type: 0,
            rect: Rect::new(0.0, index as f64 * 50.0, 300.0, 50.0),
            estimated: true,
        })
    };
    let mut cells = [
        cell(0, 2, Rect::default()),
        cell(1, 42, Rect::default()),
        cell(2, FOOTER_INDEX, Rect::default()),
    ];
    assert_eq!(c.place_cells(&provider, &mut cells), 1);
    assert_eq!(cells[0].frame(), Rect::new(0.0, 100.0, 300.0, 50.0));

    let mut probe = probe_with_window(Rect::new(0.0, 0.0, 300.0, 1000.0));
    probe.set_frame(cells[0].handle(), Rect::new(0.0, 100.0, 300.0, 50.2));
    assert!(!c.apply_measurements(&probe, &mut cells));

    probe.set_frame(cells[0].handle(), Rect::new(0.0, 100.0, 300.0, 72.0));
    assert!(c.apply_measurements(&probe, &mut cells));
    assert_eq!(cells[0].frame(), Rect::new(0.0, 100.0, 300.0, 72.0));
}

#[test]
fn layout_extent_removes_cross_axis_padding() {
    let options = CoordinatorOptions::new(WINDOW, SCROLLER).with_content_padding(ContentPadding {
        padding: Some(8.0),
        padding_left: Some(20.0),
        ..ContentPadding::default()
    });
    let c = LayoutCoordinator::new(options, BlankAreaBus::new());
    assert_eq!(
        c.layout_extent(Size::new(300.0, 500.0)),
        Size::new(272.0, 500.0)
    );
}

#[test]
fn content_padding_resolution_precedence() {
    let insets = ContentPadding {
        padding: Some(4.0),
        padding_vertical: Some(10.0),
        padding_top: Some(0.0),
        padding_right: Some(2.0),
        ..ContentPadding::default()
    }
    .resolve();
    assert_eq!(
        insets,
        Insets {
            top: 0.0,
            bottom: 10.0,
            left: 4.0,
            right: 2.0,
        }
    );
    assert_eq!(ContentPadding::default().resolve(), Insets::default());
    assert_eq!(
        insets.deflate_cross(Size::new(100.0, 100.0), Axis::Horizontal),
        Size::new(100.0, 90.0)
    );
}

#[test]
fn pixel_grid_suppresses_sub_pixel_jitter() {
    let grid = PixelGrid::new(2.0);
    assert!(!grid.dimensions_differ(100.0, 100.2));
    assert!(grid.dimensions_differ(100.0, 100.3));
    assert_eq!(grid.round_to_nearest_pixel(10.26), 10.5);
    assert_eq!(PixelGrid::new(0.0), PixelGrid::default());
    assert_eq!(PixelGrid::new(f64::NAN).density(), 1.0);
}

#[test]
fn pixel_rounding_keeps_huge_values() {
    let grid = PixelGrid::default();
    assert_eq!(grid.round_to_nearest_pixel(1e19), 1e19);
    assert_eq!(grid.round_to_nearest_pixel(-1e19), -1e19);
    assert_eq!(grid.round_to_nearest_pixel(9_007_199_254_740_994.0), 9_007_199_254_740_994.0);
    assert_eq!(grid.round_to_nearest_pixel(-2.5), -3.0);
}

#[test]
fn frame_table_probe_measures_relative_to_ancestor() {
    let mut probe = FrameTableProbe::new();
    probe.set_frame(ViewHandle(1), Rect::new(10.0, 20.0, 100.0, 100.0));
    probe.set_frame(ViewHandle(2), Rect::new(15.0, 70.0, 30.0, 40.0));
    assert_eq!(
        probe.measure(ViewHandle(2), ViewHandle(1)),
        Some(Rect::new(5.0, 50.0, 30.0, 40.0))
    );
    assert_eq!(probe.measure(ViewHandle(3), ViewHandle(1)), None);
    probe.remove(ViewHandle(1));
    assert_eq!(probe.measure(ViewHandle(2), ViewHandle(1)), None);
}

#[test]
fn rect_clamps_negative_sizes() {
    let r = Rect::new(1.0, 2.0, -5.0, f64::NAN);
    assert_eq!(r.width, 0.0);
    assert_eq!(r.height, 0.0);
}

#[test]
fn unsubscribe_is_idempotent() {
    let bus = BlankAreaBus::new();
    let hits = Rc::new(Cell::new(0usize));
    let sub = bus.add_listener({
        let hits = Rc::clone(&hits);
        move |_: &BlankAreaEvent| hits.set(hits.get() + 1)
    });
    let other = bus.add_listener(|_: &BlankAreaEvent| {});
    assert_eq!(bus.listener_count(), 2);

    sub.unsubscribe();
    sub.unsubscribe();
    assert!(!sub.is_active());
    assert!(other.is_active());
    assert_eq!(bus.listener_count(), 1);

    bus.dispatch(&BlankAreaEvent::empty());
    assert_eq!(hits.get(), 0);
    assert_eq!(bus.listener_count(), 1);
}

#[test]
fn registry_changes_during_dispatch_apply_to_next_event() {
    let bus = BlankAreaBus::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    bus.add_listener({
        let log = Rc::clone(&log);
        let victim = Rc::clone(&victim);
        let bus = bus.clone();
        move |_: &BlankAreaEvent| {
            log.borrow_mut().push("remover");
            if let Some(sub) = victim.borrow_mut().take() {
                sub.unsubscribe();
            }
            let log = Rc::clone(&log);
            bus.add_listener(move |_: &BlankAreaEvent| log.borrow_mut().push("late"));
        }
    });
    *victim.borrow_mut() = Some(bus.add_listener({
        let log = Rc::clone(&log);
        move |_: &BlankAreaEvent| log.borrow_mut().push("victim")
    }));

    bus.dispatch(&BlankAreaEvent::empty());
    assert_eq!(*log.borrow(), ["remover", "victim"]);

    log.borrow_mut().clear();
    bus.dispatch(&BlankAreaEvent::empty());
    assert_eq!(*log.borrow(), ["remover", "late"]);
}

#[cfg(feature = "std")]
#[test]
fn panicking_listener_does_not_block_others() {
    let bus = BlankAreaBus::new();
    let hits = Rc::new(Cell::new(0usize));
    bus.add_listener(|_: &BlankAreaEvent| panic!("listener failure"));
    bus.add_listener({
        let hits = Rc::clone(&hits);
        move |_: &BlankAreaEvent| hits.set(hits.get() + 1)
    });

    bus.dispatch(&BlankAreaEvent::empty());
    bus.dispatch(&BlankAreaEvent::empty());
    assert_eq!(hits.get(), 2);
}

#[test]
fn staggered_decorator_keeps_slot_identity() {
    let mut wrapped = Staggered::new(cell(3, 7, Rect::new(0.0, 0.0, 10.0, 10.0)), 40);
    assert_eq!(wrapped.slot(), SlotIndex(3));
    assert_eq!(wrapped.index(), 7);
    assert_eq!(wrapped.delay_ms(), 120);

    wrapped.inner_mut().rebind(8);
    assert_eq!(wrapped.slot(), SlotIndex(3));
    assert_eq!(wrapped.index(), 8);

    let twice = Staggered::new(wrapped, 10);
    assert_eq!(twice.slot(), SlotIndex(3));
    assert_eq!(twice.handle(), ViewHandle(103));
}

#[test]
fn render_gate_renders_when_any_input_changes() {
    fn ids_differ(a: &u32, b: &u32) -> bool {
        a != b
    }
    let inputs = |data, ext, snap| RenderInputs {
        data,
        extended_state: Revision(ext),
        internal_snapshot: Revision(snap),
    };
    let mut gate = RenderGate::new(ids_differ);

    assert!(gate.should_render(inputs(1, 0, 0)));
    assert!(!gate.should_render(inputs(1, 0, 0)));
    assert!(gate.should_render(inputs(2, 0, 0)));
    assert!(gate.should_render(inputs(2, 1, 0)));
    assert!(gate.should_render(inputs(2, 1, 1)));
    assert!(!gate.should_render(inputs(2, 1, 1)));
}
