// Example: one layout pass with a gap at the bottom of the viewport.
use recycler::{
    BlankAreaBus, BlankAreaEvent, CellContainer, CoordinatorOptions, FrameTableProbe,
    LayoutCoordinator, RecyclableCell, Rect, SlotIdentity, SlotIndex, ViewHandle,
};

fn main() {
    let window = ViewHandle(1);
    let scroller = ViewHandle(2);

    let mut probe = FrameTableProbe::new();
    probe.set_frame(scroller, Rect::new(0.0, 0.0, 300.0, 500.0));
    probe.set_frame(window, Rect::new(0.0, 0.0, 300.0, 4000.0));

    let bus = BlankAreaBus::new();
    let _sub = bus.add_listener(|e: &BlankAreaEvent| {
        println!(
            "blank: start={} end={} area={}",
            e.offset_start, e.offset_end, e.blank_area
        );
    });

    let mut coordinator = LayoutCoordinator::new(CoordinatorOptions::new(window, scroller), bus);

    // Estimated sizes left a 10px gap and an overlap; the pass snaps them together.
    let mut cells = [
        CellContainer::new(SlotIndex(0), ViewHandle(10))
            .with_index(3)
            .with_frame(Rect::new(0.0, 200.0, 300.0, 120.0)),
        CellContainer::new(SlotIndex(1), ViewHandle(11))
            .with_index(4)
            .with_frame(Rect::new(0.0, 330.0, 300.0, 120.0)),
        CellContainer::new(SlotIndex(2), ViewHandle(12))
            .with_index(5)
            .with_frame(Rect::new(0.0, 440.0, 300.0, 120.0)),
    ];

    let viewport = Rect::new(0.0, 0.0, 300.0, 500.0);
    let outcome = coordinator.on_layout_pass(&probe, &mut cells, viewport, 150.0);
    for c in &cells {
        println!("slot={:?} frame={:?}", c.slot(), c.frame());
    }
    println!("rendered_bounds={:?}", coordinator.rendered_bounds());
    println!("event={:?}", outcome.event);
}
