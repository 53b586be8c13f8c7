use recycler::Point;
use recycler_adapter::auto_scroll;

fn main() {
    // Example: scripted fling for a scroll benchmark.
    //
    // An adapter would:
    // - start the scroll from the list's current offset
    // - call frame(now_ms, ..) from its frame callback
    // - forward each (x, y) to the real scroll container
    let (mut animator, cancel) = auto_scroll(
        |x, y, _| println!("jump to x={x} y={y}"),
        Point::new(0.0, 0.0),
        Point::new(0.0, 5_000.0),
        1.5,
        0,
    );

    let mut now_ms = 0u64;
    loop {
        now_ms += 16;
        if now_ms == 320 {
            // Stop early to show that the scroll resolves with `false`.
            cancel.cancel();
        }
        let status = animator.frame(now_ms, |x, y, _| {
            if now_ms % 80 == 0 {
                println!("t={now_ms} x={x} y={y}");
            }
        });
        if let Some(arrived) = status.outcome() {
            println!("done at t={now_ms}: arrived={arrived}");
            break;
        }
    }
}
