use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Unrendered distance at both edges of the viewport after one layout pass.
///
/// `offset_start`, `offset_end` and `blank_area` are clamped to zero. The raw signed values are
/// kept for diagnostics: a negative raw offset is how far rendered content extends past that
/// viewport edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlankAreaEvent {
    pub offset_start: f64,
    pub offset_end: f64,
    pub blank_area: f64,
    pub raw_offset_start: f64,
    pub raw_offset_end: f64,
}

impl BlankAreaEvent {
    /// Builds an event from raw signed edge distances.
    ///
    /// The blank area is the larger edge, not the sum of both.
    pub fn from_raw(raw_offset_start: f64, raw_offset_end: f64) -> Self {
        let offset_start = clamp_zero(raw_offset_start);
        let offset_end = clamp_zero(raw_offset_end);
        Self {
            offset_start,
            offset_end,
            blank_area: offset_start.max(offset_end),
            raw_offset_start,
            raw_offset_end,
        }
    }

    /// The event reported when the host has no geometry for a pass.
    pub fn empty() -> Self {
        Self::from_raw(0.0, 0.0)
    }

    /// Signed blank area: the larger raw edge, negative when both edges are over-rendered.
    pub fn raw_blank_area(&self) -> f64 {
        self.raw_offset_start.max(self.raw_offset_end)
    }
}

fn clamp_zero(v: f64) -> f64 {
    if v > 0.0 { v } else { 0.0 }
}

/// A blank-area listener.
pub type BlankAreaListener = Rc<dyn Fn(&BlankAreaEvent)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(ListenerId, BlankAreaListener)>,
    // Removals are applied lazily at the start of the next dispatch.
    removed: Vec<ListenerId>,
}

impl Registry {
    fn is_live(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(e, _)| *e == id) && !self.removed.contains(&id)
    }

    fn live_count(&self) -> usize {
        self.entries.len() - self.removed.len()
    }

    fn compact(&mut self) {
        if self.removed.is_empty() {
            return;
        }
        let removed = core::mem::take(&mut self.removed);
        self.entries.retain(|(id, _)| !removed.contains(id));
    }
}

/// Fan-out channel for blank-area events.
///
/// One bus is created by the application root and handed to every list that should report into
/// it. Cloning the bus shares the same registry. Listeners run in registration order.
///
/// Registration is safe during dispatch: a listener added while an event is being delivered
/// first sees the next event, and a listener removed while an event is being delivered still
/// receives the current one.
#[derive(Clone, Default)]
pub struct BlankAreaBus {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for BlankAreaBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlankAreaBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl BlankAreaBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: impl Fn(&BlankAreaEvent) + 'static) -> Subscription {
        let mut reg = self.registry.borrow_mut();
        let id = ListenerId(reg.next_id);
        reg.next_id = reg.next_id.wrapping_add(1);
        reg.entries.push((id, Rc::new(listener)));
        rtrace!(id = id.0, "BlankAreaBus::add_listener");
        Subscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().live_count()
    }

    pub fn has_listeners(&self) -> bool {
        self.listener_count() > 0
    }

    /// Delivers `event` to every listener registered before this call.
    pub fn dispatch(&self, event: &BlankAreaEvent) {
        let snapshot: Vec<BlankAreaListener> = {
            let mut reg = self.registry.borrow_mut();
            reg.compact();
            reg.entries.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        for listener in &snapshot {
            invoke_guarded(&**listener, event);
        }
    }
}

/// Handle returned by [`BlankAreaBus::add_listener`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: ListenerId,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id.0)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    /// Removes the listener. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut reg = registry.borrow_mut();
        if reg.is_live(self.id) {
            reg.removed.push(self.id);
            rtrace!(id = self.id.0, "Subscription::unsubscribe");
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().is_live(self.id))
    }
}

/// Runs one blank-area callback. With `std`, a panicking callback is logged and skipped so the
/// remaining callbacks and the layout pass are unaffected.
///
/// Hosts that fan one event out to several callbacks of their own should guard each of them.
///
/// Returns `false` if the listener panicked.
#[cfg(feature = "std")]
pub fn invoke_guarded(listener: &dyn Fn(&BlankAreaEvent), event: &BlankAreaEvent) -> bool {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| listener(event)));
    if outcome.is_err() {
        rwarn!(
            blank_area = event.blank_area,
            "blank-area listener panicked; skipping it"
        );
        return false;
    }
    true
}

#[cfg(not(feature = "std"))]
pub fn invoke_guarded(listener: &dyn Fn(&BlankAreaEvent), event: &BlankAreaEvent) -> bool {
    listener(event);
    true
}
