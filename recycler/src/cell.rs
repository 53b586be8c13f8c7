use crate::{PixelGrid, Rect, SlotIndex, ViewHandle};

/// Data index carried by the footer cell.
pub const FOOTER_INDEX: isize = -1;

/// Anything that exposes the pool identity of a physical cell.
///
/// Decorators (entrance animations, diagnostics overlays) implement this by forwarding to the
/// wrapped cell, so callers that target physical views keep working through any number of
/// wrappers.
pub trait SlotIdentity {
    fn slot(&self) -> SlotIndex;
}

/// The geometry-facing side of a recycled cell, as seen by the layout coordinator.
pub trait RecyclableCell: SlotIdentity {
    fn handle(&self) -> ViewHandle;

    /// Data index currently rendered by the cell, or [`FOOTER_INDEX`].
    fn index(&self) -> isize;

    fn frame(&self) -> Rect;

    fn frame_mut(&mut self) -> &mut Rect;

    /// Applies a measured size if it differs from the current one on the pixel grid.
    ///
    /// Returns `true` when the frame changed. The origin is kept.
    fn apply_measured_size(&mut self, measured: Rect, grid: &PixelGrid) -> bool {
        let frame = self.frame();
        let width_changed = grid.dimensions_differ(frame.width, measured.width);
        let height_changed = grid.dimensions_differ(frame.height, measured.height);
        if !(width_changed || height_changed) {
            return false;
        }
        *self.frame_mut() = Rect::new(
            frame.x,
            frame.y,
            grid.round_to_nearest_pixel(measured.width),
            grid.round_to_nearest_pixel(measured.height),
        );
        true
    }
}

/// A recycled view: a stable slot identity plus whatever the host renders into it.
///
/// `props` is the host's presentation payload and is never inspected by the recycler.
#[derive(Clone, Debug, PartialEq)]
pub struct CellContainer<P = ()> {
    slot: SlotIndex,
    handle: ViewHandle,
    index: isize,
    frame: Rect,
    pub props: P,
}

impl CellContainer<()> {
    pub fn new(slot: SlotIndex, handle: ViewHandle) -> Self {
        Self::with_props(slot, handle, ())
    }
}

impl<P> CellContainer<P> {
    pub fn with_props(slot: SlotIndex, handle: ViewHandle, props: P) -> Self {
        Self {
            slot,
            handle,
            index: FOOTER_INDEX,
            frame: Rect::default(),
            props,
        }
    }

    /// Points the cell at another data index (a recycle). The slot is unchanged.
    pub fn rebind(&mut self, index: isize) {
        self.index = index;
    }

    pub fn with_index(mut self, index: isize) -> Self {
        self.index = index;
        self
    }

    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub fn is_footer(&self) -> bool {
        self.index == FOOTER_INDEX
    }
}

impl<P> SlotIdentity for CellContainer<P> {
    fn slot(&self) -> SlotIndex {
        self.slot
    }
}

impl<P> RecyclableCell for CellContainer<P> {
    fn handle(&self) -> ViewHandle {
        self.handle
    }

    fn index(&self) -> isize {
        self.index
    }

    fn frame(&self) -> Rect {
        self.frame
    }

    fn frame_mut(&mut self) -> &mut Rect {
        &mut self.frame
    }
}

/// Entrance-animation decorator that staggers cells by slot.
///
/// The wrapped cell stays fully addressable: slot, handle, index and frame all forward.
#[derive(Clone, Debug, PartialEq)]
pub struct Staggered<C> {
    inner: C,
    step_ms: u64,
}

impl<C: SlotIdentity> Staggered<C> {
    pub fn new(inner: C, step_ms: u64) -> Self {
        Self { inner, step_ms }
    }

    /// Delay before this cell's entrance animation starts.
    pub fn delay_ms(&self) -> u64 {
        (self.inner.slot().0 as u64).saturating_mul(self.step_ms)
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: SlotIdentity> SlotIdentity for Staggered<C> {
    fn slot(&self) -> SlotIndex {
        self.inner.slot()
    }
}

impl<C: RecyclableCell> RecyclableCell for Staggered<C> {
    fn handle(&self) -> ViewHandle {
        self.inner.handle()
    }

    fn index(&self) -> isize {
        self.inner.index()
    }

    fn frame(&self) -> Rect {
        self.inner.frame()
    }

    fn frame_mut(&mut self) -> &mut Rect {
        self.inner.frame_mut()
    }
}

/// Identity of a piece of external state, compared by revision rather than by value.
///
/// Hosts bump the revision whenever they replace the state object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Revision(pub u64);

/// Everything a wrapped cell's re-render decision depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderInputs<D> {
    pub data: D,
    pub extended_state: Revision,
    pub internal_snapshot: Revision,
}

/// Memoization boundary in front of a cell's content.
///
/// Content re-renders when the data-changed predicate says so, or when either the extended
/// state or the internal snapshot was replaced. Anything else is skipped.
pub struct RenderGate<D> {
    last: Option<RenderInputs<D>>,
    data_changed: fn(&D, &D) -> bool,
}

impl<D> core::fmt::Debug for RenderGate<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderGate")
            .field("primed", &self.last.is_some())
            .finish()
    }
}

impl<D> RenderGate<D> {
    pub fn new(data_changed: fn(&D, &D) -> bool) -> Self {
        Self {
            last: None,
            data_changed,
        }
    }

    /// Records `next` and returns whether the wrapped content must render.
    ///
    /// The first call always renders.
    pub fn should_render(&mut self, next: RenderInputs<D>) -> bool {
        let render = match &self.last {
            None => true,
            Some(prev) => {
                (self.data_changed)(&prev.data, &next.data)
                    || prev.extended_state != next.extended_state
                    || prev.internal_snapshot != next.internal_snapshot
            }
        };
        self.last = Some(next);
        render
    }
}
