use alloc::vec::Vec;

use crate::{
    Axis, BlankAreaBus, BlankAreaEvent, CoordinatorOptions, LayoutProbe, LayoutProvider,
    RecyclableCell, Rect, Size, invoke_guarded,
};

/// Result of one [`LayoutCoordinator::on_layout_pass`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutPassOutcome {
    /// The event broadcast for this pass, `None` while instrumentation is disabled.
    pub event: Option<BlankAreaEvent>,
    /// Difference between the end of the last cell and the content window's extent along the
    /// scroll axis. The footer is placed at that end.
    ///
    /// The host must grow (or shrink) the content window by this amount; until it does, every
    /// pass reports the same shift again.
    pub footer_shift: f64,
}

/// The render window along the scroll axis, in window-local coordinates.
#[derive(Clone, Copy, Debug)]
struct RenderWindow {
    axis: Axis,
    scroll: f64,
    size: f64,
    render_ahead: f64,
}

impl RenderWindow {
    fn contains(&self, rect: &Rect) -> bool {
        rect.main_end(self.axis) >= self.scroll - self.render_ahead
            && rect.main_start(self.axis) <= self.scroll + self.size
    }
}

/// Positions recycled cells inside a content window and reports blank area.
///
/// The coordinator is driven by the host's layout passes. On every pass it
/// 1. orders the active cells by the data index they render,
/// 2. snaps consecutive cells together to remove gaps and overlaps left by size estimates,
/// 3. measures how much of the viewport is not covered by rendered cells at either edge and
///    broadcasts that as a [`BlankAreaEvent`].
///
/// Instrumentation only runs while the bus has listeners or a per-instance callback is set.
///
/// It holds no host objects: cells are borrowed for the duration of a pass and geometry comes
/// from a [`LayoutProbe`].
#[derive(Debug)]
pub struct LayoutCoordinator {
    options: CoordinatorOptions,
    bus: BlankAreaBus,
    order: Vec<usize>,
    last_min_bound: f64,
    last_max_bound: f64,
    last_max_bound_overall: f64,
    last_event: Option<BlankAreaEvent>,
}

impl LayoutCoordinator {
    pub fn new(options: CoordinatorOptions, bus: BlankAreaBus) -> Self {
        rdebug!(
            axis = ?options.axis,
            auto_layout = options.auto_layout,
            render_ahead_offset = options.render_ahead_offset,
            "LayoutCoordinator::new"
        );
        Self {
            options,
            bus,
            order: Vec::new(),
            last_min_bound: 0.0,
            last_max_bound: 0.0,
            last_max_bound_overall: 0.0,
            last_event: None,
        }
    }

    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: CoordinatorOptions) {
        self.options = options;
        rdebug!(
            axis = ?self.options.axis,
            auto_layout = self.options.auto_layout,
            preserved_index = ?self.options.preserved_index,
            "LayoutCoordinator::set_options"
        );
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut CoordinatorOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn bus(&self) -> &BlankAreaBus {
        &self.bus
    }

    pub fn instrumentation_enabled(&self) -> bool {
        self.options.on_blank_area.is_some() || self.bus.has_listeners()
    }

    pub fn last_event(&self) -> Option<BlankAreaEvent> {
        self.last_event
    }

    /// First and last rendered pixel of the in-window cells after the last pass.
    pub fn rendered_bounds(&self) -> (f64, f64) {
        (self.last_min_bound, self.last_max_bound)
    }

    /// Furthest main-axis end of any active cell after the last pass.
    pub fn max_bound_overall(&self) -> f64 {
        self.last_max_bound_overall
    }

    /// Size available to the position/type provider once cross-axis padding is removed.
    pub fn layout_extent(&self, window: Size) -> Size {
        self.options
            .content_padding
            .resolve()
            .deflate_cross(window, self.options.axis)
    }

    /// Moves every non-footer cell to the rectangle `provider` reports for its data index.
    ///
    /// Returns the number of cells placed. Cells the provider knows nothing about are left as is.
    pub fn place_cells<C, L>(&self, provider: &L, cells: &mut [C]) -> usize
    where
        C: RecyclableCell,
        L: LayoutProvider + ?Sized,
    {
        let mut placed = 0usize;
        for cell in cells.iter_mut() {
            let Ok(index) = usize::try_from(cell.index()) else {
                continue;
            };
            if let Some(layout) = provider.item_layout(index) {
                *cell.frame_mut() = layout.rect;
                placed += 1;
            }
        }
        rtrace!(placed, "LayoutCoordinator::place_cells");
        placed
    }

    /// Measures every cell and applies sizes that changed on the pixel grid.
    ///
    /// Returns `true` if any cell changed, i.e. another layout pass is needed.
    pub fn apply_measurements<C, P>(&self, probe: &P, cells: &mut [C]) -> bool
    where
        C: RecyclableCell,
        P: LayoutProbe + ?Sized,
    {
        let grid = self.options.pixel_grid;
        let mut changed = false;
        for cell in cells.iter_mut() {
            if let Some(measured) = probe.measure(cell.handle(), self.options.window) {
                changed |= cell.apply_measured_size(measured, &grid);
            }
        }
        changed
    }

    /// Runs one layout pass.
    ///
    /// `viewport` is the scroll container's visible rectangle and `scroll_offset` its offset
    /// along the scroll axis. Cell frames are relative to the content window, whose own
    /// rectangle inside the scrolled content is obtained from `probe`.
    pub fn on_layout_pass<C, P>(
        &mut self,
        probe: &P,
        cells: &mut [C],
        viewport: Rect,
        scroll_offset: f64,
    ) -> LayoutPassOutcome
    where
        C: RecyclableCell,
        P: LayoutProbe + ?Sized,
    {
        let axis = self.options.axis;
        let viewport_size = viewport.main_size(axis);
        let window = probe
            .measure(self.options.window, self.options.scroll_container)
            .map(|r| self.options.pixel_grid.snap_rect(r));
        let offset_from_start = window.map_or(0.0, |w| w.main_start(axis));

        let render_window = RenderWindow {
            axis,
            scroll: scroll_offset - offset_from_start,
            size: viewport_size,
            render_ahead: self.options.render_ahead_offset,
        };

        self.sort_cells(cells);
        if self.options.auto_layout && self.order.len() > 1 {
            self.clear_gaps_and_overlaps(cells, &render_window);
        }
        self.compute_bounds(cells, &render_window);

        let mut footer_shift = 0.0;
        if let Some(w) = window {
            let end_visible = w.main_end(axis) <= scroll_offset + viewport_size;
            if self.options.auto_layout && end_visible && !self.order.is_empty() {
                footer_shift = self.last_max_bound_overall - w.main_size(axis);
                if footer_shift != 0.0 {
                    // Absolute, so repeated passes against the same window do not drift.
                    let footer_start = w.main_size(axis) + footer_shift;
                    for cell in cells.iter_mut().filter(|c| c.index() < 0) {
                        cell.frame_mut().set_main_start(axis, footer_start);
                    }
                }
            }
        }

        let event = if self.instrumentation_enabled() {
            let event = match window {
                Some(w) => self.compute_blank(&w, scroll_offset, viewport_size),
                None => {
                    rdebug!("LayoutCoordinator: window not measured, reporting no blank area");
                    BlankAreaEvent::empty()
                }
            };
            self.emit(&event);
            Some(event)
        } else {
            None
        };
        self.last_event = event.or(self.last_event);

        rtrace!(
            cells = cells.len(),
            min_bound = self.last_min_bound,
            max_bound = self.last_max_bound,
            footer_shift,
            "LayoutCoordinator::on_layout_pass"
        );
        LayoutPassOutcome {
            event,
            footer_shift,
        }
    }

    fn emit(&self, event: &BlankAreaEvent) {
        self.bus.dispatch(event);
        if let Some(cb) = &self.options.on_blank_area {
            invoke_guarded(&**cb, event);
        }
    }

    fn sort_cells<C: RecyclableCell>(&mut self, cells: &[C]) {
        self.order.clear();
        self.order
            .extend((0..cells.len()).filter(|&i| cells[i].index() >= 0));
        self.order.sort_by_key(|&i| cells[i].index());

        let duplicate = self
            .order
            .windows(2)
            .any(|w| cells[w[0]].index() == cells[w[1]].index());
        if duplicate {
            rwarn!("LayoutCoordinator: two active cells render the same data index");
        }
        debug_assert!(
            !duplicate,
            "LayoutCoordinator: duplicate data index among active cells"
        );
    }

    fn preserved_offset<C: RecyclableCell>(&self, cells: &[C]) -> Option<usize> {
        let preserved = self.options.preserved_index.filter(|&i| i >= 0)?;
        let first = *self.order.first()?;
        let last_pos = self.order.len() - 1;
        if preserved <= cells[first].index() {
            return Some(0);
        }
        if preserved >= cells[self.order[last_pos]].index() {
            return Some(last_pos);
        }
        Some(
            self.order
                .iter()
                .position(|&i| cells[i].index() == preserved)
                .unwrap_or(0),
        )
    }

    fn clear_gaps_and_overlaps<C: RecyclableCell>(
        &self,
        cells: &mut [C],
        window: &RenderWindow,
    ) {
        let axis = window.axis;
        let preserved = self.preserved_offset(cells);
        let start = preserved.unwrap_or(0);

        // Walk backwards from the preserved cell, stacking consecutive predecessors on top of it.
        for k in (1..=start).rev() {
            let cell = &cells[self.order[k]];
            let (cell_index, cell_frame) = (cell.index(), cell.frame());
            let neighbour = &mut cells[self.order[k - 1]];
            if cell_index == neighbour.index() + 1 {
                let frame = neighbour.frame_mut();
                let size = frame.main_size(axis);
                frame.set_main_start(axis, cell_frame.main_start(axis) - size);
            }
        }

        let mut max_bound: f64 = 0.0;
        for k in start..self.order.len() - 1 {
            let cell = &cells[self.order[k]];
            let (cell_index, c) = (cell.index(), cell.frame());
            if preserved.is_none() && !window.contains(&c) {
                continue;
            }
            max_bound = max_bound.max(c.main_end(axis));

            let neighbour = &mut cells[self.order[k + 1]];
            if neighbour.index() != cell_index + 1 {
                continue;
            }
            let n = neighbour.frame_mut();
            if c.cross_start(axis) < n.cross_start(axis) {
                if c.cross_end(axis) != n.cross_start(axis) {
                    n.set_cross_start(axis, c.cross_end(axis));
                }
                if c.main_start(axis) != n.main_start(axis) {
                    n.set_main_start(axis, c.main_start(axis));
                }
            } else {
                n.set_main_start(axis, max_bound);
            }
        }
    }

    fn compute_bounds<C: RecyclableCell>(&mut self, cells: &[C], window: &RenderWindow) {
        let axis = window.axis;
        let ignore_window = self.options.preserved_index.is_some_and(|i| i >= 0);
        let mut min_bound = f64::INFINITY;
        let mut max_bound = f64::NEG_INFINITY;
        let mut overall: f64 = 0.0;

        for &i in &self.order {
            let frame = cells[i].frame();
            overall = overall.max(frame.main_end(axis));
            if ignore_window || window.contains(&frame) {
                min_bound = min_bound.min(frame.main_start(axis));
                max_bound = max_bound.max(frame.main_end(axis));
            }
        }

        if min_bound > max_bound {
            // Nothing rendered inside the window: the whole viewport is blank.
            min_bound = window.scroll + window.size;
            max_bound = window.scroll;
        }
        self.last_min_bound = min_bound;
        self.last_max_bound = max_bound;
        self.last_max_bound_overall = overall;
    }

    fn compute_blank(
        &self,
        window: &Rect,
        scroll_offset: f64,
        viewport_size: f64,
    ) -> BlankAreaEvent {
        let axis = self.options.axis;
        let window_start = window.main_start(axis);
        let relative_scroll = scroll_offset - window_start;
        let distance_from_window_start = (window_start - scroll_offset).max(0.0);
        let distance_from_window_end =
            (scroll_offset + viewport_size - window.main_end(axis)).max(0.0);

        let raw_start = self.last_min_bound - relative_scroll - distance_from_window_start;
        let raw_end = relative_scroll + viewport_size
            - self.options.render_ahead_offset
            - self.last_max_bound
            - distance_from_window_end;
        BlankAreaEvent::from_raw(raw_start, raw_end)
    }
}
