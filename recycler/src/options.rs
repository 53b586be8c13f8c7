use alloc::rc::Rc;

use crate::{Axis, BlankAreaEvent, BlankAreaListener, PixelGrid, Size, ViewHandle};

/// Padding of the content container, as the host describes it.
///
/// Every field is optional. [`ContentPadding::resolve`] applies the precedence
/// side-specific > axis-specific > `padding` > `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentPadding {
    pub padding: Option<f64>,
    pub padding_vertical: Option<f64>,
    pub padding_horizontal: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
}

impl ContentPadding {
    pub fn uniform(padding: f64) -> Self {
        Self {
            padding: Some(padding),
            ..Self::default()
        }
    }

    pub fn resolve(&self) -> Insets {
        let vertical = self.padding_vertical.or(self.padding);
        let horizontal = self.padding_horizontal.or(self.padding);
        Insets {
            top: self.padding_top.or(vertical).unwrap_or(0.0),
            bottom: self.padding_bottom.or(vertical).unwrap_or(0.0),
            left: self.padding_left.or(horizontal).unwrap_or(0.0),
            right: self.padding_right.or(horizontal).unwrap_or(0.0),
        }
    }
}

/// Resolved content insets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Insets {
    /// Removes the cross-axis insets from `size`.
    ///
    /// Main-axis padding scrolls with the content and is left alone; cross-axis padding shrinks
    /// the space handed to the position/type provider.
    pub fn deflate_cross(&self, size: Size, axis: Axis) -> Size {
        match axis {
            Axis::Vertical => Size::new(size.width - self.left - self.right, size.height),
            Axis::Horizontal => Size::new(size.width, size.height - self.top - self.bottom),
        }
    }
}

/// Configuration for [`crate::LayoutCoordinator`].
#[derive(Clone)]
pub struct CoordinatorOptions {
    pub axis: Axis,
    /// Extra distance before the viewport in which cells still count as rendered.
    pub render_ahead_offset: f64,
    /// Data index whose position must stay fixed while neighbours are corrected.
    pub preserved_index: Option<isize>,
    /// Enables gap/overlap correction between consecutive cells.
    pub auto_layout: bool,
    pub pixel_grid: PixelGrid,
    pub content_padding: ContentPadding,
    /// The content window that hosts the cells.
    pub window: ViewHandle,
    /// The scrollable ancestor of `window`.
    pub scroll_container: ViewHandle,
    /// Called after the shared bus listeners for every emitted event.
    pub on_blank_area: Option<BlankAreaListener>,
}

impl core::fmt::Debug for CoordinatorOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CoordinatorOptions")
            .field("axis", &self.axis)
            .field("render_ahead_offset", &self.render_ahead_offset)
            .field("preserved_index", &self.preserved_index)
            .field("auto_layout", &self.auto_layout)
            .field("pixel_grid", &self.pixel_grid)
            .field("content_padding", &self.content_padding)
            .field("window", &self.window)
            .field("scroll_container", &self.scroll_container)
            .field("on_blank_area", &self.on_blank_area.is_some())
            .finish()
    }
}

impl CoordinatorOptions {
    pub fn new(window: ViewHandle, scroll_container: ViewHandle) -> Self {
        Self {
            axis: Axis::Vertical,
            render_ahead_offset: 0.0,
            preserved_index: None,
            auto_layout: true,
            pixel_grid: PixelGrid::default(),
            content_padding: ContentPadding::default(),
            window,
            scroll_container,
            on_blank_area: None,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_render_ahead_offset(mut self, render_ahead_offset: f64) -> Self {
        self.render_ahead_offset = render_ahead_offset.max(0.0);
        self
    }

    pub fn with_preserved_index(mut self, preserved_index: Option<isize>) -> Self {
        self.preserved_index = preserved_index;
        self
    }

    pub fn with_auto_layout(mut self, auto_layout: bool) -> Self {
        self.auto_layout = auto_layout;
        self
    }

    pub fn with_pixel_density(mut self, density: f64) -> Self {
        self.pixel_grid = PixelGrid::new(density);
        self
    }

    pub fn with_content_padding(mut self, content_padding: ContentPadding) -> Self {
        self.content_padding = content_padding;
        self
    }

    pub fn with_on_blank_area(
        mut self,
        on_blank_area: Option<impl Fn(&BlankAreaEvent) + 'static>,
    ) -> Self {
        self.on_blank_area = on_blank_area.map(|f| Rc::new(f) as _);
        self
    }
}
