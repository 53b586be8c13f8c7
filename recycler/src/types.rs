/// The scroll axis of a list.
///
/// Recycling is modelled along a single axis: the *main* axis is the scroll direction and the
/// *cross* axis is the other one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    pub fn main(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    pub fn cross(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.width,
            Axis::Horizontal => self.height,
        }
    }
}

/// An axis-aligned rectangle in the coordinate space of some ancestor view.
///
/// `width` and `height` are never negative: constructors clamp them to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Leading edge along the scroll axis (`y` for vertical lists).
    pub fn main_start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    /// Trailing edge along the scroll axis.
    pub fn main_end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.bottom(),
            Axis::Horizontal => self.right(),
        }
    }

    pub fn main_size(&self, axis: Axis) -> f64 {
        self.size().main(axis)
    }

    pub fn cross_start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.x,
            Axis::Horizontal => self.y,
        }
    }

    pub fn cross_end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.right(),
            Axis::Horizontal => self.bottom(),
        }
    }

    /// Moves the rectangle along the scroll axis, keeping its size.
    pub fn set_main_start(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Vertical => self.y = value,
            Axis::Horizontal => self.x = value,
        }
    }

    /// Moves the rectangle along the cross axis, keeping its size.
    pub fn set_cross_start(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Vertical => self.x = value,
            Axis::Horizontal => self.y = value,
        }
    }

    /// Returns this rectangle expressed relative to `ancestor`'s origin.
    pub fn relative_to(&self, ancestor: &Rect) -> Rect {
        Rect::new(
            self.x - ancestor.x,
            self.y - ancestor.y,
            self.width,
            self.height,
        )
    }
}

/// Opaque handle to a host view, used when asking the host for measurements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewHandle(pub u64);

/// Stable identity of a recycled view inside its pool.
///
/// Assigned once when the pool creates the view and never changes, even though the data index
/// rendered by the view changes on every recycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotIndex(pub usize);

/// Scroll velocity in pixels per millisecond.
///
/// Only one component is ever non-zero: the one matching the scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn along(axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Vertical => Self { x: 0.0, y: value },
            Axis::Horizontal => Self { x: value, y: 0.0 },
        }
    }

    pub fn main(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }
}

/// What the upstream position/type engine knows about one data index.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemLayout {
    pub view_type: u32,
    pub rect: Rect,
    /// `true` while `rect` is an estimate that has not been measured yet.
    pub estimated: bool,
}

/// The external position/type provider.
///
/// Given a data index it returns the view type and the rectangle the item occupies inside the
/// content window. The recycler never looks behind this interface.
pub trait LayoutProvider {
    fn item_layout(&self, index: usize) -> Option<ItemLayout>;
}

impl<F> LayoutProvider for F
where
    F: Fn(usize) -> Option<ItemLayout>,
{
    fn item_layout(&self, index: usize) -> Option<ItemLayout> {
        self(index)
    }
}

fn non_negative(v: f64) -> f64 {
    // Also maps NaN to zero.
    if v > 0.0 { v } else { 0.0 }
}
