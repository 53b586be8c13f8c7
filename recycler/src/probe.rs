#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::{Rect, ViewHandle};

#[cfg(feature = "std")]
type FrameMap = HashMap<ViewHandle, Rect>;
#[cfg(not(feature = "std"))]
type FrameMap = BTreeMap<ViewHandle, Rect>;

/// Host measurement capability.
///
/// One implementation exists per host (native view tree, DOM, test double, ...) and is chosen
/// once when the list is created. The recycler never branches on the host at call sites.
///
/// `measure` returns `view`'s rectangle in `ancestor`'s coordinate space, or `None` when the host
/// has no geometry yet. Callers treat `None` as "nothing to report" and never fail because of it.
pub trait LayoutProbe {
    fn measure(&self, view: ViewHandle, ancestor: ViewHandle) -> Option<Rect>;
}

impl<P: LayoutProbe + ?Sized> LayoutProbe for &P {
    fn measure(&self, view: ViewHandle, ancestor: ViewHandle) -> Option<Rect> {
        (**self).measure(view, ancestor)
    }
}

/// Adapts a closure into a [`LayoutProbe`].
#[derive(Clone, Copy, Debug)]
pub struct FnProbe<F>(pub F);

impl<F> LayoutProbe for FnProbe<F>
where
    F: Fn(ViewHandle, ViewHandle) -> Option<Rect>,
{
    fn measure(&self, view: ViewHandle, ancestor: ViewHandle) -> Option<Rect> {
        (self.0)(view, ancestor)
    }
}

/// A probe for hosts that report absolute (window-space) frames for every view.
///
/// Relative rectangles are derived by subtracting the ancestor's origin. Views without a
/// recorded frame measure as `None`.
#[derive(Clone, Debug, Default)]
pub struct FrameTableProbe {
    frames: FrameMap,
}

impl FrameTableProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frame(&mut self, view: ViewHandle, frame: Rect) {
        self.frames.insert(view, frame);
    }

    pub fn remove(&mut self, view: ViewHandle) {
        self.frames.remove(&view);
    }

    pub fn frame(&self, view: ViewHandle) -> Option<Rect> {
        self.frames.get(&view).copied()
    }
}

impl LayoutProbe for FrameTableProbe {
    fn measure(&self, view: ViewHandle, ancestor: ViewHandle) -> Option<Rect> {
        let view = self.frames.get(&view)?;
        let ancestor = self.frames.get(&ancestor)?;
        Some(view.relative_to(ancestor))
    }
}

/// Device pixel grid used to snap measurements and suppress sub-pixel jitter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelGrid {
    density: f64,
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self { density: 1.0 }
    }
}

impl PixelGrid {
    /// Creates a grid for `density` physical pixels per logical unit.
    ///
    /// Non-positive or non-finite densities fall back to `1.0`.
    pub fn new(density: f64) -> Self {
        if !(density.is_finite() && density > 0.0) {
            rwarn!(density, "PixelGrid: invalid density, using 1.0");
            return Self::default();
        }
        Self { density }
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Rounds a logical length to the nearest physical pixel.
    pub fn round_to_nearest_pixel(&self, value: f64) -> f64 {
        round_half_away(value * self.density) / self.density
    }

    /// Snaps the size of a measured rectangle; the origin is kept as reported.
    pub fn snap_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x,
            rect.y,
            self.round_to_nearest_pixel(rect.width),
            self.round_to_nearest_pixel(rect.height),
        )
    }

    /// `true` when two lengths land on different physical pixels.
    pub fn dimensions_differ(&self, a: f64, b: f64) -> bool {
        self.round_to_nearest_pixel(a) != self.round_to_nearest_pixel(b)
    }
}

pub(crate) fn round_half_away(v: f64) -> f64 {
    // Beyond 2^52 every f64 is already whole, and the i64 cast would saturate.
    if !v.is_finite() || v.abs() >= 4_503_599_627_370_496.0 {
        return v;
    }
    if v >= 0.0 {
        (v + 0.5) as i64 as f64
    } else {
        (v - 0.5) as i64 as f64
    }
}
