#![forbid(unsafe_code)]

//! Geometric primitives and the rest-position calculator.
//!
//! Coordinates use screen pixels with the origin at the top-left corner.
//! Positions are carried as `f64` while stacking arithmetic is in flight and
//! truncated toward zero only when handed to a surface as [`Bounds`].

use crate::corner::Corner;

/// Size of a notification surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Usable screen area (excluding task bars and other reserved regions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenBounds {
    /// Usable width in pixels.
    pub width: u32,
    /// Usable height in pixels.
    pub height: u32,
}

impl ScreenBounds {
    /// Create new screen bounds.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Distance a notification keeps from the screen edges of its corner.
///
/// `x` is measured from the left or right edge and `y` from the top or
/// bottom edge, depending on the corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    /// Horizontal margin.
    pub x: f64,
    /// Vertical margin.
    pub y: f64,
}

impl Margins {
    /// Create new margins.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both margins are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A position with sub-pixel precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Integer window bounds handed to a [`Surface`](crate::surface::Surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Bounds {
    /// Create new bounds.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Place a surface of `size` at `origin`, truncating toward zero.
    #[inline]
    pub fn at(origin: Point, size: Size) -> Self {
        Self::new(truncate(origin.x), truncate(origin.y), size.width, size.height)
    }
}

/// Truncate a coordinate toward zero, saturating at the `i32` range.
#[inline]
pub(crate) fn truncate(value: f64) -> i32 {
    value as i32
}

/// Compute the resting (fully shown, non-animating) position.
///
/// Right corners keep `margins.x` from the right edge, left corners from the
/// left edge; bottom and top corners likewise for `margins.y`. The function
/// is pure: identical inputs always produce identical output.
#[must_use]
pub fn rest_position(corner: Corner, margins: Margins, size: Size, screen: ScreenBounds) -> Point {
    let width = f64::from(size.width);
    let height = f64::from(size.height);

    let x = if corner.is_right() {
        f64::from(screen.width) - (width + margins.x)
    } else {
        margins.x
    };
    let y = if corner.is_bottom() {
        f64::from(screen.height) - (height + margins.y)
    } else {
        margins.y
    };

    Point::new(x, y)
}
