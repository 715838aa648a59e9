//! Taps on the play surface and the proximity check between them.

/// Default maximum distance between a tap and its repetition, in normalized
/// surface units.
pub const DEFAULT_TOLERANCE: f32 = 0.05;

#[cfg(feature = "std")]
fn hypot(dx: f32, dy: f32) -> f32 {
    dx.hypot(dy)
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn hypot(dx: f32, dy: f32) -> f32 {
    libm::hypotf(dx, dy)
}

fn unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// A tap position, normalized to the play surface.
///
/// Both coordinates are in `0.0..=1.0`, with the origin at the top-left
/// corner of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Tap {
    /// Creates a new tap, clamping both coordinates into the unit square.
    ///
    /// Non-finite coordinates are mapped to `0.0`.
    ///
    /// # Example
    ///
    /// ```
    /// use taprs::Tap;
    ///
    /// let tap = Tap::new(1.5, -0.25);
    /// assert_eq!(tap, Tap::new(1.0, 0.0));
    /// ```
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: unit(x),
            y: unit(y),
        }
    }

    /// Creates a tap from a pixel position on a surface of the given size.
    ///
    /// A zero-sized surface yields the origin.
    #[must_use]
    pub fn from_surface(px: f32, py: f32, width: f32, height: f32) -> Self {
        let x = if width > 0.0 { px / width } else { 0.0 };
        let y = if height > 0.0 { py / height } else { 0.0 };
        Self::new(x, y)
    }

    /// Euclidean distance to another tap.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        hypot(other.x - self.x, other.y - self.y)
    }

    /// Returns whether `other` lies within `tolerance` of this tap.
    ///
    /// The bound is inclusive and the check is symmetric.
    ///
    /// # Example
    ///
    /// ```
    /// use taprs::{DEFAULT_TOLERANCE, Tap};
    ///
    /// let a = Tap::new(0.1, 0.1);
    /// assert!(a.is_near(&Tap::new(0.12, 0.13), DEFAULT_TOLERANCE));
    /// assert!(!a.is_near(&Tap::new(0.5, 0.5), DEFAULT_TOLERANCE));
    /// ```
    #[must_use]
    pub fn is_near(&self, other: &Self, tolerance: f32) -> bool {
        self.distance(other) <= tolerance
    }
}
