pub use kurbo::{Point, Rect, Vec2};

/// Integer cell coordinate in image space.
///
/// Coordinates may be negative when a padded grid is traced right at the image edge.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct GridPoint {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridPoint {
    /// Construct a grid point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell center as a floating point position.
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Simulation clock reading in seconds.
///
/// Every time-dependent operation takes the clock explicitly instead of reading wall time,
/// so a run is reproducible from its sequence of `dt` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct SimTime(pub f64);

impl SimTime {
    /// Clock origin.
    pub const ZERO: Self = Self(0.0);

    /// Build from seconds.
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Seconds since the clock origin.
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Clock reading `dt` seconds later. Negative or non-finite steps are ignored.
    pub fn advance(self, dt: f64) -> Self {
        if dt.is_finite() && dt > 0.0 {
            Self(self.0 + dt)
        } else {
            self
        }
    }

    /// Seconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}
