use crate::geo::GeoCoordinate;
use glam::{DQuat, DVec3};

/// Unit magnitude tolerance after composition.
pub const UNIT_TOLERANCE: f64 = 1e-6;

/// The globe's orientation relative to the viewer, as a unit quaternion.
///
/// Immutable value semantics: every composition returns a new, renormalized
/// value, so repeated incremental rotations cannot accumulate drift in place.
/// At identity the view axis (+x) points at (0°, 0°), screen right is east
/// and screen up is north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation(DQuat);

impl Rotation {
    pub const IDENTITY: Self = Self(DQuat::IDENTITY);

    pub fn from_axis_angle(axis: DVec3, angle: f64) -> Self {
        Self(DQuat::from_axis_angle(axis.normalize(), angle))
    }

    /// Orientation that centers `target` on screen with north up.
    pub fn looking_at(target: GeoCoordinate) -> Self {
        let q = DQuat::from_rotation_y(target.lat) * DQuat::from_rotation_z(-target.lon);
        Self(q.normalize())
    }

    /// Compose an incremental rotation (given in view space) with this one.
    /// The result is renormalized to unit magnitude within `UNIT_TOLERANCE`.
    #[must_use]
    pub fn compose(self, delta: Rotation) -> Self {
        Self((delta.0 * self.0).normalize())
    }

    /// Globe space to view space.
    pub fn rotate(self, v: DVec3) -> DVec3 {
        self.0.mul_vec3(v)
    }

    /// View space back to globe space.
    pub fn rotate_back(self, v: DVec3) -> DVec3 {
        self.0.conjugate().mul_vec3(v)
    }

    pub fn is_normalized(self) -> bool {
        (self.0.length() - 1.0).abs() <= UNIT_TOLERANCE
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
