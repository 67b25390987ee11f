mod batch;

pub use batch::Batch;

use nalgebra::{Quaternion, UnitQuaternion};

use super::measurement::Acceleration;

/// Fused orientation as reported by the sensor, unit quaternion `[i, j, k, real]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationVector {
    pub i: f64,
    pub j: f64,
    pub k: f64,
    pub real: f64,
}

impl Default for RotationVector {
    fn default() -> Self {
        Self { i: 0.0, j: 0.0, k: 0.0, real: -1.0 }
    }
}

impl RotationVector {
    pub fn new(i: f64, j: f64, k: f64, real: f64) -> Self {
        Self { i, j, k, real }
    }

    /// Sensor frame to display frame: every component flips sign.
    ///
    /// Not renormalized, a malformed report yields a malformed quaternion.
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::new_unchecked(Quaternion::new(-self.real, -self.i, -self.j, -self.k))
    }
}

impl From<UnitQuaternion<f64>> for RotationVector {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Self { i: -q.i, j: -q.j, k: -q.k, real: -q.w }
    }
}

/// One sample instant. Ordering is implied by arrival, there is no timestamp.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IMUFrame {
    pub rotation_vector: RotationVector,
    pub acceleration: Acceleration,
}

impl IMUFrame {
    pub fn new(rotation_vector: RotationVector, acceleration: Acceleration) -> Self {
        Self { rotation_vector, acceleration }
    }
}

mod test {
    #[test]
    fn test_frame_flip() {
        use super::RotationVector;

        let q = RotationVector::new(0.1, -0.2, 0.3, 0.9).to_quaternion();
        assert_eq!((-0.9, -0.1, 0.2, -0.3), (q.w, q.i, q.j, q.k));
    }

    #[test]
    fn test_flip_round_trip() {
        use nalgebra::UnitQuaternion;

        use super::RotationVector;

        let q = UnitQuaternion::from_euler_angles(0.2, 0.4, -1.0);
        let rotation_vector = RotationVector::from(q);
        assert_eq!(q.into_inner(), rotation_vector.to_quaternion().into_inner());
    }

    #[test]
    fn test_default_is_identity() {
        use crate::types::measurement::Euler;

        use super::RotationVector;

        let euler = Euler::from(RotationVector::default().to_quaternion());
        assert_eq!(Euler::default(), euler);
    }
}
