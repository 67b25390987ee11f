use core::f64::consts::{FRAC_PI_2, PI};
use core::fmt;

use nalgebra::{Quaternion, UnitQuaternion};

pub const DEGREE_PER_DAG: f64 = 180.0 / PI;

/// Aerospace roll-pitch-yaw angles, intrinsic Z-Y-X, in radians.
///
/// Roll and yaw lie in (-π, π], pitch in [-π/2, π/2].
#[derive(Default, Copy, Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Euler {
    pub roll: f64,  // around x axis
    pub pitch: f64, // around y axis
    pub yaw: f64,   // around z axis
}

impl Euler {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Presents the angles in degrees without converting the stored value.
    pub fn degrees(self) -> Degrees {
        Degrees(self)
    }

    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

impl core::ops::Mul<f64> for Euler {
    type Output = Self;

    fn mul(self, m: f64) -> Euler {
        Euler { roll: self.roll * m, pitch: self.pitch * m, yaw: self.yaw * m }
    }
}

impl core::ops::Div<f64> for Euler {
    type Output = Self;

    fn div(self, d: f64) -> Euler {
        Euler { roll: self.roll / d, pitch: self.pitch / d, yaw: self.yaw / d }
    }
}

// atan2 yields -π for a negative zero numerator
fn half_open(angle: f64) -> f64 {
    if angle == -PI {
        PI
    } else {
        angle
    }
}

macro_rules! pow2 {
    ($x:expr) => {
        $x * $x
    };
}

/// Quaternion is taken as unit-norm and never renormalized.
///
/// Pitch uses the half-angle arctangent form instead of `asin`, so a near-unit
/// quaternion whose `2(wy - xz)` drifts past ±1 saturates at ±π/2 rather than
/// turning into NaN. At gimbal lock roll and yaw are only defined up to their
/// sum or difference.
impl From<UnitQuaternion<f64>> for Euler {
    fn from(q: UnitQuaternion<f64>) -> Self {
        let (x, y, z, w) = (q.i, q.j, q.k, q.w);

        let sinr_cosp = 2.0 * (w * x + y * z);
        let cosr_cosp = 1.0 - 2.0 * (pow2!(x) + pow2!(y));
        let roll = half_open(sinr_cosp.atan2(cosr_cosp));

        let sinp = 2.0 * (w * y - x * z);
        let half_sin = (1.0 + sinp).max(0.0).sqrt();
        let half_cos = (1.0 - sinp).max(0.0).sqrt();
        let pitch = 2.0 * half_sin.atan2(half_cos) - FRAC_PI_2;

        let siny_cosp = 2.0 * (w * z + x * y);
        let cosy_cosp = 1.0 - 2.0 * (pow2!(y) + pow2!(z));
        let yaw = half_open(siny_cosp.atan2(cosy_cosp));

        Self { roll, pitch, yaw }
    }
}

impl Into<UnitQuaternion<f64>> for Euler {
    fn into(self) -> UnitQuaternion<f64> {
        let half = self / 2.0;
        let (cr, sr) = (half.roll.cos(), half.roll.sin());
        let (cp, sp) = (half.pitch.cos(), half.pitch.sin());
        let (cy, sy) = (half.yaw.cos(), half.yaw.sin());
        UnitQuaternion::new_unchecked(Quaternion::new(
            cr * cp * cy + sr * sp * sy,
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
        ))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Degrees(pub Euler);

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let euler = self.0 * DEGREE_PER_DAG;
        write!(f, "Roll: {:.2}, Pitch: {:.2}, Yaw: {:.2}", euler.roll, euler.pitch, euler.yaw)
    }
}

#[cfg(test)]
mod test {
    use core::f64::consts::{FRAC_PI_2, PI};

    use nalgebra::{Quaternion, UnitQuaternion};

    use super::{Euler, DEGREE_PER_DAG};

    fn unchecked(w: f64, x: f64, y: f64, z: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::new_unchecked(Quaternion::new(w, x, y, z))
    }

    fn assert_close(expected: Euler, actual: Euler, tolerance: f64) {
        let delta = [
            (expected.roll - actual.roll).abs(),
            (expected.pitch - actual.pitch).abs(),
            (expected.yaw - actual.yaw).abs(),
        ];
        assert!(delta.iter().all(|d| *d < tolerance), "{:?} != {:?}", expected, actual);
    }

    #[test]
    fn test_identity() {
        let euler = Euler::from(unchecked(1.0, 0.0, 0.0, 0.0));
        assert_close(Euler::default(), euler, 1e-6);
    }

    #[test]
    fn test_quaternion_to_euler() {
        let half = 0.5f64.sqrt();

        // roll 90
        let euler = Euler::from(unchecked(half, half, 0.0, 0.0)) * DEGREE_PER_DAG;
        assert_close(Euler::new(90.0, 0.0, 0.0), euler, 1e-4);

        // yaw 90
        let euler = Euler::from(unchecked(half, 0.0, 0.0, half)) * DEGREE_PER_DAG;
        assert_close(Euler::new(0.0, 0.0, 90.0), euler, 1e-4);

        // yaw -90
        let euler = Euler::from(unchecked(half, 0.0, 0.0, -half)) * DEGREE_PER_DAG;
        assert_close(Euler::new(0.0, 0.0, -90.0), euler, 1e-4);

        // yaw 180
        let euler = Euler::from(unchecked(0.0, 0.0, 0.0, 1.0)) * DEGREE_PER_DAG;
        assert_close(Euler::new(0.0, 0.0, 180.0), euler, 1e-4);
    }

    #[test]
    fn test_pitch_near_gimbal_lock() {
        let euler = Euler::from(unchecked(0.7071, 0.0, 0.7071, 0.0));
        assert!(euler.is_finite());
        assert!((euler.pitch - FRAC_PI_2).abs() < 0.01);

        // 2(wy - xz) slightly above one
        let euler = Euler::from(unchecked(0.7071068, 0.0, 0.7071068, 0.0));
        assert!(euler.is_finite());
        assert_eq!(FRAC_PI_2, euler.pitch);

        let euler = Euler::from(unchecked(0.7071068, 0.0, -0.7071068, 0.0));
        assert!(euler.is_finite());
        assert_eq!(-FRAC_PI_2, euler.pitch);
    }

    #[test]
    fn test_pitch_bounded() {
        let steps = 12;
        for a in 0..steps {
            for b in 0..steps {
                for c in 0..steps {
                    let step = 2.0 * PI / steps as f64;
                    let angles = Euler::new(a as f64 * step - PI, b as f64 * step, c as f64 * step);
                    let q: UnitQuaternion<f64> = angles.into();
                    let euler = Euler::from(q);
                    assert!(euler.is_finite());
                    assert!(euler.pitch >= -FRAC_PI_2 && euler.pitch <= FRAC_PI_2);
                    assert!(euler.roll > -PI && euler.roll <= PI);
                    assert!(euler.yaw > -PI && euler.yaw <= PI);
                }
            }
        }
    }

    #[test]
    fn test_half_turn_is_positive() {
        let euler = Euler::from(unchecked(0.0, -0.0, 0.0, -1.0));
        assert_eq!(PI, euler.yaw);
        let euler = Euler::from(unchecked(0.0, -1.0, 0.0, -0.0));
        assert_eq!(PI, euler.roll);
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            (0.1, 0.2, 0.3),
            (-1.2, 0.7, 2.9),
            (3.0, -1.3, -3.0),
            (-0.5, 1.5, 0.25),
            (0.0, -0.01, 1.0),
        ];
        for (roll, pitch, yaw) in cases.iter() {
            let euler = Euler::new(*roll, *pitch, *yaw);
            let q: UnitQuaternion<f64> = euler.into();
            assert_close(euler, Euler::from(q), 1e-4);
        }
    }

    #[test]
    fn test_idempotence() {
        let q = UnitQuaternion::from_euler_angles(0.3, -0.8, 2.2);
        let first = Euler::from(q);
        let second = Euler::from(q);
        assert_eq!(first.roll.to_bits(), second.roll.to_bits());
        assert_eq!(first.pitch.to_bits(), second.pitch.to_bits());
        assert_eq!(first.yaw.to_bits(), second.yaw.to_bits());
    }

    #[test]
    fn test_matches_nalgebra() {
        let q = UnitQuaternion::from_euler_angles(-0.4, 0.9, 1.7);
        let (roll, pitch, yaw) = q.euler_angles();
        assert_close(Euler::new(roll, pitch, yaw), Euler::from(q), 1e-9);
    }

    #[test]
    fn test_degrees_display() {
        let euler = Euler::new(FRAC_PI_2, -PI / 4.0, PI);
        assert_eq!("Roll: 90.00, Pitch: -45.00, Yaw: 180.00", format!("{}", euler.degrees()));
    }
}
