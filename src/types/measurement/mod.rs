use nalgebra::Vector3;
use serde::ser::SerializeSeq;

pub mod euler;

pub use euler::Euler;

pub const X: usize = 0;
pub const Y: usize = 1;
pub const Z: usize = 2;

pub const GRAVITY: f64 = 9.80665;

/// Linear acceleration in m/s², sensor frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Acceleration(pub Vector3<f64>);

impl Acceleration {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn x(&self) -> f64 {
        self.0[X]
    }

    pub fn y(&self) -> f64 {
        self.0[Y]
    }

    pub fn z(&self) -> f64 {
        self.0[Z]
    }

    pub fn g_force(&self) -> f64 {
        self.0.norm() / GRAVITY
    }
}

impl From<Vector3<f64>> for Acceleration {
    fn from(vector: Vector3<f64>) -> Self {
        Self(vector)
    }
}

impl serde::Serialize for Acceleration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        for v in self.0.iter() {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}

impl<'a> serde::Deserialize<'a> for Acceleration {
    fn deserialize<D: serde::Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        let [x, y, z] = <[f64; 3]>::deserialize(deserializer)?;
        Ok(Self::new(x, y, z))
    }
}

mod test {
    #[test]
    fn test_acceleration_serde() {
        use super::Acceleration;

        let acceleration = Acceleration::new(0.5, -1.0, 9.75);
        let value = serde_json::to_value(&acceleration).unwrap();
        assert_eq!(serde_json::json!([0.5, -1.0, 9.75]), value);
        let revert: Acceleration = serde_json::from_value(value).unwrap();
        assert_eq!(acceleration, revert);
    }

    #[test]
    fn test_g_force() {
        use super::{Acceleration, GRAVITY};

        let acceleration = Acceleration::new(0.0, 0.0, -GRAVITY);
        assert!((acceleration.g_force() - 1.0).abs() < 1e-12);
    }
}
