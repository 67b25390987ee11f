pub mod json;
pub mod logger;
pub mod memory;

pub use json::JsonLines;
pub use logger::LogPublisher;
pub use memory::Recorder;

use nalgebra::UnitQuaternion;
use serde::ser::SerializeStruct;

pub const ORIENTATION: &str = "imu/orientation";
pub const ACCEL_X: &str = "imu/accel_x";
pub const ACCEL_Y: &str = "imu/accel_y";
pub const ACCEL_Z: &str = "imu/accel_z";
pub const ROLL: &str = "imu/roll";
pub const PITCH: &str = "imu/pitch";
pub const YAW: &str = "imu/yaw";

/// Solid box primitive rotated about its center.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrientedBox {
    pub center: [f32; 3],
    pub size: [f32; 3],
    pub rotation: UnitQuaternion<f64>,
    pub color: [u8; 3],
}

impl OrientedBox {
    /// Orientation marker: solid 1x3x1 box at the origin.
    pub fn marker(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            size: [1.0, 3.0, 1.0],
            rotation,
            color: [200, 50, 0],
        }
    }
}

impl serde::Serialize for OrientedBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut struct_ = serializer.serialize_struct("OrientedBox", 5)?;
        struct_.serialize_field("center", &self.center[..])?;
        struct_.serialize_field("size", &self.size[..])?;
        let q = &self.rotation;
        let value: [f64; 4] = [q.i, q.j, q.k, q.w];
        struct_.serialize_field("quaternion", &value[..])?;
        struct_.serialize_field("color", &self.color[..])?;
        struct_.serialize_field("fill", "solid")?;
        struct_.end()
    }
}

/// Telemetry sink. Calls are synchronous; a returned error is final for the stream.
pub trait Publisher {
    type Error;

    fn scalar(&mut self, channel: &str, value: f64) -> Result<(), Self::Error>;
    fn oriented_box(&mut self, channel: &str, value: &OrientedBox) -> Result<(), Self::Error>;

    /// Called once per frame after its records. Buffered sinks surface write errors here.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    type Error = P::Error;

    fn scalar(&mut self, channel: &str, value: f64) -> Result<(), Self::Error> {
        (**self).scalar(channel, value)
    }

    fn oriented_box(&mut self, channel: &str, value: &OrientedBox) -> Result<(), Self::Error> {
        (**self).oriented_box(channel, value)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

mod test {
    #[test]
    fn test_serialize_marker() {
        use nalgebra::UnitQuaternion;
        use serde_json::json;

        use super::OrientedBox;

        let expected = json!({
            "center": [0.0, 0.0, 0.0],
            "size": [1.0, 3.0, 1.0],
            "quaternion": [0.0, 0.0, 0.0, 1.0],
            "color": [200, 50, 0],
            "fill": "solid"
        });
        let marker = OrientedBox::marker(UnitQuaternion::identity());
        assert_eq!(expected, serde_json::to_value(&marker).unwrap());
    }
}
