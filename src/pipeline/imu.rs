use std::io::Write;

use crate::telemetry::{self, OrientedBox, Publisher};
use crate::types::measurement::Euler;
use crate::types::sensor::IMUFrame;

/// Converts one frame and publishes it.
pub struct IMU<P> {
    publisher: P,
    status: Option<Box<dyn Write>>,
    frames: usize,
}

impl<P: Publisher> IMU<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher, status: None, frames: 0 }
    }

    pub fn set_status(&mut self, status: Box<dyn Write>) {
        self.status = Some(status)
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_publisher(self) -> P {
        self.publisher
    }

    /// Publishes the orientation marker, acceleration x/y/z, then roll/pitch/yaw
    /// in radians, flushes the publisher, and writes the status line in degrees.
    pub fn process(&mut self, frame: &IMUFrame) -> Result<Euler, P::Error> {
        let quaternion = frame.rotation_vector.to_quaternion();
        let euler = Euler::from(quaternion);

        let publisher = &mut self.publisher;
        publisher.oriented_box(telemetry::ORIENTATION, &OrientedBox::marker(quaternion))?;

        let acceleration = &frame.acceleration;
        publisher.scalar(telemetry::ACCEL_X, acceleration.x())?;
        publisher.scalar(telemetry::ACCEL_Y, acceleration.y())?;
        publisher.scalar(telemetry::ACCEL_Z, acceleration.z())?;

        publisher.scalar(telemetry::ROLL, euler.roll)?;
        publisher.scalar(telemetry::PITCH, euler.pitch)?;
        publisher.scalar(telemetry::YAW, euler.yaw)?;
        publisher.flush()?;

        if let Some(status) = self.status.as_mut() {
            if let Err(e) = writeln!(status, "{}", euler.degrees()) {
                warn!("Status line write failed: {}", e);
            }
        }
        self.frames += 1;
        Ok(euler)
    }
}

mod test {
    #[test]
    fn test_process_frame() {
        use nalgebra::UnitQuaternion;

        use super::IMU;
        use crate::telemetry::memory::{Recorder, Value};
        use crate::telemetry::{self, OrientedBox};
        use crate::types::measurement::Acceleration;
        use crate::types::sensor::{IMUFrame, RotationVector};

        let q = UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3);
        let frame = IMUFrame::new(RotationVector::from(q), Acceleration::new(1.0, 2.0, 3.0));
        let mut imu = IMU::new(Recorder::new());
        let euler = imu.process(&frame).unwrap();
        assert_eq!(1, imu.frames());

        let recorder = imu.into_publisher();
        let channels = vec![
            telemetry::ORIENTATION,
            telemetry::ACCEL_X,
            telemetry::ACCEL_Y,
            telemetry::ACCEL_Z,
            telemetry::ROLL,
            telemetry::PITCH,
            telemetry::YAW,
        ];
        assert_eq!(channels, recorder.channels());
        assert_eq!(Value::Box(OrientedBox::marker(q)), recorder.records[0].value);
        assert_eq!(vec![2.0], recorder.scalars(telemetry::ACCEL_Y));
        assert_eq!(vec![euler.pitch], recorder.scalars(telemetry::PITCH));
        assert!((euler.roll - 0.1).abs() < 1e-9);
        assert!((euler.yaw - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_status_failure_keeps_publishing() {
        use std::io;

        use super::IMU;
        use crate::telemetry::memory::Recorder;
        use crate::types::sensor::IMUFrame;

        struct Closed;

        impl io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut imu = IMU::new(Recorder::new());
        imu.set_status(Box::new(Closed));
        assert!(imu.process(&IMUFrame::default()).is_ok());
        assert_eq!(1, imu.frames());
        assert_eq!(7, imu.into_publisher().records.len());
    }
}
