#[macro_use]
extern crate log;

use std::f64::consts::PI;
use std::thread;
use std::time::Duration;

use imu_stream::link::{self, Reporter};
use imu_stream::sync::{Event, Subscriber};
use imu_stream::types::measurement::{Acceleration, Euler, GRAVITY};
use imu_stream::types::sensor::{IMUFrame, RotationVector};
use nalgebra::{UnitQuaternion, Vector3};

const ROLL_AMPLITUDE: f64 = PI / 6.0;
const ROLL_PERIOD: f64 = 4.0; // seconds
const PITCH_AMPLITUDE: f64 = PI / 12.0;
const PITCH_PERIOD: f64 = 7.0;
const YAW_RATE: f64 = PI / 10.0; // rad/s

/// Body rocking in roll and pitch while turning slowly in yaw.
pub struct Motion {
    rate: u16,
    tick: u64,
}

impl Motion {
    pub fn new(rate: u16) -> Self {
        Self { rate, tick: 0 }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate as f64)
    }

    fn attitude(&self) -> Euler {
        let t = self.tick as f64 / self.rate as f64;
        let roll = ROLL_AMPLITUDE * (2.0 * PI * t / ROLL_PERIOD).sin();
        let pitch = PITCH_AMPLITUDE * (2.0 * PI * t / PITCH_PERIOD).sin();
        let yaw = (YAW_RATE * t + PI).rem_euclid(2.0 * PI) - PI;
        Euler::new(roll, pitch, yaw)
    }
}

impl Iterator for Motion {
    type Item = IMUFrame;

    fn next(&mut self) -> Option<IMUFrame> {
        let q: UnitQuaternion<f64> = self.attitude().into();
        let gravity = q.inverse_transform_vector(&Vector3::new(0.0, 0.0, GRAVITY));
        self.tick += 1;
        Some(IMUFrame::new(RotationVector::from(q), Acceleration::from(gravity)))
    }
}

/// Reports motion frames at the motion's rate until `stop` is notified or `frames`
/// frames were reported. Dropping the reporter on return flushes pending frames and
/// closes the link.
pub fn spawn(
    mut reporter: Reporter,
    motion: Motion,
    stop: Event,
    frames: Option<usize>,
) -> thread::JoinHandle<Result<usize, link::Error>> {
    thread::spawn(move || {
        let period = motion.period();
        let mut reported = 0;
        for frame in motion.take(frames.unwrap_or(usize::MAX)) {
            if stop.poll() {
                break;
            }
            reporter.report(frame)?;
            reported += 1;
            thread::sleep(period);
        }
        info!("Producer reported {} frames, {} dropped", reported, reporter.dropped());
        Ok(reported)
    })
}

mod test {
    #[test]
    fn test_motion() {
        use imu_stream::types::measurement::{Euler, GRAVITY};

        use super::Motion;

        let mut motion = Motion::new(100);
        let first = motion.next().unwrap();
        assert_eq!(Euler::default(), Euler::from(first.rotation_vector.to_quaternion()));
        assert_eq!(GRAVITY, first.acceleration.z());

        for frame in motion.take(1000) {
            let euler = Euler::from(frame.rotation_vector.to_quaternion());
            assert!(euler.is_finite());
            assert!((frame.acceleration.g_force() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spawn() {
        use imu_stream::config::LinkConfig;
        use imu_stream::link::{channel, SampleLink};
        use imu_stream::sync::Event;

        use super::{spawn, Motion};

        let (reporter, mut receiver) = channel(&LinkConfig::default()).unwrap();
        let producer = spawn(reporter, Motion::new(1000), Event::default(), Some(5));
        let mut frames = 0;
        while let Ok(batch) = receiver.pull() {
            frames += batch.len();
        }
        assert_eq!(Ok(5), producer.join().unwrap());
        assert_eq!(5, frames);
    }
}
