use std::cell::Cell;
use std::thread;

use imu_stream::config::{BatchConfig, LinkConfig, QueueConfig};
use imu_stream::link::{self, channel};
use imu_stream::pipeline::{exit_code, Error, Pipeline};
use imu_stream::sync::{Event, Notifier};
use imu_stream::telemetry::{self, Recorder};
use imu_stream::types::measurement::{Acceleration, Euler};
use imu_stream::types::sensor::{IMUFrame, RotationVector};
use nalgebra::UnitQuaternion;

fn link_config(report_threshold: usize, blocking: bool) -> LinkConfig {
    LinkConfig {
        batch: BatchConfig { report_threshold, max_reports: report_threshold },
        queue: QueueConfig { size: 4, blocking },
    }
}

fn frame(index: usize) -> IMUFrame {
    let euler = Euler::new(0.01 * index as f64, -0.02 * index as f64, 0.0);
    let q: UnitQuaternion<f64> = euler.into();
    IMUFrame::new(RotationVector::from(q), Acceleration::new(index as f64, 0.0, 9.8))
}

#[test]
fn stream_until_producer_leaves() {
    let (mut reporter, receiver) = channel(&link_config(4, true)).unwrap();
    let producer = thread::spawn(move || {
        for i in 0..50 {
            reporter.report(frame(i)).unwrap();
        }
    });

    let mut recorder = Recorder::new();
    let mut pipeline = Pipeline::new(receiver, &mut recorder, Event::default());
    let result = pipeline.run();
    producer.join().unwrap();

    assert!(matches!(result, Err(Error::Link(link::Error::Closed))));
    assert_eq!(1, exit_code(&result));
    assert_eq!(50, pipeline.frames());
    assert_eq!(13, pipeline.batches());
    drop(pipeline);

    let expected: Vec<f64> = (0..50).map(|i| i as f64).collect();
    assert_eq!(expected, recorder.scalars(telemetry::ACCEL_X));
    let pitches = recorder.scalars(telemetry::PITCH);
    for (i, pitch) in pitches.iter().enumerate() {
        assert!((pitch + 0.02 * i as f64).abs() < 1e-6);
    }
    assert_eq!(50 * 7, recorder.records.len());
}

#[test]
fn link_closed_mid_batch() {
    let (mut reporter, receiver) = channel(&link_config(5, false)).unwrap();
    reporter.report(frame(0)).unwrap();
    reporter.report(frame(1)).unwrap();
    assert_eq!(2, reporter.pending());
    drop(reporter);

    let mut recorder = Recorder::new();
    let result = Pipeline::new(receiver, &mut recorder, Event::default()).run();
    assert_ne!(0, exit_code(&result));
    assert_eq!(vec![0.0, 1.0], recorder.scalars(telemetry::ACCEL_X));
    assert_eq!(14, recorder.records.len());
}

#[test]
fn cancel_between_batches() {
    let (mut reporter, receiver) = channel(&link_config(2, false)).unwrap();
    for i in 0..6 {
        reporter.report(frame(i)).unwrap();
    }

    let polls = Cell::new(0);
    let cancel = || {
        polls.set(polls.get() + 1);
        polls.get() > 2
    };
    let mut recorder = Recorder::new();
    let result = Pipeline::new(receiver, &mut recorder, cancel).run();
    assert_eq!(0, exit_code(&result));
    assert_eq!(vec![0.0, 1.0, 2.0, 3.0], recorder.scalars(telemetry::ACCEL_X));
    drop(reporter);
}

#[test]
fn cancel_event_before_start() {
    let (mut reporter, receiver) = channel(&LinkConfig::default()).unwrap();
    reporter.report(frame(0)).unwrap();

    let cancel = Event::default();
    cancel.notify();
    let mut recorder = Recorder::new();
    let mut pipeline = Pipeline::new(receiver, &mut recorder, cancel);
    assert!(pipeline.run().is_ok());
    assert_eq!(0, pipeline.batches());
    drop(pipeline);
    assert!(recorder.records.is_empty());
}
