//! Ingestion loop: pull a batch, convert and publish every frame in order, poll for
//! cancellation, repeat.
//!
//! Cancellation is polled once per batch, before each pull. A stop request therefore
//! takes effect after at most one batch's processing time plus the wait for that batch.

pub mod imu;

use core::fmt;
use std::io::Write;

use crate::link::{self, SampleLink};
use crate::sync::Subscriber;
use crate::telemetry::Publisher;

pub use imu::IMU;

#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    #[error("sensor link failed: {0}")]
    Link(link::Error),
    #[error("telemetry publish failed: {0}")]
    Publish(E),
}

impl<E> Error<E> {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Link(_) => 1,
            Self::Publish(_) => 2,
        }
    }
}

/// Process exit status for a finished run, zero only for a clean stop.
pub fn exit_code<E>(result: &Result<(), Error<E>>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => e.exit_code(),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

pub struct Pipeline<L, P, C> {
    link: L,
    imu: IMU<P>,
    cancel: C,
    state: State,
    batches: usize,
}

impl<L, P, C> Pipeline<L, P, C>
where
    L: SampleLink,
    P: Publisher,
    P::Error: fmt::Display,
    C: Subscriber,
{
    pub fn new(link: L, publisher: P, cancel: C) -> Self {
        Self { link, imu: IMU::new(publisher), cancel, state: State::Running, batches: 0 }
    }

    /// Receives one human readable line per frame.
    pub fn with_status(mut self, status: impl Write + 'static) -> Self {
        self.imu.set_status(Box::new(status));
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn frames(&self) -> usize {
        self.imu.frames()
    }

    pub fn publisher(&self) -> &P {
        self.imu.publisher()
    }

    pub fn into_publisher(self) -> P {
        self.imu.into_publisher()
    }

    /// Runs until cancelled or until the link or the publisher fails. Neither failure
    /// is retried. Once stopped the pipeline stays stopped and further calls return
    /// immediately.
    pub fn run(&mut self) -> Result<(), Error<P::Error>> {
        if self.state == State::Stopped {
            return Ok(());
        }
        info!("IMU stream started");
        let result = self.stream();
        self.state = State::Stopped;
        match result {
            Ok(()) => info!("IMU stream stopped after {} frames", self.frames()),
            Err(ref e) => error!("IMU stream aborted after {} frames: {}", self.frames(), e),
        }
        result
    }

    fn stream(&mut self) -> Result<(), Error<P::Error>> {
        while !self.cancel.poll() {
            let batch = self.link.pull().map_err(Error::Link)?;
            trace!("Batch {} of {} frames", self.batches, batch.len());
            for frame in batch.iter() {
                self.imu.process(frame).map_err(Error::Publish)?;
            }
            self.batches += 1;
        }
        Ok(())
    }
}

pub fn run<L, P, C>(link: L, publisher: P, cancel: C) -> Result<(), Error<P::Error>>
where
    L: SampleLink,
    P: Publisher,
    P::Error: fmt::Display,
    C: Subscriber,
{
    Pipeline::new(link, publisher, cancel).run()
}
