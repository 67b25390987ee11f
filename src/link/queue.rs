//! In-memory sensor link.
//!
//! The producer (`Reporter`) accumulates frames into batches and hands them to a
//! bounded queue drained by the host (`Receiver`). Once `report-threshold` frames
//! are pending a batch is offered to the queue. While the queue is full the producer
//! keeps accumulating up to `max-reports` frames; beyond that it either blocks until
//! the host catches up, or evicts the oldest queued batch when the queue is
//! non-blocking.

use std::mem;

use crossbeam_channel::{bounded, Receiver as ChannelReceiver, Sender, TrySendError};

use super::{Error, SampleLink};
use crate::config::{BatchConfig, LinkConfig};
use crate::types::sensor::{Batch, IMUFrame};

pub fn channel(config: &LinkConfig) -> Result<(Reporter, Receiver), Error> {
    config.validate()?;
    let (sender, receiver) = bounded(config.queue.size);
    let evict = if config.queue.blocking { None } else { Some(receiver.clone()) };
    let reporter = Reporter {
        sender,
        evict,
        batch: config.batch,
        pending: Vec::with_capacity(config.batch.max_reports),
        dropped: 0,
    };
    Ok((reporter, Receiver { receiver }))
}

pub struct Reporter {
    sender: Sender<Batch>,
    evict: Option<ChannelReceiver<Batch>>,
    batch: BatchConfig,
    pending: Vec<IMUFrame>,
    dropped: usize,
}

impl Reporter {
    pub fn report(&mut self, frame: IMUFrame) -> Result<(), Error> {
        self.pending.push(frame);
        if self.pending.len() < self.batch.report_threshold {
            return Ok(());
        }
        self.send(false)
    }

    /// Hands pending frames over regardless of the report threshold.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.send(true)
    }

    /// Frames evicted from a full non-blocking queue so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn send(&mut self, force: bool) -> Result<(), Error> {
        let batch = match Batch::new(mem::take(&mut self.pending)) {
            Some(batch) => batch,
            None => return Ok(()),
        };
        match self.sender.try_send(batch) {
            Ok(()) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(Error::Closed),
            Err(TrySendError::Full(batch)) => {
                if !force && batch.len() < self.batch.max_reports {
                    self.pending = batch.into_inner();
                    return Ok(());
                }
                self.send_full(batch)
            }
        }
    }

    fn send_full(&mut self, mut batch: Batch) -> Result<(), Error> {
        let evict = match self.evict {
            Some(ref evict) => evict,
            None => return self.sender.send(batch).map_err(|_| Error::Closed),
        };
        loop {
            if let Ok(oldest) = evict.try_recv() {
                self.dropped += oldest.len();
                warn!("IMU queue full, {} frames evicted, {} in total", oldest.len(), self.dropped);
            }
            match self.sender.try_send(batch) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(rejected)) => batch = rejected,
                Err(TrySendError::Disconnected(_)) => return Err(Error::Closed),
            }
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if self.flush().is_err() {
            debug!("Sensor link closed with {} frames pending", self.pending.len());
        }
    }
}

pub struct Receiver {
    receiver: ChannelReceiver<Batch>,
}

impl Receiver {
    /// Batches waiting in the queue.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl SampleLink for Receiver {
    fn pull(&mut self) -> Result<Batch, Error> {
        self.receiver.recv().map_err(|_| Error::Closed)
    }
}

#[cfg(test)]
mod test {
    use std::thread;
    use std::time::Duration;

    use super::{channel, Error, SampleLink};
    use crate::config::{BatchConfig, LinkConfig, QueueConfig};
    use crate::types::measurement::Acceleration;
    use crate::types::sensor::IMUFrame;

    fn frame(index: usize) -> IMUFrame {
        IMUFrame { acceleration: Acceleration::new(index as f64, 0.0, 0.0), ..Default::default() }
    }

    fn indexes<L: SampleLink>(link: &mut L) -> Vec<usize> {
        link.pull().unwrap().iter().map(|f| f.acceleration.x() as usize).collect()
    }

    fn config(threshold: usize, max: usize, size: usize, blocking: bool) -> LinkConfig {
        LinkConfig {
            batch: BatchConfig { report_threshold: threshold, max_reports: max },
            queue: QueueConfig { size, blocking },
        }
    }

    #[test]
    fn test_report_threshold() {
        let (mut reporter, mut receiver) = channel(&config(3, 10, 4, false)).unwrap();
        for i in 0..7 {
            reporter.report(frame(i)).unwrap();
        }
        assert_eq!(2, receiver.len());
        assert_eq!(1, reporter.pending());
        drop(reporter);

        assert_eq!(vec![0, 1, 2], indexes(&mut receiver));
        assert_eq!(vec![3, 4, 5], indexes(&mut receiver));
        assert_eq!(vec![6], indexes(&mut receiver));
        assert_eq!(Err(Error::Closed), receiver.pull());
    }

    #[test]
    fn test_evict_oldest() {
        let (mut reporter, mut receiver) = channel(&config(1, 1, 2, false)).unwrap();
        for i in 0..5 {
            reporter.report(frame(i)).unwrap();
        }
        assert_eq!(3, reporter.dropped());
        assert_eq!(vec![3], indexes(&mut receiver));
        assert_eq!(vec![4], indexes(&mut receiver));
        assert!(receiver.is_empty());
    }

    #[test]
    fn test_accumulate_while_full() {
        let (mut reporter, mut receiver) = channel(&config(1, 3, 1, false)).unwrap();
        for i in 0..3 {
            reporter.report(frame(i)).unwrap();
        }
        assert_eq!(0, reporter.dropped());
        assert_eq!(2, reporter.pending());

        reporter.report(frame(3)).unwrap();
        assert_eq!(1, reporter.dropped());
        assert_eq!(0, reporter.pending());
        assert_eq!(vec![1, 2, 3], indexes(&mut receiver));
    }

    #[test]
    fn test_blocking_keeps_every_frame() {
        let (mut reporter, mut receiver) = channel(&config(1, 1, 1, true)).unwrap();
        let producer = thread::spawn(move || {
            for i in 0..5 {
                reporter.report(frame(i)).unwrap();
            }
            reporter.dropped()
        });
        let mut received = Vec::new();
        while let Ok(batch) = receiver.pull() {
            thread::sleep(Duration::from_millis(2));
            received.extend(batch.iter().map(|f| f.acceleration.x() as usize));
        }
        assert_eq!(0, producer.join().unwrap());
        assert_eq!(vec![0, 1, 2, 3, 4], received);
    }

    #[test]
    fn test_host_gone() {
        let (mut reporter, receiver) = channel(&config(1, 1, 1, true)).unwrap();
        drop(receiver);
        assert_eq!(Err(Error::Closed), reporter.report(frame(0)));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(channel(&config(0, 1, 1, true)), Err(Error::Config(_))));
        assert!(matches!(channel(&config(1, 0, 1, true)), Err(Error::Config(_))));
        assert!(matches!(channel(&config(1, 1, 0, true)), Err(Error::Config(_))));
    }
}
