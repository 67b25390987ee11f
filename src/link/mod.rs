pub mod queue;

pub use queue::{channel, Receiver, Reporter};

use crate::types::sensor::Batch;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("sensor link closed")]
    Closed,
    #[error("invalid link configuration: {0}")]
    Config(&'static str),
}

/// Host end of a sensor link.
///
/// Batch thresholds and queue depth belong to whoever built the link; the host only
/// relies on whole batches arriving in order. Packets the link drops upstream are
/// invisible here.
pub trait SampleLink {
    /// Blocks until a batch is available. `Error::Closed` once the producer is gone
    /// and every batch it sent has been pulled.
    fn pull(&mut self) -> Result<Batch, Error>;
}

impl<L: SampleLink + ?Sized> SampleLink for &mut L {
    fn pull(&mut self) -> Result<Batch, Error> {
        (**self).pull()
    }
}

impl<L: SampleLink + ?Sized> SampleLink for Box<L> {
    fn pull(&mut self) -> Result<Batch, Error> {
        (**self).pull()
    }
}
