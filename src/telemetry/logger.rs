use core::convert::Infallible;

use super::{OrientedBox, Publisher};

/// Publishes through the `log` facade at debug level. Never fails.
pub struct LogPublisher {
    recording: String,
}

impl LogPublisher {
    pub fn new(recording: impl Into<String>) -> Self {
        Self { recording: recording.into() }
    }
}

impl Publisher for LogPublisher {
    type Error = Infallible;

    fn scalar(&mut self, channel: &str, value: f64) -> Result<(), Infallible> {
        debug!("[{}] {} = {:.4}", self.recording, channel, value);
        Ok(())
    }

    fn oriented_box(&mut self, channel: &str, value: &OrientedBox) -> Result<(), Infallible> {
        let q = &value.rotation;
        debug!("[{}] {} = box [{:.4}, {:.4}, {:.4}, {:.4}]", self.recording, channel, q.i, q.j, q.k, q.w);
        Ok(())
    }
}
