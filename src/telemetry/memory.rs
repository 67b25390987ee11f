use core::convert::Infallible;

use super::{OrientedBox, Publisher};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Box(OrientedBox),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub channel: String,
    pub value: Value,
}

/// Keeps every published value in publishing order.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub records: Vec<Record>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channels(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.channel.as_str()).collect()
    }

    /// Scalar values published on `channel`, oldest first.
    pub fn scalars(&self, channel: &str) -> Vec<f64> {
        let filtered = self.records.iter().filter(|r| r.channel == channel);
        filtered
            .filter_map(|r| match r.value {
                Value::Scalar(v) => Some(v),
                Value::Box(_) => None,
            })
            .collect()
    }
}

impl Publisher for Recorder {
    type Error = Infallible;

    fn scalar(&mut self, channel: &str, value: f64) -> Result<(), Infallible> {
        self.records.push(Record { channel: channel.into(), value: Value::Scalar(value) });
        Ok(())
    }

    fn oriented_box(&mut self, channel: &str, value: &OrientedBox) -> Result<(), Infallible> {
        self.records.push(Record { channel: channel.into(), value: Value::Box(*value) });
        Ok(())
    }
}
