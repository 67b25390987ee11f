use std::vec;

use super::IMUFrame;

/// Frames handed over by one pull of the sensor link, in delivery order. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch(Vec<IMUFrame>);

impl Batch {
    pub fn new(frames: Vec<IMUFrame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self(frames))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> core::slice::Iter<IMUFrame> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<IMUFrame> {
        self.0
    }
}

impl core::ops::Deref for Batch {
    type Target = [IMUFrame];

    fn deref(&self) -> &[IMUFrame] {
        &self.0
    }
}

impl IntoIterator for Batch {
    type Item = IMUFrame;
    type IntoIter = vec::IntoIter<IMUFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a IMUFrame;
    type IntoIter = core::slice::Iter<'a, IMUFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

mod test {
    #[test]
    fn test_empty_batch() {
        use super::Batch;

        assert_eq!(None, Batch::new(Vec::new()));
    }

    #[test]
    fn test_batch_order() {
        use super::{Batch, IMUFrame};
        use crate::types::measurement::Acceleration;

        let frames: Vec<IMUFrame> = (0..4)
            .map(|i| IMUFrame { acceleration: Acceleration::new(i as f64, 0.0, 0.0), ..Default::default() })
            .collect();
        let batch = Batch::new(frames.clone()).unwrap();
        assert_eq!(4, batch.len());
        assert_eq!(frames, batch.into_inner());
    }
}
