use std::io::{self, Write};

use super::{OrientedBox, Publisher};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("telemetry write failed: {0}")]
    Io(#[from] io::Error),
    #[error("telemetry encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Record<'a> {
    recording: &'a str,
    channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scalar: Option<f64>,
    #[serde(rename = "box", skip_serializing_if = "Option::is_none")]
    oriented_box: Option<&'a OrientedBox>,
}

/// One JSON object per published value, newline separated.
pub struct JsonLines<W: Write> {
    writer: W,
    recording: String,
}

impl<W: Write> JsonLines<W> {
    pub fn new(writer: W, recording: impl Into<String>) -> Self {
        Self { writer, recording: recording.into() }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn write_record<W: Write>(writer: &mut W, record: &Record) -> Result<(), Error> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    Ok(())
}

impl<W: Write> Publisher for JsonLines<W> {
    type Error = Error;

    fn scalar(&mut self, channel: &str, value: f64) -> Result<(), Error> {
        let recording = self.recording.as_str();
        let record = Record { recording, channel, scalar: Some(value), oriented_box: None };
        write_record(&mut self.writer, &record)
    }

    fn oriented_box(&mut self, channel: &str, value: &OrientedBox) -> Result<(), Error> {
        let recording = self.recording.as_str();
        let record = Record { recording, channel, scalar: None, oriented_box: Some(value) };
        write_record(&mut self.writer, &record)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(self.writer.flush()?)
    }
}

mod test {
    #[test]
    fn test_json_lines() {
        use nalgebra::UnitQuaternion;
        use serde_json::{json, Value};

        use super::JsonLines;
        use crate::telemetry::{OrientedBox, Publisher, ACCEL_X, ORIENTATION};

        let mut sink = JsonLines::new(Vec::new(), "imu_stream");
        sink.oriented_box(ORIENTATION, &OrientedBox::marker(UnitQuaternion::identity())).unwrap();
        sink.scalar(ACCEL_X, 9.5).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<Value> = output.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(2, lines.len());
        assert_eq!(json!("imu/orientation"), lines[0]["channel"]);
        assert_eq!(json!([1.0, 3.0, 1.0]), lines[0]["box"]["size"]);
        let expected = json!({"recording": "imu_stream", "channel": "imu/accel_x", "scalar": 9.5});
        assert_eq!(expected, lines[1]);
    }

    #[test]
    fn test_write_failure() {
        use std::io;

        use super::{Error, JsonLines};
        use crate::telemetry::{Publisher, ROLL};

        struct Broken;

        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "viewer gone"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = JsonLines::new(Broken, "imu_stream");
        assert!(matches!(sink.scalar(ROLL, 0.0), Err(Error::Json(_)) | Err(Error::Io(_))));

        // buffered records only fail once flushed
        let mut sink = JsonLines::new(io::BufWriter::new(Broken), "imu_stream");
        assert!(sink.scalar(ROLL, 0.0).is_ok());
        assert!(matches!(sink.flush(), Err(Error::Io(_))));
    }
}
