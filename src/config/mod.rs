pub mod pathset;

use pathset::{Error, Path, PathSet, Value};

use crate::link;

const DEFAULT_REPORT_THRESHOLD: usize = 1;
const DEFAULT_MAX_REPORTS: usize = 10;
const DEFAULT_QUEUE_SIZE: usize = 50;

/// Producer-side batching of the sensor link.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BatchConfig {
    /// Frames accumulated before a batch is handed to the host
    pub report_threshold: usize,
    /// Frames accumulated while the host queue is full before the producer stops
    /// accumulating and blocks or evicts
    pub max_reports: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { report_threshold: DEFAULT_REPORT_THRESHOLD, max_reports: DEFAULT_MAX_REPORTS }
    }
}

impl PathSet for BatchConfig {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "report-threshold" => self.report_threshold = value.parse_or(DEFAULT_REPORT_THRESHOLD)?,
            "max-reports" => self.max_reports = value.parse_or(DEFAULT_MAX_REPORTS)?,
            _ => return Err(Error::UnknownPath),
        }
        Ok(())
    }
}

/// Host-side queue of the sensor link.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct QueueConfig {
    /// Batches held before the queue is full
    pub size: usize,
    /// When full, block the producer instead of evicting the oldest batch
    pub blocking: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { size: DEFAULT_QUEUE_SIZE, blocking: false }
    }
}

impl PathSet for QueueConfig {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "size" => self.size = value.parse_or(DEFAULT_QUEUE_SIZE)?,
            "blocking" => self.blocking = value.parse_or(false)?,
            _ => return Err(Error::UnknownPath),
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub batch: BatchConfig,
    pub queue: QueueConfig,
}

impl LinkConfig {
    pub fn validate(&self) -> Result<(), link::Error> {
        if self.batch.report_threshold == 0 {
            return Err(link::Error::Config("report-threshold must be positive"));
        }
        if self.batch.max_reports == 0 {
            return Err(link::Error::Config("max-reports must be positive"));
        }
        if self.queue.size == 0 {
            return Err(link::Error::Config("queue size must be positive"));
        }
        Ok(())
    }
}

impl PathSet for LinkConfig {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "batch" => self.batch.set(path, value),
            "queue" => self.queue.set(path, value),
            _ => Err(Error::UnknownPath),
        }
    }
}

/// Report rates in Hz.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SensorConfig {
    pub rotation_vector_rate: u16,
    pub accelerometer_rate: u16,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { rotation_vector_rate: 400, accelerometer_rate: 500 }
    }
}

impl SensorConfig {
    /// Rate at which combined frames are produced, bound by the slower sensor.
    pub fn frame_rate(&self) -> u16 {
        core::cmp::min(self.rotation_vector_rate, self.accelerometer_rate)
    }
}

impl PathSet for SensorConfig {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        let rate = match path.str()? {
            "rotation-vector-rate" => &mut self.rotation_vector_rate,
            "accelerometer-rate" => &mut self.accelerometer_rate,
            _ => return Err(Error::UnknownPath),
        };
        match value.parse()? {
            0 => Err(Error::InvalidValue),
            value => {
                *rate = value;
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub recording: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { recording: "imu_stream".into() }
    }
}

impl PathSet for TelemetryConfig {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "recording" => self.recording = value.parse()?,
            _ => return Err(Error::UnknownPath),
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub link: LinkConfig,
    pub sensors: SensorConfig,
    pub telemetry: TelemetryConfig,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl PathSet for Config {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "link" => self.link.set(path, value),
            "sensors" => self.sensors.set(path, value),
            "telemetry" => self.telemetry.set(path, value),
            _ => Err(Error::UnknownPath),
        }
    }
}

mod test {
    #[test]
    fn test_partial_json() {
        use super::{BatchConfig, Config, QueueConfig};

        let json = r#"{"link": {"batch": {"report-threshold": 20}, "queue": {"blocking": true}}}"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(BatchConfig { report_threshold: 20, max_reports: 10 }, config.link.batch);
        assert_eq!(QueueConfig { size: 50, blocking: true }, config.link.queue);
        assert_eq!(400, config.sensors.rotation_vector_rate);
        assert_eq!("imu_stream", config.telemetry.recording);
    }

    #[test]
    fn test_path_set() {
        use super::pathset::{apply, Error};
        use super::Config;

        let mut config = Config::default();
        apply(&mut config, "link.batch.max-reports=20").unwrap();
        apply(&mut config, "link.queue.blocking = true").unwrap();
        apply(&mut config, "sensors.accelerometer-rate=100").unwrap();
        apply(&mut config, "telemetry.recording=bench").unwrap();
        assert_eq!(20, config.link.batch.max_reports);
        assert!(config.link.queue.blocking);
        assert_eq!(100, config.sensors.frame_rate());
        assert_eq!("bench", config.telemetry.recording);

        apply(&mut config, "link.batch.max-reports").unwrap();
        assert_eq!(10, config.link.batch.max_reports);

        assert_eq!(Err(Error::UnknownPath), apply(&mut config, "link.batch.size=1"));
        assert_eq!(Err(Error::InvalidValue), apply(&mut config, "link.queue.size=many"));
        assert_eq!(Err(Error::InvalidValue), apply(&mut config, "sensors.accelerometer-rate=0"));
        assert_eq!(Err(Error::ExpectValue), apply(&mut config, "telemetry.recording"));
    }

    #[test]
    fn test_validate() {
        use super::LinkConfig;
        use crate::link;

        let mut config = LinkConfig::default();
        assert_eq!(Ok(()), config.validate());
        config.queue.size = 0;
        assert!(matches!(config.validate(), Err(link::Error::Config(_))));
    }
}
