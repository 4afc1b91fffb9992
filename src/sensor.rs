//! Long-lived sensor models and per-kind value transforms.
//!
//! A `Sensor` is created once per tracked record at load time and lives
//! until the registry is cleared. Identity and display name are fixed
//! at construction; only the value cell mutates, and only through the
//! kind-specific transform.

use crate::error::{BridgeError, BridgeResult};
use crate::record::SensorRecord;
use std::sync::atomic::{AtomicU64, Ordering};

/// Display-name prefix applied to power sensors.
pub const POWER_NAME_PREFIX: &str = "[POWER SENSOR] ";

/// Closed set of tracked sensor kinds.
///
/// Records with any other tag never construct a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// `temp` records; values pass through unchanged.
    Temperature,
    /// `pwr` records; the producer encodes tenths of a unit.
    Power,
}

impl SensorKind {
    /// Map a record type tag to a kind. Unknown tags are not tracked.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "temp" => Some(Self::Temperature),
            "pwr" => Some(Self::Power),
            _ => None,
        }
    }

    /// Kind-specific transform from raw producer units.
    pub fn scale(self, raw: f64) -> f64 {
        match self {
            Self::Temperature => raw,
            Self::Power => raw / 10.0,
        }
    }

    /// Display name used when a record carries no label.
    fn fallback_label(self) -> &'static str {
        match self {
            Self::Temperature => "Unknown Temp",
            Self::Power => "Unknown Power",
        }
    }
}

/// One tracked sensor: stable identity, display name, current value.
///
/// The value cell is a single atomic word (f64 bits) so host-held
/// handles can read it while the engine applies a refresh; everything
/// else is immutable after construction.
#[derive(Debug)]
pub struct Sensor {
    id: String,
    name: String,
    kind: SensorKind,
    value: AtomicU64,
}

impl Sensor {
    /// Construct a sensor from one decoded record.
    ///
    /// # Errors
    /// - `BridgeError::UnsupportedKind` if the tag names no tracked kind.
    /// - `BridgeError::MissingId` if the record has no `id` field; a
    ///   sensor without stable identity could never be matched again.
    /// - `BridgeError::UnparseableValue` if the record has no usable
    ///   initial value.
    pub fn from_record(record: &SensorRecord) -> BridgeResult<Self> {
        let kind =
            SensorKind::from_tag(&record.tag).ok_or_else(|| BridgeError::UnsupportedKind {
                tag: record.tag.clone(),
            })?;

        let id = record.id.clone().ok_or_else(|| BridgeError::MissingId {
            tag: record.tag.clone(),
        })?;

        let raw = record.value.as_deref().unwrap_or("");
        let parsed = parse_value(raw)?;

        let label = record
            .label
            .clone()
            .unwrap_or_else(|| kind.fallback_label().to_string());
        let name = match kind {
            SensorKind::Temperature => label,
            SensorKind::Power => format!("{POWER_NAME_PREFIX}{label}"),
        };

        Ok(Self {
            id,
            name,
            kind,
            value: AtomicU64::new(kind.scale(parsed).to_bits()),
        })
    }

    /// Stable identity, matched against record `id` fields on refresh.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name, fixed at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sensor kind.
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Latest value, in transformed units.
    pub fn value(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Apply a fresh raw sample through the kind transform.
    ///
    /// # Errors
    /// `BridgeError::UnparseableValue` if `raw` is not a decimal number;
    /// the prior value is retained unchanged.
    pub fn apply_update(&self, raw: &str) -> BridgeResult<()> {
        let parsed = parse_value(raw)?;
        self.value
            .store(self.kind.scale(parsed).to_bits(), Ordering::Relaxed);
        Ok(())
    }
}

/// Parse a record's decimal value text.
fn parse_value(raw: &str) -> BridgeResult<f64> {
    raw.trim()
        .parse()
        .map_err(|_| BridgeError::UnparseableValue {
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: &str, id: Option<&str>, label: Option<&str>, value: Option<&str>) -> SensorRecord {
        SensorRecord {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            label: label.map(str::to_string),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn tag_dispatch_is_closed() {
        assert_eq!(SensorKind::from_tag("temp"), Some(SensorKind::Temperature));
        assert_eq!(SensorKind::from_tag("pwr"), Some(SensorKind::Power));
        assert_eq!(SensorKind::from_tag("fan"), None);
        assert_eq!(SensorKind::from_tag(""), None);
    }

    #[test]
    fn temperature_value_passes_through() {
        let sensor = Sensor::from_record(&record("temp", Some("t1"), Some("CPU"), Some("45.2")))
            .unwrap();
        assert!((sensor.value() - 45.2).abs() < f64::EPSILON);
    }

    #[test]
    fn power_value_is_divided_by_ten() {
        let sensor =
            Sensor::from_record(&record("pwr", Some("p1"), None, Some("500"))).unwrap();
        assert!((sensor.value() - 50.0).abs() < f64::EPSILON);

        let sensor =
            Sensor::from_record(&record("pwr", Some("p2"), None, Some("237"))).unwrap();
        assert!((sensor.value() - 23.7).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_id_is_a_hard_construction_failure() {
        let result = Sensor::from_record(&record("temp", None, Some("CPU"), Some("42.0")));
        assert!(matches!(result, Err(BridgeError::MissingId { .. })));
    }

    #[test]
    fn unsupported_tag_never_constructs() {
        let result = Sensor::from_record(&record("fan", Some("f1"), None, Some("1200")));
        assert!(matches!(result, Err(BridgeError::UnsupportedKind { .. })));
    }

    #[test]
    fn missing_value_fails_construction() {
        let result = Sensor::from_record(&record("temp", Some("t1"), None, None));
        assert!(matches!(result, Err(BridgeError::UnparseableValue { .. })));
    }

    #[test]
    fn label_defaults_per_kind() {
        let temp = Sensor::from_record(&record("temp", Some("t1"), None, Some("1"))).unwrap();
        assert_eq!(temp.name(), "Unknown Temp");

        let pwr = Sensor::from_record(&record("pwr", Some("p1"), None, Some("1"))).unwrap();
        assert_eq!(pwr.name(), "[POWER SENSOR] Unknown Power");
    }

    #[test]
    fn power_name_is_prefixed_even_with_label() {
        let sensor =
            Sensor::from_record(&record("pwr", Some("p1"), Some("CPU Package"), Some("95")))
                .unwrap();
        assert_eq!(sensor.name(), "[POWER SENSOR] CPU Package");
    }

    #[test]
    fn update_applies_transform_each_time() {
        let sensor =
            Sensor::from_record(&record("pwr", Some("p1"), None, Some("500"))).unwrap();
        sensor.apply_update("237").unwrap();
        assert!((sensor.value() - 23.7).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_sample_retains_prior_value() {
        let sensor = Sensor::from_record(&record("temp", Some("t1"), None, Some("42.0")))
            .unwrap();
        let result = sensor.apply_update("not-a-number");
        assert!(matches!(result, Err(BridgeError::UnparseableValue { .. })));
        assert!((sensor.value() - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn identity_survives_construction() {
        let sensor = Sensor::from_record(&record("temp", Some("t9"), None, Some("0"))).unwrap();
        assert_eq!(sensor.id(), "t9");
        assert_eq!(sensor.kind(), SensorKind::Temperature);
    }
}
