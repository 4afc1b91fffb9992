//! Sensor synchronization engine.
//!
//! Owns the sensor registry and drives the two host-triggered
//! operations: one initial load that constructs and registers sensors,
//! and repeated refreshes that re-read the segment and update values
//! in place by stable id. The registry is never rebuilt; sensors exist
//! from load until `shutdown`.

use crate::record::{SensorRecord, decode_frame};
use crate::sensor::{Sensor, SensorKind};
use crate::shm::FrameSource;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared handle to a registered sensor.
///
/// The engine retains one handle per sensor in its registry; the host
/// sink receives clones for read access to id, name, and value.
pub type SensorHandle = Arc<Sensor>;

/// Registration surface offered by the consuming host.
pub trait SensorSink {
    /// Accept one sensor handle for external polling.
    fn register(&mut self, sensor: SensorHandle);
}

/// Ordered reference sink collecting handles for polling.
///
/// Used by the CLI host and tests; real hosts provide their own
/// `SensorSink` implementation.
#[derive(Debug, Default)]
pub struct SensorContainer {
    sensors: Vec<SensorHandle>,
}

impl SensorContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over registered handles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SensorHandle> {
        self.sensors.iter()
    }

    /// Number of registered sensors.
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// Whether any sensors are registered.
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

impl SensorSink for SensorContainer {
    fn register(&mut self, sensor: SensorHandle) {
        self.sensors.push(sensor);
    }
}

/// Outcome of one load or refresh cycle.
///
/// Whole-cycle failures degrade the cycle instead of escalating; the
/// status makes the degradation observable to hosts that care. The
/// system self-heals once the producer writes a clean frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// Cycle ran; `count` sensors were registered (load) or updated
    /// (refresh).
    Completed {
        /// Registered or updated sensor count.
        count: usize,
    },
    /// Frame was empty or whitespace-only; producer has no data yet.
    Empty,
    /// Segment missing or unreadable this cycle.
    SegmentUnavailable,
    /// Frame failed to decode, typically a torn read.
    Malformed,
}

/// Synchronization engine owning the sensor registry.
///
/// Single-writer: only the engine mutates the registry and sensor
/// values; sinks read through shared handles.
pub struct SensorBridge<S> {
    source: S,
    registry: Vec<SensorHandle>,
}

impl<S: FrameSource> SensorBridge<S> {
    /// Create an engine over the given frame source with an empty
    /// registry.
    pub fn new(source: S) -> Self {
        Self {
            source,
            registry: Vec::new(),
        }
    }

    /// Initial load: read, decode, construct, and register sensors.
    ///
    /// Called once by the host. Each record with a tracked tag becomes
    /// one sensor; records failing construction are skipped without
    /// affecting the rest. On a whole-cycle failure the registry stays
    /// empty and no sensors are exposed this cycle.
    pub fn load(&mut self, sink: &mut dyn SensorSink) -> CycleStatus {
        let records = match self.snapshot() {
            Ok(records) => records,
            Err(status) => return status,
        };

        let mut skipped = 0usize;
        for record in &records {
            if SensorKind::from_tag(&record.tag).is_none() {
                continue;
            }
            match Sensor::from_record(record) {
                Ok(sensor) => {
                    let handle = SensorHandle::new(sensor);
                    sink.register(Arc::clone(&handle));
                    self.registry.push(handle);
                }
                Err(e) => {
                    skipped += 1;
                    debug!("Skipping record during load: {e}");
                }
            }
        }

        info!(
            "Loaded {} sensors ({} records skipped)",
            self.registry.len(),
            skipped
        );
        CycleStatus::Completed {
            count: self.registry.len(),
        }
    }

    /// Refresh: re-read the segment and update registered sensors by id.
    ///
    /// Matching is exact string equality on `id` against a fresh record
    /// sequence. A sensor with no matching record, or whose matched
    /// record carries no usable value, keeps its last known value. On a
    /// whole-cycle failure the entire refresh is a no-op.
    pub fn refresh(&mut self) -> CycleStatus {
        let records = match self.snapshot() {
            Ok(records) => records,
            Err(status) => return status,
        };

        let mut updated = 0usize;
        for sensor in &self.registry {
            let matched = records
                .iter()
                .find(|record| record.id.as_deref() == Some(sensor.id()));
            let Some(record) = matched else {
                debug!("No record for sensor {} this cycle", sensor.id());
                continue;
            };
            match record.value.as_deref() {
                Some(raw) => match sensor.apply_update(raw) {
                    Ok(()) => updated += 1,
                    Err(e) => debug!("Sensor {} keeps prior value: {e}", sensor.id()),
                },
                None => debug!("Record for sensor {} has no value field", sensor.id()),
            }
        }

        debug!("Refreshed {updated}/{} sensors", self.registry.len());
        CycleStatus::Completed { count: updated }
    }

    /// Registered sensor handles, in registration order.
    pub fn sensors(&self) -> &[SensorHandle] {
        &self.registry
    }

    /// Clear the registry.
    ///
    /// Lifecycle hook for host shutdown or reload. Handles already
    /// given to the sink stop receiving updates and must not be used
    /// afterward.
    pub fn shutdown(&mut self) {
        info!("Clearing {} sensors from registry", self.registry.len());
        self.registry.clear();
    }

    /// Read and decode one frame; whole-cycle failures map to a status.
    fn snapshot(&mut self) -> Result<Vec<SensorRecord>, CycleStatus> {
        let text = match self.source.read_frame() {
            Ok(text) => text,
            Err(e) => {
                warn!("Segment unavailable this cycle: {e}");
                return Err(CycleStatus::SegmentUnavailable);
            }
        };

        if text.trim().is_empty() {
            debug!("Empty frame; no data this cycle");
            return Err(CycleStatus::Empty);
        }

        match decode_frame(&text) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("Discarding undecodable frame: {e}");
                Err(CycleStatus::Malformed)
            }
        }
    }
}
