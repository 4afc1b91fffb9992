//! # AIDA64 Shared-Memory Sensor Bridge
//!
//! Ingests hardware telemetry (temperatures, power draw) that AIDA64
//! publishes into a null-terminated shared memory segment and
//! republishes it as a stable, queryable set of named sensor values.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌───────────────┐
//! │   Producer   │    │  Shared Segment  │    │  SensorBridge │
//! │  (AIDA64)    ├───►│  <temp>..<pwr>.. ├───►│  load/refresh │
//! └──────────────┘    │  NUL-terminated  │    └───────┬───────┘
//!                     └──────────────────┘            │
//!                                              ┌──────▼───────┐
//!                                              │  SensorSink  │
//!                                              │  (host polls │
//!                                              │   handles)   │
//!                                              └──────────────┘
//! ```
//!
//! The producer writes the segment on its own schedule with no
//! coordination; every read is a snapshot attempt and a torn frame is
//! a routine, self-healing miss rather than an error.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use aida_bridge::{
//!     CycleStatus, DEFAULT_SEGMENT_NAME, SensorBridge, SensorContainer, SharedMemorySource,
//! };
//!
//! let source = SharedMemorySource::new(DEFAULT_SEGMENT_NAME);
//! let mut bridge = SensorBridge::new(source);
//! let mut container = SensorContainer::new();
//!
//! match bridge.load(&mut container) {
//!     CycleStatus::Completed { count } => println!("tracking {count} sensors"),
//!     status => println!("no sensors this cycle: {status:?}"),
//! }
//!
//! loop {
//!     bridge.refresh();
//!     for sensor in container.iter() {
//!         println!("{:>8.1}  {}  ({})", sensor.value(), sensor.name(), sensor.id());
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Per-record failures (missing id, unparseable value, unknown tag) are
//! swallowed at the record level; one bad record never affects others.
//! Whole-cycle failures (segment missing, torn frame) degrade the cycle
//! to a no-op and surface only through [`CycleStatus`]. No failure is
//! fatal to the host; retry is the host calling refresh again.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod record;
pub mod sensor;
pub mod shm;
pub mod sync;

pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use record::{SensorRecord, decode_frame};
pub use sensor::{POWER_NAME_PREFIX, Sensor, SensorKind};
pub use shm::{DEFAULT_SEGMENT_NAME, FrameSource, MAX_FRAME_BYTES, SharedMemorySource};
pub use sync::{CycleStatus, SensorBridge, SensorContainer, SensorHandle, SensorSink};

/// Initialize tracing for hosts that have no subscriber of their own
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
