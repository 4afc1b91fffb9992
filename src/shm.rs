//! Shared memory frame acquisition.
//!
//! The producer publishes telemetry as a null-terminated text run at
//! offset 0 of a named POSIX shared memory object. This module attaches
//! to that object read-only and extracts one frame snapshot per call.
//! There is no locking protocol with the producer; a snapshot taken
//! mid-write surfaces later as a decode failure, not here.

use crate::error::{BridgeError, BridgeResult};
use memmap2::Mmap;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::shm_open;
use nix::sys::stat::Mode;
use std::fs::File;
use tracing::trace;

/// Well-known segment name published by the producer.
pub const DEFAULT_SEGMENT_NAME: &str = "AIDA64_SensorValues";

/// Upper bound on one frame, in bytes.
pub const MAX_FRAME_BYTES: usize = 65536;

/// A source of raw telemetry frames.
///
/// The synchronization engine reads through this trait so hosts and
/// tests can substitute their own frame delivery.
pub trait FrameSource {
    /// Read one frame snapshot as text.
    ///
    /// An empty or whitespace-only result means the producer has not
    /// written data yet; it is not an error.
    ///
    /// # Errors
    /// - `BridgeError::SegmentNotFound` if the segment does not exist.
    /// - `BridgeError::PermissionDenied` if it cannot be opened.
    fn read_frame(&mut self) -> BridgeResult<String>;
}

/// Frame source backed by a named POSIX shared memory object.
///
/// The object is opened read-only on every call; the producer may
/// recreate it between cycles, so no mapping is held across reads.
pub struct SharedMemorySource {
    name: String,
}

impl SharedMemorySource {
    /// Create a source for the given segment name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Get the segment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// POSIX shm object names carry a leading slash.
    fn shm_path(&self) -> String {
        if self.name.starts_with('/') {
            self.name.clone()
        } else {
            format!("/{}", self.name)
        }
    }
}

impl FrameSource for SharedMemorySource {
    fn read_frame(&mut self) -> BridgeResult<String> {
        let path = self.shm_path();
        let fd = shm_open(path.as_str(), OFlag::O_RDONLY, Mode::empty()).map_err(
            |errno| match errno {
                Errno::ENOENT => BridgeError::SegmentNotFound {
                    name: self.name.clone(),
                },
                Errno::EACCES => BridgeError::PermissionDenied {
                    name: self.name.clone(),
                },
                other => BridgeError::Sys { source: other },
            },
        )?;

        let file = File::from(fd);
        let len = file.metadata()?.len() as usize;
        if len == 0 {
            // Segment created but not yet written.
            return Ok(String::new());
        }

        // SAFETY: read-only mapping of a file we hold open; the producer
        // may mutate it concurrently, which can only tear the text run.
        let map = unsafe { Mmap::map(&file)? };

        let frame = extract_frame(&map);
        trace!("Read {} chars from segment {}", frame.len(), self.name);
        Ok(frame)
    }
}

/// Extract the null-terminated text run from mapped segment bytes.
///
/// Stops at the first zero byte (exclusive) or at `MAX_FRAME_BYTES`,
/// whichever comes first. The producer writes a single-byte encoding;
/// each byte widens to the code point of equal value.
fn extract_frame(bytes: &[u8]) -> String {
    let bound = bytes.len().min(MAX_FRAME_BYTES);
    let run = match bytes[..bound].iter().position(|&b| b == 0) {
        Some(nul) => &bytes[..nul],
        None => &bytes[..bound],
    };
    run.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_stops_at_first_nul() {
        let bytes = b"<temp><id>a</id></temp>\0garbage after terminator";
        assert_eq!(extract_frame(bytes), "<temp><id>a</id></temp>");
    }

    #[test]
    fn frame_without_nul_truncates_at_bound() {
        let bytes = vec![b'x'; MAX_FRAME_BYTES + 512];
        let frame = extract_frame(&bytes);
        assert_eq!(frame.len(), MAX_FRAME_BYTES);
    }

    #[test]
    fn frame_shorter_than_bound_is_taken_whole() {
        let bytes = b"<pwr><id>p</id></pwr>";
        assert_eq!(extract_frame(bytes), "<pwr><id>p</id></pwr>");
    }

    #[test]
    fn high_bytes_widen_to_equal_code_points() {
        // 0xB0 is the degree sign in the producer's encoding.
        let bytes = b"CPU \xB0C\0";
        assert_eq!(extract_frame(bytes), "CPU \u{b0}C");
    }

    #[test]
    fn leading_nul_yields_empty_frame() {
        assert_eq!(extract_frame(b"\0<temp/>"), "");
    }

    #[test]
    fn segment_name_gains_leading_slash() {
        let source = SharedMemorySource::new("AIDA64_SensorValues");
        assert_eq!(source.shm_path(), "/AIDA64_SensorValues");

        let source = SharedMemorySource::new("/already_rooted");
        assert_eq!(source.shm_path(), "/already_rooted");
    }
}
