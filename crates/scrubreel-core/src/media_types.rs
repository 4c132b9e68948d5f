// crates/scrubreel-core/src/media_types.rs
//
// Types that flow across the channels between scrubreel-media workers and
// whatever consumes thumbnails / previews.
// No ffmpeg, just plain data.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MediaError;
use crate::helpers::time::{format_clock, round_to};

/// What probing a file reports. Everything downstream (sampling plan, hover
/// math, duration label) is derived from these four numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub duration_secs: f64,
    pub frame_count:   u64,
    pub frame_rate:    f64,
    /// width / height of the first decoded frame.
    pub aspect:        f64,
}

impl MediaInfo {
    /// Build from raw stream numbers. `width`/`height` are the first decoded
    /// frame's dimensions.
    ///
    /// ```
    /// use std::path::Path;
    /// use scrubreel_core::MediaInfo;
    /// let info = MediaInfo::from_stream(Path::new("a.mp4"), 3000, 30.0, 1920, 1080).unwrap();
    /// assert_eq!(info.duration_secs, 100.0);
    /// ```
    pub fn from_stream(
        path:        &Path,
        frame_count: u64,
        frame_rate:  f64,
        width:       u32,
        height:      u32,
    ) -> Result<Self, MediaError> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(MediaError::DurationUnknown { path: path.to_path_buf() });
        }
        if width == 0 || height == 0 {
            return Err(MediaError::unreadable(path, format!("first frame is {width}x{height}")));
        }
        Ok(Self {
            duration_secs: round_to(frame_count as f64 / frame_rate, 3),
            frame_count,
            frame_rate,
            aspect: width as f64 / height as f64,
        })
    }

    /// Frame index shown at `timestamp_ms`: `floor(ms / 1000 * fps)`.
    /// Negative timestamps map to frame 0. The result is NOT clamped to
    /// `frame_count`; range checks belong to the extractor.
    pub fn frame_at_ms(&self, timestamp_ms: f64) -> u64 {
        let idx = (timestamp_ms / 1000.0 * self.frame_rate).floor();
        if idx.is_finite() && idx > 0.0 { idx as u64 } else { 0 }
    }

    /// `M:SS` label for the timeline's duration readout (whole seconds).
    pub fn duration_label(&self) -> String {
        format_clock(self.duration_secs.trunc())
    }
}

/// The file currently active in a session. Each component that needs to read
/// frames opens its own decoder against `path`; the handle itself owns none.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaHandle {
    /// Identity of this open. Re-opening the same path yields a new id.
    pub id:         Uuid,
    pub path:       PathBuf,
    pub info:       MediaInfo,
    /// Sampler generation bound to this open. Events carrying any other
    /// generation are stale.
    pub generation: u64,
}

impl MediaHandle {
    pub fn new(path: &Path, info: MediaInfo, generation: u64) -> Self {
        Self { id: Uuid::new_v4(), path: path.to_path_buf(), info, generation }
    }
}

/// Packed RGBA pixels, row-major, no stride padding.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaFrame {
    pub width:  u32,
    pub height: u32,
    pub data:   Vec<u8>,
}

impl RgbaFrame {
    /// Opaque black frame of the given size.
    pub fn black(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self { width, height, data }
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

/// One thumbnail together with its slot in the strip.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedFrame {
    /// `floor(frame_index / frame_interval)`. Workers finish out of order, so
    /// this, not arrival order, decides where the thumbnail goes.
    pub sequence: usize,
    pub image:    RgbaFrame,
}

/// Events sent from TimelineSampler workers. Every event is tagged with the
/// file identity and generation of the run that produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum SamplerEvent {
    Thumbnail  { file: Uuid, generation: u64, frame: ExtractedFrame },
    WorkerDone { file: Uuid, generation: u64, worker: usize, produced: usize },
}

impl SamplerEvent {
    pub fn generation(&self) -> u64 {
        match self {
            SamplerEvent::Thumbnail  { generation, .. } => *generation,
            SamplerEvent::WorkerDone { generation, .. } => *generation,
        }
    }

    pub fn file(&self) -> Uuid {
        match self {
            SamplerEvent::Thumbnail  { file, .. } => *file,
            SamplerEvent::WorkerDone { file, .. } => *file,
        }
    }
}

/// One throttled emission from the scrub input. `x`/`y` are global
/// (screen) pointer coordinates used to place the popup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PreviewRequest {
    Show { x: f64, y: f64, timestamp_ms: f64 },
    Hide,
}
