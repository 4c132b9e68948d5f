// crates/scrubreel-media/src/source.rs
//
// The decoder seam. Sampler workers, the hover extractor and the probe all
// talk to a FrameSource; FfmpegDecoders hands out the real FFmpeg-backed one.
//
// A FrameSource is stateful (it owns a seek cursor) and is never shared:
// every consumer opens its own through a DecoderFactory, on the thread that
// will use it. That is why FrameSource carries no `Send` bound: only the
// factory crosses threads.

use std::path::Path;

use anyhow::Result;
use scrubreel_core::RgbaFrame;

use crate::decode::FrameDecoder;

pub trait FrameSource {
    /// Frame count from container metadata (or estimated from duration).
    fn frame_count(&self) -> u64;

    /// Frames per second; 0.0 when the stream does not report one.
    fn frame_rate(&self) -> f64;

    /// Decode the next frame from the current position and report its
    /// native size. Used once by the probe, right after open.
    fn first_frame_size(&mut self) -> Result<(u32, u32)>;

    /// Seek to frame `index`, decode it and scale it to `width`×`height` RGBA.
    fn read_frame(&mut self, index: u64, width: u32, height: u32) -> Result<RgbaFrame>;
}

pub trait DecoderFactory: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>>;
}

/// Opens FFmpeg-backed FrameDecoders.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegDecoders;

impl DecoderFactory for FfmpegDecoders {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        Ok(Box::new(FrameDecoder::open(path)?))
    }
}
