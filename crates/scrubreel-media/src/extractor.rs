// crates/scrubreel-media/src/extractor.rs
//
// SingleFrameExtractor: random-access decode of one frame for the hover
// preview, scaled to the thumbnail height.
//
// Owns a decoder separate from playback and from the sampler workers. It is
// opened lazily on the first request and reused for every request after that;
// a decoder that fails a read is dropped and reopened on the next request.
// Not Send: build it on the thread that calls `extract`.

use std::sync::Arc;

use scrubreel_core::helpers::geometry::scaled_size;
use scrubreel_core::{MediaHandle, RgbaFrame};
use uuid::Uuid;

use crate::source::{DecoderFactory, FrameSource};

pub struct SingleFrameExtractor {
    handle:  MediaHandle,
    width:   u32,
    height:  u32,
    factory: Arc<dyn DecoderFactory>,
    source:  Option<Box<dyn FrameSource>>,
}

impl SingleFrameExtractor {
    pub fn new(handle: MediaHandle, thumbnail_height: u32, factory: Arc<dyn DecoderFactory>) -> Self {
        let (width, height) = scaled_size(handle.info.aspect, thumbnail_height);
        Self { handle, width, height, factory, source: None }
    }

    /// Id of the file this extractor reads.
    pub fn file(&self) -> Uuid {
        self.handle.id
    }

    pub fn handle(&self) -> &MediaHandle {
        &self.handle
    }

    /// Decode frame `frame_index`. `None` when the index is past the end of
    /// the file or the decoder fails; failures are logged, not raised.
    pub fn extract(&mut self, frame_index: u64) -> Option<RgbaFrame> {
        if frame_index >= self.handle.info.frame_count {
            log::debug!(
                "[extract] frame {frame_index} out of range (0..{})",
                self.handle.info.frame_count
            );
            return None;
        }

        if self.source.is_none() {
            match self.factory.open(&self.handle.path) {
                Ok(s) => self.source = Some(s),
                Err(e) => {
                    log::warn!("[extract] open {} failed: {e:#}", self.handle.path.display());
                    return None;
                }
            }
        }
        let source = self.source.as_mut()?;

        match source.read_frame(frame_index, self.width, self.height) {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("[extract] frame {frame_index} failed: {e:#}; reopening next time");
                self.source = None;
                None
            }
        }
    }
}
