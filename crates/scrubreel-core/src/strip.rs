// crates/scrubreel-core/src/strip.rs
//
// ThumbnailStrip: the sink side of TimelineSampler.
//
// Workers finish out of order, so thumbnails are inserted by sequence index
// into a fixed slot array rather than appended. Each strip is bound to one
// (file, generation) pair; events from any other run are stale and dropped.
//
// Also maps a playback position onto the strip for the playhead line drawn
// over the thumbnails.

use std::collections::HashSet;
use uuid::Uuid;

use crate::helpers::time::round_to;
use crate::media_types::{RgbaFrame, SamplerEvent};

#[derive(Default)]
pub struct ThumbnailStrip {
    file:         Option<Uuid>,
    generation:   u64,
    slots:        Vec<Option<RgbaFrame>>,
    workers:      usize,
    workers_done: HashSet<usize>,
    duration_ms:  f64,
    /// Width of one thumbnail, learned from the first one that arrives.
    slot_width:   u32,
    slot_height:  u32,
}

impl ThumbnailStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything and bind the strip to a new run.
    /// `len` is the plan's sequence length, `workers` its active worker count.
    pub fn reset(&mut self, file: Uuid, generation: u64, len: usize, workers: usize, duration_secs: f64) {
        self.file         = Some(file);
        self.generation   = generation;
        self.slots        = vec![None; len];
        self.workers      = workers;
        self.workers_done.clear();
        self.duration_ms  = duration_secs * 1000.0;
        self.slot_width   = 0;
        self.slot_height  = 0;
    }

    /// Apply one sampler event. Returns `false` when the event was discarded
    /// (stale run, or a sequence index outside the strip).
    pub fn accept(&mut self, event: SamplerEvent) -> bool {
        if self.file != Some(event.file()) || event.generation() != self.generation {
            return false;
        }
        match event {
            SamplerEvent::Thumbnail { frame, .. } => {
                let Some(slot) = self.slots.get_mut(frame.sequence) else {
                    return false;
                };
                if self.slot_width == 0 {
                    self.slot_width  = frame.image.width;
                    self.slot_height = frame.image.height;
                }
                *slot = Some(frame.image);
                true
            }
            SamplerEvent::WorkerDone { worker, .. } => {
                self.workers_done.insert(worker);
                true
            }
        }
    }

    pub fn file(&self) -> Option<Uuid> {
        self.file
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots that hold a thumbnail.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn get(&self, sequence: usize) -> Option<&RgbaFrame> {
        self.slots.get(sequence).and_then(Option::as_ref)
    }

    /// All workers reported done. Missing slots after this point are the
    /// accepted result of early-stopped workers.
    pub fn is_complete(&self) -> bool {
        self.workers_done.len() >= self.workers
    }

    /// Width of the whole strip once the thumbnail width is known.
    pub fn total_width(&self) -> f64 {
        self.slots.len() as f64 * self.slot_width as f64
    }

    /// X offset of the playhead for `position_ms`:
    /// `round(position / duration, 6) * total_width`.
    /// `None` until the duration and a thumbnail width are known.
    pub fn playhead_x(&self, position_ms: f64) -> Option<f64> {
        if !(self.duration_ms > 0.0) || self.slot_width == 0 {
            return None;
        }
        let progress = round_to((position_ms / self.duration_ms).clamp(0.0, 1.0), 6);
        Some(progress * self.total_width())
    }

    /// Lay the thumbnails out left to right in one frame. Missing slots are
    /// left black.
    pub fn compose(&self) -> Option<RgbaFrame> {
        if self.slot_width == 0 || self.slots.is_empty() {
            return None;
        }
        let (sw, sh) = (self.slot_width as usize, self.slot_height as usize);
        let mut out = RgbaFrame::black(self.slot_width * self.slots.len() as u32, self.slot_height);
        let out_stride = out.width as usize * 4;

        for (i, thumb) in self.slots.iter().enumerate() {
            let Some(thumb) = thumb else { continue };
            let copy_w = sw.min(thumb.width as usize) * 4;
            let rows   = sh.min(thumb.height as usize);
            for row in 0..rows {
                let src = row * thumb.width as usize * 4;
                let dst = row * out_stride + i * sw * 4;
                out.data[dst..dst + copy_w].copy_from_slice(&thumb.data[src..src + copy_w]);
            }
        }
        Some(out)
    }
}
