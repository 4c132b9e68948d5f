// crates/scrubreel-media/src/sampler.rs
//
// TimelineSampler: fills the thumbnail strip with up to `thumbnail_budget`
// evenly spaced frames, decoded by K worker threads in parallel.
//
// Each worker opens its own decoder and walks its disjoint, interleaved slice
// of the SamplePlan. Results go out on the caller's channel tagged with the
// file id and generation; the strip reorders them by sequence index.
//
// Cancellation is cooperative: the flag is checked before every seek, so a
// worker stops within one frame's decode of `cancel()`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use uuid::Uuid;

use scrubreel_core::helpers::geometry::scaled_size;
use scrubreel_core::sampling::{SamplePlan, SampleTask};
use scrubreel_core::{ExtractedFrame, MediaHandle, SamplerEvent, ScrubConfig};

use crate::source::DecoderFactory;

pub struct TimelineSampler;

impl TimelineSampler {
    /// Spawn the workers for `handle` and return immediately.
    ///
    /// Every event carries `handle.id` and `handle.generation`. A worker that
    /// cannot open its decoder, or fails a read, stops early and still reports
    /// `WorkerDone`; its remaining slots stay empty.
    pub fn start(
        handle:  &MediaHandle,
        config:  &ScrubConfig,
        factory: Arc<dyn DecoderFactory>,
        tx:      Sender<SamplerEvent>,
    ) -> SamplerRun {
        let plan = SamplePlan::new(handle.info.frame_count, config.thumbnail_budget, config.workers);
        let (thumb_w, thumb_h) = scaled_size(handle.info.aspect, config.thumbnail_height);
        let cancel = Arc::new(AtomicBool::new(false));

        log::info!(
            "[sampler] {} gen {}: {} thumbnails every {} frames on {} workers ({thumb_w}x{thumb_h})",
            handle.path.display(), handle.generation,
            plan.sequence_len(), plan.frame_interval(), plan.active_workers(),
        );

        let handles = plan.tasks().map(|task| {
            let job = WorkerJob {
                file:       handle.id,
                generation: handle.generation,
                path:       handle.path.clone(),
                task,
                plan,
                thumb_w,
                thumb_h,
                factory:    Arc::clone(&factory),
                cancel:     Arc::clone(&cancel),
                tx:         tx.clone(),
            };
            thread::spawn(move || job.run())
        }).collect();

        SamplerRun {
            file:       handle.id,
            generation: handle.generation,
            plan,
            cancel,
            handles,
        }
    }
}

/// A running (or finished) sampling pass. Dropping it cancels the workers
/// without waiting for them.
pub struct SamplerRun {
    file:       Uuid,
    generation: u64,
    plan:       SamplePlan,
    cancel:     Arc<AtomicBool>,
    handles:    Vec<JoinHandle<()>>,
}

impl SamplerRun {
    pub fn file(&self) -> Uuid {
        self.file
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn plan(&self) -> &SamplePlan {
        &self.plan
    }

    /// Ask every worker to stop before its next seek.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Block until every worker has exited.
    pub fn join(mut self) {
        for h in self.handles.drain(..) {
            if h.join().is_err() {
                log::error!("[sampler] worker panicked (gen {})", self.generation);
            }
        }
    }
}

impl Drop for SamplerRun {
    fn drop(&mut self) {
        // Workers left running after a drop only ever produce stale events.
        if !self.handles.is_empty() {
            self.cancel();
        }
    }
}

struct WorkerJob {
    file:       Uuid,
    generation: u64,
    path:       PathBuf,
    task:       SampleTask,
    plan:       SamplePlan,
    thumb_w:    u32,
    thumb_h:    u32,
    factory:    Arc<dyn DecoderFactory>,
    cancel:     Arc<AtomicBool>,
    tx:         Sender<SamplerEvent>,
}

impl WorkerJob {
    fn run(self) {
        let produced = self.sample();
        log::debug!(
            "[sampler] worker {} gen {} done: {produced} thumbnails",
            self.task.worker, self.generation
        );
        let _ = self.tx.send(SamplerEvent::WorkerDone {
            file:       self.file,
            generation: self.generation,
            worker:     self.task.worker,
            produced,
        });
    }

    fn sample(&self) -> usize {
        let mut source = match self.factory.open(&self.path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[sampler] worker {} open failed: {e:#}", self.task.worker);
                return 0;
            }
        };

        let mut produced = 0;
        for frame_index in self.task.frame_indices() {
            if self.cancel.load(Ordering::SeqCst) {
                log::debug!("[sampler] worker {} cancelled at frame {frame_index}", self.task.worker);
                break;
            }
            let image = match source.read_frame(frame_index, self.thumb_w, self.thumb_h) {
                Ok(img) => img,
                Err(e) => {
                    // A read failure ends this worker only; the others keep going.
                    log::warn!(
                        "[sampler] worker {} stopped at frame {frame_index}: {e:#}",
                        self.task.worker
                    );
                    break;
                }
            };
            let event = SamplerEvent::Thumbnail {
                file:       self.file,
                generation: self.generation,
                frame: ExtractedFrame {
                    sequence: self.plan.sequence_index(frame_index),
                    image,
                },
            };
            if self.tx.send(event).is_err() {
                // Sink is gone; nobody will read the rest.
                break;
            }
            produced += 1;
        }
        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    use crossbeam_channel::{bounded, unbounded, Receiver};
    use scrubreel_core::MediaInfo;

    use crate::testing::{shade_of, SyntheticDecoders};

    fn handle(frame_count: u64, generation: u64) -> MediaHandle {
        let info = MediaInfo::from_stream(Path::new("clip.mp4"), frame_count, 30.0, 1920, 1080).unwrap();
        MediaHandle::new(Path::new("clip.mp4"), info, generation)
    }

    fn collect(rx: &Receiver<SamplerEvent>) -> (Vec<ExtractedFrame>, usize) {
        let (mut thumbs, mut done) = (Vec::new(), 0);
        for ev in rx.iter() {
            match ev {
                SamplerEvent::Thumbnail { frame, .. } => thumbs.push(frame),
                SamplerEvent::WorkerDone { .. }        => done += 1,
            }
        }
        (thumbs, done)
    }

    #[test]
    fn eight_workers_fill_every_slot_once() {
        let factory = SyntheticDecoders::new(3000, 30.0, 1920, 1080);
        let (tx, rx) = unbounded();
        let run = TimelineSampler::start(&handle(3000, 1), &ScrubConfig::default(), Arc::new(factory.clone()), tx);
        run.join();

        let (thumbs, done) = collect(&rx);
        assert_eq!(done, 8);
        assert_eq!(factory.open_count(), 8);
        let slots: HashSet<usize> = thumbs.iter().map(|f| f.sequence).collect();
        assert_eq!(thumbs.len(), 100);
        assert_eq!(slots, (0..100).collect::<HashSet<_>>());
        for f in &thumbs {
            // slot i holds frame i*30, scaled to the thumbnail height
            assert_eq!(f.image.data[0], shade_of(f.sequence as u64 * 30));
            assert_eq!((f.image.width, f.image.height), (142, 80));
        }
    }

    #[test]
    fn events_carry_file_and_generation() {
        let factory = SyntheticDecoders::new(90, 30.0, 640, 480);
        let (tx, rx) = unbounded();
        let h = handle(90, 7);
        TimelineSampler::start(&h, &ScrubConfig::default(), Arc::new(factory), tx).join();
        for ev in rx.iter() {
            assert_eq!(ev.file(), h.id);
            assert_eq!(ev.generation(), 7);
        }
    }

    #[test]
    fn short_clip_uses_fewer_workers() {
        let factory = SyntheticDecoders::new(3, 30.0, 640, 480);
        let (tx, rx) = unbounded();
        let run = TimelineSampler::start(&handle(3, 1), &ScrubConfig::default(), Arc::new(factory.clone()), tx);
        assert_eq!(run.plan().active_workers(), 3);
        run.join();
        let (thumbs, done) = collect(&rx);
        assert_eq!((thumbs.len(), done), (3, 3));
        assert_eq!(factory.open_count(), 3);
    }

    #[test]
    fn empty_clip_produces_nothing() {
        let factory = SyntheticDecoders::new(0, 30.0, 640, 480);
        let (tx, rx) = unbounded();
        let run = TimelineSampler::start(&handle(0, 1), &ScrubConfig::default(), Arc::new(factory.clone()), tx);
        run.join();
        let (thumbs, done) = collect(&rx);
        assert!(thumbs.is_empty());
        assert_eq!(done, 0);
        assert_eq!(factory.open_count(), 0);
    }

    #[test]
    fn read_failure_stops_only_that_worker() {
        // Frames >= 1500 fail: every worker stops partway, none panics.
        let factory = SyntheticDecoders::new(3000, 30.0, 1920, 1080).failing_from(1500);
        let (tx, rx) = unbounded();
        TimelineSampler::start(&handle(3000, 1), &ScrubConfig::default(), Arc::new(factory), tx).join();
        let (thumbs, done) = collect(&rx);
        assert_eq!(done, 8);
        let slots: HashSet<usize> = thumbs.iter().map(|f| f.sequence).collect();
        assert_eq!(slots, (0..50).collect::<HashSet<_>>());
    }

    #[test]
    fn open_failure_reports_done_with_nothing() {
        let factory = SyntheticDecoders::new(3000, 30.0, 1920, 1080).failing_open();
        let (tx, rx) = unbounded();
        TimelineSampler::start(&handle(3000, 1), &ScrubConfig::default(), Arc::new(factory), tx).join();
        let (thumbs, done) = collect(&rx);
        assert!(thumbs.is_empty());
        assert_eq!(done, 8);
    }

    #[test]
    fn cancel_stops_workers_before_next_seek() {
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let factory = SyntheticDecoders::new(3000, 30.0, 1920, 1080).gated(gate_rx);
        let config = ScrubConfig { workers: 1, ..ScrubConfig::default() };
        let (tx, rx) = unbounded();
        let run = TimelineSampler::start(&handle(3000, 1), &config, Arc::new(factory.clone()), tx);

        // Let two reads through, then cancel. Closing the gate fails a read
        // that is already waiting, so the worker exits either way.
        gate_tx.send(()).unwrap();
        gate_tx.send(()).unwrap();
        run.cancel();
        assert!(run.is_cancelled());
        drop(gate_tx);
        run.join();

        let (thumbs, done) = collect(&rx);
        assert_eq!(done, 1);
        assert_eq!(thumbs.len(), 2);
        assert_eq!(factory.read_count(), 2);
    }
}
