// crates/scrubreel-media/src/session.rs
//
// ScrubSession: one timeline control's worth of scrub state.
//
// Owns the active file, the sampler run filling the strip, the hover
// throttler and the preview bus, and wires them together:
//   open(path)     → probe → new generation → cancel old run → start sampler
//                    → swap the preview extractor
//   pointer events → throttler → bus → preview worker → display
//   hover edges    → pause / resume the playback collaborator
//
// Not thread-safe by itself; drive it from the thread that receives pointer
// events. All decoding happens on the sampler and preview threads.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use scrubreel_core::display::{PlaybackControl, PreviewDisplay};
use scrubreel_core::helpers::geometry::ScreenRect;
use scrubreel_core::helpers::time::UNKNOWN_DURATION_LABEL;
use scrubreel_core::preview_bus::{PreviewBus, SubscriberId};
use scrubreel_core::strip::ThumbnailStrip;
use scrubreel_core::throttle::ScrubInputThrottler;
use scrubreel_core::{MediaError, MediaHandle, PreviewRequest, SamplerEvent, ScrubConfig};

use crate::preview::PreviewWorker;
use crate::probe::probe_with;
use crate::sampler::{SamplerRun, TimelineSampler};
use crate::source::{DecoderFactory, FfmpegDecoders};

pub struct ScrubSession<P: PlaybackControl> {
    config:          ScrubConfig,
    factory:         Arc<dyn DecoderFactory>,
    generation:      u64,
    handle:          Option<MediaHandle>,
    run:             Option<SamplerRun>,
    events_tx:       Sender<SamplerEvent>,
    events_rx:       Receiver<SamplerEvent>,
    strip:           ThumbnailStrip,
    throttler:       ScrubInputThrottler,
    bus:             PreviewBus,
    preview:         Option<(SubscriberId, PreviewWorker)>,
    playback:        P,
    /// Set only when this session paused playback on hover enter.
    paused_by_scrub: bool,
}

impl<P: PlaybackControl> ScrubSession<P> {
    /// Session that decodes with FFmpeg.
    pub fn with_ffmpeg(config: ScrubConfig, playback: P) -> Result<Self> {
        Self::new(config, Arc::new(FfmpegDecoders), playback)
    }

    pub fn new(config: ScrubConfig, factory: Arc<dyn DecoderFactory>, playback: P) -> Result<Self> {
        config.validate()?;
        let (events_tx, events_rx) = unbounded();
        let throttler = ScrubInputThrottler::new(0.0, 0.0, config.throttle_window());
        Ok(Self {
            config,
            factory,
            generation: 0,
            handle: None,
            run: None,
            events_tx,
            events_rx,
            strip: ThumbnailStrip::new(),
            throttler,
            bus: PreviewBus::new(),
            preview: None,
            playback,
            paused_by_scrub: false,
        })
    }

    /// Make `path` the active file.
    ///
    /// The previous file is closed first whatever the outcome: its sampler
    /// run is cancelled and its extractor dropped. On error the session is
    /// left with no active file.
    pub fn open(&mut self, path: &Path) -> Result<MediaHandle, MediaError> {
        self.close();

        let info = probe_with(self.factory.as_ref(), path)?;
        self.generation += 1;
        let handle = MediaHandle::new(path, info, self.generation);

        let run = TimelineSampler::start(
            &handle, &self.config, Arc::clone(&self.factory), self.events_tx.clone(),
        );
        self.strip.reset(
            handle.id,
            handle.generation,
            run.plan().sequence_len(),
            run.plan().active_workers(),
            info.duration_secs,
        );
        self.throttler.set_duration(info.duration_secs);
        if let Some((_, worker)) = &self.preview {
            worker.replace_extractor(handle.clone());
        }

        log::info!("[session] opened {} (gen {})", path.display(), handle.generation);
        self.run    = Some(run);
        self.handle = Some(handle.clone());
        Ok(handle)
    }

    /// Drop the active file, if any.
    pub fn close(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel();
        }
        if let Some(h) = self.handle.take() {
            log::debug!("[session] closed {} (gen {})", h.path.display(), h.generation);
        }
        self.strip = ThumbnailStrip::new();
        self.throttler.set_duration(0.0);
        if let Some((_, worker)) = &self.preview {
            worker.clear_extractor();
        }
    }

    /// Move every sampler event received so far into the strip. Returns how
    /// many were accepted; events from earlier generations are discarded.
    pub fn pump_thumbnails(&mut self) -> usize {
        let mut accepted = 0;
        while let Ok(ev) = self.events_rx.try_recv() {
            accepted += self.accept(ev) as usize;
        }
        accepted
    }

    /// Block until the strip is complete or `timeout` passes. Returns whether
    /// the strip completed.
    pub fn wait_for_strip(&mut self, timeout: Duration) -> bool {
        if self.handle.is_none() {
            return false;
        }
        let deadline = Instant::now() + timeout;
        while !self.strip.is_complete() {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.events_rx.recv_timeout(left) {
                Ok(ev) => { self.accept(ev); }
                Err(RecvTimeoutError::Timeout) => return false,
                // The session holds a sender, so this cannot happen.
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn accept(&mut self, ev: SamplerEvent) -> bool {
        let accepted = self.strip.accept(ev);
        if accepted && self.strip.is_complete() {
            log::info!(
                "[session] strip complete: {}/{} thumbnails (gen {})",
                self.strip.filled(), self.strip.len(), self.strip.generation()
            );
        }
        accepted
    }

    pub fn strip(&self) -> &ThumbnailStrip {
        &self.strip
    }

    pub fn active(&self) -> Option<&MediaHandle> {
        self.handle.as_ref()
    }

    /// `M:SS`, or `--:--` when no file is open.
    pub fn duration_label(&self) -> String {
        self.handle.as_ref()
            .map(|h| h.info.duration_label())
            .unwrap_or_else(|| UNKNOWN_DURATION_LABEL.to_string())
    }

    /// Playhead offset over the strip for a playback position.
    pub fn playhead_x(&self, position_ms: f64) -> Option<f64> {
        self.strip.playhead_x(position_ms)
    }

    pub fn set_control_width(&mut self, width: f64) {
        self.throttler.set_control_width(width);
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    // ── Preview wiring ────────────────────────────────────────────────────────

    /// Subscribe to throttled preview requests.
    pub fn subscribe_preview(&mut self) -> (SubscriberId, Receiver<PreviewRequest>) {
        self.bus.subscribe()
    }

    pub fn unsubscribe_preview(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Start a preview worker rendering into the display built by
    /// `make_display`. Replaces (and joins) any previously attached worker.
    pub fn attach_preview<D, F>(&mut self, make_display: F, screen: ScreenRect)
    where
        D: PreviewDisplay + 'static,
        F: FnOnce() -> D + Send + 'static,
    {
        self.detach_preview();
        let (id, rx) = self.bus.subscribe();
        let worker = PreviewWorker::spawn(
            make_display,
            self.config.popup_layout(),
            screen,
            self.config.thumbnail_height,
            Arc::clone(&self.factory),
            rx,
        );
        if let Some(h) = &self.handle {
            worker.replace_extractor(h.clone());
        }
        self.preview = Some((id, worker));
    }

    pub fn detach_preview(&mut self) {
        if let Some((id, worker)) = self.preview.take() {
            self.bus.unsubscribe(id);
            worker.shutdown();
        }
    }

    // ── Pointer input ─────────────────────────────────────────────────────────

    /// Pointer entered the timeline control. Pauses playback if it was
    /// running.
    pub fn pointer_enter(&mut self, now: Instant) {
        if self.throttler.pointer_enter(now) && self.playback.is_playing() {
            self.playback.pause();
            self.paused_by_scrub = true;
            log::debug!("[session] playback paused for scrub");
        }
    }

    /// Pointer moved over the control. Returns the request published to the
    /// preview subscribers, if the throttle window allowed one.
    pub fn pointer_move(&mut self, now: Instant, local_x: f64, global_x: f64, global_y: f64) -> Option<PreviewRequest> {
        let req = self.throttler.pointer_move(now, local_x, global_x, global_y)?;
        self.bus.publish(req);
        Some(req)
    }

    /// Pointer left the control. Publishes `Hide` and resumes playback if
    /// this session paused it.
    pub fn pointer_leave(&mut self) -> Option<PreviewRequest> {
        let req = self.throttler.pointer_leave()?;
        self.bus.publish(req);
        if std::mem::take(&mut self.paused_by_scrub) {
            self.playback.resume();
            log::debug!("[session] playback resumed");
        }
        Some(req)
    }
}
