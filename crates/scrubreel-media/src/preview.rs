// crates/scrubreel-media/src/preview.rs
//
// PreviewCoordinator: turns a PreviewRequest into a popup update.
// PreviewWorker: runs a coordinator on its own thread so decodes never block
// the thread that feeds pointer events.
//
// Requests are coalesced, not queued. When the worker wakes it drains every
// request already waiting and serves only the newest one, so a fast scrub
// costs one decode per wake-up instead of one per emission.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{select, unbounded, Receiver, Sender, TryRecvError};

use scrubreel_core::display::PreviewDisplay;
use scrubreel_core::helpers::geometry::{PopupLayout, ScreenRect};
use scrubreel_core::helpers::time::format_clock;
use scrubreel_core::{MediaHandle, PreviewRequest};

use crate::extractor::SingleFrameExtractor;
use crate::source::DecoderFactory;

pub struct PreviewCoordinator<D: PreviewDisplay> {
    extractor: Option<SingleFrameExtractor>,
    display:   D,
    layout:    PopupLayout,
    screen:    ScreenRect,
}

impl<D: PreviewDisplay> PreviewCoordinator<D> {
    pub fn new(display: D, layout: PopupLayout, screen: ScreenRect) -> Self {
        Self { extractor: None, display, layout, screen }
    }

    /// Swap in the extractor for a newly opened file (or none). The previous
    /// extractor and its decoder are dropped here.
    pub fn set_extractor(&mut self, extractor: Option<SingleFrameExtractor>) {
        self.extractor = extractor;
    }

    pub fn handle(&mut self, req: PreviewRequest) {
        match req {
            PreviewRequest::Hide => self.display.hide(),
            PreviewRequest::Show { x, y, timestamp_ms } => self.show(x, y, timestamp_ms),
        }
    }

    fn show(&mut self, x: f64, y: f64, timestamp_ms: f64) {
        let Some(extractor) = self.extractor.as_mut() else {
            self.display.hide();
            return;
        };
        let frame_index = extractor.handle().info.frame_at_ms(timestamp_ms);
        match extractor.extract(frame_index) {
            Some(image) => {
                let (px, py) = self.layout.place(x, y, self.screen);
                self.display.move_to(px, py);
                self.display.display(image, &format_clock(timestamp_ms / 1000.0));
            }
            None => self.display.hide(),
        }
    }
}

enum PreviewControl {
    Replace(Option<MediaHandle>),
    Shutdown,
}

/// Owns the preview thread. Dropping it shuts the thread down and joins it.
pub struct PreviewWorker {
    control: Sender<PreviewControl>,
    thread:  Option<JoinHandle<()>>,
}

impl PreviewWorker {
    /// Start the preview thread.
    ///
    /// `make_display` runs on the new thread, so the display itself does not
    /// have to be `Send`. The thread exits when `requests` disconnects or on
    /// shutdown.
    pub fn spawn<D, F>(
        make_display:     F,
        layout:           PopupLayout,
        screen:           ScreenRect,
        thumbnail_height: u32,
        factory:          Arc<dyn DecoderFactory>,
        requests:         Receiver<PreviewRequest>,
    ) -> Self
    where
        D: PreviewDisplay + 'static,
        F: FnOnce() -> D + Send + 'static,
    {
        let (control, control_rx) = unbounded();
        let thread = thread::spawn(move || {
            let mut coordinator = PreviewCoordinator::new(make_display(), layout, screen);
            let apply = |coordinator: &mut PreviewCoordinator<D>, msg: PreviewControl| -> bool {
                match msg {
                    PreviewControl::Replace(handle) => {
                        coordinator.set_extractor(handle.map(|h| {
                            SingleFrameExtractor::new(h, thumbnail_height, Arc::clone(&factory))
                        }));
                        true
                    }
                    PreviewControl::Shutdown => false,
                }
            };

            loop {
                select! {
                    recv(control_rx) -> msg => {
                        let Ok(msg) = msg else { break };
                        if !apply(&mut coordinator, msg) { break; }
                    }
                    recv(requests) -> msg => {
                        let Ok(mut req) = msg else {
                            log::debug!("[preview] request stream closed");
                            break;
                        };
                        // Pending control first: a request must never be
                        // served by the previous file's extractor.
                        loop {
                            match control_rx.try_recv() {
                                Ok(msg) => if !apply(&mut coordinator, msg) { return; },
                                Err(TryRecvError::Empty) => break,
                                Err(TryRecvError::Disconnected) => return,
                            }
                        }
                        let mut skipped = 0usize;
                        while let Ok(newer) = requests.try_recv() {
                            req = newer;
                            skipped += 1;
                        }
                        if skipped > 0 {
                            log::trace!("[preview] coalesced {skipped} stale requests");
                        }
                        coordinator.handle(req);
                    }
                }
            }
            log::debug!("[preview] worker exiting");
        });
        Self { control, thread: Some(thread) }
    }

    /// Serve subsequent requests from a fresh extractor for `handle`.
    pub fn replace_extractor(&self, handle: MediaHandle) {
        let _ = self.control.send(PreviewControl::Replace(Some(handle)));
    }

    /// Drop the current extractor; Show requests hide the popup until a new
    /// one is installed.
    pub fn clear_extractor(&self) {
        let _ = self.control.send(PreviewControl::Replace(None));
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.control.send(PreviewControl::Shutdown);
        if let Some(t) = self.thread.take() {
            if t.join().is_err() {
                log::error!("[preview] worker panicked");
            }
        }
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    use crossbeam_channel::bounded;
    use scrubreel_core::MediaInfo;

    use crate::testing::{shade_of, Recorder, Shown, SyntheticDecoders};

    const LAYOUT: PopupLayout = PopupLayout { width: 202.0, height: 108.0, gap: 10.0 };

    fn screen() -> ScreenRect {
        ScreenRect::new(0.0, 0.0, 1920.0, 1080.0)
    }

    fn handle(f: &SyntheticDecoders) -> MediaHandle {
        let info = MediaInfo::from_stream(Path::new("clip.mp4"), f.frame_count, f.frame_rate, f.width, f.height).unwrap();
        MediaHandle::new(Path::new("clip.mp4"), info, 1)
    }

    fn coordinator(f: &SyntheticDecoders) -> (PreviewCoordinator<Recorder>, Receiver<Shown>) {
        let (tx, rx) = unbounded();
        let mut c = PreviewCoordinator::new(Recorder(tx), LAYOUT, screen());
        c.set_extractor(Some(SingleFrameExtractor::new(handle(f), 80, Arc::new(f.clone()))));
        (c, rx)
    }

    #[test]
    fn show_places_popup_and_captions_frame() {
        let f = SyntheticDecoders::new(3000, 30.0, 1920, 1080);
        let (mut c, rx) = coordinator(&f);
        c.handle(PreviewRequest::Show { x: 500.0, y: 900.0, timestamp_ms: 65_500.0 });
        assert_eq!(rx.try_recv(), Ok(Shown::At(399.0, 782.0)));
        assert_eq!(rx.try_recv(), Ok(Shown::Frame {
            shade:   shade_of(1965),
            width:   142,
            caption: "1:05".into(),
        }));
    }

    #[test]
    fn show_past_end_hides() {
        let f = SyntheticDecoders::new(3000, 30.0, 1920, 1080);
        let (mut c, rx) = coordinator(&f);
        c.handle(PreviewRequest::Show { x: 500.0, y: 900.0, timestamp_ms: 200_000.0 });
        assert_eq!(rx.try_recv(), Ok(Shown::Hidden));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn show_without_extractor_hides() {
        let (tx, rx) = unbounded();
        let mut c = PreviewCoordinator::new(Recorder(tx), LAYOUT, screen());
        c.handle(PreviewRequest::Show { x: 1.0, y: 1.0, timestamp_ms: 0.0 });
        assert_eq!(rx.try_recv(), Ok(Shown::Hidden));
    }

    #[test]
    fn hide_forwards_to_display() {
        let f = SyntheticDecoders::new(3000, 30.0, 1920, 1080);
        let (mut c, rx) = coordinator(&f);
        c.handle(PreviewRequest::Hide);
        assert_eq!(rx.try_recv(), Ok(Shown::Hidden));
    }

    #[test]
    fn worker_serves_only_latest_of_a_burst() {
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let f = SyntheticDecoders::new(3000, 30.0, 1920, 1080).gated(gate_rx);
        let (shown_tx, shown_rx) = unbounded();
        let (req_tx, req_rx) = unbounded();
        let worker = PreviewWorker::spawn(
            move || Recorder(shown_tx), LAYOUT, screen(), 80, Arc::new(f.clone()), req_rx,
        );
        worker.replace_extractor(handle(&f));

        // First request blocks in the decoder until the gate opens.
        req_tx.send(PreviewRequest::Show { x: 500.0, y: 900.0, timestamp_ms: 1_000.0 }).unwrap();
        while f.open_count() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        // Burst while the worker is busy: only the last one may be decoded.
        for ms in [2_000.0, 3_000.0, 4_000.0, 5_000.0] {
            req_tx.send(PreviewRequest::Show { x: 500.0, y: 900.0, timestamp_ms: ms }).unwrap();
        }
        gate_tx.send(()).unwrap();
        gate_tx.send(()).unwrap();

        let shades: Vec<u8> = (0..4)
            .filter_map(|_| match shown_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Shown::Frame { shade, .. } => Some(shade),
                _ => None,
            })
            .collect();
        assert_eq!(shades, vec![shade_of(30), shade_of(150)]);
        assert_eq!(f.read_count(), 2);
        worker.shutdown();
    }

    #[test]
    fn trailing_hide_wins_over_pending_shows() {
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let f = SyntheticDecoders::new(3000, 30.0, 1920, 1080).gated(gate_rx);
        let (shown_tx, shown_rx) = unbounded();
        let (req_tx, req_rx) = unbounded();
        let worker = PreviewWorker::spawn(
            move || Recorder(shown_tx), LAYOUT, screen(), 80, Arc::new(f.clone()), req_rx,
        );
        worker.replace_extractor(handle(&f));

        req_tx.send(PreviewRequest::Show { x: 500.0, y: 900.0, timestamp_ms: 1_000.0 }).unwrap();
        while f.open_count() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        req_tx.send(PreviewRequest::Show { x: 500.0, y: 900.0, timestamp_ms: 2_000.0 }).unwrap();
        req_tx.send(PreviewRequest::Hide).unwrap();
        gate_tx.send(()).unwrap();

        let mut seen = Vec::new();
        while let Ok(s) = shown_rx.recv_timeout(Duration::from_secs(5)) {
            let done = s == Shown::Hidden;
            seen.push(s);
            if done { break; }
        }
        assert_eq!(seen.last(), Some(&Shown::Hidden));
        assert_eq!(f.read_count(), 1);
        drop(worker);
    }

    #[test]
    fn worker_exits_when_requests_close() {
        let f = SyntheticDecoders::new(30, 30.0, 64, 48);
        let (req_tx, req_rx) = unbounded::<PreviewRequest>();
        let (shown_tx, _shown_rx) = unbounded();
        let worker = PreviewWorker::spawn(
            move || Recorder(shown_tx), LAYOUT, screen(), 80, Arc::new(f), req_rx,
        );
        drop(req_tx);
        worker.shutdown();
    }
}
