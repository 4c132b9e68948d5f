// crates/scrubreel-media/src/testing.rs
//
// Test doubles: synthetic decoders (no media files, no FFmpeg) and a
// recording preview display.
// Synthetic frames are solid fills whose byte value is `index % 251`, so a
// test can tell which frame it got back.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use crossbeam_channel::{Receiver, Sender};
use scrubreel_core::display::PreviewDisplay;
use scrubreel_core::RgbaFrame;

use crate::source::{DecoderFactory, FrameSource};

pub fn shade_of(index: u64) -> u8 {
    (index % 251) as u8
}

#[derive(Clone)]
pub struct SyntheticDecoders {
    pub frame_count: u64,
    pub frame_rate:  f64,
    pub width:       u32,
    pub height:      u32,
    fail_open:       bool,
    /// Reads at or past this index fail.
    fail_from:       Option<u64>,
    /// Every read blocks until a token arrives.
    gate:            Option<Receiver<()>>,
    pub opens:       Arc<AtomicUsize>,
    pub reads:       Arc<AtomicUsize>,
    /// Every path opened, in order.
    opened:          Arc<Mutex<Vec<PathBuf>>>,
}

impl SyntheticDecoders {
    pub fn new(frame_count: u64, frame_rate: f64, width: u32, height: u32) -> Self {
        Self {
            frame_count, frame_rate, width, height,
            fail_open: false,
            fail_from: None,
            gate:      None,
            opens:     Arc::new(AtomicUsize::new(0)),
            reads:     Arc::new(AtomicUsize::new(0)),
            opened:    Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_from(mut self, index: u64) -> Self {
        self.fail_from = Some(index);
        self
    }

    pub fn gated(mut self, gate: Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }
}

impl DecoderFactory for SyntheticDecoders {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        if self.fail_open {
            bail!("cannot open {}", path.display());
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(Box::new(SyntheticSource { cfg: self.clone() }))
    }
}

struct SyntheticSource {
    cfg: SyntheticDecoders,
}

impl FrameSource for SyntheticSource {
    fn frame_count(&self) -> u64 {
        self.cfg.frame_count
    }

    fn frame_rate(&self) -> f64 {
        self.cfg.frame_rate
    }

    fn first_frame_size(&mut self) -> Result<(u32, u32)> {
        Ok((self.cfg.width, self.cfg.height))
    }

    fn read_frame(&mut self, index: u64, width: u32, height: u32) -> Result<RgbaFrame> {
        if let Some(gate) = &self.cfg.gate {
            gate.recv()?;
        }
        self.cfg.reads.fetch_add(1, Ordering::SeqCst);
        if index >= self.cfg.frame_count {
            bail!("index {index} past end");
        }
        if self.cfg.fail_from.is_some_and(|f| index >= f) {
            bail!("read error at {index}");
        }
        let data = vec![shade_of(index); width as usize * height as usize * 4];
        Ok(RgbaFrame { width, height, data })
    }
}

/// What a `Recorder` display was asked to do, in order.
#[derive(Debug, PartialEq)]
pub enum Shown {
    At(f64, f64),
    Frame { shade: u8, width: u32, caption: String },
    Hidden,
}

/// PreviewDisplay that forwards every call to a channel.
pub struct Recorder(pub Sender<Shown>);

impl PreviewDisplay for Recorder {
    fn move_to(&mut self, x: f64, y: f64) {
        let _ = self.0.send(Shown::At(x, y));
    }

    fn display(&mut self, image: RgbaFrame, caption: &str) {
        let _ = self.0.send(Shown::Frame {
            shade:   image.data[0],
            width:   image.width,
            caption: caption.to_string(),
        });
    }

    fn hide(&mut self) {
        let _ = self.0.send(Shown::Hidden);
    }
}
