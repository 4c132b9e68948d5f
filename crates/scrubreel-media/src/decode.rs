// crates/scrubreel-media/src/decode.rs
//
// FrameDecoder: one FFmpeg demux+decode handle against one file.
//
// Stateful (owns the demuxer's seek cursor and the codec's reference
// frames), so every sampler worker and the hover extractor open their own.
// Random access is seek-to-keyframe, then decode forward until the PTS of
// the requested frame; precision depends on the container's timestamps.
// Frame N is looked up at `stream start + N / fps`, so files whose first
// timestamp is not zero (MPEG-TS, trimmed remuxes) land on the right frame.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{anyhow, bail, Context, Result};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};
use ffmpeg::util::frame::video::Video as VideoFrame;

use scrubreel_core::RgbaFrame;

use crate::helpers::clock::StreamClock;
use crate::helpers::seek::seek_to_secs;
use crate::source::FrameSource;

/// Frames decoded past a seek before we give up looking for the target.
/// Bounds the cost of a request on files with very long GOPs or broken PTS.
const MAX_PREROLL_FRAMES: usize = 600;

/// Initialise FFmpeg once per process and silence its console logging.
pub fn init() -> Result<()> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();
    INIT.get_or_init(|| {
        ffmpeg::init().map_err(|e| e.to_string())?;
        ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Fatal);
        Ok(())
    })
    .clone()
    .map_err(|e| anyhow!("ffmpeg init failed: {e}"))
}

struct ScalerState {
    ctx:     SwsContext,
    src_w:   u32,
    src_h:   u32,
    src_fmt: Pixel,
    out_w:   u32,
    out_h:   u32,
}

pub struct FrameDecoder {
    path:        PathBuf,
    ictx:        ffmpeg::format::context::Input,
    decoder:     ffmpeg::decoder::Video,
    video_idx:   usize,
    clock:       StreamClock,
    frame_count: u64,
    scaler:      Option<ScalerState>,
}

impl FrameDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        init()?;
        let ictx = input(path).with_context(|| format!("open {}", path.display()))?;

        let (video_idx, clock, stream_frames, decoder) = {
            let stream = ictx.streams().best(Type::Video)
                .ok_or_else(|| anyhow!("no video stream"))?;
            let tb = stream.time_base();
            let mut rate = rational_to_f64(stream.avg_frame_rate());
            if rate <= 0.0 {
                rate = rational_to_f64(stream.rate());
            }
            let start = stream.start_time();
            let start = (start != ffmpeg::ffi::AV_NOPTS_VALUE).then_some(start);
            let clock = StreamClock::new(tb.numerator(), tb.denominator(), rate, start);
            let dec_ctx = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?;
            let decoder = dec_ctx.decoder().video()?;
            (stream.index(), clock, stream.frames(), decoder)
        };
        let frame_rate = clock.frame_rate();

        // Some containers (raw streams, many .ts files) leave nb_frames at 0;
        // estimate from the container duration instead.
        let frame_count = if stream_frames > 0 {
            stream_frames as u64
        } else {
            let secs = ictx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
            if secs > 0.0 && frame_rate > 0.0 { (secs * frame_rate).round() as u64 } else { 0 }
        };

        log::debug!(
            "[decode] opened {}: {frame_count} frames @ {frame_rate:.3} fps, start {:.3}s",
            path.display(), clock.start_secs()
        );

        Ok(Self {
            path: path.to_path_buf(),
            ictx, decoder, video_idx, clock, frame_count,
            scaler: None,
        })
    }
}

/// Best-effort timestamp of a decoded frame, falling back to its raw PTS.
fn frame_ts(frame: &VideoFrame) -> Option<i64> {
    frame.timestamp().or_else(|| frame.pts())
}

impl FrameSource for FrameDecoder {
    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn frame_rate(&self) -> f64 {
        self.clock.frame_rate()
    }

    fn first_frame_size(&mut self) -> Result<(u32, u32)> {
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx { continue; }
            if self.decoder.send_packet(&packet).is_err() { continue; }
            let mut decoded = VideoFrame::empty();
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return Ok((decoded.width(), decoded.height()));
            }
        }
        // Short clips and frame-threaded codecs may hold every frame until
        // the codec is flushed.
        let _ = self.decoder.send_eof();
        let mut decoded = VideoFrame::empty();
        if self.decoder.receive_frame(&mut decoded).is_ok() {
            return Ok((decoded.width(), decoded.height()));
        }
        bail!("no decodable video frame in {}", self.path.display())
    }

    fn read_frame(&mut self, index: u64, width: u32, height: u32) -> Result<RgbaFrame> {
        if self.clock.frame_rate() <= 0.0 {
            bail!("frame rate unknown");
        }
        let target_pts = self.clock.target_pts(index);

        seek_to_secs(&mut self.ictx, self.clock.start_secs(), self.clock.offset_secs(index), "read_frame");
        self.decoder.flush();

        let mut decoded_count = 0usize;
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx { continue; }
            if self.decoder.send_packet(&packet).is_err() { continue; }
            let mut decoded = VideoFrame::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                decoded_count += 1;
                // Skip pre-roll frames between the keyframe and the target.
                if self.clock.is_preroll(frame_ts(&decoded), target_pts)
                    && decoded_count < MAX_PREROLL_FRAMES
                {
                    continue;
                }
                return scale_frame(&mut self.scaler, &decoded, width, height);
            }
        }

        // Demuxer hit EOF: drain the codec. The final frames of a file only
        // come out here, so the last one stands in for a target past them.
        let _ = self.decoder.send_eof();
        let mut decoded = VideoFrame::empty();
        let mut tail: Option<VideoFrame> = None;
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            if !self.clock.is_preroll(frame_ts(&decoded), target_pts) {
                return scale_frame(&mut self.scaler, &decoded, width, height);
            }
            tail = Some(decoded.clone());
        }
        match tail {
            Some(frame) => scale_frame(&mut self.scaler, &frame, width, height),
            None        => bail!("no frame decoded for index {index} in {}", self.path.display()),
        }
    }
}

fn rational_to_f64(r: ffmpeg::Rational) -> f64 {
    if r.denominator() == 0 {
        0.0
    } else {
        r.numerator() as f64 / r.denominator() as f64
    }
}

/// Scale `frame` to packed RGBA at `out_w`×`out_h`, rebuilding the cached
/// SwsContext only when the source or output geometry changes.
fn scale_frame(
    scaler: &mut Option<ScalerState>,
    frame:  &VideoFrame,
    out_w:  u32,
    out_h:  u32,
) -> Result<RgbaFrame> {
    let (src_w, src_h, src_fmt) = (frame.width(), frame.height(), frame.format());
    if src_w == 0 || src_h == 0 || out_w == 0 || out_h == 0 {
        bail!("cannot scale {src_w}x{src_h} to {out_w}x{out_h}");
    }

    let stale = scaler.as_ref().map_or(true, |s| {
        s.src_w != src_w || s.src_h != src_h || s.src_fmt != src_fmt
            || s.out_w != out_w || s.out_h != out_h
    });
    if stale {
        let ctx = SwsContext::get(src_fmt, src_w, src_h, Pixel::RGBA, out_w, out_h, Flags::BILINEAR)?;
        *scaler = Some(ScalerState { ctx, src_w, src_h, src_fmt, out_w, out_h });
    }
    let state = scaler.as_mut().ok_or_else(|| anyhow!("scaler missing"))?;

    let mut rgba = VideoFrame::empty();
    state.ctx.run(frame, &mut rgba)?;

    // Destripe: copy only visible pixels, not stride padding.
    let stride    = rgba.stride(0);
    let raw       = rgba.data(0);
    let row_bytes = out_w as usize * 4;
    let mut data  = Vec::with_capacity(row_bytes * out_h as usize);
    for row in 0..out_h as usize {
        let start = row * stride;
        let Some(line) = raw.get(start..start + row_bytes) else {
            bail!("scaled frame shorter than expected");
        };
        data.extend_from_slice(line);
    }
    Ok(RgbaFrame { width: out_w, height: out_h, data })
}
