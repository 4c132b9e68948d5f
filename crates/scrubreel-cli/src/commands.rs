// crates/scrubreel-cli/src/commands.rs
//
// One function per subcommand. Each returns anyhow::Result so main can print
// the error chain and exit non-zero.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use scrubreel_core::display::NoPlayback;
use scrubreel_core::helpers::time::format_clock;
use scrubreel_core::{MediaHandle, PreviewRequest, ScrubConfig};
use scrubreel_media::{probe, FfmpegDecoders, ScrubSession, SingleFrameExtractor};

use crate::helpers::hover_sim::Sweep;
use crate::helpers::png_out::write_png;

pub fn run_probe(path: &Path, json: bool) -> Result<()> {
    let info = probe(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    println!("file:      {}", path.display());
    println!("duration:  {} ({:.3}s)", info.duration_label(), info.duration_secs);
    println!("frames:    {}", info.frame_count);
    println!("rate:      {:.3} fps", info.frame_rate);
    println!("aspect:    {:.4}", info.aspect);
    Ok(())
}

pub fn run_strip(config: ScrubConfig, path: &Path, output: &Path, timeout: Duration) -> Result<()> {
    let mut session = ScrubSession::with_ffmpeg(config, NoPlayback)?;
    session.open(path)?;

    if !session.wait_for_strip(timeout) {
        log::warn!("[strip] timed out after {:?}; writing what arrived", timeout);
    }
    let strip = session.strip();
    let image = strip.compose()
        .ok_or_else(|| anyhow!("no thumbnails decoded from {}", path.display()))?;
    write_png(output, &image)?;
    println!(
        "{}/{} thumbnails ({}x{}) → {}",
        strip.filled(), strip.len(), image.width, image.height, output.display()
    );
    Ok(())
}

pub fn run_frame(
    config: &ScrubConfig,
    path:   &Path,
    at:     f64,
    height: Option<u32>,
    output: &Path,
) -> Result<()> {
    let info = probe(path)?;
    let frame_index = info.frame_at_ms(at * 1000.0);
    let handle = MediaHandle::new(path, info, 0);
    let mut extractor = SingleFrameExtractor::new(
        handle,
        height.unwrap_or(config.thumbnail_height),
        Arc::new(FfmpegDecoders),
    );
    let image = extractor.extract(frame_index)
        .ok_or_else(|| anyhow!("frame {frame_index} ({}) is not decodable", format_clock(at)))
        .with_context(|| format!("extract from {}", path.display()))?;
    write_png(output, &image)?;
    println!(
        "frame {frame_index} at {} ({}x{}) → {}",
        format_clock(at), image.width, image.height, output.display()
    );
    Ok(())
}

pub fn run_hover(config: &ScrubConfig, duration: f64, width: f64, step_ms: u64, span_ms: u64) -> Result<()> {
    let sweep = Sweep {
        duration_secs: duration,
        control_width: width,
        step_ms,
        span_ms,
        window: config.throttle_window(),
    };
    let emissions = sweep.run();
    let moves = span_ms / step_ms.max(1);
    for e in &emissions {
        match e.request {
            PreviewRequest::Show { x, timestamp_ms, .. } => println!(
                "{:>6} ms  show  x={x:>7.1}  {}  ({timestamp_ms:.0} ms)",
                e.at_ms, format_clock(timestamp_ms / 1000.0)
            ),
            PreviewRequest::Hide => println!("{:>6} ms  hide", e.at_ms),
        }
    }
    println!("{} requests from {moves} pointer moves", emissions.len());
    Ok(())
}
