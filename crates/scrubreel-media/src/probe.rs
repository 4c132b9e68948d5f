// crates/scrubreel-media/src/probe.rs
//
// MediaProbe: open a file read-only, report duration / frame count / frame
// rate / aspect ratio. The decoder is dropped on return.

use std::path::Path;

use scrubreel_core::{MediaError, MediaInfo};

use crate::source::{DecoderFactory, FfmpegDecoders};

/// Probe `path` with FFmpeg.
pub fn probe(path: &Path) -> Result<MediaInfo, MediaError> {
    probe_with(&FfmpegDecoders, path)
}

/// Probe through an arbitrary decoder factory.
pub fn probe_with(factory: &dyn DecoderFactory, path: &Path) -> Result<MediaInfo, MediaError> {
    let mut source = factory.open(path).map_err(|e| {
        log::warn!("[probe] open failed for {}: {e:#}", path.display());
        MediaError::unreadable(path, format!("{e:#}"))
    })?;

    let (frame_count, frame_rate) = (source.frame_count(), source.frame_rate());
    if !(frame_rate > 0.0) {
        log::warn!("[probe] {} reports frame rate 0", path.display());
        return Err(MediaError::DurationUnknown { path: path.to_path_buf() });
    }

    let (w, h) = source.first_frame_size()
        .map_err(|e| MediaError::unreadable(path, format!("{e:#}")))?;
    let info = MediaInfo::from_stream(path, frame_count, frame_rate, w, h)?;

    log::info!(
        "[probe] {}: {:.3}s, {} frames @ {:.3} fps, {w}x{h}",
        path.display(), info.duration_secs, info.frame_count, info.frame_rate,
    );
    Ok(info)
}
