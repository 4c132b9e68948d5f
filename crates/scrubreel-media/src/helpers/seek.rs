// crates/scrubreel-media/src/helpers/seek.rs
//
// Seek helper wrapping ffmpeg's avformat seek with a consistent soft-fail.
//
// All decoder seeks route through here. A failed seek is logged and
// reported, never raised: the demuxer keeps decoding from wherever it is and
// the caller's PTS filter skips frames before the target.

use ffmpeg_the_third as ffmpeg;

/// Seek `ictx` to the keyframe at or before `start_secs + offset_secs`.
///
/// `start_secs` is the stream's first timestamp; container timestamps are
/// absolute, so an offset from the start of the media must be shifted by it.
/// Returns `false` if FFmpeg rejected the seek.
///
/// # Why backward seek (`..=seek_ts`)
/// A forward seek lands on the keyframe AT OR AFTER the target, which can be
/// seconds past it; every frame in between would be unreachable. A backward
/// seek lands before the target and the pre-roll is decoded and discarded.
///
/// # Why an open range at offset 0.0
/// `avformat_seek_file(max_ts=0)` returns EPERM on Windows for some
/// containers. Seeking to the start with no upper bound rewinds without
/// tripping it.
/// The rewind cannot be skipped: decoders are reused, so the cursor is
/// usually somewhere past the start.
pub fn seek_to_secs(
    ictx: &mut ffmpeg::format::context::Input,
    start_secs:  f64,
    offset_secs: f64,
    label: &str,   // caller description for log messages e.g. "read_frame"
) -> bool {
    let target_secs = start_secs + offset_secs;
    let seek_ts = (target_secs * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;
    let result = if offset_secs <= 0.0 {
        ictx.seek(seek_ts, ..)
    } else {
        ictx.seek(seek_ts, ..=seek_ts)
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "[seek] soft-fail in {label} at {target_secs:.3}s: {e} \
                 (decoding from current position)"
            );
            false
        }
    }
}
