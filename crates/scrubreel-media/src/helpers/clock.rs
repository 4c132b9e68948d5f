// crates/scrubreel-media/src/helpers/clock.rs
//
// Frame index → timestamp conversion for one video stream.
//
// Container timestamps are absolute: an MPEG-TS file usually starts around
// 1.4 s, not 0. Frame N lives at `start + N / fps`, so every seek target and
// every PTS comparison carries the stream's start offset.

/// Timing of one video stream, in its own time base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamClock {
    tb_num:     i32,
    tb_den:     i32,
    frame_rate: f64,
    /// First timestamp of the stream in time-base units (0 when unknown).
    start_pts:  i64,
}

impl StreamClock {
    /// `start_pts` is `None` when the container does not report a start.
    pub fn new(tb_num: i32, tb_den: i32, frame_rate: f64, start_pts: Option<i64>) -> Self {
        Self { tb_num, tb_den, frame_rate, start_pts: start_pts.unwrap_or(0) }
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn secs_to_ticks(&self, secs: f64) -> i64 {
        if self.tb_num == 0 {
            return 0;
        }
        (secs * self.tb_den as f64 / self.tb_num as f64) as i64
    }

    /// Stream start in seconds.
    pub fn start_secs(&self) -> f64 {
        if self.tb_den == 0 {
            return 0.0;
        }
        self.start_pts as f64 * self.tb_num as f64 / self.tb_den as f64
    }

    /// Offset of frame `index` from the start of the stream, in seconds.
    pub fn offset_secs(&self, index: u64) -> f64 {
        if self.frame_rate > 0.0 { index as f64 / self.frame_rate } else { 0.0 }
    }

    /// Absolute position of frame `index` in seconds, for the demuxer seek.
    pub fn seek_secs(&self, index: u64) -> f64 {
        self.start_secs() + self.offset_secs(index)
    }

    /// Absolute PTS of frame `index`.
    pub fn target_pts(&self, index: u64) -> i64 {
        self.start_pts + self.secs_to_ticks(self.offset_secs(index))
    }

    /// True when a decoded frame stamped `ts` still lies before `target`.
    /// Half a frame of slack keeps PTS rounding from skipping the wanted
    /// frame. A frame with no timestamp at all is taken as the target.
    pub fn is_preroll(&self, ts: Option<i64>, target: i64) -> bool {
        let slack = if self.frame_rate > 0.0 { self.secs_to_ticks(0.5 / self.frame_rate) } else { 0 };
        ts.is_some_and(|t| t + slack < target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // MPEG-TS: 90 kHz time base, first PTS at 1.4 s.
    fn ts_clock() -> StreamClock {
        StreamClock::new(1, 90_000, 30.0, Some(126_000))
    }

    #[test]
    fn start_offset_shifts_seek_and_target() {
        let c = ts_clock();
        assert!((c.start_secs() - 1.4).abs() < 1e-9);
        assert!((c.seek_secs(300) - 11.4).abs() < 1e-9);
        assert_eq!(c.target_pts(300), 1_026_000);
    }

    #[test]
    fn frame_at_stream_start_offset_is_not_preroll() {
        // Frame 300 of a file starting at 1.4 s carries PTS 1_026_000.
        let c = ts_clock();
        let target = c.target_pts(300);
        assert!(!c.is_preroll(Some(1_026_000), target));
        // The frame an offset-blind decoder would have accepted (absolute
        // 10 s, i.e. frame 258) is still pre-roll.
        assert!(c.is_preroll(Some(900_000), target));
    }

    #[test]
    fn consecutive_frames_get_distinct_targets() {
        let c = ts_clock();
        assert!(c.target_pts(1) > c.target_pts(0));
        assert!(c.is_preroll(Some(c.target_pts(0)), c.target_pts(1)));
    }

    #[test]
    fn unknown_start_is_zero() {
        let c = StreamClock::new(1, 1000, 25.0, None);
        assert_eq!(c.start_secs(), 0.0);
        assert_eq!(c.target_pts(25), 1000);
    }

    #[test]
    fn frames_without_timestamp_are_taken() {
        let c = ts_clock();
        assert!(!c.is_preroll(None, c.target_pts(300)));
    }

    #[test]
    fn slack_absorbs_rounding_below_target() {
        // Half a frame at 30 fps is 1500 ticks of the 90 kHz clock.
        let c = ts_clock();
        let target = c.target_pts(100);
        assert!(!c.is_preroll(Some(target - 1), target));
        assert!(!c.is_preroll(Some(target - 1499), target));
        assert!(c.is_preroll(Some(target - 1501), target));
    }
}
