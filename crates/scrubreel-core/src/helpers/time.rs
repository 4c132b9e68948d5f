// crates/scrubreel-core/src/helpers/time.rs
//
// Time formatting and rounding shared by the preview caption, the duration
// label and the strip playhead.

/// Shown instead of a duration when probing reported `DurationUnknown`.
pub const UNKNOWN_DURATION_LABEL: &str = "--:--";

/// Format seconds as `M:SS` (minutes unpadded, seconds zero-padded).
///
/// Used for the hover preview caption and the duration label. Minutes are not
/// wrapped into hours: a 75-minute clip reads `75:00`.
///
/// ```
/// use scrubreel_core::helpers::time::format_clock;
/// assert_eq!(format_clock(0.0),    "0:00");
/// assert_eq!(format_clock(60.0),   "1:00");
/// assert_eq!(format_clock(187.9),  "3:07");
/// assert_eq!(format_clock(4500.0), "75:00");
/// ```
pub fn format_clock(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".into();
    }
    let whole = secs as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Round `value` to `decimals` decimal places.
///
/// ```
/// use scrubreel_core::helpers::time::round_to;
/// assert_eq!(round_to(33.400066, 3), 33.4);
/// assert_eq!(round_to(0.1234567, 6), 0.123457);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
