// crates/scrubreel-core/src/display.rs
//
// Contracts for the collaborators this crate drives but does not implement:
// the popup that shows a preview frame, and the playback engine that is
// paused while the user scrubs.

use crate::media_types::RgbaFrame;

/// The hover popup. Implemented by whatever toolkit renders it.
pub trait PreviewDisplay {
    /// Move the popup's top-left corner to global `(x, y)`. Called before
    /// every `display`.
    fn move_to(&mut self, _x: f64, _y: f64) {}

    /// Show `image` with `caption` (an `M:SS` timestamp).
    fn display(&mut self, image: RgbaFrame, caption: &str);

    fn hide(&mut self);
}

/// Play/pause control of the primary media stream.
pub trait PlaybackControl {
    fn is_playing(&self) -> bool;
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Stand-in for front-ends without a playback engine (e.g. the CLI).
#[derive(Debug, Default)]
pub struct NoPlayback;

impl PlaybackControl for NoPlayback {
    fn is_playing(&self) -> bool { false }
    fn pause(&mut self) {}
    fn resume(&mut self) {}
}
