// crates/scrubreel-core/src/lib.rs
//
// Pure scrub/preview logic: no FFmpeg, no decode threads.
// scrubreel-media drives these types from its workers; scrubreel-cli and any
// UI front-end consume them.
//
// To add a new capability that needs a decoder, put the data types and the
// math here and the FFmpeg side in scrubreel-media.

pub mod config;
pub mod display;
pub mod error;
pub mod helpers;
pub mod media_types;
pub mod preview_bus;
pub mod sampling;
pub mod strip;
pub mod throttle;

pub use config::ScrubConfig;
pub use error::MediaError;
pub use media_types::{ExtractedFrame, MediaHandle, MediaInfo, PreviewRequest, RgbaFrame, SamplerEvent};
