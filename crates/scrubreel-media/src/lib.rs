// crates/scrubreel-media/src/lib.rs
//
// FFmpeg side of scrubreel: decoders, the thumbnail sampler, the hover
// extractor and the preview worker. Front-ends talk to ScrubSession and
// receive results over channels; no UI toolkit dependency.
//
// To add a new media capability:
//   1. Put its data types in scrubreel-core
//   2. Create a module here that reads frames through a FrameSource
//   3. Wire it into ScrubSession

pub mod decode;
pub mod extractor;
pub mod helpers;
pub mod preview;
pub mod probe;
pub mod sampler;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use extractor::SingleFrameExtractor;
pub use preview::{PreviewCoordinator, PreviewWorker};
pub use probe::{probe, probe_with};
pub use sampler::{SamplerRun, TimelineSampler};
pub use session::ScrubSession;
pub use source::{DecoderFactory, FfmpegDecoders, FrameSource};
