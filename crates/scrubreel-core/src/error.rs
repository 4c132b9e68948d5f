// crates/scrubreel-core/src/error.rs
//
// Errors a caller has to react to when opening a file.
// Everything past probing (mid-sample read failures, failed hover extracts)
// is absorbed locally and never surfaces as a MediaError.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The container could not be opened, has no video stream, or produced no
    /// decodable first frame.
    #[error("cannot read media {}: {reason}", path.display())]
    MediaUnreadable { path: PathBuf, reason: String },

    /// The stream reports a frame rate of zero, so neither duration nor frame
    /// positions can be derived.
    #[error("duration unknown for {}: frame rate is zero", path.display())]
    DurationUnknown { path: PathBuf },
}

impl MediaError {
    pub fn unreadable(path: &Path, reason: impl std::fmt::Display) -> Self {
        MediaError::MediaUnreadable { path: path.to_path_buf(), reason: reason.to_string() }
    }

    pub fn path(&self) -> &Path {
        match self {
            MediaError::MediaUnreadable { path, .. } => path,
            MediaError::DurationUnknown { path }     => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_message_names_path_and_reason() {
        let e = MediaError::unreadable(Path::new("/tmp/clip.mp4"), "no video stream");
        let msg = e.to_string();
        assert!(msg.contains("/tmp/clip.mp4"));
        assert!(msg.contains("no video stream"));
    }

    #[test]
    fn path_accessor_covers_both_variants() {
        let e = MediaError::DurationUnknown { path: PathBuf::from("a.ts") };
        assert_eq!(e.path(), Path::new("a.ts"));
    }
}
