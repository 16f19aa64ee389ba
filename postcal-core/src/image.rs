//! Image attachment encoding.
//!
//! The scheduling engine stores the encoded string as-is and never looks
//! inside it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

use crate::error::{ScheduleError, ScheduleResult};

pub trait ImageEncoder {
    /// Turn raw image bytes into an embeddable string.
    fn encode(&self, bytes: &[u8], mime: &str) -> String;

    /// Read an image file from disk and encode it.
    /// Files whose extension does not map to an `image/*` type are rejected.
    fn encode_file(&self, path: &Path) -> ScheduleResult<String> {
        let mime = mime_guess::from_path(path)
            .first()
            .filter(|m| m.type_() == mime_guess::mime::IMAGE)
            .ok_or_else(|| {
                ScheduleError::Image(format!("{} is not an image file", path.display()))
            })?;

        let bytes = std::fs::read(path)?;
        Ok(self.encode(&bytes, mime.essence_str()))
    }
}

/// Produces `data:<mime>;base64,<payload>` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlEncoder;

impl ImageEncoder for DataUrlEncoder {
    fn encode(&self, bytes: &[u8], mime: &str) -> String {
        format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
    }
}
