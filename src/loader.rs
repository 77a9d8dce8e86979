//! Asynchronous background-image decoding.
//!
//! Decodes run on worker threads so template switches and uploads never
//! stall the UI. Completions re-enter the core through [`BackgroundLoader::poll`]
//! under a "latest request wins" token: a stale decode finishing after the
//! user has already asked for something else is discarded, never resurrected.
//! This is a correctness requirement, not an optimization.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use image::RgbaImage;
use parking_lot::Mutex;
use thiserror::Error;

/// What the decoded bitmap is for, so the app knows which state replacement
/// to perform when the decode completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodePurpose {
    /// A catalog template's background; carries the template id.
    Template(String),
    /// A user-uploaded background for the custom template.
    Upload,
}

/// Where the raw image bytes come from.
#[derive(Debug, Clone)]
pub enum DecodeSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A finished decode, stale or not.
pub struct Completion {
    pub token: u64,
    pub purpose: DecodePurpose,
    pub result: Result<RgbaImage, DecodeError>,
}

/// Issues decode requests and hands back only the most recent completion.
pub struct BackgroundLoader {
    latest_token: u64,
    /// Token of the last completion handed out by [`BackgroundLoader::poll`].
    consumed_token: u64,
    slot: Arc<Mutex<Option<Completion>>>,
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundLoader {
    pub fn new() -> Self {
        Self {
            latest_token: 0,
            consumed_token: 0,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Kick off a decode on a worker thread. The returned token supersedes
    /// every earlier request.
    pub fn request(&mut self, source: DecodeSource, purpose: DecodePurpose) -> u64 {
        self.latest_token += 1;
        let token = self.latest_token;
        let slot = Arc::clone(&self.slot);
        log::info!("decode request {token} for {purpose:?}");
        thread::spawn(move || {
            let result = decode(source);
            store_completion(
                &slot,
                Completion {
                    token,
                    purpose,
                    result,
                },
            );
        });
        token
    }

    /// The completion of the latest request, if it has arrived. Older
    /// completions are dropped here.
    pub fn poll(&mut self) -> Option<Completion> {
        let mut slot = self.slot.lock();
        match slot.take() {
            Some(completion) if completion.token == self.latest_token => {
                self.consumed_token = completion.token;
                Some(completion)
            }
            Some(stale) => {
                log::debug!(
                    "discarding stale decode {} (latest is {})",
                    stale.token,
                    self.latest_token
                );
                None
            }
            None => None,
        }
    }

    /// True while the latest request's completion has not yet been handed
    /// out by [`BackgroundLoader::poll`].
    pub fn pending(&self) -> bool {
        self.latest_token > self.consumed_token
    }
}

/// Workers only ever overwrite the slot with a newer completion, so a slow
/// early decode cannot clobber a fast later one.
fn store_completion(slot: &Mutex<Option<Completion>>, completion: Completion) {
    let mut slot = slot.lock();
    match slot.as_ref() {
        Some(existing) if existing.token > completion.token => {}
        _ => *slot = Some(completion),
    }
}

fn decode(source: DecodeSource) -> Result<RgbaImage, DecodeError> {
    let bytes = match source {
        DecodeSource::Bytes(bytes) => bytes,
        DecodeSource::Path(path) => std::fs::read(&path).map_err(|source| DecodeError::Read {
            path: path.display().to_string(),
            source,
        })?,
    };
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(token: u64) -> Completion {
        Completion {
            token,
            purpose: DecodePurpose::Upload,
            result: Ok(RgbaImage::new(1, 1)),
        }
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut loader = BackgroundLoader::new();
        loader.latest_token = 2; // two requests issued
        store_completion(&loader.slot, completion(1));
        assert!(loader.poll().is_none());
        store_completion(&loader.slot, completion(2));
        let got = loader.poll().expect("latest completion accepted");
        assert_eq!(got.token, 2);
    }

    #[test]
    fn slow_old_decode_cannot_clobber_newer_one() {
        let slot = Mutex::new(None);
        store_completion(&slot, completion(5));
        store_completion(&slot, completion(3));
        assert_eq!(slot.lock().as_ref().unwrap().token, 5);
    }

    #[test]
    fn pending_clears_once_the_latest_completion_is_consumed() {
        let mut loader = BackgroundLoader::new();
        assert!(!loader.pending());

        loader.latest_token = 1;
        assert!(loader.pending());
        store_completion(&loader.slot, completion(1));
        assert!(loader.poll().is_some());
        assert!(!loader.pending());

        // A stale completion does not satisfy a newer request.
        loader.latest_token = 2;
        store_completion(&loader.slot, completion(1));
        assert!(loader.poll().is_none());
        assert!(loader.pending());
        store_completion(&loader.slot, completion(2));
        assert!(loader.poll().is_some());
        assert!(!loader.pending());
    }

    #[test]
    fn decode_failure_carries_error() {
        let result = decode(DecodeSource::Bytes(vec![0, 1, 2, 3]));
        assert!(matches!(result, Err(DecodeError::Decode(_))));
    }

    #[test]
    fn decode_round_trip_from_bytes() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let decoded = decode(DecodeSource::Bytes(bytes)).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [9, 8, 7, 255]);
    }
}
