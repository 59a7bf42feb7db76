//! Deduplicating cache in front of an external paste service.
//!
//! [`PasteCache::obtain_url`] never fails: errors are logged and replaced by a sentinel
//! string, so callers can render the result directly.

use crate::types::Fingerprint;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, warn};

mod service;
pub use service::{PasteError, PasteService, TcpPasteService};

/// Returned when asked to share empty content.
pub const EMPTY_CONTENT_SENTINEL: &str = "empty notes provided";

/// Returned when the paste service could not produce a URL.
pub const SERVICE_ERROR_SENTINEL: &str = "pastebin error";

/// Memoizes paste URLs by content fingerprint for the lifetime of the process.
///
/// A single mutex covers both the lookup and the call to the service, so identical content
/// is never submitted twice, even concurrently. The price is that a slow submission stalls
/// every other caller, hits included.
pub struct PasteCache<S> {
    service: S,
    urls: Mutex<HashMap<Fingerprint, String>>,
}

impl<S: PasteService> PasteCache<S> {
    /// Creates an empty cache that submits through `service`.
    pub fn new(service: S) -> Self {
        Self {
            service,
            urls: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a shareable URL for `content`, submitting it only on a cache miss.
    pub fn obtain_url(&self, content: &str) -> String {
        if content.is_empty() {
            return EMPTY_CONTENT_SENTINEL.to_string();
        }

        let fingerprint = Fingerprint::of(content);
        let mut urls = self.urls.lock();

        if let Some(url) = urls.get(&fingerprint) {
            debug!(%fingerprint, "paste cache hit");
            return url.clone();
        }

        match self.service.submit(content) {
            Ok(url) => {
                debug!(%fingerprint, %url, "paste cache miss, submitted");
                urls.insert(fingerprint, url.clone());
                url
            }
            Err(err) => {
                warn!(%fingerprint, %err, "paste submission failed");
                SERVICE_ERROR_SENTINEL.to_string()
            }
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn len(&self) -> usize {
        self.urls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.lock().is_empty()
    }
}
