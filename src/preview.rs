//! Preview-handle lifecycle for staged image files
//!
//! Image files staged for upload get a locally-rendered preview. The preview
//! is a shared resource that must be released exactly once when the staged
//! entry is removed or the list is cleared; this module puts that discipline
//! behind the [`PreviewStore`] trait so every removal path pairs an `acquire`
//! with a `release` instead of relying on incidental cleanup.

use std::collections::HashMap;

use image::RgbaImage;
use uuid::Uuid;

/// Longest edge of a generated thumbnail, in pixels
const THUMBNAIL_EDGE: u32 = 64;

/// Opaque reference to a locally-rendered preview
///
/// Handles are only meaningful to the [`PreviewStore`] that issued them.
/// They are intentionally not `Copy` so a released handle is not trivially
/// reused by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(Uuid);

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocation and release of preview resources
///
/// Implementations own the backing resource for each live handle. Callers
/// must release every acquired handle exactly once; releasing an unknown
/// handle is logged and ignored rather than treated as fatal.
pub trait PreviewStore: Send {
    /// Allocates a preview for the given image bytes and returns its handle
    ///
    /// Allocation never fails: bytes that cannot be decoded as an image
    /// still get a live handle (mirroring object-URL semantics, where the
    /// browser never inspects the bytes at allocation time).
    fn acquire(&mut self, bytes: &[u8], mime_type: &str) -> PreviewHandle;

    /// Releases the resource behind `handle`
    fn release(&mut self, handle: &PreviewHandle);

    /// Number of currently-allocated (unreleased) handles
    fn live_handles(&self) -> usize;
}

/// One allocated preview
struct Preview {
    mime_type: String,
    /// Decoded thumbnail, when the bytes were a readable image
    thumbnail: Option<RgbaImage>,
}

/// In-memory [`PreviewStore`] implementation
///
/// Decodes image bytes into a small RGBA thumbnail where possible and keeps
/// it keyed by handle until released.
#[derive(Default)]
pub struct InMemoryPreviews {
    previews: HashMap<Uuid, Preview>,
}

impl InMemoryPreviews {
    /// Creates an empty preview store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the decoded thumbnail for a live handle, if one was produced
    pub fn thumbnail(&self, handle: &PreviewHandle) -> Option<&RgbaImage> {
        self.previews
            .get(&handle.0)
            .and_then(|p| p.thumbnail.as_ref())
    }

    /// Returns the declared mime type for a live handle
    pub fn mime_type(&self, handle: &PreviewHandle) -> Option<&str> {
        self.previews.get(&handle.0).map(|p| p.mime_type.as_str())
    }
}

impl PreviewStore for InMemoryPreviews {
    fn acquire(&mut self, bytes: &[u8], mime_type: &str) -> PreviewHandle {
        let thumbnail = match image::load_from_memory(bytes) {
            Ok(img) => {
                let thumb = img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgba8();
                tracing::debug!(
                    "decoded {}x{} thumbnail for {} preview",
                    thumb.width(),
                    thumb.height(),
                    mime_type
                );
                Some(thumb)
            }
            Err(e) => {
                tracing::debug!("could not decode {} bytes for preview: {}", mime_type, e);
                None
            }
        };

        let id = Uuid::new_v4();
        self.previews.insert(
            id,
            Preview {
                mime_type: mime_type.to_string(),
                thumbnail,
            },
        );
        PreviewHandle(id)
    }

    fn release(&mut self, handle: &PreviewHandle) {
        if self.previews.remove(&handle.0).is_none() {
            tracing::warn!("release of unknown preview handle {}", handle);
        }
    }

    fn live_handles(&self) -> usize {
        self.previews.len()
    }
}
