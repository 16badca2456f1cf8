use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};

use crate::coords::Dimension;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique texture identity. Renderers key their GPU uploads on it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u64);

/// CPU-side RGBA8 image (straight alpha, sRGB) ready for upload.
///
/// Equality is identity: two textures compare equal only if they are the same
/// upload.
pub struct Texture {
    id: TextureId,
    name: String,
    size: Dimension,
    pixels: Vec<u8>,
}

impl Texture {
    /// Wraps raw RGBA8 pixels. `pixels` must hold exactly `width * height * 4` bytes.
    pub fn from_rgba8(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let name = name.into();
        anyhow::ensure!(width > 0 && height > 0, "texture '{name}' has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "texture '{name}': expected {expected} bytes, got {}",
            pixels.len()
        );

        Ok(Self {
            id: TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
            name,
            size: Dimension::new(width, height),
            pixels,
        })
    }

    /// Decodes an encoded image (PNG) into RGBA8.
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let img = image::load_from_memory(bytes)
            .with_context(|| format!("failed to decode image '{name}'"))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba8(name, w, h, img.into_raw())
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size(&self) -> Dimension {
        self.size
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
