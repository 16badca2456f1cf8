use std::collections::HashMap;
use std::rc::Rc;

use crate::render::Texture;

use super::FileSystem;

/// Named texture lookup used by the load screen and client code.
pub trait TextureSource {
    /// Returns the texture called `name`, or `None` when it cannot be provided.
    fn get_texture(&mut self, name: &str) -> Option<Rc<Texture>>;
}

/// Texture source decoding image files found through a [`FileSystem`].
///
/// Decoded textures are cached by name. Failed lookups are cached too, so a
/// missing image is reported once instead of every frame.
#[derive(Default)]
pub struct FileTextureSource {
    cache: HashMap<String, Option<Rc<Texture>>>,
}

impl FileTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapts this cache to `fs` for a batch of lookups.
    pub fn with_fs<'a>(&'a mut self, fs: &'a FileSystem) -> FileTextures<'a> {
        FileTextures { cache: self, fs }
    }

    /// Forgets every cached texture and failure.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cached_count(&self) -> usize {
        self.cache.values().filter(|t| t.is_some()).count()
    }

    fn lookup(&mut self, fs: &FileSystem, name: &str) -> Option<Rc<Texture>> {
        if let Some(hit) = self.cache.get(name) {
            return hit.clone();
        }

        let loaded = fs
            .read(name)
            .and_then(|bytes| Texture::decode(name, &bytes))
            .map(Rc::new);

        let entry = match loaded {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("texture '{name}' unavailable: {e:#}");
                None
            }
        };
        self.cache.insert(name.to_string(), entry.clone());
        entry
    }
}

/// [`TextureSource`] view pairing a [`FileTextureSource`] with a file system.
pub struct FileTextures<'a> {
    cache: &'a mut FileTextureSource,
    fs: &'a FileSystem,
}

impl TextureSource for FileTextures<'_> {
    fn get_texture(&mut self, name: &str) -> Option<Rc<Texture>> {
        self.cache.lookup(self.fs, name)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::*;

    fn asset_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-tex-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.join("progress_bar.png"), png).unwrap();
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();
        dir
    }

    #[test]
    fn loads_and_caches_by_name() {
        let mut fs = FileSystem::new();
        fs.add_search_path(asset_dir("cache"));
        let mut source = FileTextureSource::new();

        let first = source.with_fs(&fs).get_texture("progress_bar.png").unwrap();
        let second = source.with_fs(&fs).get_texture("progress_bar.png").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.size().width, 4);
        assert_eq!(source.cached_count(), 1);
    }

    #[test]
    fn missing_and_undecodable_yield_none() {
        let mut fs = FileSystem::new();
        fs.add_search_path(asset_dir("missing"));
        let mut source = FileTextureSource::new();
        let mut textures = source.with_fs(&fs);

        assert!(textures.get_texture("progress_bar_bg.png").is_none());
        assert!(textures.get_texture("broken.png").is_none());
        assert_eq!(source.cached_count(), 0);
    }
}
