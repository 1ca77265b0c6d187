use crate::compose::ComposedImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

static NEXT_PREVIEW: AtomicU64 = AtomicU64::new(0);

/// A `file://` URL to a temporary copy of a composed image. The file is
/// removed when the URL is revoked or dropped, whichever comes first.
#[derive(Debug)]
pub struct DisplayUrl {
    path: PathBuf,
    url: String,
    released: bool,
}

impl DisplayUrl {
    pub fn create_in(dir: &Path, image: &ComposedImage) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        let name = format!(
            "outs_preview_{}_{}_{}.png",
            std::process::id(),
            nanos,
            NEXT_PREVIEW.fetch_add(1, Ordering::Relaxed)
        );
        let path = std::fs::canonicalize(dir)?.join(name);
        let url = file_url(&path)?;
        std::fs::write(&path, image.png())?;
        log::debug!("created preview {url}");
        Ok(Self {
            path,
            url,
            released: false,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("revoked preview {}", self.url),
            Err(err) => log::warn!("failed to remove preview {}: {err}", self.path.display()),
        }
    }
}

/// Percent-encoded `file://` URL for an absolute path.
fn file_url(path: &Path) -> std::io::Result<String> {
    Url::from_file_path(path).map(String::from).map_err(|()| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cannot build a file URL for {}", path.display()),
        )
    })
}

impl Drop for DisplayUrl {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::CompressionType;
    use image::{Rgba, RgbaImage};

    fn tiny_image() -> ComposedImage {
        let canvas = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        ComposedImage::from_canvas(&canvas, CompressionType::Fast).expect("encode")
    }

    #[test]
    fn url_is_percent_encoded() {
        let dir = std::env::temp_dir().join(format!("outs preview ü {}", std::process::id()));
        let url = DisplayUrl::create_in(&dir, &tiny_image()).expect("create");
        assert!(url.as_str().starts_with("file:///"), "{}", url.as_str());
        assert!(url.as_str().contains("outs%20preview%20%C3%BC%20"));
        assert!(!url.as_str().contains(' '));
        let parsed = Url::parse(url.as_str()).expect("parse");
        assert_eq!(parsed.to_file_path().expect("path"), url.path());
        assert!(url.path().exists());
    }

    #[test]
    fn revoke_removes_the_file() {
        let dir = std::env::temp_dir().join(format!("outs_display_test_{}", std::process::id()));
        let url = DisplayUrl::create_in(&dir, &tiny_image()).expect("create");
        let path = url.path().to_path_buf();
        assert_eq!(std::fs::read(&path).expect("read"), tiny_image().png());
        url.revoke();
        assert!(!path.exists());
    }
}
