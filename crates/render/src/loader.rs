//! Decoding card images, one task per tile.
//!
//! Loads are spawned onto the blocking pool and awaited strictly in input
//! order. With a window of 1 the next load starts only after the previous one
//! finished; wider windows overlap reads but never reorder results.

use crate::error::LoadError;
use image::DynamicImage;
use outs_core::DeckEntry;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub trait ImageLoader: Send + Sync + 'static {
    fn load(&self, entry: &DeckEntry) -> Result<DynamicImage, LoadError>;
}

/// Reads entries as file paths (or `file://` URLs), relative ones resolved
/// against `root`.
#[derive(Debug, Clone, Default)]
pub struct FsImageLoader {
    root: Option<PathBuf>,
}

impl FsImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, entry: &DeckEntry) -> PathBuf {
        let raw = entry.as_str();
        let path = Path::new(raw.strip_prefix("file://").unwrap_or(raw));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, entry: &DeckEntry) -> Result<DynamicImage, LoadError> {
        let path = self.resolve(entry);
        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            entry: entry.clone(),
            source,
        })?;
        image::load_from_memory(&bytes).map_err(|err| LoadError::Decode {
            entry: entry.clone(),
            message: err.to_string(),
        })
    }
}

type LoadTask = (DeckEntry, JoinHandle<Result<DynamicImage, LoadError>>);

fn spawn_load<L: ImageLoader>(loader: &Arc<L>, entry: &DeckEntry) -> LoadTask {
    let loader = Arc::clone(loader);
    let owned = entry.clone();
    let handle = tokio::task::spawn_blocking(move || loader.load(&owned));
    (entry.clone(), handle)
}

/// Loads every entry, returning images in input order. The first failure
/// aborts whatever is still queued and is returned as is.
pub async fn load_in_order<L: ImageLoader>(
    loader: &Arc<L>,
    entries: &[DeckEntry],
    window: usize,
) -> Result<Vec<DynamicImage>, LoadError> {
    let window = window.max(1);
    let mut images = Vec::with_capacity(entries.len());
    let mut in_flight: VecDeque<LoadTask> = VecDeque::with_capacity(window);
    let mut queued = entries.iter();

    loop {
        while in_flight.len() < window {
            match queued.next() {
                Some(entry) => in_flight.push_back(spawn_load(loader, entry)),
                None => break,
            }
        }
        let Some((entry, handle)) = in_flight.pop_front() else {
            break;
        };
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => Err(LoadError::Task {
                entry,
                message: err.to_string(),
            }),
        };
        match result {
            Ok(image) => images.push(image),
            Err(err) => {
                log::warn!("{err}; abandoning {} pending loads", in_flight.len());
                for (_, pending) in in_flight {
                    pending.abort();
                }
                return Err(err);
            }
        }
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_relative_entries() {
        let loader = FsImageLoader::with_root("/srv/cards");
        assert_eq!(
            loader.resolve(&DeckEntry::new("7.png")),
            PathBuf::from("/srv/cards/7.png")
        );
        assert_eq!(
            loader.resolve(&DeckEntry::new("file:///tmp/7.png")),
            PathBuf::from("/tmp/7.png")
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let loader = FsImageLoader::new();
        let err = loader
            .load(&DeckEntry::new("/definitely/not/here/1.png"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_are_decode_error() {
        let path = std::env::temp_dir().join(format!(
            "outs_loader_garbage_{}.png",
            std::process::id()
        ));
        std::fs::write(&path, b"not an image").expect("write");
        let err = FsImageLoader::new()
            .load(&DeckEntry::new(path.to_string_lossy()))
            .unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        let _ = std::fs::remove_file(path);
    }
}
