//! The OS clipboard through `arboard`, owned by one worker thread.
//!
//! On X11 and Wayland the copying process keeps serving the clipboard
//! contents, so the handle must outlive each write. The worker opens it on the
//! first write and holds it until the [`SystemClipboard`] is dropped.

use crate::clipboard::ClipboardSink;
use crate::compose::ComposedImage;
use crate::error::ClipboardError;
use std::borrow::Cow;
use std::sync::mpsc;
use std::thread::JoinHandle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClipboardHold {
    /// Serve the image for as long as this process runs.
    #[default]
    Session,
    /// Return from a write only once another program replaces the clipboard
    /// contents. For commands that exit right after copying.
    UntilReplaced,
}

trait ImageTarget {
    fn put_image(
        &mut self,
        image: arboard::ImageData<'_>,
        hold: ClipboardHold,
    ) -> Result<(), ClipboardError>;
}

impl ImageTarget for arboard::Clipboard {
    fn put_image(
        &mut self,
        image: arboard::ImageData<'_>,
        hold: ClipboardHold,
    ) -> Result<(), ClipboardError> {
        set_image(self, image, hold).map_err(|err| ClipboardError::WriteFailed(err.to_string()))
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_image(
    clipboard: &mut arboard::Clipboard,
    image: arboard::ImageData<'_>,
    hold: ClipboardHold,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    match hold {
        ClipboardHold::Session => clipboard.set_image(image),
        ClipboardHold::UntilReplaced => {
            log::info!("serving the image until another copy replaces it");
            clipboard.set().wait().image(image)
        }
    }
}

// Elsewhere the OS keeps clipboard contents after the writer exits.
#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn set_image(
    clipboard: &mut arboard::Clipboard,
    image: arboard::ImageData<'_>,
    _hold: ClipboardHold,
) -> Result<(), arboard::Error> {
    clipboard.set_image(image)
}

struct WriteRequest {
    png: Vec<u8>,
    reply: mpsc::Sender<Result<(), ClipboardError>>,
}

pub struct SystemClipboard {
    requests: Option<mpsc::Sender<WriteRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl SystemClipboard {
    pub fn spawn(hold: ClipboardHold) -> Result<Self, ClipboardError> {
        Self::with_opener(hold, || {
            arboard::Clipboard::new().map_err(|err| ClipboardError::Unavailable(err.to_string()))
        })
    }

    fn with_opener<T, F>(hold: ClipboardHold, open: F) -> Result<Self, ClipboardError>
    where
        T: ImageTarget,
        F: FnMut() -> Result<T, ClipboardError> + Send + 'static,
    {
        let (requests, inbox) = mpsc::channel();
        let worker = std::thread::Builder::new()
            .name("outs-clipboard".to_string())
            .spawn(move || serve(inbox, open, hold))
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
        Ok(Self {
            requests: Some(requests),
            worker: Some(worker),
        })
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_png(&self, image: &ComposedImage) -> Result<(), ClipboardError> {
        let stopped = || ClipboardError::Unavailable("clipboard worker stopped".to_string());
        let requests = self.requests.as_ref().ok_or_else(stopped)?;
        let (reply, answer) = mpsc::channel();
        requests
            .send(WriteRequest {
                png: image.png().to_vec(),
                reply,
            })
            .map_err(|_| stopped())?;
        answer.recv().map_err(|_| stopped())?
    }
}

impl Drop for SystemClipboard {
    fn drop(&mut self) {
        drop(self.requests.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("clipboard worker panicked");
            }
        }
    }
}

fn serve<T, F>(inbox: mpsc::Receiver<WriteRequest>, mut open: F, hold: ClipboardHold)
where
    T: ImageTarget,
    F: FnMut() -> Result<T, ClipboardError>,
{
    let mut target = None;
    for request in inbox {
        let result = write_with(&mut target, &mut open, &request.png, hold);
        if request.reply.send(result).is_err() {
            log::debug!("clipboard write finished after its caller went away");
        }
    }
    log::debug!("clipboard worker stopping");
}

/// Decodes `png` and writes it, opening the handle on first use. The handle
/// is kept after failed writes; a failed open is retried next time.
fn write_with<T, F>(
    target: &mut Option<T>,
    open: &mut F,
    png: &[u8],
    hold: ClipboardHold,
) -> Result<(), ClipboardError>
where
    T: ImageTarget,
    F: FnMut() -> Result<T, ClipboardError>,
{
    let pixels = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(|err| ClipboardError::Decode(err.to_string()))?
        .to_rgba8();
    let mut handle = match target.take() {
        Some(handle) => handle,
        None => open()?,
    };
    let data = arboard::ImageData {
        width: pixels.width() as usize,
        height: pixels.height() as usize,
        bytes: Cow::Borrowed(pixels.as_raw()),
    };
    let result = handle.put_image(data, hold);
    *target = Some(handle);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::CompressionType;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Counters {
        opens: AtomicUsize,
        drops: AtomicUsize,
        writes: Mutex<Vec<(usize, usize, ClipboardHold)>>,
    }

    struct FakeTarget {
        counters: Arc<Counters>,
    }

    impl ImageTarget for FakeTarget {
        fn put_image(
            &mut self,
            image: arboard::ImageData<'_>,
            hold: ClipboardHold,
        ) -> Result<(), ClipboardError> {
            self.counters
                .writes
                .lock()
                .expect("lock")
                .push((image.width, image.height, hold));
            Ok(())
        }
    }

    impl Drop for FakeTarget {
        fn drop(&mut self) {
            self.counters.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fake_clipboard(counters: &Arc<Counters>, hold: ClipboardHold) -> SystemClipboard {
        let counters = Arc::clone(counters);
        SystemClipboard::with_opener(hold, move || {
            counters.opens.fetch_add(1, Ordering::SeqCst);
            Ok(FakeTarget {
                counters: Arc::clone(&counters),
            })
        })
        .expect("spawn")
    }

    fn tiny_image() -> ComposedImage {
        let canvas = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        ComposedImage::from_canvas(&canvas, CompressionType::Fast).expect("encode")
    }

    #[test]
    fn handle_outlives_each_write() {
        let counters = Arc::new(Counters::default());
        let clipboard = fake_clipboard(&counters, ClipboardHold::Session);
        clipboard.write_png(&tiny_image()).expect("first write");
        clipboard.write_png(&tiny_image()).expect("second write");
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
        assert_eq!(counters.drops.load(Ordering::SeqCst), 0);

        drop(clipboard);
        assert_eq!(counters.drops.load(Ordering::SeqCst), 1);
        assert_eq!(
            *counters.writes.lock().expect("lock"),
            vec![
                (3, 2, ClipboardHold::Session),
                (3, 2, ClipboardHold::Session)
            ]
        );
    }

    #[test]
    fn hold_mode_reaches_the_handle() {
        let counters = Arc::new(Counters::default());
        let clipboard = fake_clipboard(&counters, ClipboardHold::UntilReplaced);
        clipboard.write_png(&tiny_image()).expect("write");
        drop(clipboard);
        assert_eq!(
            *counters.writes.lock().expect("lock"),
            vec![(3, 2, ClipboardHold::UntilReplaced)]
        );
    }

    #[test]
    fn failed_open_is_retried_on_next_write() {
        let counters = Arc::new(Counters::default());
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);
        let shared = Arc::clone(&counters);
        let clipboard = SystemClipboard::with_opener(ClipboardHold::Session, move || {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ClipboardError::Unavailable("no display".to_string()));
            }
            Ok(FakeTarget {
                counters: Arc::clone(&shared),
            })
        })
        .expect("spawn");
        assert!(matches!(
            clipboard.write_png(&tiny_image()),
            Err(ClipboardError::Unavailable(_))
        ));
        clipboard.write_png(&tiny_image()).expect("retry");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn corrupt_png_is_rejected_before_opening() {
        let counters = Arc::new(Counters::default());
        let mut target: Option<FakeTarget> = None;
        let shared = Arc::clone(&counters);
        let mut open = move || -> Result<FakeTarget, ClipboardError> {
            shared.opens.fetch_add(1, Ordering::SeqCst);
            Ok(FakeTarget {
                counters: Arc::clone(&shared),
            })
        };
        let err = write_with(&mut target, &mut open, b"not a png", ClipboardHold::Session)
            .unwrap_err();
        assert!(matches!(err, ClipboardError::Decode(_)));
        assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
    }
}
