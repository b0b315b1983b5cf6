use std::io;
use std::sync::mpsc;
use std::sync::Arc;

use tracing::{debug, warn};

use geolabel_core::GeoFrame;

use crate::fetch::ImageFetcher;
use crate::session::{LabelSession, SessionError};

/// What the fetch worker hands back: a session on the fetched image, or why
/// there is none.
pub(crate) type FetchOutcome = Result<LabelSession, SessionError>;

/// Bootstrap a labelling session for `frame` on a dedicated thread.
///
/// The returned receiver yields exactly one outcome; it is the only path by
/// which the session reaches the UI thread. `on_complete` runs on the worker
/// after the outcome has been sent (used to wake the UI).
pub(crate) fn spawn_fetch(
    fetcher: Arc<dyn ImageFetcher>,
    frame: GeoFrame,
    labels: Vec<String>,
    on_complete: impl FnOnce() + Send + 'static,
) -> io::Result<mpsc::Receiver<FetchOutcome>> {
    let (tx, rx) = mpsc::sync_channel::<FetchOutcome>(1);

    std::thread::Builder::new()
        .name("image-fetch".into())
        .spawn(move || {
            debug!(
                lon = frame.center.longitude,
                lat = frame.center.latitude,
                size = frame.image_size_px,
                "Fetch worker started"
            );
            let outcome = LabelSession::bootstrap(frame, labels, fetcher.as_ref());
            if tx.send(outcome).is_err() {
                warn!("Fetch worker: receiver dropped before the image arrived");
            }
            on_complete();
        })?;

    Ok(rx)
}
