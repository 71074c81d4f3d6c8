use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::library::TrackId;

use super::types::{MetadataEvent, MetadataExtractor};

struct MetadataRequest {
    id: TrackId,
    path: PathBuf,
}

/// Background tag reader.
///
/// Requests are served in order on a single thread. Results are picked up
/// with [`MetadataWorker::try_recv`] by whoever owns the playlist, which is
/// where staleness gets decided; in-flight reads are never cancelled.
pub struct MetadataWorker {
    tx: Option<Sender<MetadataRequest>>,
    rx: Receiver<MetadataEvent>,
    join: Option<JoinHandle<()>>,
}

impl MetadataWorker {
    pub fn spawn(extractor: Arc<dyn MetadataExtractor>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<MetadataRequest>();
        let (event_tx, event_rx) = mpsc::channel::<MetadataEvent>();

        let join = thread::Builder::new()
            .name("hifi-metadata".to_string())
            .spawn(move || {
                for req in req_rx {
                    let result = extractor.extract(&req.path);
                    if let Err(ref e) = result {
                        log::debug!("no tags for {}: {e}", req.path.display());
                    }
                    if event_tx.send(MetadataEvent { id: req.id, result }).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| log::error!("failed to start metadata thread: {e}"))
            .ok();

        Self {
            tx: Some(req_tx),
            rx: event_rx,
            join,
        }
    }

    /// Queue a read for `path`; the outcome arrives later as a `MetadataEvent`.
    pub fn request(&self, id: TrackId, path: PathBuf) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(MetadataRequest { id, path }).is_err() {
            log::warn!("metadata worker is gone; request for {id:?} dropped");
        }
    }

    /// Next finished result, if any, without blocking.
    pub fn try_recv(&self) -> Option<MetadataEvent> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<MetadataEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Close the request queue and wait for the thread to finish its current read.
    pub fn shutdown(&mut self) {
        self.tx = None;
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for MetadataWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
