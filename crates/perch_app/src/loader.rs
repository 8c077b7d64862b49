//! One-shot background asset load.
//!
//! Decoding runs on its own thread and hands the result back over a channel
//! that the session polls without blocking.  There is no cancellation; a
//! load that never finishes simply stays `Pending`.

use std::sync::mpsc::{self, Receiver, TryRecvError};

use log::debug;
use perch_core::LoadedAsset;

pub enum LoadStatus {
    Pending,
    Ready(anyhow::Result<LoadedAsset>),
    /// The worker went away without sending (it panicked).
    Disconnected,
}

pub struct AssetLoad {
    rx: Receiver<anyhow::Result<LoadedAsset>>,
}

impl AssetLoad {
    pub fn poll(&self) -> LoadStatus {
        match self.rx.try_recv() {
            Ok(result) => LoadStatus::Ready(result),
            Err(TryRecvError::Empty) => LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => LoadStatus::Disconnected,
        }
    }
}

/// Runs `load` on a worker thread.
pub fn spawn_asset_load<F>(load: F) -> AssetLoad
where
    F: FnOnce() -> anyhow::Result<LoadedAsset> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        // the receiver may already be gone if the session was dropped
        let _ = tx.send(load());
        debug!("asset worker finished");
    });
    AssetLoad { rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_core::{Aabb, AssetHandle};
    use std::sync::mpsc::channel;
    use std::time::Duration;

    fn wait(load: &AssetLoad) -> LoadStatus {
        for _ in 0..400 {
            match load.poll() {
                LoadStatus::Pending => std::thread::sleep(Duration::from_millis(5)),
                done => return done,
            }
        }
        LoadStatus::Pending
    }

    #[test]
    fn delivers_result() {
        let load = spawn_asset_load(|| {
            Ok(LoadedAsset::new(
                AssetHandle(3),
                Aabb::new(glam::Vec3::ZERO, glam::Vec3::ONE),
            ))
        });
        match wait(&load) {
            LoadStatus::Ready(Ok(asset)) => assert_eq!(asset.handle, AssetHandle(3)),
            _ => panic!("expected a loaded asset"),
        }
        // one-shot: nothing more arrives
        assert!(matches!(wait(&load), LoadStatus::Disconnected));
    }

    #[test]
    fn stays_pending_until_worker_sends() {
        let (go_tx, go_rx) = channel::<()>();
        let load = spawn_asset_load(move || {
            let _ = go_rx.recv();
            anyhow::bail!("decoder gave up")
        });
        assert!(matches!(load.poll(), LoadStatus::Pending));
        go_tx.send(()).unwrap();
        match wait(&load) {
            LoadStatus::Ready(Err(e)) => assert_eq!(e.to_string(), "decoder gave up"),
            _ => panic!("expected a load error"),
        }
    }

    #[test]
    fn panicking_worker_disconnects() {
        let load = spawn_asset_load(|| panic!("decoder crashed"));
        assert!(matches!(wait(&load), LoadStatus::Disconnected));
    }
}
