//! Scripted backend that records calls and answers from canned responses.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use intake_torrent_core::{
    BackendError, BackendResult, IngestBackend, PrefetchedMetadata, TorrentInfo, TorrentInfoQuery,
};

/// How a scripted call answers.
#[derive(Debug, Clone)]
pub enum Response<T> {
    /// Succeed with the value.
    Ok(T),
    /// Fail with the message.
    Err(String),
    /// Never answer.
    Hang,
    /// Panic with the message.
    Panic(String),
}

/// Canned answer plus an optional delay before it is delivered.
#[derive(Debug, Clone)]
pub struct Script<T> {
    delay: Duration,
    response: Response<T>,
}

impl<T: Clone> Script<T> {
    /// Answer immediately with `value`.
    #[must_use]
    pub const fn ok(value: T) -> Self {
        Self {
            delay: Duration::ZERO,
            response: Response::Ok(value),
        }
    }

    /// Answer immediately with a failure.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            response: Response::Err(message.into()),
        }
    }

    /// Never answer.
    #[must_use]
    pub const fn hang() -> Self {
        Self {
            delay: Duration::ZERO,
            response: Response::Hang,
        }
    }

    /// Panic inside the call.
    #[must_use]
    pub fn panic(message: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            response: Response::Panic(message.into()),
        }
    }

    /// Deliver the answer after `delay`.
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn play(&self) -> BackendResult<T> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.response {
            Response::Ok(value) => Ok(value.clone()),
            Response::Err(message) => Err(BackendError::new(message.clone())),
            Response::Hang => std::future::pending().await,
            Response::Panic(message) => panic!("{message}"),
        }
    }
}

/// A backend call observed by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// `get_magnet_info(magnet)`.
    GetMagnetInfo(String),
    /// `prefetch_magnet_metadata(magnet)`.
    PrefetchMagnetMetadata(String),
    /// `download_torrent_from_url(url, cookies)`.
    DownloadTorrentFromUrl {
        /// URL argument.
        url: String,
        /// Cookie argument.
        cookies: String,
    },
    /// `get_torrent_info(query)`.
    GetTorrentInfo(TorrentInfoQuery),
}

/// Backend double driven by per-operation scripts. Unscripted calls fail.
#[derive(Clone)]
pub struct ScriptedBackend {
    magnet_info: Script<TorrentInfo>,
    prefetch: Script<PrefetchedMetadata>,
    download: Script<String>,
    torrent_info: Script<TorrentInfo>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    /// Backend whose every call fails with `not scripted`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magnet_info: Script::err("get_magnet_info not scripted"),
            prefetch: Script::err("prefetch_magnet_metadata not scripted"),
            download: Script::err("download_torrent_from_url not scripted"),
            torrent_info: Script::err("get_torrent_info not scripted"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script `get_magnet_info`.
    #[must_use]
    pub fn with_magnet_info(mut self, script: Script<TorrentInfo>) -> Self {
        self.magnet_info = script;
        self
    }

    /// Script `prefetch_magnet_metadata`.
    #[must_use]
    pub fn with_prefetch(mut self, script: Script<PrefetchedMetadata>) -> Self {
        self.prefetch = script;
        self
    }

    /// Script `download_torrent_from_url`.
    #[must_use]
    pub fn with_download(mut self, script: Script<String>) -> Self {
        self.download = script;
        self
    }

    /// Script `get_torrent_info`.
    #[must_use]
    pub fn with_torrent_info(mut self, script: Script<TorrentInfo>) -> Self {
        self.torrent_info = script;
        self
    }

    /// Calls observed so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock_calls().clone()
    }

    fn record(&self, call: BackendCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<BackendCall>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl IngestBackend for ScriptedBackend {
    async fn get_magnet_info(&self, magnet: &str) -> BackendResult<TorrentInfo> {
        self.record(BackendCall::GetMagnetInfo(magnet.to_string()));
        self.magnet_info.play().await
    }

    async fn prefetch_magnet_metadata(&self, magnet: &str) -> BackendResult<PrefetchedMetadata> {
        self.record(BackendCall::PrefetchMagnetMetadata(magnet.to_string()));
        self.prefetch.play().await
    }

    async fn download_torrent_from_url(&self, url: &str, cookies: &str) -> BackendResult<String> {
        self.record(BackendCall::DownloadTorrentFromUrl {
            url: url.to_string(),
            cookies: cookies.to_string(),
        });
        self.download.play().await
    }

    async fn get_torrent_info(&self, query: TorrentInfoQuery) -> BackendResult<TorrentInfo> {
        self.record(BackendCall::GetTorrentInfo(query));
        self.torrent_info.play().await
    }
}
