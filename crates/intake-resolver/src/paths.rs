//! Backend call sequences that turn a classified source into torrent metadata.
//!
//! # Design
//! - Every backend call runs under a deadline and maps onto `ResolveError`.
//! - Magnet sources race the direct lookup against the metadata prefetch;
//!   the first success wins and the other path is dropped.

use std::future::Future;
use std::time::Duration;

use intake_config::ResolverConfig;
use intake_torrent_core::{
    BackendOperation, BackendResult, IngestBackend, InfoHash, ResolveError, ResolveResult,
    TorrentInfoQuery, TorrentKey, TorrentMetadata, TorrentSource,
};
use tokio::time::timeout;
use tracing::debug;

use crate::context::SubmissionContext;
use crate::race::{Race, first_ok};

/// Which call sequence produced the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolutionPath {
    Direct,
    MagnetPrimary,
    MagnetPrefetch,
}

impl ResolutionPath {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::MagnetPrimary => "primary",
            Self::MagnetPrefetch => "prefetch",
        }
    }
}

/// Metadata plus the path that produced it.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub(crate) metadata: TorrentMetadata,
    pub(crate) path: ResolutionPath,
}

/// Run the call sequence matching the submission's source.
pub(crate) async fn resolve(
    backend: &dyn IngestBackend,
    config: &ResolverConfig,
    ctx: &SubmissionContext,
) -> ResolveResult<Resolved> {
    match &ctx.source {
        TorrentSource::Direct { url, cookies } => {
            let metadata = direct(backend, config, ctx, url, cookies).await?;
            Ok(Resolved {
                metadata,
                path: ResolutionPath::Direct,
            })
        }
        TorrentSource::Magnet { uri } => magnet(backend, config, ctx, uri).await,
    }
}

async fn direct(
    backend: &dyn IngestBackend,
    config: &ResolverConfig,
    ctx: &SubmissionContext,
    url: &str,
    cookies: &str,
) -> ResolveResult<TorrentMetadata> {
    let filename = call(
        BackendOperation::DownloadTorrentFromUrl,
        config.call_timeout(),
        backend.download_torrent_from_url(url, cookies),
    )
    .await?;
    debug!(%filename, "torrent file downloaded");

    let info = call(
        BackendOperation::GetTorrentInfo,
        config.call_timeout(),
        backend.get_torrent_info(TorrentInfoQuery::File(filename.clone())),
    )
    .await?;

    Ok(TorrentMetadata::stamp(
        TorrentKey::Correlation(ctx.correlation_id),
        filename,
        info,
    ))
}

async fn magnet(
    backend: &dyn IngestBackend,
    config: &ResolverConfig,
    ctx: &SubmissionContext,
    uri: &str,
) -> ResolveResult<Resolved> {
    let race = first_ok(
        magnet_primary(backend, config, ctx, uri),
        magnet_prefetch(backend, config, uri),
    )
    .await;

    match race {
        Race::Left(metadata) => Ok(Resolved {
            metadata,
            path: ResolutionPath::MagnetPrimary,
        }),
        Race::Right(metadata) => Ok(Resolved {
            metadata,
            path: ResolutionPath::MagnetPrefetch,
        }),
        Race::BothFailed { left, right } => Err(ResolveError::AllPathsFailed {
            primary: Box::new(left),
            prefetch: Box::new(right),
        }),
    }
}

async fn magnet_primary(
    backend: &dyn IngestBackend,
    config: &ResolverConfig,
    ctx: &SubmissionContext,
    uri: &str,
) -> ResolveResult<TorrentMetadata> {
    let info = call(
        BackendOperation::GetMagnetInfo,
        config.call_timeout(),
        backend.get_magnet_info(uri),
    )
    .await
    .inspect_err(|err| debug!(error = %err, "magnet info lookup failed"))?;

    Ok(TorrentMetadata::stamp(
        TorrentKey::Correlation(ctx.correlation_id),
        uri,
        info,
    ))
}

async fn magnet_prefetch(
    backend: &dyn IngestBackend,
    config: &ResolverConfig,
    uri: &str,
) -> ResolveResult<TorrentMetadata> {
    let prefetched = call(
        BackendOperation::PrefetchMagnetMetadata,
        config.prefetch_timeout(),
        backend.prefetch_magnet_metadata(uri),
    )
    .await
    .inspect_err(|err| debug!(error = %err, "metadata prefetch failed"))?;

    let info_hash = InfoHash::parse(&prefetched.info_hash)?;
    let metadata = prefetched
        .decode()
        .inspect_err(|err| debug!(error = %err, "prefetched metadata unusable"))?;
    debug!(%info_hash, bytes = metadata.len(), "magnet metadata prefetched");

    let info = call(
        BackendOperation::GetTorrentInfo,
        config.call_timeout(),
        backend.get_torrent_info(TorrentInfoQuery::Metadata(metadata)),
    )
    .await?;

    Ok(TorrentMetadata::stamp(TorrentKey::InfoHash(info_hash), uri, info))
}

async fn call<T>(
    operation: BackendOperation,
    after: Duration,
    request: impl Future<Output = BackendResult<T>>,
) -> ResolveResult<T> {
    match timeout(after, request).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(ResolveError::backend(operation, source)),
        Err(_) => Err(ResolveError::TimedOut { operation, after }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_test_support::fixtures::{
        DIRECT_URL, INFO_HASH, MAGNET_URI, RAW_METADATA, prefetched, sample_info,
    };
    use intake_test_support::mocks::{BackendCall, Script, ScriptedBackend};
    use intake_torrent_core::{BackendError, CorrelationId, FILENAME_FIELD};
    use tokio_util::sync::CancellationToken;

    fn context(source: TorrentSource) -> SubmissionContext {
        SubmissionContext::new(CorrelationId::new(), source, CancellationToken::new())
    }

    fn config() -> ResolverConfig {
        ResolverConfig {
            call_timeout_ms: 1_000,
            prefetch_timeout_ms: 500,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn direct_path_stamps_downloaded_filename() {
        let backend = ScriptedBackend::new()
            .with_download(Script::ok("a.torrent".to_string()))
            .with_torrent_info(Script::ok(sample_info("demo")));
        let ctx = context(TorrentSource::direct(DIRECT_URL, "sid=1"));

        let resolved = resolve(&backend, &config(), &ctx)
            .await
            .expect("direct resolves");
        assert_eq!(resolved.path, ResolutionPath::Direct);
        assert_eq!(
            resolved.metadata.torrent_id,
            TorrentKey::Correlation(ctx.correlation_id)
        );
        assert_eq!(resolved.metadata.info[FILENAME_FIELD], "a.torrent");
    }

    #[tokio::test(start_paused = true)]
    async fn direct_download_failure_skips_info_lookup() {
        let backend = ScriptedBackend::new().with_download(Script::err("404"));
        let ctx = context(TorrentSource::direct(DIRECT_URL, ""));

        let err = resolve(&backend, &config(), &ctx)
            .await
            .expect_err("download fails");
        assert_eq!(
            err,
            ResolveError::backend(
                BackendOperation::DownloadTorrentFromUrl,
                BackendError::new("404")
            )
        );
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn prefetch_uses_its_own_deadline() {
        let backend = ScriptedBackend::new()
            .with_magnet_info(Script::err("no peers"))
            .with_prefetch(Script::hang());
        let ctx = context(TorrentSource::magnet(MAGNET_URI));

        let err = resolve(&backend, &config(), &ctx)
            .await
            .expect_err("both paths fail");
        let ResolveError::AllPathsFailed { prefetch, .. } = err else {
            panic!("expected AllPathsFailed, got {err:?}");
        };
        assert_eq!(
            *prefetch,
            ResolveError::TimedOut {
                operation: BackendOperation::PrefetchMagnetMetadata,
                after: Duration::from_millis(500),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn prefetch_path_keys_on_reported_info_hash() {
        let reported = INFO_HASH.to_ascii_uppercase();
        let backend = ScriptedBackend::new()
            .with_magnet_info(Script::err("no peers"))
            .with_prefetch(Script::ok(prefetched(&format!(" {reported} "), RAW_METADATA)))
            .with_torrent_info(Script::ok(sample_info("demo")));
        let ctx = context(TorrentSource::magnet(MAGNET_URI));

        let resolved = resolve(&backend, &config(), &ctx)
            .await
            .expect("prefetch resolves");
        assert_eq!(resolved.path, ResolutionPath::MagnetPrefetch);
        assert_eq!(resolved.metadata.torrent_id.to_string(), reported);
        assert_eq!(resolved.metadata.filename, MAGNET_URI);
        assert!(
            backend
                .calls()
                .contains(&BackendCall::GetTorrentInfo(TorrentInfoQuery::Metadata(
                    RAW_METADATA.to_vec()
                )))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn blank_info_hash_fails_the_prefetch_path() {
        let backend = ScriptedBackend::new()
            .with_magnet_info(Script::err("no peers"))
            .with_prefetch(Script::ok(prefetched("  ", RAW_METADATA)));
        let ctx = context(TorrentSource::magnet(MAGNET_URI));

        let err = resolve(&backend, &config(), &ctx)
            .await
            .expect_err("both paths fail");
        assert!(matches!(
            err,
            ResolveError::AllPathsFailed { ref prefetch, .. }
                if matches!(**prefetch, ResolveError::InvalidInfoHash { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_metadata_never_reaches_info_lookup() {
        let backend = ScriptedBackend::new()
            .with_magnet_info(Script::err("no peers"))
            .with_prefetch(Script::ok(prefetched(INFO_HASH, b"")));
        let ctx = context(TorrentSource::magnet(MAGNET_URI));

        let err = resolve(&backend, &config(), &ctx)
            .await
            .expect_err("both paths fail");
        assert!(matches!(
            err,
            ResolveError::AllPathsFailed { ref prefetch, .. }
                if matches!(**prefetch, ResolveError::MetadataUnavailable { .. })
        ));
        assert!(
            !backend
                .calls()
                .iter()
                .any(|call| matches!(call, BackendCall::GetTorrentInfo(_)))
        );
    }

    #[test]
    fn path_labels() {
        assert_eq!(ResolutionPath::Direct.as_str(), "direct");
        assert_eq!(ResolutionPath::MagnetPrimary.as_str(), "primary");
        assert_eq!(ResolutionPath::MagnetPrefetch.as_str(), "prefetch");
    }
}
