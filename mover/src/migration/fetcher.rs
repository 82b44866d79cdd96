//! Bounded-concurrency download of migration candidates.
//!
//! Every candidate gets a `FetchResult`; a failed download never stops
//! the others.

use futures_util::{stream, StreamExt};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use super::types::{CandidateSource, FetchResult, MigrationCandidate};
use crate::services::client::{AuthenticatedCaller, FetchTransport, LocalFileReader};
use crate::services::config::MigrationConfig;
use crate::services::errors::ResourceError;
use crate::utils::{add_cache_bust, decode_data_url, has_prefix, is_data_url};

pub struct Fetcher<'a> {
    transport: &'a dyn FetchTransport,
    reader: &'a dyn LocalFileReader,
    caller: Option<&'a AuthenticatedCaller>,
    credentialed_prefixes: Vec<String>,
    cache_bust_param: String,
    cache_bust_value: String,
    max_concurrent: usize,
}

impl<'a> Fetcher<'a> {
    pub fn new(
        transport: &'a dyn FetchTransport,
        reader: &'a dyn LocalFileReader,
        caller: Option<&'a AuthenticatedCaller>,
        config: &MigrationConfig,
    ) -> Self {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        Self {
            transport,
            reader,
            caller,
            credentialed_prefixes: config
                .storage
                .credentialed_prefixes()
                .into_iter()
                .map(str::to_string)
                .collect(),
            cache_bust_param: config.network.cache_bust_param.clone(),
            cache_bust_value: now_millis.to_string(),
            max_concurrent: config.concurrency.max_concurrent_fetches.max(1),
        }
    }

    /// Download (or read) all candidates with at most `max_concurrent` in
    /// flight. `on_progress(completed, total)` fires once per finished item,
    /// `total` being the candidate count. Results keep the candidates' order.
    pub async fn fetch_all(
        &self,
        candidates: Vec<MigrationCandidate>,
        on_progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Vec<FetchResult> {
        let total = candidates.len();
        info!(
            "[Fetcher] Fetching {} resources ({} concurrent)",
            total, self.max_concurrent
        );

        let mut slots: Vec<Option<FetchResult>> = (0..total).map(|_| None).collect();
        let mut completed = 0usize;
        let mut failed = 0usize;

        let mut results = stream::iter(candidates.into_iter().enumerate())
            .map(|(index, candidate)| async move {
                let outcome = self.fetch_one(&candidate.source).await;
                (index, FetchResult { candidate, outcome })
            })
            .buffer_unordered(self.max_concurrent);

        while let Some((index, result)) = results.next().await {
            completed += 1;
            if let Some(error) = result.error() {
                failed += 1;
                warn!(
                    "[Fetcher] {} failed: {}",
                    result.candidate.resource_name, error
                );
            }
            slots[index] = Some(result);
            on_progress(completed, total);
        }

        info!(
            "[Fetcher] Completed: {}/{} fetched, {} failed",
            total - failed,
            total,
            failed
        );

        slots.into_iter().flatten().collect()
    }

    async fn fetch_one(&self, source: &CandidateSource) -> Result<bytes::Bytes, ResourceError> {
        match source {
            CandidateSource::Url(url) if is_data_url(url) => {
                decode_data_url(url).map_err(|message| ResourceError::InvalidDataUrl { message })
            }
            CandidateSource::Url(url) => {
                let credentials = self.caller.filter(|_| self.is_credentialed(url));
                let request_url =
                    add_cache_bust(url, &self.cache_bust_param, &self.cache_bust_value);
                self.transport
                    .get(&request_url, credentials)
                    .await
                    .map_err(ResourceError::from)
            }
            CandidateSource::LocalPath(path) => {
                self.reader
                    .read_file(path)
                    .await
                    .map_err(|e| ResourceError::LocalRead {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })
            }
        }
    }

    fn is_credentialed(&self, url: &str) -> bool {
        self.credentialed_prefixes
            .iter()
            .any(|prefix| has_prefix(url, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::{ClientError, ClientResult};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeTransport {
        requests: Mutex<Vec<(String, bool)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl FetchTransport for FakeTransport {
        async fn get(
            &self,
            url: &str,
            credentials: Option<&AuthenticatedCaller>,
        ) -> ClientResult<Bytes> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), credentials.is_some()));
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("missing") {
                return Err(ClientError::HttpStatus {
                    status: 404,
                    message: String::new(),
                });
            }
            Ok(Bytes::from(url.split('?').next().unwrap_or("").to_string()))
        }
    }

    struct NoFiles;

    #[async_trait]
    impl LocalFileReader for NoFiles {
        async fn read_file(&self, path: &Path) -> std::io::Result<Bytes> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("denied: {}", path.display()),
            ))
        }
    }

    fn url_candidate(name: &str, url: &str) -> MigrationCandidate {
        MigrationCandidate {
            resource_name: name.to_string(),
            source: CandidateSource::Url(url.to_string()),
            target_filename: format!("{}.png", name),
            extension_hint: None,
        }
    }

    #[tokio::test]
    async fn test_all_candidates_attempted_in_order() {
        let transport = FakeTransport::default();
        let config = MigrationConfig::default();
        let fetcher = Fetcher::new(&transport, &NoFiles, None, &config);
        let progress = Mutex::new(Vec::new());

        let candidates = vec![
            url_candidate("a", "https://cdn/a.png"),
            url_candidate("b", "https://cdn/missing.png"),
            url_candidate("c", "https://cdn/c.png"),
        ];
        let results = fetcher
            .fetch_all(candidates, &|done, total| {
                progress.lock().unwrap().push((done, total))
            })
            .await;

        let names: Vec<_> = results
            .iter()
            .map(|r| r.candidate.resource_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(results[0].payload().unwrap(), &Bytes::from("https://cdn/a.png"));
        assert_eq!(
            results[1].error(),
            Some(&ResourceError::HttpStatus { status: 404 })
        );
        assert!(results[2].payload().is_some());
        assert_eq!(*progress.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_pool_width_is_bounded() {
        let transport = FakeTransport::default();
        let mut config = MigrationConfig::default();
        config.concurrency.max_concurrent_fetches = 4;
        let fetcher = Fetcher::new(&transport, &NoFiles, None, &config);

        let candidates = (0..25)
            .map(|i| url_candidate(&format!("r{}", i), &format!("https://cdn/{}.png", i)))
            .collect();
        let results = fetcher.fetch_all(candidates, &|_, _| {}).await;

        assert_eq!(results.len(), 25);
        assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_cache_bust_and_credentials() {
        let transport = FakeTransport::default();
        let config = MigrationConfig::default();
        let caller = AuthenticatedCaller::new("user-1", "token");
        let fetcher = Fetcher::new(&transport, &NoFiles, Some(&caller), &config);

        let bucket_url = format!("{}p1/resources/a.png", config.storage.cloud_resources_url);
        let candidates = vec![
            url_candidate("bucket", &bucket_url),
            url_candidate("public", "https://cdn/b.png?v=2"),
        ];
        fetcher.fetch_all(candidates, &|_, _| {}).await;

        let mut requests = transport.requests.lock().unwrap().clone();
        requests.sort();
        let bucket = requests.iter().find(|(url, _)| url.starts_with(&bucket_url)).unwrap();
        assert!(bucket.1, "bucket downloads carry credentials");
        assert!(bucket.0.contains("?cache_bust="));

        let public = requests.iter().find(|(url, _)| url.starts_with("https://cdn/")).unwrap();
        assert!(!public.1, "public downloads are anonymous");
        assert!(public.0.starts_with("https://cdn/b.png?v=2&cache_bust="));
    }

    #[tokio::test]
    async fn test_local_and_data_sources() {
        let transport = FakeTransport::default();
        let config = MigrationConfig::default();
        let fetcher = Fetcher::new(&transport, &NoFiles, None, &config);

        let candidates = vec![
            MigrationCandidate {
                resource_name: "local".to_string(),
                source: CandidateSource::LocalPath(PathBuf::from("/nope/a.png")),
                target_filename: "a.png".to_string(),
                extension_hint: None,
            },
            url_candidate("inline", "data:text/plain;base64,aGVsbG8="),
        ];
        let results = fetcher.fetch_all(candidates, &|_, _| {}).await;

        assert!(matches!(
            results[0].error(),
            Some(ResourceError::LocalRead { .. })
        ));
        assert_eq!(results[1].payload().unwrap(), &Bytes::from_static(b"hello"));
        assert!(transport.requests.lock().unwrap().is_empty());
    }
}
