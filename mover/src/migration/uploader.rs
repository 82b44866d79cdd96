//! Size-bounded batch uploads to a destination project.

use std::ops::Range;
use tracing::{error, info, warn};

use super::types::{UploadOutcome, UploadUnit};
use crate::services::client::{
    AuthenticatedCaller, CredentialService, UploadFile, UploadResponseItem, UploadService,
};
use crate::services::errors::{MigrationError, ResourceError};

/// Group `units` into consecutive batches whose cumulative size stays within
/// `max_batch_bytes`. A unit larger than the ceiling is never refused: it
/// goes out alone, after whatever was accumulated before it.
pub fn plan_batches(units: &[UploadUnit], max_batch_bytes: u64) -> Vec<Range<usize>> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut batch_bytes = 0u64;

    for (index, unit) in units.iter().enumerate() {
        let size = unit.size();
        if batch_bytes + size <= max_batch_bytes {
            batch_bytes += size;
            continue;
        }

        if start < index {
            batches.push(start..index);
        }

        if size > max_batch_bytes {
            batches.push(index..index + 1);
            start = index + 1;
            batch_bytes = 0;
        } else {
            start = index;
            batch_bytes = size;
        }
    }

    if start < units.len() {
        batches.push(start..units.len());
    }

    batches
}

fn outcome_from_item(item: Option<&UploadResponseItem>) -> Result<String, ResourceError> {
    match item {
        Some(UploadResponseItem {
            error: Some(message),
            ..
        }) => Err(ResourceError::Upload {
            message: message.clone(),
        }),
        Some(UploadResponseItem { url: Some(url), .. }) => Ok(url.clone()),
        _ => Err(ResourceError::MissingUploadResult),
    }
}

pub struct Uploader<'a> {
    credentials: &'a dyn CredentialService,
    uploads: &'a dyn UploadService,
    max_batch_bytes: u64,
}

impl<'a> Uploader<'a> {
    pub fn new(
        credentials: &'a dyn CredentialService,
        uploads: &'a dyn UploadService,
        max_batch_bytes: u64,
    ) -> Self {
        Self {
            credentials,
            uploads,
            max_batch_bytes,
        }
    }

    /// Acquire upload credentials for the destination project. Failing here
    /// is fatal: without credentials no upload can succeed.
    pub async fn authorize(
        &self,
        caller: &AuthenticatedCaller,
        project_id: &str,
    ) -> Result<(), MigrationError> {
        self.credentials
            .acquire_upload_credentials(caller, project_id)
            .await
            .map_err(|source| {
                error!(
                    "[Uploader] Upload credentials refused for project {}: {}",
                    project_id, source
                );
                MigrationError::CredentialAcquisition {
                    project_id: project_id.to_string(),
                    source,
                }
            })
    }

    /// Upload already authorized units, batch after batch. Returns one
    /// outcome per unit, in input order. `on_progress(uploaded, total)`
    /// fires after each batch.
    pub async fn upload_units(
        &self,
        caller: &AuthenticatedCaller,
        project_id: &str,
        units: Vec<UploadUnit>,
        on_progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Vec<UploadOutcome> {
        let total = units.len();
        let batches = plan_batches(&units, self.max_batch_bytes);
        info!(
            "[Uploader] Uploading {} files to project {} in {} requests",
            total,
            project_id,
            batches.len()
        );

        let mut outcomes = Vec::with_capacity(total);
        let mut uploaded = 0usize;

        for (batch_index, range) in batches.into_iter().enumerate() {
            let batch = &units[range];
            let files: Vec<UploadFile> = batch
                .iter()
                .map(|unit| UploadFile {
                    name: unit.file_name.clone(),
                    bytes: unit.bytes.clone(),
                })
                .collect();

            match self.uploads.upload_files(caller, project_id, &files).await {
                Ok(items) => {
                    if items.len() != batch.len() {
                        warn!(
                            "[Uploader] Batch {} returned {} results for {} files",
                            batch_index,
                            items.len(),
                            batch.len()
                        );
                    }
                    for (position, unit) in batch.iter().enumerate() {
                        outcomes.push(UploadOutcome {
                            resource_name: unit.resource_name.clone(),
                            outcome: outcome_from_item(items.get(position)),
                        });
                    }
                }
                Err(e) => {
                    error!("[Uploader] Batch {} failed: {}", batch_index, e);
                    outcomes.extend(batch.iter().map(|unit| UploadOutcome {
                        resource_name: unit.resource_name.clone(),
                        outcome: Err(ResourceError::Upload {
                            message: e.to_string(),
                        }),
                    }));
                }
            }

            uploaded += batch.len();
            on_progress(uploaded, total);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::{ClientError, ClientResult};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    const MB: usize = 1024 * 1024;

    fn unit(name: &str, size: usize) -> UploadUnit {
        UploadUnit {
            resource_name: name.to_string(),
            file_name: format!("{}.bin", name),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    #[derive(Default)]
    struct FakeStorage {
        refuse_credentials: bool,
        fail_batches_containing: Option<String>,
        batches: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl CredentialService for FakeStorage {
        async fn acquire_upload_credentials(
            &self,
            _caller: &AuthenticatedCaller,
            _project_id: &str,
        ) -> ClientResult<()> {
            if self.refuse_credentials {
                return Err(ClientError::AuthenticationFailed {
                    message: "no access".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UploadService for FakeStorage {
        async fn upload_files(
            &self,
            _caller: &AuthenticatedCaller,
            project_id: &str,
            files: &[UploadFile],
        ) -> ClientResult<Vec<UploadResponseItem>> {
            let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
            self.batches.lock().unwrap().push(names.clone());

            if let Some(marker) = &self.fail_batches_containing {
                if names.iter().any(|name| name.contains(marker.as_str())) {
                    return Err(ClientError::NetworkError {
                        message: "connection reset".to_string(),
                    });
                }
            }

            Ok(names
                .iter()
                .map(|name| {
                    if name.starts_with("rejected") {
                        UploadResponseItem::failed("too large")
                    } else {
                        UploadResponseItem::uploaded(&format!(
                            "https://dest/{}/{}",
                            project_id, name
                        ))
                    }
                })
                .collect())
        }
    }

    #[test]
    fn test_chunking_isolates_oversized_unit() {
        let units = vec![
            unit("a", 50 * MB),
            unit("b", 50 * MB),
            unit("c", 250 * MB),
            unit("d", 10 * MB),
        ];

        let batches = plan_batches(&units, 200 * MB as u64);

        assert_eq!(batches, vec![0..2, 2..3, 3..4]);
    }

    #[test]
    fn test_chunking_coalesces_and_splits() {
        let units = vec![
            unit("a", 60),
            unit("b", 40),
            unit("c", 30),
            unit("d", 70),
            unit("e", 10),
        ];

        assert_eq!(plan_batches(&units, 100), vec![0..2, 2..4, 4..5]);
        assert_eq!(plan_batches(&units, 1000), vec![0..5]);
        assert_eq!(plan_batches(&[], 100), Vec::<Range<usize>>::new());
        assert_eq!(plan_batches(&[unit("huge", 500)], 100), vec![0..1]);
    }

    #[tokio::test]
    async fn test_outcomes_are_index_aligned() {
        let storage = FakeStorage::default();
        let uploader = Uploader::new(&storage, &storage, 100);
        let caller = AuthenticatedCaller::new("u", "t");
        let progress = Mutex::new(Vec::new());

        let outcomes = uploader
            .upload_units(
                &caller,
                "dest-project",
                vec![unit("a", 60), unit("rejected", 10), unit("c", 80)],
                &|done, total| progress.lock().unwrap().push((done, total)),
            )
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[0].outcome,
            Ok("https://dest/dest-project/a.bin".to_string())
        );
        assert_eq!(
            outcomes[1].outcome,
            Err(ResourceError::Upload {
                message: "too large".to_string()
            })
        );
        assert_eq!(outcomes[2].resource_name, "c");
        assert_eq!(
            *storage.batches.lock().unwrap(),
            vec![
                vec!["a.bin".to_string(), "rejected.bin".to_string()],
                vec!["c.bin".to_string()],
            ]
        );
        assert_eq!(*progress.lock().unwrap(), vec![(2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_later_batches() {
        let storage = FakeStorage {
            fail_batches_containing: Some("a".to_string()),
            ..FakeStorage::default()
        };
        let uploader = Uploader::new(&storage, &storage, 100);
        let caller = AuthenticatedCaller::new("u", "t");

        let outcomes = uploader
            .upload_units(&caller, "p", vec![unit("a", 90), unit("c", 90)], &|_, _| {})
            .await;

        assert!(outcomes[0].outcome.is_err());
        assert_eq!(outcomes[1].outcome, Ok("https://dest/p/c.bin".to_string()));
    }

    #[tokio::test]
    async fn test_credential_failure_is_fatal() {
        let storage = FakeStorage {
            refuse_credentials: true,
            ..FakeStorage::default()
        };
        let uploader = Uploader::new(&storage, &storage, 100);
        let caller = AuthenticatedCaller::new("u", "t");

        let result = uploader.authorize(&caller, "p").await;

        assert!(matches!(
            result,
            Err(MigrationError::CredentialAcquisition { ref project_id, .. }) if project_id == "p"
        ));
        assert!(storage.batches.lock().unwrap().is_empty());
    }
}
