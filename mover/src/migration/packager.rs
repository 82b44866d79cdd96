//! Turns fetched payloads into named upload units.

use super::types::{FetchResult, UploadUnit};
use crate::services::errors::ResourceError;
use crate::utils::{has_extension, strip_query_string};

/// Filename rewrite applied before a unit is persisted at the destination
pub type FilenameTransform<'a> = &'a (dyn Fn(&str) -> String + Send + Sync);

/// Drops a `?token=...` style suffix so it never ends up in a stored name
pub fn strip_query_from_filename(name: &str) -> String {
    strip_query_string(name).to_string()
}

/// Build upload units from successful fetches. Failed fetches are handed to
/// `on_error` and left out of the output.
pub fn package_fetch_results(
    results: Vec<FetchResult>,
    transform_filename: Option<FilenameTransform<'_>>,
    on_error: &mut dyn FnMut(&str, ResourceError),
) -> Vec<UploadUnit> {
    let mut units = Vec::with_capacity(results.len());

    for result in results {
        let candidate = result.candidate;
        let bytes = match result.outcome {
            Ok(bytes) => bytes,
            Err(error) => {
                on_error(&candidate.resource_name, error);
                continue;
            }
        };

        let mut file_name = match transform_filename {
            Some(transform) => transform(&candidate.target_filename),
            None => candidate.target_filename,
        };
        if let Some(extension) = candidate.extension_hint.as_deref() {
            if !has_extension(&file_name) {
                file_name = format!("{}.{}", file_name, extension);
            }
        }

        units.push(UploadUnit {
            resource_name: candidate.resource_name,
            file_name,
            bytes,
        });
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::types::{CandidateSource, MigrationCandidate};
    use bytes::Bytes;

    fn fetched(name: &str, filename: &str, outcome: Result<Bytes, ResourceError>) -> FetchResult {
        FetchResult {
            candidate: MigrationCandidate {
                resource_name: name.to_string(),
                source: CandidateSource::Url(format!("https://host/{}", filename)),
                target_filename: filename.to_string(),
                extension_hint: None,
            },
            outcome,
        }
    }

    #[test]
    fn test_errors_forwarded_and_dropped() {
        let results = vec![
            fetched("ok", "ok.png", Ok(Bytes::from_static(b"1234"))),
            fetched("broken", "broken.png", Err(ResourceError::HttpStatus { status: 500 })),
        ];
        let mut errors = Vec::new();

        let units = package_fetch_results(results, None, &mut |name, error| {
            errors.push((name.to_string(), error))
        });

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].resource_name, "ok");
        assert_eq!(units[0].size(), 4);
        assert_eq!(
            errors,
            vec![("broken".to_string(), ResourceError::HttpStatus { status: 500 })]
        );
    }

    #[test]
    fn test_token_stripped_from_filename() {
        let results = vec![fetched(
            "asset",
            "asset.png?token=abc",
            Ok(Bytes::from_static(b"png")),
        )];

        let units =
            package_fetch_results(results, Some(&strip_query_from_filename), &mut |_, _| {});

        assert_eq!(units[0].file_name, "asset.png");
    }

    #[test]
    fn test_extension_hint_appended() {
        let mut result = fetched("blob", "5f0c-11", Ok(Bytes::from_static(b"png")));
        result.candidate.extension_hint = Some("png".to_string());

        let units = package_fetch_results(vec![result], None, &mut |_, _| {});

        assert_eq!(units[0].file_name, "5f0c-11.png");
    }
}
