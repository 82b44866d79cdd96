use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use percent_encoding::percent_decode_str;
use url::Url;

/// Schemes fetched over the network
const NETWORK_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

fn has_scheme(file: &str, scheme: &str) -> bool {
    file.as_bytes()
        .get(..scheme.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(scheme.as_bytes()))
}

/// True when `file` is an http(s)/ftp URL, a `blob:` or a `data:` URL.
/// Anything else is a relative or local path.
pub fn is_url(file: &str) -> bool {
    is_blob_url(file)
        || is_data_url(file)
        || Url::parse(file).is_ok_and(|url| NETWORK_SCHEMES.contains(&url.scheme()))
}

/// In-browser object URL, only valid in the page that created it
pub fn is_blob_url(file: &str) -> bool {
    has_scheme(file, "blob:")
}

pub fn is_data_url(file: &str) -> bool {
    has_scheme(file, "data:")
}

pub fn has_prefix(url: &str, prefix: &str) -> bool {
    !prefix.is_empty() && url.starts_with(prefix)
}

/// Remove a `?query` or `#fragment` tail from a file name
pub fn strip_query_string(value: &str) -> &str {
    let end = value.find(['?', '#']).unwrap_or(value.len());
    &value[..end]
}

/// Last path segment of a URL, percent-escapes decoded. `None` for `data:`
/// URLs, unparsable URLs, or when the path ends with `/`.
pub fn extract_filename_from_url(url: &str) -> Option<String> {
    if is_data_url(url) {
        return None;
    }

    // blob:<origin>/<uuid> carries its name in the inner URL
    let address = if is_blob_url(url) {
        &url["blob:".len()..]
    } else {
        url
    };
    let parsed = Url::parse(address).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    Some(decoded.replace(['/', '\\'], "_"))
}

/// Project id of a URL in the platform bucket: the first path segment after
/// `cloud_prefix`. This relies on the bucket's `<prefix><id>/...` layout.
pub fn extract_cloud_project_id<'a>(url: &'a str, cloud_prefix: &str) -> Option<&'a str> {
    let rest = url.strip_prefix(cloud_prefix).filter(|_| !cloud_prefix.is_empty())?;
    rest.split(['/', '?', '#'])
        .next()
        .filter(|project_id| !project_id.is_empty())
}

/// Append `param=value` to the query string. URLs that don't parse are
/// returned unchanged.
pub fn add_cache_bust(url: &str, param: &str, value: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair(param, value);
            parsed.into()
        }
        Err(_) => url.to_string(),
    }
}

/// Decode a `data:[<media type>][;base64],<payload>` URL
pub fn decode_data_url(url: &str) -> Result<Bytes, String> {
    if !is_data_url(url) {
        return Err("not a data URL".to_string());
    }

    let (header, payload) = url["data:".len()..]
        .split_once(',')
        .ok_or_else(|| "missing ',' separator".to_string())?;
    let decoded: Vec<u8> = percent_decode_str(payload).collect();

    if header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        let compact: Vec<u8> = decoded
            .into_iter()
            .filter(|byte| !byte.is_ascii_whitespace())
            .collect();
        STANDARD
            .decode(&compact)
            .map(Bytes::from)
            .map_err(|e| e.to_string())
    } else {
        Ok(Bytes::from(decoded))
    }
}

/// Insert `-<n>` before the extension: `hero.png` -> `hero-1.png`
pub fn with_numeric_suffix(filename: &str, n: usize) -> String {
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{}{}", &filename[..dot], n, &filename[dot..]),
        _ => format!("{}-{}", filename, n),
    }
}

pub fn has_extension(filename: &str) -> bool {
    matches!(filename.rfind('.'), Some(dot) if dot > 0 && dot + 1 < filename.len())
}
