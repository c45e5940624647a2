//! Line-oriented input files (private keys, proxies)

use std::path::Path;

use crate::error::{ClaimerError, Result};

/// Read one entry per line, trimmed, skipping blank lines.
///
/// A missing or unreadable file is a fatal [`ClaimerError::InputFile`].
pub async fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ClaimerError::InputFile {
            path: path.display().to_string(),
            source,
        })?;

    Ok(parse_lines(&contents))
}

pub fn parse_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Pair every key with its proxy by position.
///
/// Keys without a proxy get `None`. More proxies than keys is a fatal error
/// unless `mobile` is set, in which case the proxy list is reused cyclically
/// so every key gets one.
pub fn pair_keys_with_proxies(
    keys: Vec<String>,
    proxies: Vec<String>,
    mobile: bool,
) -> Result<Vec<(String, Option<String>)>> {
    if mobile && !proxies.is_empty() {
        let paired = keys
            .into_iter()
            .zip(proxies.iter().cycle().cloned().map(Some))
            .collect();
        return Ok(paired);
    }

    if proxies.len() > keys.len() {
        return Err(ClaimerError::ProxyCountExceedsKeys {
            proxies: proxies.len(),
            keys: keys.len(),
        });
    }

    let mut proxies = proxies.into_iter();
    Ok(keys.into_iter().map(|key| (key, proxies.next())).collect())
}
