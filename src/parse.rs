use crate::error::ConfigError;

/// A parsed destination URL: `scheme://bucket/prefix`.
///
/// The prefix has its single leading slash stripped so that joined keys are
/// always relative to the destination root; a trailing slash is dropped to
/// keep key joining uniform. For `file://` destinations the host part is
/// empty and the prefix is the absolute path minus its leading slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub scheme: String,
    pub bucket: String,
    pub prefix: String,
}

pub fn parse_remote_url(input: &str) -> Result<RemoteUrl, ConfigError> {
    let (scheme, rest) = input.split_once("://").ok_or_else(|| {
        ConfigError::InvalidRemoteUrl(input.to_string(), "missing '://' separator".to_string())
    })?;
    if scheme.is_empty() {
        return Err(ConfigError::InvalidRemoteUrl(input.to_string(), "empty scheme".to_string()));
    }
    if !scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return Err(ConfigError::InvalidRemoteUrl(
            input.to_string(),
            format!("scheme '{}' contains invalid characters", scheme),
        ));
    }
    let (bucket, path) = match rest.split_once('/') {
        Some((b, p)) => (b, p),
        None => (rest, ""),
    };
    if bucket.is_empty() && path.is_empty() {
        return Err(ConfigError::InvalidRemoteUrl(
            input.to_string(),
            "missing host and path".to_string(),
        ));
    }
    Ok(RemoteUrl {
        scheme: scheme.to_ascii_lowercase(),
        bucket: bucket.to_string(),
        prefix: path.trim_end_matches('/').to_string(),
    })
}
