//! Field validation and normalization shared by platform configs

use url::Url;

use kestrel_common::defaults::DEFAULT_ENDPOINT_SCHEME;
use kestrel_common::{Error, Result};

use crate::PlatformKind;

/// Fail unless `value` has non-whitespace content
pub fn require(platform: PlatformKind, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation_for_field(
            platform.as_str(),
            field,
            format!("{field} is required"),
        ));
    }
    Ok(())
}

/// Trim an endpoint and prefix the default scheme when none is given
///
/// Empty input stays empty so that `require` reports it.
pub fn normalize_endpoint(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_ENDPOINT_SCHEME}{trimmed}")
    }
}

/// Parse an HTTP(S) endpoint that must name a host
pub fn parse_http_endpoint(platform: PlatformKind, field: &str, value: &str) -> Result<Url> {
    let url = parse_url(platform, field, value)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation_for_field(
            platform.as_str(),
            field,
            format!("{field} must use http or https, got {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::validation_for_field(
            platform.as_str(),
            field,
            format!("{field} has no host: {value}"),
        ));
    }
    Ok(url)
}

/// Parse any absolute URL
pub fn parse_url(platform: PlatformKind, field: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| {
        Error::validation_for_field(
            platform.as_str(),
            field,
            format!("{field} is not a valid URL ({value}): {e}"),
        )
    })
}

/// Trim an optional string, collapsing blank values to `None`
pub fn trim_optional(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}
