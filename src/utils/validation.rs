use crate::utils::error::{FxError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> FxError {
    FxError::InvalidConfigValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The rate table is fetched with a plain GET, so only http(s) URLs are usable.
pub fn validate_source_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, value, format!("Rates cannot be fetched over {}", scheme))),
    }
}

pub fn validate_path(field: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains('\0') {
        return Err(invalid(field, value, "Path must be non-empty and free of NUL bytes"));
    }
    Ok(())
}

/// A zero timeout would fail every fetch before it starts.
pub fn validate_timeout_secs(field: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(invalid(field, secs, "Timeout must be at least 1 second"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// Amounts come straight from user input, so NaN and infinities are rejected.
pub fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(field, value, "Amount must be a finite number"));
    }
    Ok(())
}
