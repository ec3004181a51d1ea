use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use url::Url;

use crate::models::contribution::DateRange;

/// First year GitHub has contribution data for
pub const MIN_YEAR: i32 = 2008;
pub const MAX_YEAR: i32 = 9999;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validate that a string is a valid URL with http or https scheme
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| anyhow!("Invalid URL format: {}", e))?;

    // Only allow http and https schemes
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!(
            "URL must use http or https scheme, got: {}",
            url.scheme()
        ));
    }

    if url.host_str().is_none() {
        return Err(anyhow!("URL must have a host"));
    }

    Ok(url)
}

/// Validate a CORS origin and return it as `scheme://host[:port]`
pub fn validate_origin(origin_str: &str) -> Result<String> {
    let url = validate_url(origin_str)?;

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(anyhow!(
            "Origin must not contain a path, query or fragment: {}",
            origin_str
        ));
    }

    Ok(url.origin().ascii_serialization())
}

/// Validate a GitHub login (alphanumeric, hyphens, underscores, 1-39 chars)
pub fn validate_login(login: &str) -> Result<()> {
    if login.is_empty() || login.chars().count() > 39 {
        return Err(anyhow!("Login must be between 1 and 39 characters"));
    }

    if !login
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!(
            "Login can only contain alphanumeric characters, hyphens, and underscores"
        ));
    }

    Ok(())
}

/// Parse a `from`/`to` pair of RFC 3339 timestamps into a range
pub fn validate_date_range(from: &str, to: &str) -> Result<DateRange> {
    let parse = |name: &str, value: &str| -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| anyhow!("Invalid '{}' timestamp '{}': {}", name, value, e))
    };

    let from = parse("from", from)?;
    let to = parse("to", to)?;

    if from > to {
        return Err(anyhow!("'from' must not be later than 'to'"));
    }

    Ok(DateRange { from, to })
}

pub fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(anyhow!(
            "Year must be between {} and {}, got {}",
            MIN_YEAR,
            MAX_YEAR,
            year
        ));
    }
    Ok(())
}

pub fn validate_page_size(first: u32) -> Result<()> {
    if first == 0 || first > MAX_PAGE_SIZE {
        return Err(anyhow!(
            "'first' must be between 1 and {}, got {}",
            MAX_PAGE_SIZE,
            first
        ));
    }
    Ok(())
}
