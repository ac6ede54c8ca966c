//! Cookie record codec.
//!
//! A record is `<name>=<value>; expires=<UTC date>; path=/` where the value is
//! the JSON document escaped like `encodeURIComponent` and the date is
//! rendered like `Date.prototype.toUTCString`.

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use time::{Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::consts::COOKIE_PATH;
use crate::error::CacheError;

/// Characters `encodeURIComponent` escapes: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const UTC_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT");

/// Escape a cookie value the way `encodeURIComponent` does.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Undo [`encode_component`].
///
/// # Errors
///
/// Returns [`CacheError::MalformedEncoding`] if the decoded bytes are not UTF-8.
pub fn decode_component(encoded: &str) -> Result<String, CacheError> {
    Ok(percent_decode_str(encoded).decode_utf8()?.into_owned())
}

/// Render `now_ms + lifetime_ms` (milliseconds since the Unix epoch) as a cookie date.
///
/// # Errors
///
/// Returns [`CacheError::Expiry`] if the instant is outside the representable range.
pub fn expiry_date(now_ms: i64, lifetime_ms: u64) -> Result<String, CacheError> {
    let lifetime = i64::try_from(lifetime_ms).map_err(|e| CacheError::Expiry(e.to_string()))?;
    let expires = OffsetDateTime::UNIX_EPOCH
        .checked_add(Duration::milliseconds(now_ms))
        .and_then(|t| t.checked_add(Duration::milliseconds(lifetime)))
        .ok_or_else(|| CacheError::Expiry(format!("{now_ms} + {lifetime_ms} ms is out of range")))?;
    expires.format(UTC_DATE).map_err(|e| CacheError::Expiry(e.to_string()))
}

/// Build the full record written to the cookie store.
///
/// # Errors
///
/// Propagates [`expiry_date`] failures.
pub fn encode_record(name: &str, json: &str, now_ms: i64, lifetime_ms: u64) -> Result<String, CacheError> {
    let expires = expiry_date(now_ms, lifetime_ms)?;
    Ok(format!(
        "{name}={}; expires={expires}; path={COOKIE_PATH}",
        encode_component(json)
    ))
}

/// Find `name` in a `document.cookie` style string (`a=1; b=2`) and decode its value.
///
/// Returns an empty string when the cookie is not present.
///
/// # Errors
///
/// Returns [`CacheError::MalformedEncoding`] if the matching value does not decode.
pub fn find_value(cookies: &str, name: &str) -> Result<String, CacheError> {
    for pair in cookies.split(';') {
        let Some((key, value)) = pair.trim_start().split_once('=') else {
            continue;
        };
        if key == name {
            return decode_component(value);
        }
    }
    Ok(String::new())
}
