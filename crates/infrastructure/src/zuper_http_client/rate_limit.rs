//! Rate-limit header extraction.

use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use zuper_domain::{Annotations, RateLimitDescription, RateLimitStatus};

const LIMIT_HEADERS: [&str; 2] = ["x-ratelimit-limit", "ratelimit-limit"];
const REMAINING_HEADERS: [&str; 2] = ["x-ratelimit-remaining", "ratelimit-remaining"];
const RESET_HEADERS: [&str; 2] = ["x-ratelimit-reset", "ratelimit-reset"];
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Reset values above this are absolute unix timestamps; smaller ones are deltas.
const EPOCH_THRESHOLD_SECS: u64 = 1_000_000_000;

/// Builds the rate-limit annotation for a response, or nothing when the
/// response carries no rate-limit headers.
pub(super) fn rate_limit_annotations(
    status: StatusCode,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Annotations {
    let limit = first_number(headers, &LIMIT_HEADERS);
    let remaining = first_number(headers, &REMAINING_HEADERS);
    let reset_at = first_number(headers, &RESET_HEADERS)
        .and_then(|value| reset_time(value, now))
        .or_else(|| retry_after(headers, now));

    if limit.is_none() && remaining.is_none() && reset_at.is_none() {
        return Annotations::new();
    }

    let throttled = status == StatusCode::TOO_MANY_REQUESTS || remaining == Some(0);
    Annotations::from(RateLimitDescription {
        status: if throttled {
            RateLimitStatus::Overlimit
        } else {
            RateLimitStatus::Ok
        },
        limit,
        remaining,
        reset_at,
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

fn first_number(headers: &HeaderMap, names: &[&str]) -> Option<u64> {
    names
        .iter()
        .find_map(|name| header_str(headers, name).and_then(|value| value.parse().ok()))
}

fn reset_time(value: u64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if value > EPOCH_THRESHOLD_SECS {
        DateTime::from_timestamp(i64::try_from(value).ok()?, 0)
    } else {
        now.checked_add_signed(Duration::seconds(i64::try_from(value).ok()?))
    }
}

fn retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let value = header_str(headers, RETRY_AFTER_HEADER)?;
    match value.parse::<u64>() {
        Ok(seconds) => now.checked_add_signed(Duration::seconds(i64::try_from(seconds).ok()?)),
        Err(_) => DateTime::parse_from_rfc2822(value)
            .ok()
            .map(|date| date.with_timezone(&Utc)),
    }
}
