//! Page cursor and the codec between host continuation tokens and cursors.
//!
//! A cursor is the base64 encoding of a compact JSON record
//! `{"page": N, "page_size": M}`. The empty token always means page 1, so
//! callers never special-case the first request. A corrupt token is an error
//! and never silently restarts at page 1.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use zuper_core::{AppError, AppResult};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Decoded position inside a paginated upstream collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// One-based page number.
    pub page: u32,
    /// Requested page size; zero means "use the default".
    #[serde(default)]
    pub page_size: u32,
}

impl PageCursor {
    /// Cursor pointing at the first page.
    pub const FIRST: Self = Self {
        page: 1,
        page_size: 0,
    };

    /// Creates a cursor for `page`.
    #[must_use]
    pub fn new(page: u32) -> Self {
        Self { page, page_size: 0 }
    }
}

/// Continuation marker the host carries between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageToken {
    /// Opaque token; empty for the first call.
    pub token: String,
    /// Page size requested by the host; zero means default.
    pub size: u32,
}

impl PageToken {
    /// Creates a token with an explicit size.
    #[must_use]
    pub fn new(token: impl Into<String>, size: u32) -> Self {
        Self {
            token: token.into(),
            size,
        }
    }
}

/// Paging options passed to list calls on the API client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Encoded cursor; empty for page 1.
    pub page_token: String,
    /// Page size; zero falls back to [`DEFAULT_PAGE_SIZE`].
    pub page_size: u32,
}

impl PageOptions {
    /// Creates options for an explicit token and size.
    #[must_use]
    pub fn new(page_token: impl Into<String>, page_size: u32) -> Self {
        Self {
            page_token: page_token.into(),
            page_size,
        }
    }

    /// Translates the host token into client options.
    #[must_use]
    pub fn from_host(token: &PageToken) -> Self {
        Self::new(token.token.clone(), token.size)
    }

    /// Returns the page size with the default applied.
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Decodes the page number to request.
    pub fn page(&self) -> AppResult<u32> {
        decode(&self.page_token).map(|cursor| cursor.page)
    }
}

/// Encodes a cursor into an opaque token.
#[must_use]
pub fn encode(cursor: &PageCursor) -> String {
    // Two integer fields always serialize.
    let payload = serde_json::to_vec(cursor).unwrap_or_default();
    STANDARD.encode(payload)
}

/// Decodes an opaque token. The empty string yields the first page.
pub fn decode(token: &str) -> AppResult<PageCursor> {
    if token.is_empty() {
        return Ok(PageCursor::FIRST);
    }

    let bytes = STANDARD
        .decode(token)
        .map_err(|error| AppError::InvalidPageToken(format!("token is not base64: {error}")))?;
    let cursor: PageCursor = serde_json::from_slice(&bytes).map_err(|error| {
        AppError::InvalidPageToken(format!("token does not hold a page cursor: {error}"))
    })?;

    if cursor.page == 0 {
        return Err(AppError::InvalidPageToken(
            "page number must be at least 1".to_owned(),
        ));
    }

    Ok(cursor)
}

/// Returns the token for the page after `current_page`, or `""` on the last page.
#[must_use]
pub fn next_token(current_page: u32, total_pages: u32) -> String {
    if current_page < total_pages {
        encode(&PageCursor::new(current_page.saturating_add(1)))
    } else {
        String::new()
    }
}
