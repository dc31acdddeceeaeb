//! Client configuration.

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.restful-api.dev";
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Environment variable holding the API base URL.
pub const BASE_URL_VAR: &str = "OBJECTS_API_URL";
/// Environment variable holding the initial page size.
pub const PAGE_SIZE_VAR: &str = "OBJECTS_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    /// Read `OBJECTS_API_URL` and `OBJECTS_PAGE_SIZE`, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let page_size = lookup(PAGE_SIZE_VAR)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self {
            base_url,
            page_size,
        }
    }
}
