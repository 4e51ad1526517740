use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub recognize_url: String,
    pub search_url: String,
    pub meals_url: String,
}

impl Endpoints {
    /// Derives all three endpoint URLs from one base (`<base>/recognize`, ...).
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            recognize_url: format!("{base}/recognize"),
            search_url: format!("{base}/search"),
            meals_url: format!("{base}/meals"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_base(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpTimeouts {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl HttpTimeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoints: Endpoints,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    #[serde(default)]
    pub http: HttpTimeouts,

    #[serde(default = "default_toast_ttl_ms")]
    pub toast_ttl_ms: u64,
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_toast_ttl_ms() -> u64 {
    4000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            search_debounce_ms: default_search_debounce_ms(),
            http: HttpTimeouts::default(),
            toast_ttl_ms: default_toast_ttl_ms(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.endpoints = Endpoints::from_base(base);
        self
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let e = Endpoints::from_base("https://food.example.com/api/");
        assert_eq!(e.recognize_url, "https://food.example.com/api/recognize");
        assert_eq!(e.search_url, "https://food.example.com/api/search");
        assert_eq!(e.meals_url, "https://food.example.com/api/meals");
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let cfg: ClientConfig = serde_json::from_str(
            r#"{"endpoints":{"recognize_url":"a","search_url":"b","meals_url":"c"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.search_debounce_ms, 300);
        assert_eq!(cfg.http, HttpTimeouts::default());
        assert_eq!(cfg.toast_ttl(), Duration::from_secs(4));
    }
}
