use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use worker::Env;

use crate::cors::{AllowList, CorsPolicy};
use crate::error::ConfigError;

pub const DEFAULT_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";
pub const PER_PAGE: u32 = 9;

const CORS_MODE: &str = "CORS_MODE";
const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
const FALLBACK_URL: &str = "FALLBACK_URL";
const ACCESS_KEY: &str = "UNSPLASH_ACCESS_KEY";
const SEARCH_URL: &str = "UNSPLASH_SEARCH_URL";

#[derive(Debug, Deserialize, Default)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<Value>,
}

impl SearchRequest {
    /// Reads the body as a JSON object. Only an object's `query` key counts, so
    /// arrays and other scalars carry no query; `null` is rejected.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        match value {
            Value::Object(_) => serde_json::from_value(value),
            Value::Null => Err(serde::de::Error::custom("expected a JSON object, found null")),
            _ => Ok(Self::default()),
        }
    }

    /// Term forwarded upstream. A missing query is still forwarded as an empty
    /// term instead of being rejected.
    pub fn term(&self) -> String {
        match &self.query {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    pub image: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamSearch {
    pub results: Vec<UpstreamPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamPhoto {
    pub id: String,
    pub urls: PhotoUrls,
    pub links: PhotoLinks,
}

#[derive(Debug, Deserialize)]
pub struct PhotoUrls {
    pub small: String,
}

#[derive(Debug, Deserialize)]
pub struct PhotoLinks {
    pub html: String,
}

impl From<UpstreamPhoto> for ImageRecord {
    fn from(photo: UpstreamPhoto) -> Self {
        Self {
            id: photo.id,
            image: photo.urls.small,
            link: photo.links.html,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub search_url: Url,
    pub access_key: String,
}

impl UpstreamConfig {
    pub fn search_url_for(&self, term: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.access_key)
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("query", term);
        url
    }
}

/// Deployment settings, read once per invocation and shared by reference.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub cors: CorsPolicy,
    pub fallback_url: Url,
    pub upstream: UpstreamConfig,
}

impl ProxyConfig {
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| {
            env.var(name)
                .or_else(|_| env.secret(name))
                .ok()
                .map(|value| value.to_string())
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = lookup(CORS_MODE).unwrap_or_else(|| "allow-list".to_string());
        let cors = match mode.trim() {
            "allow-list" => {
                let raw = lookup(ALLOWED_ORIGINS).ok_or(ConfigError::Missing(ALLOWED_ORIGINS))?;
                let origins = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty());
                let list = AllowList::new(origins).ok_or(ConfigError::EmptyAllowList(ALLOWED_ORIGINS))?;
                CorsPolicy::AllowList(list)
            }
            "wildcard" => CorsPolicy::Wildcard,
            other => return Err(ConfigError::UnknownCorsMode(other.to_string())),
        };

        let fallback = lookup(FALLBACK_URL).ok_or(ConfigError::Missing(FALLBACK_URL))?;
        let fallback_url = parse_url(FALLBACK_URL, &fallback)?;

        let access_key = lookup(ACCESS_KEY).ok_or(ConfigError::Missing(ACCESS_KEY))?;
        let search_url = match lookup(SEARCH_URL) {
            Some(raw) => parse_url(SEARCH_URL, &raw)?,
            None => parse_url(SEARCH_URL, DEFAULT_SEARCH_URL)?,
        };

        Ok(Self {
            cors,
            fallback_url,
            upstream: UpstreamConfig { search_url, access_key },
        })
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            (ALLOWED_ORIGINS, "https://workers-unsplash-viewer.pages.dev, http://localhost:3000"),
            (FALLBACK_URL, "https://workers-unsplash-viewer.pages.dev"),
            (ACCESS_KEY, "secret-key"),
        ]
    }

    #[test]
    fn allow_list_profile_is_the_default() {
        let config = ProxyConfig::from_lookup(lookup_from(&base())).unwrap();
        match config.cors {
            CorsPolicy::AllowList(list) => assert_eq!(
                list.origins(),
                ["https://workers-unsplash-viewer.pages.dev", "http://localhost:3000"]
            ),
            CorsPolicy::Wildcard => panic!("expected allow-list profile"),
        }
        assert_eq!(config.upstream.search_url.as_str(), DEFAULT_SEARCH_URL);
    }

    #[test]
    fn wildcard_profile_does_not_need_origins() {
        let config = ProxyConfig::from_lookup(lookup_from(&[
            (CORS_MODE, "wildcard"),
            (FALLBACK_URL, "https://open-viewer.pages.dev"),
            (ACCESS_KEY, "secret-key"),
        ]))
        .unwrap();
        assert_eq!(config.cors, CorsPolicy::Wildcard);
        assert_eq!(config.fallback_url.as_str(), "https://open-viewer.pages.dev/");
    }

    #[test]
    fn blank_origin_list_is_rejected() {
        let mut pairs = base();
        pairs[0] = (ALLOWED_ORIGINS, " , ");
        let err = ProxyConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyAllowList(_)));
    }

    #[test]
    fn missing_access_key_is_reported() {
        let pairs: Vec<_> = base().into_iter().filter(|(k, _)| *k != ACCESS_KEY).collect();
        let err = ProxyConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ACCESS_KEY)));
    }

    #[test]
    fn unknown_mode_and_bad_urls_are_rejected() {
        let mut pairs = base();
        pairs.push((CORS_MODE, "strict"));
        assert!(matches!(
            ProxyConfig::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::UnknownCorsMode(_)
        ));

        let mut pairs = base();
        pairs.push((SEARCH_URL, "not a url"));
        assert!(matches!(
            ProxyConfig::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::InvalidUrl { name: SEARCH_URL, .. }
        ));
    }

    #[test]
    fn search_url_carries_fixed_parameters() {
        let config = ProxyConfig::from_lookup(lookup_from(&base())).unwrap();
        let url = config.upstream.search_url_for("red cats");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".to_string(), "secret-key".to_string()),
                ("per_page".to_string(), "9".to_string()),
                ("query".to_string(), "red cats".to_string()),
            ]
        );
        assert_eq!(url.path(), "/search/photos");
    }

    #[test]
    fn query_term_handles_missing_and_non_string_values() {
        let missing: SearchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.term(), "");
        let null: SearchRequest = serde_json::from_str(r#"{"query":null}"#).unwrap();
        assert_eq!(null.term(), "");
        let number: SearchRequest = serde_json::from_str(r#"{"query":5}"#).unwrap();
        assert_eq!(number.term(), "5");
        let text: SearchRequest = serde_json::from_str(r#"{"query":"cats"}"#).unwrap();
        assert_eq!(text.term(), "cats");
    }

    #[test]
    fn body_query_is_read_by_key_only() {
        let object = SearchRequest::from_body(br#"{"query":"cats","page":2}"#).unwrap();
        assert_eq!(object.term(), "cats");

        let array = SearchRequest::from_body(br#"["cats"]"#).unwrap();
        assert_eq!(array.term(), "");
        let scalar = SearchRequest::from_body(b"42").unwrap();
        assert_eq!(scalar.term(), "");

        assert!(SearchRequest::from_body(b"null").is_err());
        assert!(SearchRequest::from_body(b"query=cats").is_err());
    }
}
