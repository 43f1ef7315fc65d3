use serde::Serialize;
use url::Url;
use worker::{Headers, Response};

use crate::cors::CorsHeaders;
use crate::error::ProxyError;

/// Runtime-independent response, turned into a `worker::Response` at the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    pub fn text(body: &str, cors: &CorsHeaders) -> Self {
        Self {
            status: 200,
            headers: cors.pairs().into_iter().collect(),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn json<T: Serialize>(value: &T, cors: &CorsHeaders) -> Result<Self, ProxyError> {
        let body = serde_json::to_vec(value).map_err(ProxyError::Encode)?;
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        headers.extend(cors.pairs());
        Ok(Self { status: 200, headers, body })
    }

    pub fn redirect(location: &Url) -> Self {
        Self {
            status: 302,
            headers: vec![("Location", location.to_string())],
            body: Vec::new(),
        }
    }

    pub fn error(err: &ProxyError, cors: &CorsHeaders) -> Self {
        let body = serde_json::json!({ "error": err.client_message() });
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        headers.extend(cors.pairs());
        Self {
            status: err.status(),
            headers,
            body: body.to_string().into_bytes(),
        }
    }

    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn into_worker(self) -> worker::Result<Response> {
        let mut headers = Headers::new();
        for (name, value) in &self.headers {
            headers.set(name, value)?;
        }
        Ok(Response::from_bytes(self.body)?
            .with_status(self.status)
            .with_headers(headers))
    }
}
