use worker::Method;

use crate::config::{ImageRecord, ProxyConfig, SearchRequest, UpstreamSearch};
use crate::cors::CorsHeaders;
use crate::error::ProxyError;
use crate::fetch::Upstream;
use crate::response::ProxyResponse;

#[derive(Debug)]
pub struct IncomingRequest {
    pub method: Method,
    pub origin: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preflight,
    Search,
    Fallback,
}

impl From<&Method> for Route {
    fn from(method: &Method) -> Self {
        match method {
            Method::Options => Route::Preflight,
            Method::Post => Route::Search,
            _ => Route::Fallback,
        }
    }
}

pub async fn route<U: Upstream>(
    config: &ProxyConfig,
    upstream: &U,
    request: IncomingRequest,
) -> ProxyResponse {
    match Route::from(&request.method) {
        Route::Preflight => {
            let cors = config.cors.headers_for(request.origin.as_deref());
            ProxyResponse::text("OK", &cors)
        }
        Route::Search => {
            let cors = config.cors.headers_for(request.origin.as_deref());
            match search(config, upstream, &request.body, &cors).await {
                Ok(resp) => resp,
                Err(e) => ProxyResponse::error(&e, &cors),
            }
        }
        Route::Fallback => ProxyResponse::redirect(&config.fallback_url),
    }
}

pub async fn search<U: Upstream>(
    config: &ProxyConfig,
    upstream: &U,
    body: &[u8],
    cors: &CorsHeaders,
) -> Result<ProxyResponse, ProxyError> {
    let request = SearchRequest::from_body(body).map_err(ProxyError::InvalidBody)?;
    let url = config.upstream.search_url_for(&request.term());

    let payload = upstream.get_text(&url).await?;
    let images = project(&payload)?;

    ProxyResponse::json(&images, cors)
}

/// Reduces an upstream search payload to the records sent to the browser,
/// keeping the upstream ranking order.
pub fn project(payload: &str) -> Result<Vec<ImageRecord>, ProxyError> {
    let search: UpstreamSearch = serde_json::from_str(payload).map_err(ProxyError::UpstreamPayload)?;
    Ok(search.results.into_iter().map(ImageRecord::from).collect())
}
