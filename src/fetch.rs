use js_sys::Date;
use url::Url;
use worker::*;

use crate::error::ProxyError;

/// Source of upstream search payloads. The proxy only ever issues a single GET.
#[allow(async_fn_in_trait)]
pub trait Upstream {
    async fn get_text(&self, url: &Url) -> std::result::Result<String, ProxyError>;
}

/// Upstream client backed by the Workers `fetch` API. Failures are returned as-is,
/// there is no retry.
pub struct WorkerFetch;

impl Upstream for WorkerFetch {
    async fn get_text(&self, url: &Url) -> std::result::Result<String, ProxyError> {
        // client_id is a secret, log the endpoint only
        let target = format!("{}{}", url.host_str().unwrap_or_default(), url.path());
        let started = Date::now();

        let mut response = Fetch::Url(url.clone()).send().await.map_err(|e| {
            console_error!("Upstream fetch to {} failed: {}", target, e);
            ProxyError::UpstreamFetch(e.to_string())
        })?;

        let status = response.status_code();
        console_log!(
            "Upstream {} -> {} in {}ms",
            target,
            status,
            Date::now() - started
        );

        if status >= 400 {
            console_error!("Upstream error {} for {}", status, target);
            return Err(ProxyError::UpstreamStatus(status));
        }

        response.text().await.map_err(|e| {
            console_error!("Text extraction error for {}: {:?}", target, e);
            ProxyError::UpstreamFetch(e.to_string())
        })
    }
}
