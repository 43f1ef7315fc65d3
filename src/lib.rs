mod config;
mod cors;
mod error;
mod fetch;
mod handlers;
mod response;

use js_sys::Date;
use worker::*;
use worker_macros::event;

use crate::config::ProxyConfig;
use crate::fetch::WorkerFetch;
use crate::handlers::{route, IncomingRequest};

#[event(fetch)]
pub async fn main(mut req: Request, env: Env, _ctx: Context) -> Result<Response> {
    // It's crucial to set the panic hook, otherwise panics might silently fail
    console_error_panic_hook::set_once();

    let started = Date::now();
    let method = req.method();
    let path = req.path();

    let config = match ProxyConfig::from_env(&env) {
        Ok(config) => config,
        Err(e) => {
            console_error!("Configuration error: {}", e);
            return Response::error("Proxy is misconfigured", 500);
        }
    };

    let origin = req.headers().get("Origin")?;
    // Only the search route reads the body
    let body = if method == Method::Post {
        req.bytes().await?
    } else {
        Vec::new()
    };

    let incoming = IncomingRequest {
        method: req.method(),
        origin,
        body,
    };
    let resp = route(&config, &WorkerFetch, incoming).await;

    if resp.status >= 400 {
        console_error!(
            "{:?} {} failed with {} in {}ms: {}",
            method,
            path,
            resp.status,
            Date::now() - started,
            String::from_utf8_lossy(&resp.body)
        );
    } else {
        console_log!(
            "{:?} {} -> {} in {}ms",
            method,
            path,
            resp.status,
            Date::now() - started
        );
    }

    resp.into_worker()
}
