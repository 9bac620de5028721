//! CLI Status Command
//!
//! Calls the health canary of a running endpoint.

use anyhow::{bail, Context, Result};
use reqwest::StatusCode;

pub const CANARY_PATH: &str = "/meta/health/canary";

pub fn canary_url(endpoint_base: &str) -> String {
    format!("{}{}", endpoint_base.trim_end_matches('/'), CANARY_PATH)
}

pub async fn run(endpoint_base: &str) -> Result<()> {
    let url = canary_url(endpoint_base);
    println!("Upload endpoint status: checking {url}");

    let client = reqwest::Client::new();
    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Upload endpoint is not running at {endpoint_base}"))?;
    if resp.status() != StatusCode::NO_CONTENT {
        bail!("Upload endpoint is unhealthy: canary answered {}", resp.status());
    }

    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    println!("  healthy (request id {request_id})");
    Ok(())
}
