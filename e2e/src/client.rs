//! HTTP client that simulates how a browser widget talks to the proxy

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method};

use crate::types::ProxyResponse;

/// Prefix every proxied miniprofile URL starts with
pub const MINIPROFILE_PREFIX: &str = "https://steamcommunity.com/miniprofile/";

/// Build an HTTP client
pub fn build_client() -> Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build reqwest client")
}

/// Proxy path for a raw identifier, e.g. `/https://steamcommunity.com/miniprofile/22202`
pub fn miniprofile_path(identifier: &str) -> String {
    format!("/{MINIPROFILE_PREFIX}{identifier}")
}

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode the way a browser's `encodeURIComponent` does
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Send a request with the given method and extra headers to the proxy
pub async fn send(
    client: &Client,
    proxy_addr: &str,
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
) -> anyhow::Result<ProxyResponse> {
    let url = format!("http://{proxy_addr}{path}");

    let mut request = client.request(method.clone(), &url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let resp = request
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to {} {}: {}", method, url, e))?;

    let status = resp.status().as_u16();
    let headers = resp.headers().clone();
    let body = resp
        .text()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read body of {}: {}", url, e))?;

    Ok(ProxyResponse { status, headers, body })
}

/// Send a GET request to the proxy
pub async fn send_get(client: &Client, proxy_addr: &str, path: &str) -> anyhow::Result<ProxyResponse> {
    send(client, proxy_addr, Method::GET, path, &[]).await
}

/// Send a CORS pre-flight to the proxy
pub async fn send_options(client: &Client, proxy_addr: &str, path: &str) -> anyhow::Result<ProxyResponse> {
    send(
        client,
        proxy_addr,
        Method::OPTIONS,
        path,
        &[
            ("Origin", "https://example.com"),
            ("Access-Control-Request-Method", "GET"),
        ],
    )
    .await
}
