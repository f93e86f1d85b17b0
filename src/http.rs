//! Blocking HTTP client shared by the dictionary and translation services.

use std::time::Duration;

use reqwest::blocking::Client;

const USER_AGENT: &str = "bookleaf";

fn is_loopback(endpoint: &str) -> bool {
    ["http://127.0.0.1", "http://localhost"]
        .iter()
        .any(|prefix| endpoint.starts_with(prefix))
}

/// A client with the request timeout and user agent applied. Loopback
/// endpoints bypass any configured proxy.
pub fn http_client(endpoint: &str, timeout: Duration) -> reqwest::Result<Client> {
    let mut builder = Client::builder().timeout(timeout).user_agent(USER_AGENT);
    if is_loopback(endpoint) {
        builder = builder.no_proxy();
    }
    builder.build()
}
