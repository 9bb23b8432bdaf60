//! HTTP client construction and request decoration.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;

use crate::options::TransportOptions;

/// Build a configured HTTP client from transport options.
///
/// This applies common configuration like timeouts and proxies.
pub fn build_http_client(transport_options: &TransportOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = transport_options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(read_timeout) = transport_options.read_timeout {
        builder = builder.read_timeout(read_timeout);
    }

    if let Some(proxy_url) = &transport_options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Set the JSON content type and, when a key is configured, bearer auth.
pub fn add_default_headers(request: RequestBuilder, transport_options: &TransportOptions) -> RequestBuilder {
    let request = request.header(CONTENT_TYPE, "application/json");
    let request = match &transport_options.api_key {
        Some(key) => request.header(AUTHORIZATION, format!("Bearer {}", key.expose_secret())),
        None => request,
    };
    add_extra_headers(request, &transport_options.extra_headers)
}

/// Add extra headers to a request if specified in transport options.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}
