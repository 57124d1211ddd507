use std::sync::Arc;
use std::time::Duration;

use hyper::body::{Bytes, to_bytes};
use hyper::client::HttpConnector;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use hyper::{Body, Client, Request, StatusCode, Uri};
use hyper_rustls::HttpsConnector;
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use serde::Serialize;
use tokio::time::timeout;
use tracing::debug;
use webpki_roots::TLS_SERVER_ROOTS;

use crate::traits::{AdapterError, AdapterResult};

type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

/// JSON-over-HTTPS transport shared by the provider adapters.
pub(crate) struct JsonTransport {
    client: HyperClient,
    provider: &'static str,
    timeout: Duration,
}

impl JsonTransport {
    pub(crate) fn new(provider: &'static str, timeout: Duration) -> Self {
        Self {
            client: build_https_client(),
            provider,
            timeout,
        }
    }

    /// POSTs `payload` as JSON and returns the body of a 2xx response.
    pub(crate) async fn post_json<T: Serialize>(
        &self,
        endpoint: &Uri,
        bearer: Option<&str>,
        payload: &T,
    ) -> AdapterResult<Bytes> {
        let provider = self.provider;
        let body = serde_json::to_vec(payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode {provider} request: {err}"))
        })?;

        let mut builder = Request::post(endpoint.clone()).header(CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body)).map_err(|err| {
            AdapterError::transport(format!("failed to build {provider} request: {err}"))
        })?;

        debug!(provider, endpoint = %endpoint, "sending chat request");

        let response = timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| AdapterError::transport(format!("{provider} request timed out")))?
            .map_err(|err| AdapterError::transport(format!("{provider} request failed: {err}")))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let bytes = to_bytes(response.into_body()).await.map_err(|err| {
            AdapterError::transport(format!("failed to read {provider} response: {err}"))
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AdapterError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let reason = String::from_utf8_lossy(&bytes);
            return Err(AdapterError::response(format!(
                "{provider} returned {status}: {reason}"
            )));
        }

        Ok(bytes)
    }
}

fn build_https_client() -> HyperClient {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, Arc::new(config)));
    Client::builder().build::<_, Body>(connector)
}

/// Validates a provider base URL and normalises its trailing slash.
pub(crate) fn sanitize_base_url(provider: &str, input: &str) -> AdapterResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(format!(
            "{provider} base URL must start with http:// or https://"
        )));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>().map_err(|err| {
        AdapterError::configuration(format!("invalid {provider} base URL: {err}"))
    })?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_requires_scheme() {
        let err = sanitize_base_url("OpenAI", "api.openai.com").expect_err("scheme");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(
            sanitize_base_url("Ollama", " http://localhost:11434 ").unwrap(),
            "http://localhost:11434/"
        );
    }
}
