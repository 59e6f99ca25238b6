use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{CatalogError, Result};

/// Authenticated handle on one Google REST service.
#[derive(Debug, Clone)]
pub(crate) struct ServiceHandle {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl ServiceHandle {
    pub(crate) fn new(http: Client, base_url: &str, access_token: String) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidArgument(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        Ok(ServiceHandle {
            http,
            base_url,
            access_token,
        })
    }

    /// Build an endpoint URL, percent-encoding every segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.http.request(method, url).bearer_auth(&self.access_token)
    }
}

/// Turn a non-success response into [`CatalogError::Api`].
///
/// Google services wrap failures as `{"error": {"code", "message", "status"}}`;
/// the message is taken from there when present, otherwise the raw body is
/// used.
pub(crate) fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);

    Err(CatalogError::Api {
        status: status.as_u16(),
        message,
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body: Value = check_status(response)?.json()?;
    debug!("{:?}", body);
    Ok(serde_json::from_value(body)?)
}
