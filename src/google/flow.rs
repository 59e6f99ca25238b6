use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use log::{debug, info};
use rand::Rng;
use sha2::{Digest, Sha256};
use reqwest::blocking::Client;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use url::Url;

use super::credentials::{request_token, ClientSecrets, Credentials, TokenEndpointError};
use crate::error::{CatalogError, Result};

const SUCCESS_PAGE: &str =
    "The authentication flow has completed. You may close this window.";
const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Obtains fresh credentials when no usable cached token exists
pub trait AuthorizationFlow {
    fn authorize(
        &self,
        http: &Client,
        secrets: &ClientSecrets,
        scopes: &[&str],
    ) -> Result<Credentials>;
}

/// Installed-application flow with a loopback redirect.
///
/// Binds a local listener, prints the consent URL, waits for the browser to
/// be redirected back with an authorization code and exchanges it for
/// tokens.
#[derive(Debug, Clone)]
pub struct InstalledAppFlow {
    host: String,
    /// 0 picks a free port
    port: u16,
}

impl Default for InstalledAppFlow {
    fn default() -> Self {
        InstalledAppFlow {
            host: "localhost".to_string(),
            port: 0,
        }
    }
}

impl InstalledAppFlow {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        InstalledAppFlow {
            host: host.into(),
            port,
        }
    }
}

impl AuthorizationFlow for InstalledAppFlow {
    fn authorize(
        &self,
        http: &Client,
        secrets: &ClientSecrets,
        scopes: &[&str],
    ) -> Result<Credentials> {
        let listener = TcpListener::bind((self.host.as_str(), self.port))?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://{}:{}/", self.host, port);

        let state = random_token(24);
        let code_verifier = random_token(48);
        let url = authorization_url(secrets, scopes, &redirect_uri, &state, &code_verifier)?;

        info!("Waiting for authorization on {}", redirect_uri);
        println!("Please visit this URL to authorize this application: {}", url);

        // browsers also open preconnects and ask for /favicon.ico
        let request_line = loop {
            let (mut stream, _) = listener.accept()?;
            let mut request_line = String::new();
            BufReader::new(&stream).read_line(&mut request_line)?;

            if !is_redirect(&request_line) {
                debug!("Ignoring request on loopback: {:?}", request_line.trim_end());
                stream.write_all(NOT_FOUND.as_bytes())?;
                stream.flush()?;
                continue;
            }

            debug!("Authorization redirect: {}", request_line.trim_end());
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                SUCCESS_PAGE.len(),
                SUCCESS_PAGE
            )?;
            stream.flush()?;
            break request_line;
        };

        let code = parse_redirect(&request_line, &state)?;

        let grant = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("code_verifier", code_verifier.as_str()),
        ];
        let token = request_token(http, &secrets.token_uri, &grant).map_err(|e| match e {
            TokenEndpointError::Rejected(msg) => CatalogError::Authorization(msg),
            TokenEndpointError::Other(e) => e,
        })?;

        let mut credentials = Credentials {
            token: None,
            refresh_token: None,
            token_uri: secrets.token_uri.clone(),
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            expiry: None,
        };
        token.apply(&mut credentials, Utc::now());
        info!("Authorization completed");
        Ok(credentials)
    }
}

fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill(bytes.as_mut_slice());
    URL_SAFE_NO_PAD.encode(bytes)
}

/// PKCE `S256` challenge: base64url of the SHA-256 of the verifier.
fn code_challenge(code_verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes()))
}

/// Consent page URL with an `S256` PKCE challenge.
pub(crate) fn authorization_url(
    secrets: &ClientSecrets,
    scopes: &[&str],
    redirect_uri: &str,
    state: &str,
    code_verifier: &str,
) -> Result<Url> {
    let mut url = Url::parse(&secrets.auth_uri)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &secrets.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &scopes.join(" "))
        .append_pair("state", state)
        .append_pair("code_challenge", &code_challenge(code_verifier))
        .append_pair("code_challenge_method", "S256")
        .append_pair("access_type", "offline");
    Ok(url)
}

/// Whether a loopback request carries the consent outcome, i.e. a `code` or
/// an `error` in its query. Anything else is a stray browser request.
pub(crate) fn is_redirect(request_line: &str) -> bool {
    let Some(target) = request_line.split_whitespace().nth(1) else {
        return false;
    };
    let Ok(url) = Url::parse("http://localhost").and_then(|base| base.join(target)) else {
        return false;
    };
    let found = url
        .query_pairs()
        .any(|(key, _)| key == "code" || key == "error");
    found
}

/// Extract the authorization code from the redirect request line
/// (`GET /?state=..&code=.. HTTP/1.1`).
pub(crate) fn parse_redirect(request_line: &str, expected_state: &str) -> Result<String> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| CatalogError::Authorization("malformed redirect request".to_string()))?;
    let url = Url::parse("http://localhost")?.join(target)?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(CatalogError::Authorization(format!(
                    "consent denied: {}",
                    value
                )))
            }
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(CatalogError::Authorization(
            "state mismatch in authorization redirect".to_string(),
        ));
    }
    code.ok_or_else(|| CatalogError::Authorization("no code in authorization redirect".to_string()))
}
