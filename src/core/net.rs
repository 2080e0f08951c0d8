// src/core/net.rs
// One blocking GET per call. No retries, no custom headers beyond the User-Agent.

use reqwest::blocking::Client;

use crate::config::consts::USER_AGENT;
use crate::error::{Error, Result};

/// A finished HTTP exchange. Non-success statuses are still `Ok` here so
/// callers can decide per item whether to skip or fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can GET a URL. The pipeline only ever needs this much,
/// which keeps the stages testable without a network.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<Response>;

    /// GET and decode the body as text, failing on a non-success status.
    fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.get(url)?;
        if !resp.is_success() {
            return Err(Error::Status { status: resp.status, url: s!(url) });
        }
        Ok(String::from_utf8_lossy(&resp.body).into_owned())
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<Response> {
        logd!("GET {url}");
        let resp = self.client.get(url).send()?;
        let status = resp.status().as_u16();
        let body = resp.bytes()?.to_vec();
        logd!("GET {url} -> {status} ({} bytes)", body.len());
        Ok(Response { status, body })
    }
}
