use std::borrow::Cow;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::credentials::Credentials;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl ApiClient {
    pub fn new(creds: &Credentials) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: creds.server_url.trim_end_matches('/').to_string(),
            token: creds.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()?;
        handle_response(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()?;
        handle_response(resp)
    }

    pub fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .client
            .patch(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()?;
        handle_response(resp)
    }

    pub fn delete(&self, path: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(error_from(resp))
        }
    }
}

/// Percent-encodes a user-supplied id for use as one path segment.
#[must_use]
pub fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id.trim())
}

fn handle_response<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> anyhow::Result<T> {
    if resp.status().is_success() {
        let api_resp: ApiResponse<T> = resp.json()?;
        api_resp
            .data
            .ok_or_else(|| anyhow::anyhow!("Server returned an empty response"))
    } else {
        Err(error_from(resp))
    }
}

fn error_from(resp: reqwest::blocking::Response) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ApiResponse<()>>() {
        Ok(api_resp) => anyhow::anyhow!(
            api_resp
                .error
                .unwrap_or_else(|| "Server error (no details provided)".into())
        ),
        Err(_) => anyhow::anyhow!("Server returned {status}"),
    }
}
