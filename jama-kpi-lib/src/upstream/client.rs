//! Jama Connect REST client
//!
//! Minimal client for the two endpoints the report needs: saved filter results and users.
//! Authenticates once with the OAuth client-credentials flow and sends the resulting bearer
//! token on every request.

use super::{FilterSource, UserLookup};
use crate::Result;
use crate::records::Record;
use crate::users::UserId;
use core::fmt::{Debug, Formatter};
use ohno::{EnrichableExt, IntoAppError, app_err};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

const LOG_TARGET: &str = "  upstream";
const USER_AGENT: &str = "jama-kpi";

/// Largest page the Jama REST API hands out.
pub const MAX_PAGE_SIZE: u32 = 50;

/// OAuth client credentials for the Jama API.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// One page of a list endpoint.
#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    data: Vec<Record>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    total_results: u64,
}

/// A single-item response.
#[derive(Debug, Deserialize)]
struct Item {
    data: Record,
}

/// Authenticated Jama REST client.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    api_url: Url,
    page_size: u32,
}

impl Client {
    /// Authenticate against `host` and return a client ready to issue API calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the token request fails or is rejected.
    pub async fn connect(host: &Url, credentials: &Credentials, page_size: u32) -> Result<Self> {
        let root = host.as_str().trim_end_matches('/');
        let token_url = Url::parse(&format!("{root}/rest/oauth/token")).into_app_err_with(|| format!("invalid host '{host}'"))?;
        let api_url = Url::parse(&format!("{root}/rest/v1/")).into_app_err_with(|| format!("invalid host '{host}'"))?;

        let token = fetch_token(&token_url, credentials)
            .await
            .map_err(|e| e.enrich_with(|| format!("authenticating with '{host}'")))?;

        let mut auth_val = HeaderValue::from_str(&format!("Bearer {token}"))?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).default_headers(headers).build()?;

        log::debug!(target: LOG_TARGET, "Authenticated with {host}");

        Ok(Self {
            client,
            api_url,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    /// Base URL of the REST API (ends in `/rest/v1/`).
    #[must_use]
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url.join(path).into_app_err_with(|| format!("invalid API path '{path}'"))
    }

    async fn fetch_page(&self, path: &str, start_at: u64) -> Result<Page> {
        let mut url = self.endpoint(path)?;
        let _ = url
            .query_pairs_mut()
            .append_pair("startAt", &start_at.to_string())
            .append_pair("maxResults", &self.page_size.to_string());

        log::debug!(target: LOG_TARGET, "GET {url}");

        let page = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .into_app_err_with(|| format!("requesting '{url}'"))?
            .json::<Page>()
            .await
            .into_app_err_with(|| format!("decoding response from '{url}'"))?;

        Ok(page)
    }
}

impl FilterSource for Client {
    async fn get_filter_results(&self, filter_id: u32) -> Result<Vec<Record>> {
        let path = format!("filters/{filter_id}/results");
        let mut records = Vec::new();

        loop {
            let page = self
                .fetch_page(&path, records.len() as u64)
                .await
                .map_err(|e| e.enrich_with(|| format!("fetching results of filter {filter_id}")))?;

            let total = page.meta.page_info.map(|info| info.total_results);
            let fetched = page.data.len();
            records.extend(page.data);

            log::debug!(target: LOG_TARGET, "Filter {filter_id}: {} of {} item(s)", records.len(), total.map_or_else(|| "?".to_string(), |t| t.to_string()));

            let done = total.is_none_or(|total| records.len() as u64 >= total);

            if fetched == 0 || done {
                break;
            }
        }

        Ok(records)
    }
}

impl UserLookup for Client {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<Record>> {
        let url = self.endpoint(&format!("users/{user_id}"))?;

        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = self.client.get(url.clone()).send().await.into_app_err_with(|| format!("requesting '{url}'"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let item = resp
            .error_for_status()
            .into_app_err_with(|| format!("requesting '{url}'"))?
            .json::<Item>()
            .await
            .into_app_err_with(|| format!("decoding response from '{url}'"))?;

        Ok(Some(item.data))
    }
}

async fn fetch_token(token_url: &Url, credentials: &Credentials) -> Result<String> {
    let resp = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()?
        .post(token_url.clone())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("grant_type=client_credentials")
        .send()
        .await
        .into_app_err("requesting OAuth token")?;

    let status = resp.status();
    if !status.is_success() {
        return Err(app_err!("OAuth token request was rejected with HTTP status {status}"));
    }

    let token: TokenResponse = resp.json().await.into_app_err("decoding OAuth token response")?;
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserialize() {
        let json = r#"{
            "meta": {"status": "OK", "pageInfo": {"startIndex": 0, "resultCount": 2, "totalResults": 7}},
            "links": {},
            "data": [{"id": 1}, {"id": 2}]
        }"#;

        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.page_info.unwrap().total_results, 7);
    }

    #[test]
    fn test_page_deserialize_without_meta() {
        let page: Page = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.data.is_empty());
        assert!(page.meta.page_info.is_none());
    }

    #[test]
    fn test_item_deserialize() {
        let json = r#"{"meta": {"status": "OK"}, "data": {"id": 5, "firstName": "Alice"}}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.data.find_text("firstName").as_deref(), Some("Alice"));
    }

    #[test]
    fn test_token_deserialize() {
        let json = r#"{"access_token": "abc", "token_type": "bearer", "expires_in": 3600}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "abc");
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials {
            client_id: "id".into(),
            client_secret: "hunter2".into(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("id"));
        assert!(!debug.contains("hunter2"));
    }
}
