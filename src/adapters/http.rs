use crate::domain::model::StoredObject;
use crate::domain::ports::ObjectStore;
use crate::utils::error::{ProofError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use url::Url;

/// [`ObjectStore`] backed by a running proxy: `GET /list`, `GET /{key}`, `PUT /{key}`.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: Client,
    base_url: Url,
}

impl HttpObjectStore {
    pub fn new(base_url: &str) -> Result<Self> {
        crate::utils::validation::validate_url("proxy_url", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| ProofError::ConfigError {
            message: format!("Invalid proxy URL '{}': {}", base_url, e),
        })?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segment` as one percent-encoded path segment.
    fn url_for(&self, segment: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProofError::ConfigError {
                message: format!("Proxy URL '{}' cannot be a base", self.base_url),
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }
}

/// Maps non-success statuses to the matching error kind.
async fn check_status(key: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!("Proxy answered {} for '{}': {}", status, key, body);
    Err(match status {
        StatusCode::BAD_REQUEST => ProofError::BadRequest {
            message: if body.is_empty() {
                "rejected by proxy".to_string()
            } else {
                body
            },
        },
        StatusCode::NOT_FOUND => ProofError::NotFound {
            key: key.to_string(),
        },
        StatusCode::CONFLICT => ProofError::Conflict {
            key: key.to_string(),
        },
        other => ProofError::UploadFailed {
            status: Some(other.as_u16()),
            message: format!("proxy returned {}", other),
        },
    })
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn list(&self) -> Result<Vec<String>> {
        let url = self.url_for("list")?;
        tracing::debug!("Listing objects from {}", url);
        let response = check_status("list", self.client.get(url).send().await?).await?;
        let mut keys: Vec<String> = response.json().await?;
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        let url = self.url_for(key)?;
        tracing::debug!("Fetching {}", url);
        let response = check_status(key, self.client.get(url).send().await?).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(StoredObject {
            key: key.to_string(),
            bytes,
            content_type,
        })
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<()> {
        let url = self.url_for(key)?;
        tracing::debug!("Uploading {} bytes to {}", bytes.len(), url);

        let mut request = self.client.put(url).body(bytes);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }

        let response = request.send().await.map_err(|e| ProofError::UploadFailed {
            status: None,
            message: e.to_string(),
        })?;
        check_status(key, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_single_encoded_segments() {
        let store = HttpObjectStore::new("http://localhost:8787/proofs/").unwrap();
        assert_eq!(
            store.url_for("123_Jane Doe.svg").unwrap().as_str(),
            "http://localhost:8787/proofs/123_Jane%20Doe.svg"
        );

        let root = HttpObjectStore::new("http://localhost:8787").unwrap();
        assert_eq!(root.url_for("list").unwrap().as_str(), "http://localhost:8787/list");
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(HttpObjectStore::new("ftp://example.com").is_err());
    }
}
