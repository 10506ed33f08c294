use crate::core::filename::check_key;
use crate::domain::model::StoredObject;
use crate::domain::ports::ObjectStore;
use crate::utils::error::{ProofError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3Store {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    /// Builds a client from the default credential chain. `endpoint_url` targets
    /// S3-compatible services and switches to path-style addressing.
    pub async fn connect(
        bucket: String,
        prefix: String,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(region) = region {
            builder = builder.region(Region::new(region));
        }
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!("Using S3 bucket '{}' (prefix '{}')", bucket, prefix);
        Self::new(S3Client::from_conf(builder.build()), bucket, prefix)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ProofError::Storage {
                message: format!("Failed to list S3 objects: {}", e),
            })?;
            for object in page.contents() {
                if let Some(key) = object.key().and_then(|k| k.strip_prefix(&self.prefix)) {
                    if !key.is_empty() {
                        keys.push(key.to_string());
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        check_key(key)?;
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                return Err(match err.into_service_error() {
                    GetObjectError::NoSuchKey(_) => ProofError::NotFound {
                        key: key.to_string(),
                    },
                    other => ProofError::Storage {
                        message: format!("Failed to read from S3: {}", other),
                    },
                })
            }
        };

        let content_type = resp.content_type().map(str::to_string);
        let data = resp.body.collect().await.map_err(|e| ProofError::Storage {
            message: format!("Failed to collect S3 data: {}", e),
        })?;

        Ok(StoredObject {
            key: key.to_string(),
            bytes: data.into_bytes().to_vec(),
            content_type,
        })
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<()> {
        check_key(key)?;
        // If-None-Match makes the write a conditional create on the S3 side.
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .set_content_type(content_type.map(str::to_string))
            .if_none_match("*")
            .body(ByteStream::from(bytes))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let status = err.raw_response().map(|r| r.status().as_u16());
                let conflict = matches!(status, Some(409) | Some(412))
                    || matches!(
                        err.code(),
                        Some("PreconditionFailed") | Some("ConditionalRequestConflict")
                    );
                if conflict {
                    Err(ProofError::Conflict {
                        key: key.to_string(),
                    })
                } else {
                    Err(ProofError::Storage {
                        message: format!("Failed to write to S3: {}", err),
                    })
                }
            }
        }
    }
}
