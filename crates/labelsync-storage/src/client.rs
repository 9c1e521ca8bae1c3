//! Main client implementation

use crate::{
    signing::{amz_date, sha256_hex, CanonicalRequest, Signer},
    types::*,
    Config, Result, StorageError,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use chrono::Utc;
use md5::{Digest, Md5};
use reqwest::{header, Client, Method, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use url::Url;

/// S3-compatible object storage client
pub struct ObjectStorageClient {
    config: Config,
    signer: Signer,
    http: Client,
}

impl ObjectStorageClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        if config.access_key_id.is_empty() || config.secret_access_key.is_empty() {
            return Err(StorageError::Config(
                "access key id and secret access key are required".to_string(),
            ));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| StorageError::Config(format!("invalid user agent: {}", e)))?,
        );

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let signer = Signer::s3(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            config.region.clone(),
        );

        Ok(Self {
            config,
            signer,
            http,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Bucket Operations ====================

    /// List all buckets owned by the credentials
    #[instrument(skip(self))]
    pub async fn list_buckets(&self) -> Result<ListBucketsResult> {
        let response = self.request(Method::GET, "/", &[], BTreeMap::new(), None).await?;
        let text = response.text().await?;
        parse_list_buckets_response(&text)
    }

    /// Create a bucket
    #[instrument(skip(self, options))]
    pub async fn create_bucket(&self, bucket: &str, options: &CreateBucketOptions) -> Result<()> {
        let mut headers = BTreeMap::new();
        if let Some(acl) = &options.acl {
            headers.insert("x-amz-acl".to_string(), acl.clone());
        }

        let body = match &options.location_constraint {
            Some(location) => Some(to_xml(
                "CreateBucketConfiguration",
                &CreateBucketConfiguration {
                    location_constraint: location.clone(),
                },
            )?),
            None => None,
        };

        let path = format!("/{}", bucket);
        self.request(Method::PUT, &path, &[], headers, body).await?;
        Ok(())
    }

    /// Replace the bucket's CORS configuration
    #[instrument(skip(self, cors))]
    pub async fn put_bucket_cors(&self, bucket: &str, cors: &CorsConfiguration) -> Result<()> {
        let body = to_xml("CORSConfiguration", cors)?;
        let path = format!("/{}", bucket);
        self.request(Method::PUT, &path, &[("cors", "")], content_md5(&body), Some(body))
            .await?;
        Ok(())
    }

    /// Set the bucket's versioning state
    #[instrument(skip(self))]
    pub async fn put_bucket_versioning(&self, bucket: &str, status: VersioningStatus) -> Result<()> {
        let body = to_xml(
            "VersioningConfiguration",
            &VersioningConfiguration {
                status: status.as_str(),
            },
        )?;
        let path = format!("/{}", bucket);
        self.request(Method::PUT, &path, &[("versioning", "")], content_md5(&body), Some(body))
            .await?;
        Ok(())
    }

    // ==================== Helper Methods ====================

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        extra_headers: BTreeMap<String, String>,
        body: Option<Bytes>,
    ) -> Result<Response> {
        let mut url = Url::parse(&format!("{}{}", self.config.base_url(), path))
            .map_err(|e| StorageError::Config(format!("invalid endpoint: {}", e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(StorageError::Config(format!("endpoint has no host: {}", url)))
            }
        };

        let now = Utc::now();
        let payload_sha256 = sha256_hex(body.as_deref().unwrap_or_default());

        let mut headers = extra_headers;
        headers.insert("host".to_string(), host);
        headers.insert("x-amz-content-sha256".to_string(), payload_sha256.clone());
        headers.insert("x-amz-date".to_string(), amz_date(now));

        let authorization = self.signer.authorization(
            &CanonicalRequest {
                method: method.as_str(),
                path,
                query,
                headers: &headers,
                payload_sha256: &payload_sha256,
            },
            now,
        );

        let mut req = self.http.request(method.clone(), url.clone());
        // reqwest derives Host from the URL itself
        for (name, value) in headers.iter().filter(|(name, _)| name.as_str() != "host") {
            req = req.header(name.as_str(), value.as_str());
        }
        req = req.header(header::AUTHORIZATION, authorization);

        if let Some(data) = body {
            req = req.body(data);
        }

        debug!("Sending {} request to {}", method, url);
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StorageError::from_s3_xml(&text, status.as_u16()));
        }

        Ok(response)
    }
}

// ==================== Body Helpers ====================

fn to_xml<T: Serialize>(root: &str, value: &T) -> Result<Bytes> {
    quick_xml::se::to_string_with_root(root, value)
        .map(Bytes::from)
        .map_err(|e| StorageError::XmlEncode(e.to_string()))
}

fn content_md5(body: &[u8]) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("content-md5".to_string(), STANDARD.encode(Md5::digest(body)));
    headers
}

fn parse_list_buckets_response(xml: &str) -> Result<ListBucketsResult> {
    let parsed: ListAllMyBucketsResult =
        quick_xml::de::from_str(xml).map_err(|e| StorageError::XmlParse(e.to_string()))?;

    Ok(ListBucketsResult {
        buckets: parsed.buckets.bucket.into_iter().map(Bucket::from).collect(),
    })
}
