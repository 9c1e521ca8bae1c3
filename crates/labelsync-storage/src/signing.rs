//! AWS Signature Version 4 request signing
//!
//! Only the header-based flavour is implemented: the payload hash is always
//! sent as `x-amz-content-sha256` and every header passed in is signed.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Hex-encoded SHA-256 of an empty payload
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Credentials and scope used to sign requests
#[derive(Clone, Debug)]
pub struct Signer {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    service: String,
}

/// The parts of an HTTP request that take part in the signature
#[derive(Debug)]
pub struct CanonicalRequest<'a> {
    pub method: &'a str,
    /// Path without query string, e.g. `/my-bucket`
    pub path: &'a str,
    pub query: &'a [(&'a str, &'a str)],
    /// Lower-cased header names to values
    pub headers: &'a BTreeMap<String, String>,
    pub payload_sha256: &'a str,
}

impl Signer {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Signer for the `s3` service
    pub fn s3(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::new(access_key_id, secret_access_key, region, "s3")
    }

    /// Build the `Authorization` header value for a request.
    ///
    /// The `x-amz-date` header in `request.headers` must carry the same
    /// instant as `timestamp`, formatted with [`amz_date`].
    pub fn authorization(&self, request: &CanonicalRequest<'_>, timestamp: DateTime<Utc>) -> String {
        let date = timestamp.format("%Y%m%d").to_string();
        let scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);

        let signed_headers = request
            .headers
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";");

        let canonical = canonical_request(request, &signed_headers);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date(timestamp),
            scope,
            sha256_hex(canonical.as_bytes())
        );

        let k_date = hmac(format!("AWS4{}", self.secret_access_key).as_bytes(), date.as_bytes());
        let k_region = hmac(&k_date, self.region.as_bytes());
        let k_service = hmac(&k_region, self.service.as_bytes());
        let k_signing = hmac(&k_service, b"aws4_request");
        let signature = hex::encode(hmac(&k_signing, string_to_sign.as_bytes()));

        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key_id, scope, signed_headers, signature
        )
    }
}

/// Format a timestamp the way `x-amz-date` expects
pub fn amz_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Hex-encoded SHA-256 digest
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn canonical_request(request: &CanonicalRequest<'_>, signed_headers: &str) -> String {
    let uri = request
        .path
        .split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/");
    let uri = if uri.is_empty() { "/".to_string() } else { uri };

    let mut query: Vec<(String, String)> = request
        .query
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    query.sort();
    let query = query
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let headers: String = request
        .headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
        .collect();

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method, uri, query, headers, signed_headers, request.payload_sha256
    )
}

fn uri_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
