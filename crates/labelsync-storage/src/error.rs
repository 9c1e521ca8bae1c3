//! Client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, StorageError>;

/// Object storage client errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// S3 API error returned by the endpoint
    #[error("S3 error ({code}): {message}")]
    S3 {
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Request body could not be encoded
    #[error("XML encoding error: {0}")]
    XmlEncode(String),

    /// Response body could not be decoded
    #[error("XML parsing error: {0}")]
    XmlParse(String),
}

impl StorageError {
    /// Parse an S3 error from an XML response body
    pub fn from_s3_xml(xml: &str, status: u16) -> Self {
        let code = extract_xml_element(xml, "Code").unwrap_or_else(|| format!("HTTP{}", status));
        let message =
            extract_xml_element(xml, "Message").unwrap_or_else(|| "Unknown error".to_string());
        let request_id = extract_xml_element(xml, "RequestId");

        Self::S3 {
            code,
            message,
            request_id,
        }
    }

    /// The S3 error code, if this is an API error
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::S3 { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Check if this is an access denied error
    pub fn is_access_denied(&self) -> bool {
        matches!(self.code(), Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"))
    }
}

fn extract_xml_element(xml: &str, element: &str) -> Option<String> {
    let start_tag = format!("<{}>", element);
    let end_tag = format!("</{}>", element);

    let start = xml.find(&start_tag)? + start_tag.len();
    let end = xml[start..].find(&end_tag)? + start;

    if start < end {
        Some(xml[start..end].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_error() {
        let xml = r#"<?xml version="1.0"?>
<Error>
    <Code>BucketAlreadyOwnedByYou</Code>
    <Message>Your previous request to create the named bucket succeeded.</Message>
    <RequestId>abc123</RequestId>
</Error>"#;

        let error = StorageError::from_s3_xml(xml, 409);

        match error {
            StorageError::S3 {
                code,
                message,
                request_id,
            } => {
                assert_eq!(code, "BucketAlreadyOwnedByYou");
                assert_eq!(
                    message,
                    "Your previous request to create the named bucket succeeded."
                );
                assert_eq!(request_id, Some("abc123".to_string()));
            }
            _ => panic!("Expected S3 error"),
        }
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let error = StorageError::from_s3_xml("", 403);
        assert_eq!(error.code(), Some("HTTP403"));
        assert!(!error.is_access_denied());

        let denied = StorageError::from_s3_xml("<Error><Code>AccessDenied</Code></Error>", 403);
        assert!(denied.is_access_denied());
    }
}
