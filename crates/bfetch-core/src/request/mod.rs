//! The single download request built from process inputs.
//!
//! Validates the URL scheme and rejects empty inputs up front so that every
//! later failure is either a network or a filesystem problem.

mod destination;

pub use destination::resolve_destination;

use crate::error::{FetchError, Result};
use std::fmt;

/// Bearer credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(FetchError::EmptyToken);
        }
        Ok(AuthToken(token))
    }

    /// Value for the `Authorization` header: `Bearer <token>`.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// URL, destination filename, and token for one invocation.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    url: url::Url,
    filename: String,
    token: AuthToken,
}

impl DownloadRequest {
    /// Build a request. The URL must parse and use `http` or `https`.
    pub fn new(url: &str, filename: &str, token: &str) -> Result<Self> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(FetchError::InvalidUrl {
                    url: url.to_string(),
                    reason: format!("unsupported scheme {other:?}, expected http or https"),
                })
            }
        }
        if filename.is_empty() {
            return Err(FetchError::InvalidFilename {
                filename: String::new(),
                reason: "filename is empty",
            });
        }
        Ok(DownloadRequest {
            url: parsed,
            filename: filename.to_string(),
            token: AuthToken::new(token)?,
        })
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builds_bearer_header() {
        let t = AuthToken::new("abc123").unwrap();
        assert_eq!(t.header_value(), "Bearer abc123");
    }

    #[test]
    fn token_debug_is_redacted() {
        let req = DownloadRequest::new("https://example.test/a.bin", "a.bin", "s3cr3t").unwrap();
        let dbg = format!("{:?}", req);
        assert!(!dbg.contains("s3cr3t"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(DownloadRequest::new("http://127.0.0.1:8080/x", "x", "t").is_ok());
        assert!(DownloadRequest::new("https://example.test/artifact.bin", "artifact.bin", "t").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        let err = DownloadRequest::new("ftp://example.test/a", "a", "t").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invocation);
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = DownloadRequest::new("not a url", "a", "t").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_empty_inputs() {
        assert!(matches!(
            DownloadRequest::new("https://example.test/a", "", "t"),
            Err(FetchError::InvalidFilename { .. })
        ));
        assert!(matches!(
            DownloadRequest::new("https://example.test/a", "a", ""),
            Err(FetchError::EmptyToken)
        ));
    }

    #[test]
    fn token_is_kept_verbatim() {
        let req = DownloadRequest::new("https://example.test/a", "a", " spaced token ").unwrap();
        assert_eq!(req.token().expose(), " spaced token ");
    }
}
