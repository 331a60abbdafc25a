//! `window.location` components derived from the document URL.

use serde::Serialize;
use url::Url;

use mockview_common::DomError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationParts {
    pub href: String,
    pub origin: String,
    pub protocol: String,
    pub host: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl LocationParts {
    pub fn parse(raw: &str) -> Result<Self, DomError> {
        let url = Url::parse(raw).map_err(|e| DomError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        let hostname = url.host_str().unwrap_or_default().to_string();
        let host = match url.port() {
            Some(port) => format!("{hostname}:{port}"),
            None => hostname.clone(),
        };

        Ok(Self {
            href: url.as_str().to_string(),
            origin: url.origin().ascii_serialization(),
            protocol: format!("{}:", url.scheme()),
            host,
            hostname,
            port: url.port().map(|p| p.to_string()).unwrap_or_default(),
            pathname: url.path().to_string(),
            search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
            hash: url.fragment().map(|f| format!("#{f}")).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_http_url() {
        let parts = LocationParts::parse("http://app.test:8080/a/b?x=1#top").unwrap();
        assert_eq!(parts.href, "http://app.test:8080/a/b?x=1#top");
        assert_eq!(parts.origin, "http://app.test:8080");
        assert_eq!(parts.protocol, "http:");
        assert_eq!(parts.host, "app.test:8080");
        assert_eq!(parts.hostname, "app.test");
        assert_eq!(parts.port, "8080");
        assert_eq!(parts.pathname, "/a/b");
        assert_eq!(parts.search, "?x=1");
        assert_eq!(parts.hash, "#top");
    }

    #[test]
    fn about_blank_has_opaque_origin() {
        let parts = LocationParts::parse("about:blank").unwrap();
        assert_eq!(parts.href, "about:blank");
        assert_eq!(parts.origin, "null");
        assert_eq!(parts.protocol, "about:");
        assert!(parts.host.is_empty());
    }

    #[test]
    fn rejects_relative_url() {
        let err = LocationParts::parse("/relative/path").unwrap_err();
        assert!(matches!(err, DomError::InvalidUrl { ref url, .. } if url == "/relative/path"));
    }
}
