//! Client identity used as the rate-limit key.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};
use std::net::IpAddr;

/// Who a request is counted against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity {
    ip: IpAddr,
    key: String,
}

impl ClientIdentity {
    /// Derives the identity of a request from `peer`.
    ///
    /// With `use_auth_identity` and an `Authorization` header, the key is
    /// `principal:<sha256 of the header, hex>`, so credentials are never kept.
    /// Otherwise the key is the peer address.
    pub fn resolve(peer: IpAddr, headers: &HeaderMap, use_auth_identity: bool) -> Self {
        let principal = use_auth_identity
            .then(|| headers.get(header::AUTHORIZATION))
            .flatten()
            .map(|value| format!("principal:{:x}", Sha256::digest(value.as_bytes())));

        Self {
            ip: peer,
            key: principal.unwrap_or_else(|| peer.to_string()),
        }
    }

    /// Peer address.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Rate-limit key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_address_is_default_key() {
        let ip: IpAddr = "10.0.0.7".parse().unwrap();
        let identity = ClientIdentity::resolve(ip, &bearer("secret"), false);
        assert_eq!(identity.key(), "10.0.0.7");
    }

    #[test]
    fn test_principal_key_hides_credentials() {
        let ip: IpAddr = "10.0.0.7".parse().unwrap();
        let identity = ClientIdentity::resolve(ip, &bearer("secret"), true);
        assert!(identity.key().starts_with("principal:"));
        assert!(!identity.key().contains("secret"));
        assert_eq!(identity.key().len(), "principal:".len() + 64);

        let same = ClientIdentity::resolve("10.0.0.8".parse().unwrap(), &bearer("secret"), true);
        assert_eq!(identity.key(), same.key());
    }

    #[test]
    fn test_missing_header_falls_back_to_address() {
        let ip: IpAddr = "::1".parse().unwrap();
        let identity = ClientIdentity::resolve(ip, &HeaderMap::new(), true);
        assert_eq!(identity.key(), "::1");
    }
}
