// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claims carried by the request auth token.

use serde::{Deserialize, Serialize};

/// JOSE header of every auth token.
pub const TOKEN_ALGORITHM: &str = "ES256";
pub const TOKEN_TYPE: &str = "JWT";

/// Payload of the bearer token attached to each request.
///
/// Serialized with sorted keys, so the wire order is
/// `body, exp, iat, urlPath, userId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestClaims {
    /// Hex SHA-256 of the canonical request body.
    pub body: String,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,

    /// Issued at timestamp (Unix seconds)
    pub iat: i64,

    /// Request path exactly as sent, including any inline query string
    #[serde(rename = "urlPath")]
    pub url_path: String,

    /// API key of the calling API user
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl RequestClaims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_use_camel_case_wire_names() {
        let claims = RequestClaims {
            body: "digest".to_string(),
            exp: 1_700_000_300,
            iat: 1_700_000_000,
            url_path: "/api/external/vaults/".to_string(),
            user_id: "api-key".to_string(),
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["urlPath"], "/api/external/vaults/");
        assert_eq!(value["userId"], "api-key");
        assert!(value.get("url_path").is_none());
    }

    #[test]
    fn expiry_is_inclusive() {
        let claims = RequestClaims {
            body: String::new(),
            exp: 100,
            iat: 0,
            url_path: String::new(),
            user_id: String::new(),
        };
        assert!(!claims.is_expired_at(99));
        assert!(claims.is_expired_at(100));
    }
}
