// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::{
    client::ApiClient,
    error::SdkError,
    models::{Asset, ChainData},
};

impl ApiClient {
    /// All assets supported by the organization.
    pub async fn get_assets_data(&self) -> Result<Vec<Asset>, SdkError> {
        self.get_as("/api/external/assets/").await
    }

    /// Chains the organization can hold assets on.
    pub async fn get_supported_chains(&self) -> Result<Vec<ChainData>, SdkError> {
        self.get_as("/api/external/assets/supported_chains/").await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{test_client, MockServer};
    use serde_json::json;

    #[tokio::test]
    async fn decodes_assets_and_chains() {
        let server = MockServer::start().await;
        let (client, _) = test_client(&server);
        server.respond(
            200,
            json!([{
                "name": "Ethereum",
                "symbol": "ETH",
                "blockChain": "ETHEREUM",
                "details": {"decimals": 18},
                "logoURL": "https://cdn.example.com/eth.png"
            }]),
        );
        server.respond(200, json!([{"value": "POLYGON", "label": "Polygon", "logo": ""}]));

        let assets = client.get_assets_data().await.unwrap();
        assert_eq!(assets[0].symbol, "ETH");
        assert_eq!(assets[0].logo_url.as_deref(), Some("https://cdn.example.com/eth.png"));
        assert_eq!(assets[0].token_address, None);

        let chains = client.get_supported_chains().await.unwrap();
        assert_eq!(chains[0].value, "POLYGON");

        let paths: Vec<String> = server.requests().iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            ["/api/external/assets/", "/api/external/assets/supported_chains/"]
        );
    }

    #[tokio::test]
    async fn unexpected_shape_is_invalid_response() {
        let server = MockServer::start().await;
        let (client, _) = test_client(&server);
        server.respond(200, json!({"not": "a list"}));

        let err = client.get_assets_data().await.unwrap_err();
        assert!(matches!(err, crate::error::SdkError::InvalidResponse(_)));
    }
}
