// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vault endpoints.
//!
//! New vaults generate their wallet addresses asynchronously; poll
//! [`ApiClient::get_vault_by_id`] until `wallets_generated` is set.

use serde_json::Value;

use super::{flag, list_path};
use crate::{
    client::ApiClient,
    error::SdkError,
    models::{BalanceResponse, CreateVaultRequest, Vault, VaultListResponse},
};

const VAULTS_PATH: &str = "/api/external/vaults/";

impl ApiClient {
    /// One page of vaults. `filters` are appended to the query verbatim.
    pub async fn get_vaults(
        &self,
        filters: &[(&str, &str)],
        page: u32,
        limit: u32,
        reverse: bool,
    ) -> Result<VaultListResponse, SdkError> {
        let path = list_path(
            VAULTS_PATH,
            &[
                ("limit", limit.to_string()),
                ("page", page.to_string()),
                ("reverse", flag(reverse).to_string()),
            ],
            filters,
        );
        self.get_as(&path).await
    }

    pub async fn get_vault_by_id(&self, vault_id: &str) -> Result<Vault, SdkError> {
        self.get_as(&format!("{VAULTS_PATH}{vault_id}/")).await
    }

    pub async fn create_vault(&self, request: &CreateVaultRequest) -> Result<Vault, SdkError> {
        self.post_as(VAULTS_PATH, serde_json::to_value(request)?).await
    }

    /// Balances keyed by asset symbol, then chain.
    pub async fn get_balances(&self, vault_id: &str) -> Result<BalanceResponse, SdkError> {
        self.get_as(&format!("{VAULTS_PATH}{vault_id}/balances/")).await
    }

    pub async fn get_detailed_balances(&self, vault_id: &str) -> Result<Vec<Value>, SdkError> {
        self.get_as(&format!("{VAULTS_PATH}{vault_id}/detailed_balances/"))
            .await
    }

    /// Ask the server to refresh balances from chain.
    pub async fn update_balances(&self, vault_id: &str) -> Result<Value, SdkError> {
        self.post(&format!("{VAULTS_PATH}{vault_id}/update_balances/"), None)
            .await
    }
}
