// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints.
//!
//! Transfers, contract calls and swaps are all created through
//! `POST /api/external/transactions/`; the `category` field tells them apart.
//! A created transaction starts pending approval. Poll
//! [`ApiClient::get_transaction_by_id`] to follow it to a final status.

use serde_json::{json, Value};

use super::list_path;
use crate::{
    client::ApiClient,
    error::SdkError,
    models::{
        CreateContractCallTransactionRequest, CreateTradeQuoteRequest,
        CreateTradeTransactionRequest, CreateTransferTransactionRequest, EstimateFeeRequest,
        EstimatedFeeResponse, GetTradeQuoteResponse, ReplaceTransactionRequest, Transaction,
        TransactionCategory, TransactionListResponse,
    },
};

const TRANSACTIONS_PATH: &str = "/api/external/transactions/";

impl ApiClient {
    /// One page of transactions. `filters` are appended to the query verbatim.
    pub async fn get_transactions(
        &self,
        filters: &[(&str, &str)],
        page: u32,
        limit: u32,
    ) -> Result<TransactionListResponse, SdkError> {
        let path = list_path(
            TRANSACTIONS_PATH,
            &[("page", page.to_string()), ("limit", limit.to_string())],
            filters,
        );
        self.get_as(&path).await
    }

    pub async fn get_transaction_by_id(&self, transaction_id: &str) -> Result<Transaction, SdkError> {
        self.get_as(&format!("{TRANSACTIONS_PATH}{transaction_id}/"))
            .await
    }

    pub async fn estimate_fee(&self, request: &EstimateFeeRequest) -> Result<EstimatedFeeResponse, SdkError> {
        let body = json!({
            "source": request.source,
            "destination": request.destination,
            "amount": request.amount,
            "asset": request.asset,
            "blockChain": request.chain,
            "category": TransactionCategory::Transfer.as_str(),
        });
        self.post_as(&format!("{TRANSACTIONS_PATH}estimate_fee/"), body)
            .await
    }

    pub async fn create_transfer_transaction(
        &self,
        request: &CreateTransferTransactionRequest,
    ) -> Result<Transaction, SdkError> {
        self.post_as(TRANSACTIONS_PATH, transfer_body(request)).await
    }

    /// Resubmit a stuck transaction, optionally with a new fee tier.
    pub async fn replace_transaction(&self, request: &ReplaceTransactionRequest) -> Result<Transaction, SdkError> {
        self.post_as(
            &format!("{TRANSACTIONS_PATH}replace_transaction/"),
            serde_json::to_value(request)?,
        )
        .await
    }

    pub async fn create_contract_call_transaction(
        &self,
        request: &CreateContractCallTransactionRequest,
    ) -> Result<Transaction, SdkError> {
        let body = json!({
            "vaultId": request.vault_id,
            "blockChain": request.chain,
            "amount": request.amount,
            "category": TransactionCategory::ContractCall.as_str(),
            "data": request.data,
            "externalId": request.external_id,
            "gasParams": object_or_empty(&request.gas_params)?,
            "creationOptions": request.creation_options.clone().unwrap_or_else(|| json!({})),
        });
        self.post_as(TRANSACTIONS_PATH, body).await
    }

    /// Swap quotes from the available liquidity sources.
    ///
    /// Quote parameters travel as a separate query string and are not part
    /// of the signed path.
    pub async fn get_trade_quote(&self, request: &CreateTradeQuoteRequest) -> Result<GetTradeQuoteResponse, SdkError> {
        let path = format!("{TRANSACTIONS_PATH}trade_quote/");
        let params = [
            ("vaultId", request.vault_id.as_str()),
            ("fromAsset", request.from_asset.as_str()),
            ("toAsset", request.to_asset.as_str()),
            ("fromAmount", request.from_amount.as_str()),
            ("blockChain", request.from_chain.as_str()),
            ("toBlockchain", request.to_chain.as_str()),
            ("slippage", request.slippage.as_str()),
        ];
        self.get_as_with_params(&path, &params).await
    }

    /// Execute one of the quotes returned by [`ApiClient::get_trade_quote`].
    pub async fn create_trade_transaction(
        &self,
        request: &CreateTradeTransactionRequest,
    ) -> Result<Transaction, SdkError> {
        let body = json!({
            "vaultId": request.vault_id,
            "tradeRequestData": request.trade_request_data,
            "tradeResponseData": request.trade_response_data,
            "category": TransactionCategory::Swap.as_str(),
            "blockChain": request.trade_request_data.block_chain,
            "externalId": request.external_id,
            "memo": request.memo,
        });
        self.post_as(TRANSACTIONS_PATH, body).await
    }
}

fn transfer_body(request: &CreateTransferTransactionRequest) -> Value {
    json!({
        "source": request.source,
        "destination": request.destination,
        "amount": request.amount,
        "asset": request.asset,
        "blockChain": request.chain,
        "category": TransactionCategory::Transfer.as_str(),
        "gasParams": request.gas_params.as_ref().map_or_else(|| json!({}), |gas| json!(gas)),
        "externalId": request.external_id,
        "isAutomation": request.is_automation,
        "executeAt": request.execute_at,
        "memo": request.memo,
        "feePayer": request.fee_payer,
    })
}

// Unset optional objects are sent as `{}` rather than `null`.
fn object_or_empty<T: serde::Serialize>(value: &Option<T>) -> Result<Value, SdkError> {
    match value {
        Some(value) => Ok(serde_json::to_value(value)?),
        None => Ok(json!({})),
    }
}
