// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response shapes for the PrimeVault external API. Wire names
//! are camelCase; Rust fields are snake_case.
//!
//! Status-like fields are kept as plain strings on responses so new values
//! from the server never break decoding. The enums below are for building
//! requests and for comparisons such as `tx.status == TransactionStatus::Completed.as_str()`.
//!
//! ## Model Categories
//!
//! - **Assets**: supported assets and chains
//! - **Vaults**: vaults, wallets, balances
//! - **Transactions**: transfers, contract calls, trades, fee estimates
//! - **Contacts**: whitelisted counterparties

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// =============================================================================
// Enums
// =============================================================================

wire_enum!(
    /// Kind of party on either side of a transfer.
    TransferPartyType {
        Contact => "CONTACT",
        Vault => "VAULT",
        ExternalAddress => "EXTERNAL_ADDRESS",
    }
);

wire_enum!(
    VaultType {
        Exchange => "EXCHANGE",
        Default => "DEFAULT",
        Gas => "GAS",
    }
);

wire_enum!(
    ContactStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Declined => "DECLINED",
    }
);

wire_enum!(
    TransactionType {
        Incoming => "INCOMING",
        Outgoing => "OUTGOING",
    }
);

wire_enum!(
    TransactionCategory {
        Transfer => "TRANSFER",
        Swap => "SWAP",
        ContractCall => "CONTRACT_CALL",
    }
);

wire_enum!(
    TransactionSubCategory {
        IncomingTransfer => "INCOMING_TRANSFER",
        ExternalTransfer => "EXTERNAL_TRANSFER",
        InternalTransfer => "INTERNAL_TRANSFER",
        LimitTrade => "LIMIT_TRADE",
        MarketTrade => "MARKET_TRADE",
        ApproveTokenAllowance => "APPROVE_TOKEN_ALLOWANCE",
    }
);

wire_enum!(
    /// Lifecycle of a transaction. `Completed`, `Failed` and `Declined` are final.
    TransactionStatus {
        Draft => "DRAFT",
        Pending => "PENDING",
        Approved => "APPROVED",
        Completed => "COMPLETED",
        Failed => "FAILED",
        Declined => "DECLINED",
        Submitted => "SUBMITTED",
        WaitingConfirmation => "WAITING_CONFIRMATION",
    }
);

impl TransactionStatus {
    /// Whether a transaction in this status can still change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed | TransactionStatus::Failed | TransactionStatus::Declined
        )
    }
}

wire_enum!(
    TransactionFeeTier {
        High => "HIGH",
        Medium => "MEDIUM",
        Low => "LOW",
    }
);

// =============================================================================
// Assets
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    pub symbol: String,
    pub block_chain: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default, rename = "logoURL")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub token_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainData {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub logo: String,
}

// =============================================================================
// Vaults
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub blockchain: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub id: String,
    #[serde(default)]
    pub org_id: String,
    pub vault_name: String,
    #[serde(default)]
    pub vault_type: String,
    #[serde(default)]
    pub wallets: Vec<Wallet>,
    #[serde(default)]
    pub signers: Vec<User>,
    #[serde(default)]
    pub viewers: Vec<User>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub is_deleted: bool,
    /// Set once wallet addresses exist for every chain.
    #[serde(default)]
    pub wallets_generated: Option<bool>,
}

/// Body of `POST /api/external/vaults/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVaultRequest {
    pub vault_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_transfer_spend_limit: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_trade_spend_limit: Option<Value>,
    /// Vault template configured in the PrimeVault UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

/// Balances keyed by asset symbol, then chain.
pub type BalanceResponse = HashMap<String, HashMap<String, Value>>;

// =============================================================================
// Contacts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(default)]
    pub org_id: String,
    pub name: String,
    pub block_chain: String,
    pub address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_smart_contract_address: bool,
    #[serde(default)]
    pub created_by_id: String,
    #[serde(default)]
    pub is_sanctioned: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub operation_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub address: String,
    pub chain: String,
    pub tags: Option<Vec<String>>,
    pub external_id: Option<String>,
}

// =============================================================================
// Transactions
// =============================================================================

/// One side of a transfer: a vault, a contact, or a raw address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPartyData {
    #[serde(rename = "type")]
    pub party_type: TransferPartyType,
    pub id: Option<String>,
    pub value: Option<String>,
}

impl TransferPartyData {
    pub fn vault(id: impl Into<String>) -> Self {
        Self {
            party_type: TransferPartyType::Vault,
            id: Some(id.into()),
            value: None,
        }
    }

    pub fn contact(id: impl Into<String>) -> Self {
        Self {
            party_type: TransferPartyType::Contact,
            id: Some(id.into()),
            value: None,
        }
    }

    pub fn external_address(address: impl Into<String>) -> Self {
        Self {
            party_type: TransferPartyType::ExternalAddress,
            id: None,
            value: Some(address.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreationGasParams {
    pub fee_tier: Option<TransactionFeeTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub vault_id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub block_chain: String,
    pub status: String,
    #[serde(default)]
    pub to_address: String,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub to_address_name: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub to_vault_id: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub gas_params: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub source_address: Option<String>,
    #[serde(default)]
    pub txn_signature: Option<String>,
    #[serde(default)]
    pub output: Option<TransactionOutput>,
}

impl Transaction {
    /// Parsed status, if the server sent a known value.
    pub fn status(&self) -> Option<TransactionStatus> {
        serde_json::from_value(Value::String(self.status.clone())).ok()
    }
}

/// Chain-specific execution output. EVM calls set `return_data`; ICP calls
/// set `certificate` and `content_map`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_map: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransferTransactionRequest {
    pub source: TransferPartyData,
    pub destination: TransferPartyData,
    pub amount: String,
    pub asset: String,
    pub chain: String,
    pub gas_params: Option<TransactionCreationGasParams>,
    pub external_id: Option<String>,
    pub is_automation: Option<bool>,
    pub execute_at: Option<String>,
    pub memo: Option<String>,
    pub fee_payer: Option<TransferPartyData>,
}

impl CreateTransferTransactionRequest {
    pub fn new(
        source: TransferPartyData,
        destination: TransferPartyData,
        amount: impl Into<String>,
        asset: impl Into<String>,
        chain: impl Into<String>,
    ) -> Self {
        Self {
            source,
            destination,
            amount: amount.into(),
            asset: asset.into(),
            chain: chain.into(),
            gas_params: None,
            external_id: None,
            is_automation: None,
            execute_at: None,
            memo: None,
            fee_payer: None,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_fee_tier(mut self, tier: TransactionFeeTier) -> Self {
        self.gas_params = Some(TransactionCreationGasParams {
            fee_tier: Some(tier),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateFeeRequest {
    pub source: TransferPartyData,
    pub destination: TransferPartyData,
    pub amount: String,
    pub asset: String,
    pub chain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeData {
    pub expected_fee_in_asset: String,
    pub asset: String,
    #[serde(rename = "expectedFeeInUSD")]
    pub expected_fee_in_usd: String,
    #[serde(default)]
    pub base_fee: Option<String>,
    #[serde(default)]
    pub priority_fee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedFeeResponse {
    pub high: FeeData,
    pub medium: FeeData,
    pub low: FeeData,
}

/// Body of `POST /api/external/transactions/replace_transaction/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTransactionRequest {
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_params: Option<TransactionCreationGasParams>,
}

/// Payload of a contract call, EVM or ICP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractCallData {
    Evm {
        #[serde(rename = "callData")]
        call_data: String,
        #[serde(rename = "toAddress")]
        to_address: Option<String>,
    },
    Icp {
        #[serde(rename = "canisterId")]
        canister_id: String,
        method: String,
        arg: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateContractCallTransactionRequest {
    pub vault_id: String,
    pub chain: String,
    pub amount: Option<String>,
    pub data: Option<ContractCallData>,
    pub external_id: Option<String>,
    pub gas_params: Option<TransactionCreationGasParams>,
    pub creation_options: Option<Value>,
}

/// Parameters for a swap quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTradeQuoteRequest {
    pub vault_id: String,
    pub from_asset: String,
    pub from_amount: String,
    pub from_chain: String,
    pub to_asset: String,
    pub to_chain: String,
    pub slippage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeQuoteRequestData {
    pub from_asset: String,
    pub from_amount: String,
    pub block_chain: String,
    pub to_asset: String,
    pub to_blockchain: String,
    pub slippage: String,
    #[serde(default, rename = "fromAmountUSD")]
    pub from_amount_usd: Option<String>,
    #[serde(default)]
    pub destination_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeQuoteResponseData {
    pub final_to_amount: String,
    #[serde(rename = "finalToAmountUSD")]
    pub final_to_amount_usd: String,
    pub source_name: String,
    #[serde(rename = "feeInUSD")]
    pub fee_in_usd: String,
    pub auto_slippage: String,
    #[serde(default)]
    pub unit_to_asset_amount: Option<String>,
    #[serde(default)]
    pub quotes_valid_till: Option<String>,
    #[serde(default)]
    pub est_completion_time_in_sec: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTradeQuoteResponse {
    pub trade_request_data: TradeQuoteRequestData,
    pub trade_response_data_list: Vec<TradeQuoteResponseData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTradeTransactionRequest {
    pub vault_id: String,
    pub trade_request_data: TradeQuoteRequestData,
    pub trade_response_data: TradeQuoteResponseData,
    pub external_id: Option<String>,
    pub memo: Option<String>,
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: u64,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

pub type VaultListResponse = Page<Vault>;
pub type TransactionListResponse = Page<Transaction>;
pub type ContactListResponse = Page<Contact>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transfer_party_serializes_all_fields() {
        let party = TransferPartyData::vault("v-1");
        assert_eq!(
            serde_json::to_value(&party).unwrap(),
            json!({"type": "VAULT", "id": "v-1", "value": null})
        );

        let external = TransferPartyData::external_address("0xabc");
        assert_eq!(external.party_type.as_str(), "EXTERNAL_ADDRESS");
        assert_eq!(external.value.as_deref(), Some("0xabc"));
    }

    #[test]
    fn vault_decodes_with_optional_fields_missing() {
        let vault: Vault = serde_json::from_value(json!({
            "id": "v-1",
            "vaultName": "core-vault-1",
            "vaultType": "DEFAULT",
            "wallets": [{"id": "w-1", "blockchain": "ETHEREUM", "address": "0x1"}]
        }))
        .unwrap();
        assert_eq!(vault.vault_name, "core-vault-1");
        assert_eq!(vault.wallets.len(), 1);
        assert_eq!(vault.wallets_generated, None);
    }

    #[test]
    fn transaction_status_parses_known_values() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "tx-1",
            "status": "COMPLETED",
            "gasParams": {"expectedGasFeeInToken": "0.00055509", "gasFeeToken": "ETH"},
            "output": {"returnData": "0x01"}
        }))
        .unwrap();
        assert_eq!(tx.status(), Some(TransactionStatus::Completed));
        assert!(tx.status().unwrap().is_terminal());
        assert_eq!(
            tx.gas_params.unwrap().get("gasFeeToken"),
            Some(&json!("ETH"))
        );
        assert_eq!(
            tx.output,
            Some(TransactionOutput {
                return_data: Some("0x01".to_string()),
                ..Default::default()
            })
        );

        let unknown: Transaction =
            serde_json::from_value(json!({"id": "tx-2", "status": "QUEUED"})).unwrap();
        assert_eq!(unknown.status(), None);
    }

    #[test]
    fn create_vault_request_skips_unset_fields() {
        let request = CreateVaultRequest {
            vault_name: "vault_from_template".to_string(),
            template_id: Some("tpl-1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"vaultName": "vault_from_template", "templateId": "tpl-1"})
        );
    }

    #[test]
    fn contract_call_data_serializes_by_shape() {
        let evm = ContractCallData::Evm {
            call_data: "0x".to_string(),
            to_address: None,
        };
        assert_eq!(
            serde_json::to_value(&evm).unwrap(),
            json!({"callData": "0x", "toAddress": null})
        );

        let icp = ContractCallData::Icp {
            canister_id: "c-1".to_string(),
            method: "transfer".to_string(),
            arg: "00".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&icp).unwrap(),
            json!({"canisterId": "c-1", "method": "transfer", "arg": "00"})
        );
    }

    #[test]
    fn fee_data_uses_uppercase_usd_suffix() {
        let fee: FeeData = serde_json::from_value(json!({
            "expectedFeeInAsset": "0.001",
            "asset": "ETH",
            "expectedFeeInUSD": "3.10"
        }))
        .unwrap();
        assert_eq!(fee.expected_fee_in_usd, "3.10");
    }

    #[test]
    fn page_decodes_results() {
        let page: ContactListResponse = serde_json::from_value(json!({
            "results": [{
                "id": "c-1",
                "name": "Lynn Bell",
                "blockChain": "SOLANA",
                "address": "CEzN7mqP9xoxn2HdyW6fjEJ73t7qaX9Rp2zyS6hb3iEu",
                "status": "APPROVED"
            }],
            "count": 1
        }))
        .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].status, ContactStatus::Approved.as_str());
        assert_eq!(page.next, None);
    }
}
