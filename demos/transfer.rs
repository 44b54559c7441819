// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer ETH from a vault to a contact and wait for it to settle.
//!
//! ```text
//! PRIMEVAULT_API_KEY=... PRIMEVAULT_API_URL=https://api.primevault.com \
//! PRIMEVAULT_PRIVATE_KEY="$(cat private_key.pem)" cargo run --example transfer
//! ```
//!
//! Set `SIGNATURE_SERVICE=AWS_KMS` and `PRIMEVAULT_KMS_KEY_ID` instead of the
//! private key to sign with KMS.

use std::{env, time::Duration};

use primevault_sdk::{
    api::DEFAULT_PAGE_SIZE,
    config::SignatureService,
    logging::init_logging,
    models::{
        CreateTransferTransactionRequest, EstimateFeeRequest, TransactionFeeTier, TransferPartyData,
    },
    ApiClient, ClientConfig, SdkError, SigningCredentials,
};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_POLLS: usize = 60;

fn required(name: &str) -> Result<String, SdkError> {
    env::var(name).map_err(|_| SdkError::Configuration(format!("{name} is not set")))
}

#[tokio::main]
async fn main() -> Result<(), SdkError> {
    init_logging("info");

    let config = ClientConfig::from_env()?;
    let credentials = match config.signature_service {
        SignatureService::PrivateKey => SigningCredentials::private_key(required("PRIMEVAULT_PRIVATE_KEY")?),
        SignatureService::AwsKms => SigningCredentials::kms_key(required("PRIMEVAULT_KMS_KEY_ID")?),
    };
    let client = ApiClient::new(
        config,
        required("PRIMEVAULT_API_KEY")?,
        &required("PRIMEVAULT_API_URL")?,
        credentials,
    )
    .await?;

    let assets = client.get_assets_data().await?;
    let eth = assets
        .iter()
        .find(|asset| asset.block_chain == "ETHEREUM" && asset.symbol == "ETH")
        .ok_or_else(|| SdkError::InvalidResponse("ETH on ETHEREUM is not enabled".to_string()))?;

    let vaults = client.get_vaults(&[("vaultName", "core-vault-1")], 1, DEFAULT_PAGE_SIZE, false).await?;
    let contacts = client.get_contacts(&[("name", "Lynn Bell")], 1, DEFAULT_PAGE_SIZE).await?;
    let (Some(vault), Some(contact)) = (vaults.results.first(), contacts.results.first()) else {
        return Err(SdkError::InvalidResponse("source vault or contact not found".to_string()));
    };

    let source = TransferPartyData::vault(&vault.id);
    let destination = TransferPartyData::contact(&contact.id);

    let fees = client
        .estimate_fee(&EstimateFeeRequest {
            source: source.clone(),
            destination: destination.clone(),
            amount: "0.0001".to_string(),
            asset: eth.symbol.clone(),
            chain: eth.block_chain.clone(),
        })
        .await?;
    info!(high = %fees.high.expected_fee_in_asset, low = %fees.low.expected_fee_in_asset, "fee estimate");

    let request = CreateTransferTransactionRequest::new(source, destination, "0.0001", &eth.symbol, &eth.block_chain)
        .with_external_id("externalId-1")
        .with_fee_tier(TransactionFeeTier::High);

    let mut transaction = match client.create_transfer_transaction(&request).await {
        Ok(transaction) => transaction,
        Err(err) => {
            if let Some(api) = err.as_api_error() {
                warn!(status = %api.status, code = ?api.code, message = %api.message, "transfer rejected");
            }
            return Err(err);
        }
    };
    info!(id = %transaction.id, status = %transaction.status, "transfer created");

    for _ in 0..MAX_POLLS {
        if transaction.status().is_some_and(|status| status.is_terminal()) {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
        transaction = client.get_transaction_by_id(&transaction.id).await?;
        info!(id = %transaction.id, status = %transaction.status, "polled transfer");
    }

    info!(id = %transaction.id, status = %transaction.status, tx_hash = ?transaction.tx_hash, "done");
    Ok(())
}
