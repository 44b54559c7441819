// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `primevault-keygen` - create signing keys for a PrimeVault API user.
//!
//! Register the printed public key with PrimeVault, then hand the private
//! key (or KMS key id) to the client.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use primevault_sdk::{
    config::{ClientConfig, AWS_REGION_ENV, DEFAULT_AWS_REGION},
    generate_aws_kms_key_pair, generate_public_private_key_pair,
    keys::DEFAULT_KMS_KEY_ALIAS,
    logging::init_logging,
    SdkError,
};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "primevault-keygen", version, about = "Generate PrimeVault API signing keys")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a P-256 key pair locally.
    Local,
    /// Create a P-256 signing key in AWS KMS.
    Kms {
        /// Alias for the new key, without the `alias/` prefix.
        #[arg(long, default_value = DEFAULT_KMS_KEY_ALIAS)]
        alias: String,
        #[arg(long, env = AWS_REGION_ENV, default_value = DEFAULT_AWS_REGION)]
        region: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging("info");
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "key generation failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), SdkError> {
    match command {
        Command::Local => {
            let pair = generate_public_private_key_pair()?;
            println!("{}", pair.private_key_pem.trim_end());
            println!("{}", pair.public_key_pem.trim_end());
            println!("Public key (hex): {}", pair.public_key_hex);
        }
        Command::Kms { alias, region } => {
            let config = ClientConfig::aws_kms(region);
            let pair = generate_aws_kms_key_pair(&config, Some(&alias)).await?;
            println!("Key id: {}", pair.key_id);
            println!("Alias: alias/{}", pair.alias);
            println!("{}", pair.public_key_pem.trim_end());
            println!("Public key (hex): {}", pair.public_key_hex);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kms_arguments() {
        let cli = Cli::try_parse_from(["primevault-keygen", "kms", "--alias", "ops", "--region", "us-east-1"])
            .unwrap();
        match cli.command {
            Command::Kms { alias, region } => {
                assert_eq!(alias, "ops");
                assert_eq!(region, "us-east-1");
            }
            Command::Local => panic!("expected kms"),
        }
    }

    #[test]
    fn kms_alias_defaults() {
        let cli = Cli::try_parse_from(["primevault-keygen", "kms", "--region", "eu-north-1"]).unwrap();
        assert!(matches!(cli.command, Command::Kms { alias, .. } if alias == DEFAULT_KMS_KEY_ALIAS));
    }

    #[test]
    fn local_takes_no_arguments() {
        assert!(matches!(
            Cli::try_parse_from(["primevault-keygen", "local"]).unwrap().command,
            Command::Local
        ));
        assert!(Cli::try_parse_from(["primevault-keygen", "local", "--alias", "x"]).is_err());
    }
}
