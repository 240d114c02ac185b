//! Registration of trusted remotes between contract instances on different networks
//!
//! A contract only accepts cross-chain messages from a source it trusts. The
//! trusted remote for a destination chain is the path `remote ++ local`, and
//! since the contract is deployed at the same address everywhere, the path
//! is the deployed address packed with itself.

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, TxHash},
    providers::DynProvider,
    sol_types::SolValue,
};
use itertools::Itertools;
use tracing::{error, info};

use crate::{
    config::ConfigTables, errors::ScriptError,
    solidity::IAdvancedONFT721Gasless::IAdvancedONFT721GaslessInstance,
};

/// The contract instance type used by the setup task
pub type OnftContract = IAdvancedONFT721GaslessInstance<DynProvider, Ethereum>;

/// Pack the deployed address with itself into a trusted remote path
pub fn trusted_remote_path(addr: Address) -> Bytes {
    (addr, addr).abi_encode_packed().into()
}

/// A contract that can register trusted remotes
#[allow(async_fn_in_trait)]
pub trait TrustedRemoteSetter {
    /// Register `path` as the trusted remote for `chain_id`, returning the
    /// hash of the confirmed transaction
    async fn set_trusted_remote(&self, chain_id: u16, path: Bytes) -> Result<TxHash, ScriptError>;
}

impl TrustedRemoteSetter for OnftContract {
    async fn set_trusted_remote(&self, chain_id: u16, path: Bytes) -> Result<TxHash, ScriptError> {
        let receipt = self
            .setTrustedRemote(chain_id, path)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractInteraction(format!(
                "setTrustedRemote reverted in tx {}",
                receipt.transaction_hash
            )));
        }

        Ok(receipt.transaction_hash)
    }
}

/// A destination network whose trusted remote was registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The destination network
    pub network: String,
    /// The bridging chain id of the destination
    pub chain_id: u16,
    /// The confirmed transaction
    pub tx_hash: TxHash,
}

/// The outcome of a registration run
#[derive(Debug, Default)]
pub struct TrustReport {
    /// Destinations registered successfully
    pub registered: Vec<Registration>,
    /// Destinations that failed, with the reason
    pub failed: Vec<(String, ScriptError)>,
}

impl TrustReport {
    /// Whether every destination was registered
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Convert the report into an error if any destination failed
    pub fn into_result(self) -> Result<Vec<Registration>, ScriptError> {
        if self.is_complete() {
            return Ok(self.registered);
        }

        let failed = self.failed.iter().map(|(network, _)| network).join(", ");
        Err(ScriptError::TrustSetup(format!(
            "{} of {} networks failed: {}",
            self.failed.len(),
            self.failed.len() + self.registered.len(),
            failed
        )))
    }
}

/// Register the deployed contract on `src` as trusting its counterparts on
/// every destination network other than `src` itself.
///
/// Destinations are processed one at a time, waiting for each confirmation.
/// A failed destination is logged and skipped, the run always covers every
/// destination.
pub async fn register_trusted_remotes<S: TrustedRemoteSetter>(
    setter: &S,
    src: &str,
    destinations: &[&str],
    addr: Address,
    tables: &ConfigTables,
) -> TrustReport {
    let path = trusted_remote_path(addr);
    let mut report = TrustReport::default();

    for &dst in destinations.iter().filter(|&&dst| dst != src) {
        let res = match tables.chain_id(dst) {
            Ok(chain_id) => setter
                .set_trusted_remote(chain_id, path.clone())
                .await
                .map(|tx_hash| (chain_id, tx_hash)),
            Err(e) => Err(e),
        };

        match res {
            Ok((chain_id, tx_hash)) => {
                info!("✅ [{}] setTrustedRemote({}, {:#x})", src, chain_id, addr);
                info!(" tx: {}", tx_hash);
                report.registered.push(Registration {
                    network: dst.to_string(),
                    chain_id,
                    tx_hash,
                });
            }
            Err(e) => {
                error!("[{}] failed to trust {}: {}", src, dst, e);
                report.failed.push((dst.to_string(), e));
            }
        }
    }

    report
}
