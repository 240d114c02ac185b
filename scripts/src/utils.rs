//! Utilities for the deploy scripts.

use std::{fs, path::Path, str::FromStr};

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{errors::ScriptError, networks::NetworkDescriptor};

/// Sets up a signing client for the given network, returning the provider
/// and the address of the deployer.
///
/// The RPC URL of the network may be overridden. If the network pins a chain
/// id, the node is checked to be serving that chain.
pub async fn setup_client(
    priv_key: &str,
    network: &NetworkDescriptor,
    rpc_url: Option<&str>,
) -> Result<(DynProvider, Address), ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let url = Url::parse(rpc_url.unwrap_or(network.rpc_url))
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    let provider = DynProvider::new(provider);

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    match network.chain_id {
        Some(expected) if expected != chain_id => {
            return Err(ScriptError::ClientInitialization(format!(
                "[{}] expected chain id {}, node reports {}",
                network.name, expected, chain_id
            )));
        }
        Some(_) => {}
        None => warn!("[{}] no pinned chain id, using {}", network.name, chain_id),
    }

    Ok((provider, deployer))
}

/// Read a file to a string
pub fn read_file(path: &Path) -> Result<String, ScriptError> {
    fs::read_to_string(path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))
}

/// Parse a JSON file
pub fn get_json_from_file(path: &Path) -> Result<Value, ScriptError> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))
}

/// Record a deployed contract address in the deployments file, under the
/// network the contract was deployed to.
///
/// Creates the file if it does not exist, other entries are preserved.
pub fn write_deployed_address(
    path: &Path,
    network: &str,
    contract: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut deployments = if path.exists() {
        get_json_from_file(path)?
    } else {
        Value::Object(Map::new())
    };

    let root = deployments.as_object_mut().ok_or_else(|| {
        ScriptError::WriteFile(format!("{} is not a JSON object", path.display()))
    })?;
    let entry = root
        .entry(network.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let entry = entry.as_object_mut().ok_or_else(|| {
        ScriptError::WriteFile(format!("`{}` in {} is not a JSON object", network, path.display()))
    })?;
    entry.insert(contract.to_string(), Value::String(format!("{address:#x}")));

    let contents = serde_json::to_string_pretty(&deployments)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    fs::write(path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    info!("[{}] recorded {} at {:#x} in {}", network, contract, address, path.display());
    Ok(())
}

/// Read a deployed contract address from the deployments file
pub fn parse_addr_from_deployments_file(
    path: &Path,
    network: &str,
    contract: &str,
) -> Result<Address, ScriptError> {
    let deployments = get_json_from_file(path)?;
    let addr = deployments[network][contract].as_str().ok_or_else(|| {
        ScriptError::ReadFile(format!(
            "no `{}` deployment for `{}` in {}",
            contract,
            network,
            path.display()
        ))
    })?;

    Address::from_str(addr).map_err(|e| ScriptError::ReadFile(e.to_string()))
}
