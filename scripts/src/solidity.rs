//! Definitions of Solidity functions called during deployment and setup

use std::{path::Path, str::FromStr};

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolValue,
};
use serde::Deserialize;

use crate::{config::ContractArgs, errors::ScriptError, utils::read_file};

sol! {
    /// The omnichain NFT contract
    #[sol(rpc)]
    interface IAdvancedONFT721Gasless {
        /// Trust `_path` as the source of messages from `_remoteChainId`
        function setTrustedRemote(uint16 _remoteChainId, bytes calldata _path) external;
        /// The trusted path registered for `_remoteChainId`
        function trustedRemoteLookup(uint16 _remoteChainId) external view returns (bytes memory);
    }
}

/// A compiled contract artifact, as emitted by Hardhat
#[derive(Debug, Deserialize)]
pub struct HardhatArtifact {
    /// The name of the compiled contract
    #[serde(rename = "contractName")]
    pub contract_name: String,
    /// The creation bytecode, hex encoded
    pub bytecode: String,
}

impl HardhatArtifact {
    /// Read an artifact from disk
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = read_file(path)?;
        serde_json::from_str(&contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// Decode the creation bytecode
    pub fn creation_code(&self) -> Result<Bytes, ScriptError> {
        let code = Bytes::from_str(&self.bytecode)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        if code.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} has no creation bytecode",
                self.contract_name
            )));
        }

        Ok(code)
    }
}

/// ABI-encode the constructor arguments of the contract
pub fn constructor_calldata(args: &ContractArgs, endpoint: Address, stablecoin: Address) -> Bytes {
    (
        args.name.clone(),
        args.symbol.clone(),
        endpoint,
        U256::from(args.start_mint_id),
        U256::from(args.end_mint_id),
        U256::from(args.max_tokens_per_mint),
        args.base_token_uri.clone(),
        args.hidden_uri.clone(),
        stablecoin,
    )
        .abi_encode_params()
        .into()
}

/// Append the encoded constructor arguments to the creation bytecode
pub fn deploy_code(
    artifact: &HardhatArtifact,
    constructor_args: &Bytes,
) -> Result<Bytes, ScriptError> {
    let mut code = artifact.creation_code()?.to_vec();
    code.extend_from_slice(constructor_args);
    Ok(code.into())
}
