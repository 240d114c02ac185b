//! The JSON configuration tables consumed by the scripts
//!
//! Each table is keyed by network name. The tables are parsed once and never
//! mutated; addresses are validated as they are loaded so a malformed entry
//! surfaces before any transaction is sent.

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    path::Path,
    str::FromStr,
};

use alloy::primitives::Address;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    constants::{
        CHAIN_IDS_FILE, CONTRACT_ARGS_FILE, ENDPOINTS_FILE, STABLECOINS_FILE, VERIFY_ARGS_FILE,
    },
    errors::ScriptError,
    networks::{self, Environment},
    utils::read_file,
};

/// The constructor arguments of the contract on a single network
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractArgs {
    /// The token collection name
    pub name: String,
    /// The token collection symbol
    pub symbol: String,
    /// The first token id mintable on this network
    #[serde(rename = "startMintId")]
    pub start_mint_id: u64,
    /// The last token id mintable on this network
    #[serde(rename = "endMintId")]
    pub end_mint_id: u64,
    /// The maximum number of tokens minted in a single transaction
    #[serde(rename = "maxTokensPerMint")]
    pub max_tokens_per_mint: u64,
    /// The metadata URI once revealed
    #[serde(rename = "baseTokenURI")]
    pub base_token_uri: String,
    /// The metadata URI before reveal
    #[serde(rename = "hiddenURI")]
    pub hidden_uri: String,
}

/// The constructor arguments passed to the verifier
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VerifyArgs {
    /// A literal argument list, passed through as-is
    Positional(Vec<Value>),
    /// Named arguments, completed with the per-network endpoint and stablecoin
    Named(ContractArgs),
}

/// A problem found when checking the tables against an environment group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// The network is absent from the network table
    UnknownNetwork(String),
    /// The network has no bridging chain id
    MissingChainId(String),
    /// The network has no LayerZero endpoint
    MissingEndpoint(String),
    /// The network has no constructor arguments
    MissingContractArgs(String),
}

impl Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::UnknownNetwork(n) => write!(f, "[{}] not in the network table", n),
            ConfigIssue::MissingChainId(n) => write!(f, "[{}] no entry in {}", n, CHAIN_IDS_FILE),
            ConfigIssue::MissingEndpoint(n) => write!(f, "[{}] no entry in {}", n, ENDPOINTS_FILE),
            ConfigIssue::MissingContractArgs(n) => {
                write!(f, "[{}] no entry in {}", n, CONTRACT_ARGS_FILE)
            }
        }
    }
}

/// The raw contents of every configuration file
pub struct ConfigSources<'a> {
    /// Contents of the chain id table
    pub chain_ids: &'a str,
    /// Contents of the endpoint table
    pub endpoints: &'a str,
    /// Contents of the stablecoin table
    pub stablecoins: &'a str,
    /// Contents of the constructor argument table
    pub contract_args: &'a str,
    /// Contents of the verification argument file
    pub verify_args: &'a str,
}

/// The parsed configuration tables
#[derive(Debug, Clone)]
pub struct ConfigTables {
    /// Network name -> bridging chain id
    chain_ids: BTreeMap<String, u16>,
    /// Network name -> LayerZero endpoint
    endpoints: BTreeMap<String, Address>,
    /// Network name -> stablecoin
    stablecoins: BTreeMap<String, Address>,
    /// Network name -> constructor arguments
    contract_args: BTreeMap<String, ContractArgs>,
    /// Constructor arguments used for verification
    verify_args: VerifyArgs,
}

impl ConfigTables {
    /// Load the tables from the given constants directory
    pub fn load(dir: &Path) -> Result<Self, ScriptError> {
        let chain_ids = read_file(&dir.join(CHAIN_IDS_FILE))?;
        let endpoints = read_file(&dir.join(ENDPOINTS_FILE))?;
        let stablecoins = read_file(&dir.join(STABLECOINS_FILE))?;
        let contract_args = read_file(&dir.join(CONTRACT_ARGS_FILE))?;
        let verify_args = read_file(&dir.join(VERIFY_ARGS_FILE))?;

        Self::parse(ConfigSources {
            chain_ids: &chain_ids,
            endpoints: &endpoints,
            stablecoins: &stablecoins,
            contract_args: &contract_args,
            verify_args: &verify_args,
        })
    }

    /// The tables shipped with the repository
    pub fn bundled() -> Result<Self, ScriptError> {
        Self::parse(ConfigSources {
            chain_ids: include_str!("../../constants/chainIds.json"),
            endpoints: include_str!("../../constants/layerzeroEndpoints.json"),
            stablecoins: include_str!("../../constants/usd.json"),
            contract_args: include_str!("../../constants/milady.json"),
            verify_args: include_str!("../../constants/miladyXargs.json"),
        })
    }

    /// Parse the tables from their raw JSON contents
    pub fn parse(sources: ConfigSources<'_>) -> Result<Self, ScriptError> {
        let chain_ids = parse_json(CHAIN_IDS_FILE, sources.chain_ids)?;
        let endpoints = parse_addresses(ENDPOINTS_FILE, sources.endpoints)?;
        let stablecoins = parse_addresses(STABLECOINS_FILE, sources.stablecoins)?;
        let contract_args = parse_json(CONTRACT_ARGS_FILE, sources.contract_args)?;
        let verify_args = parse_json(VERIFY_ARGS_FILE, sources.verify_args)?;

        Ok(Self {
            chain_ids,
            endpoints,
            stablecoins,
            contract_args,
            verify_args,
        })
    }

    /// The bridging chain id of the given network
    pub fn chain_id(&self, network: &str) -> Result<u16, ScriptError> {
        self.chain_ids
            .get(network)
            .copied()
            .ok_or_else(|| missing(network, CHAIN_IDS_FILE))
    }

    /// The LayerZero endpoint of the given network
    pub fn endpoint(&self, network: &str) -> Result<Address, ScriptError> {
        self.endpoints
            .get(network)
            .copied()
            .ok_or_else(|| missing(network, ENDPOINTS_FILE))
    }

    /// The stablecoin of the given network, or the zero address if it has none
    pub fn stablecoin(&self, network: &str) -> Address {
        self.stablecoins
            .get(network)
            .copied()
            .unwrap_or(Address::ZERO)
    }

    /// The constructor arguments of the given network
    pub fn contract_args(&self, network: &str) -> Result<&ContractArgs, ScriptError> {
        self.contract_args
            .get(network)
            .ok_or_else(|| missing(network, CONTRACT_ARGS_FILE))
    }

    /// The constructor arguments used for verification
    pub fn verify_args(&self) -> &VerifyArgs {
        &self.verify_args
    }

    /// Check that every network in the environment group can be targeted
    pub fn check_environment(&self, env: Environment) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for &network in env.networks() {
            if networks::lookup(network).is_err() {
                issues.push(ConfigIssue::UnknownNetwork(network.to_string()));
            }
            if !self.chain_ids.contains_key(network) {
                issues.push(ConfigIssue::MissingChainId(network.to_string()));
            }
            if !self.endpoints.contains_key(network) {
                issues.push(ConfigIssue::MissingEndpoint(network.to_string()));
            }
            if !self.contract_args.contains_key(network) {
                issues.push(ConfigIssue::MissingContractArgs(network.to_string()));
            }
        }

        issues
    }

    /// The networks in the environment group that fall back to the zero
    /// address for their stablecoin
    pub fn stablecoin_fallbacks(&self, env: Environment) -> Vec<&'static str> {
        env.networks()
            .iter()
            .copied()
            .filter(|network| !self.stablecoins.contains_key(*network))
            .collect()
    }
}

/// Build the error for a missing table entry
fn missing(network: &str, file: &str) -> ScriptError {
    ScriptError::MissingConfig(format!("no entry for `{}` in {}", network, file))
}

/// Parse a JSON table, tagging errors with the file name
fn parse_json<T: DeserializeOwned>(file: &str, contents: &str) -> Result<T, ScriptError> {
    serde_json::from_str(contents)
        .map_err(|e| ScriptError::ConfigParsing(format!("{}: {}", file, e)))
}

/// Parse a table of addresses, validating every entry
fn parse_addresses(file: &str, contents: &str) -> Result<BTreeMap<String, Address>, ScriptError> {
    let raw: BTreeMap<String, String> = parse_json(file, contents)?;
    raw.into_iter()
        .map(|(network, addr)| {
            let parsed = Address::from_str(&addr).map_err(|e| {
                ScriptError::ConfigParsing(format!("{}: `{}` for `{}`: {}", file, addr, network, e))
            })?;
            Ok((network, parsed))
        })
        .collect()
}
