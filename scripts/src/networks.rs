//! The static network table and the environment groups targeted by the tasks

use std::{
    env,
    fmt::{self, Display},
};

use clap::ValueEnum;

use crate::errors::ScriptError;

/// A network the contract can be deployed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    /// The name of the network, used as the key in every configuration table
    pub name: &'static str,
    /// The RPC endpoint of the network
    pub rpc_url: &'static str,
    /// The EVM chain id, if pinned
    pub chain_id: Option<u64>,
    /// The environment variable holding the block explorer API key used
    /// when verifying on this network
    pub explorer_key_env: Option<&'static str>,
}

impl NetworkDescriptor {
    /// Read the block explorer API key for this network from the environment
    ///
    /// Returns `None` if the network has no explorer configured or the
    /// variable is unset or empty
    pub fn explorer_api_key(&self) -> Option<String> {
        let var = self.explorer_key_env?;
        env::var(var).ok().filter(|key| !key.is_empty())
    }
}

/// Every network known to the scripts
pub const NETWORKS: &[NetworkDescriptor] = &[
    // Mainnets
    NetworkDescriptor {
        name: "ethereum",
        rpc_url: "https://mainnet.infura.io/v3/9aa3d95b3bc440fa88ea12eaa4456161",
        chain_id: Some(1),
        explorer_key_env: Some("ETHERSCAN_API_KEY"),
    },
    NetworkDescriptor {
        name: "bsc",
        rpc_url: "https://bsc-dataseed.binance.org",
        chain_id: Some(56),
        explorer_key_env: Some("BSCSCAN_API_KEY"),
    },
    NetworkDescriptor {
        name: "avalanche",
        rpc_url: "https://api.avax.network/ext/bc/C/rpc",
        chain_id: Some(43114),
        explorer_key_env: Some("AVALANCHE_API_KEY"),
    },
    NetworkDescriptor {
        name: "polygon",
        rpc_url: "https://polygon-rpc.com",
        chain_id: Some(137),
        explorer_key_env: Some("POLYGON_API_KEY"),
    },
    NetworkDescriptor {
        name: "arbitrum",
        rpc_url: "https://arb1.arbitrum.io/rpc",
        chain_id: Some(42161),
        explorer_key_env: Some("ARBITRUM_API_KEY"),
    },
    NetworkDescriptor {
        name: "optimism",
        rpc_url: "https://mainnet.optimism.io",
        chain_id: Some(10),
        explorer_key_env: Some("OPTIMISTIC_API_KEY"),
    },
    NetworkDescriptor {
        name: "fantom",
        rpc_url: "https://rpc.ftm.tools",
        chain_id: Some(250),
        explorer_key_env: Some("FANTOM_API_KEY"),
    },
    // Testnets
    NetworkDescriptor {
        name: "rinkeby",
        rpc_url: "https://rinkeby.infura.io/v3/9aa3d95b3bc440fa88ea12eaa4456161",
        chain_id: Some(4),
        explorer_key_env: None,
    },
    NetworkDescriptor {
        name: "goerli",
        rpc_url: "https://goerli.infura.io/v3/9aa3d95b3bc440fa88ea12eaa4456161",
        chain_id: Some(5),
        explorer_key_env: Some("ETHERSCAN_API_KEY"),
    },
    NetworkDescriptor {
        name: "bsc-testnet",
        rpc_url: "https://rpc.ankr.com/bsc_testnet_chapel",
        chain_id: Some(97),
        explorer_key_env: Some("BSCSCAN_API_KEY"),
    },
    NetworkDescriptor {
        name: "fuji",
        rpc_url: "https://api.avax-test.network/ext/bc/C/rpc",
        chain_id: Some(43113),
        explorer_key_env: Some("AVALANCHE_API_KEY"),
    },
    NetworkDescriptor {
        name: "mumbai",
        rpc_url: "https://rpc.ankr.com/polygon_mumbai",
        chain_id: Some(80001),
        explorer_key_env: Some("POLYGON_API_KEY"),
    },
    NetworkDescriptor {
        name: "arbitrum-rinkeby",
        rpc_url: "https://rinkeby.arbitrum.io/rpc",
        chain_id: Some(421611),
        explorer_key_env: Some("ARBITRUM_API_KEY"),
    },
    NetworkDescriptor {
        name: "arbitrum-goerli",
        rpc_url: "https://goerli-rollup.arbitrum.io/rpc/",
        chain_id: Some(421613),
        explorer_key_env: Some("ARBITRUM_API_KEY"),
    },
    NetworkDescriptor {
        name: "optimism-kovan",
        rpc_url: "https://kovan.optimism.io/",
        chain_id: Some(69),
        explorer_key_env: None,
    },
    NetworkDescriptor {
        name: "optimism-goerli",
        rpc_url: "https://goerli.optimism.io/",
        chain_id: Some(420),
        explorer_key_env: Some("OPTIMISTIC_API_KEY"),
    },
    NetworkDescriptor {
        name: "fantom-testnet",
        rpc_url: "https://rpc.testnet.fantom.network/",
        chain_id: Some(4002),
        explorer_key_env: Some("FANTOM_API_KEY"),
    },
    // Moonbase Alpha does not pin a chain id, the node's answer is trusted
    NetworkDescriptor {
        name: "moonbeam_testnet",
        rpc_url: "https://rpc.testnet.moonbeam.network",
        chain_id: None,
        explorer_key_env: Some("MOONBEAM_API_KEY"),
    },
];

/// Look up a network by name in the network table
pub fn lookup(name: &str) -> Result<&'static NetworkDescriptor, ScriptError> {
    NETWORKS
        .iter()
        .find(|network| network.name == name)
        .ok_or_else(|| ScriptError::MissingConfig(format!("unknown network `{}`", name)))
}

/// A group of networks targeted together by the administrative tasks
#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Environment {
    /// The production networks
    Mainnet,
    /// The test networks
    Testnet,
}

impl Environment {
    /// The networks in this group
    pub fn networks(self) -> &'static [&'static str] {
        match self {
            Environment::Mainnet => &[
                "ethereum",
                "bsc",
                "avalanche",
                "polygon",
                "arbitrum",
                "optimism",
                "fantom",
            ],
            Environment::Testnet => &[
                "goerli",
                "bsc-testnet",
                "fuji",
                "mumbai",
                "arbitrum-goerli",
                "optimism-goerli",
                "fantom-testnet",
                "moonbeam_testnet",
            ],
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Mainnet => write!(f, "mainnet"),
            Environment::Testnet => write!(f, "testnet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{lookup, Environment, NETWORKS};

    #[test]
    fn test_network_names_unique() {
        let names: HashSet<_> = NETWORKS.iter().map(|n| n.name).collect();
        assert_eq!(names.len(), NETWORKS.len());
    }

    #[test]
    fn test_environment_networks_in_table() {
        for env in [Environment::Mainnet, Environment::Testnet] {
            for name in env.networks() {
                assert!(lookup(name).is_ok(), "{} missing from network table", name);
            }
        }
    }

    #[test]
    fn test_lookup_unknown_network() {
        assert!(lookup("hardhat").is_err());
    }

    #[test]
    fn test_explorer_key_absent_without_explorer() {
        let rinkeby = lookup("rinkeby").unwrap();
        assert!(rinkeby.explorer_api_key().is_none());
    }
}
