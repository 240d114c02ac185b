//! Definitions of CLI arguments and commands for the deploy scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{check_config, deploy, setup_milady, verify_all},
    config::ConfigTables,
    constants::{
        CONTRACT_NAME, DEFAULT_ARTIFACT_PATH, DEFAULT_CONSTANTS_DIR, DEFAULT_DEPLOYMENTS_PATH,
        DEFAULT_VERIFIER_COMMAND, NETWORK_ENV_VAR, PRIVATE_KEY_ENV_VAR, VERIFY_CONTRACT_PATH,
    },
    errors::ScriptError,
    networks::{self, Environment, NetworkDescriptor},
    utils::parse_addr_from_deployments_file,
    verify::VerifierInvocation,
};

/// Deployment and administration of the omnichain NFT contract
#[derive(Parser)]
pub struct Cli {
    /// Options shared by every command
    #[command(flatten)]
    pub globals: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Clone)]
pub struct GlobalArgs {
    /// The network to operate on, as named in the network table
    #[arg(short, long, env = NETWORK_ENV_VAR, global = true)]
    pub network: Option<String>,

    /// Private key of the deployer
    #[arg(short, long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true, global = true)]
    pub priv_key: Option<String>,

    /// Override the RPC URL of the network
    #[arg(short, long, global = true)]
    pub rpc_url: Option<String>,

    /// Directory holding the JSON configuration tables
    #[arg(long, default_value = DEFAULT_CONSTANTS_DIR, global = true)]
    pub constants_dir: PathBuf,
}

impl GlobalArgs {
    /// The selected network
    pub fn network(&self) -> Result<&'static NetworkDescriptor, ScriptError> {
        let name = self.network.as_deref().ok_or_else(|| {
            ScriptError::MissingConfig(format!(
                "no network selected, set --network or {}",
                NETWORK_ENV_VAR
            ))
        })?;
        networks::lookup(name)
    }

    /// The deployer's private key
    pub fn priv_key(&self) -> Result<&str, ScriptError> {
        self.priv_key.as_deref().ok_or_else(|| {
            ScriptError::MissingConfig(format!(
                "no private key, set --priv-key or {}",
                PRIVATE_KEY_ENV_VAR
            ))
        })
    }

    /// Load the configuration tables
    pub fn tables(&self) -> Result<ConfigTables, ScriptError> {
        ConfigTables::load(&self.constants_dir)
    }
}

/// The available commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the contract to the selected network
    Deploy(DeployArgs),
    /// Trust the contract instances on every other network of an environment
    #[command(name = "setupMilady", alias = "setup-milady")]
    SetupMilady(TaskArgs),
    /// Verify the contract on every network of an environment
    #[command(name = "verifyAll", alias = "verify-all")]
    VerifyAll(VerifyAllArgs),
    /// Check that the configuration tables cover an environment
    CheckConfig(CheckConfigArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, globals: &GlobalArgs) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, globals).await,
            Command::SetupMilady(args) => setup_milady(args, globals).await,
            Command::VerifyAll(args) => verify_all(args, globals).await,
            Command::CheckConfig(args) => check_config(args, globals),
        }
    }
}

/// Deploy the contract
#[derive(Args)]
pub struct DeployArgs {
    /// Path to the compiled contract artifact
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub artifact: PathBuf,

    /// Path to the file in which deployed addresses are recorded
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments: PathBuf,
}

/// Arguments of the administrative tasks
#[derive(Args)]
pub struct TaskArgs {
    /// The environment group to operate on
    #[arg(short, long = "e", value_enum)]
    pub environment: Environment,

    /// The address the contract was deployed at, read from the deployments
    /// file under the selected network if not given
    #[arg(long)]
    pub addr: Option<Address>,

    /// Path to the file in which deployed addresses are recorded
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments: PathBuf,
}

impl TaskArgs {
    /// The address of the deployed contract
    pub fn addr(&self, globals: &GlobalArgs) -> Result<Address, ScriptError> {
        match self.addr {
            Some(addr) => Ok(addr),
            None => {
                let network = globals.network()?;
                parse_addr_from_deployments_file(&self.deployments, network.name, CONTRACT_NAME)
            }
        }
    }
}

/// Verify the contract
#[derive(Args)]
pub struct VerifyAllArgs {
    /// The environment and deployed address
    #[command(flatten)]
    pub task: TaskArgs,

    /// The command performing the verification
    #[arg(long, default_value = DEFAULT_VERIFIER_COMMAND)]
    pub verifier: VerifierInvocation,

    /// The fully qualified path of the contract to verify
    #[arg(long, default_value = VERIFY_CONTRACT_PATH)]
    pub contract: String,
}

/// Check the configuration tables
#[derive(Args)]
pub struct CheckConfigArgs {
    /// The environment group to check
    #[arg(short, long = "e", value_enum)]
    pub environment: Environment,
}
