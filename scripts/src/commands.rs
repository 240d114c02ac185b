//! Implementations of the deploy script and the administrative tasks

use alloy::{
    network::TransactionBuilder, primitives::Address, providers::Provider,
    rpc::types::TransactionRequest,
};
use tracing::{error, info, warn};

use crate::{
    cli::{CheckConfigArgs, DeployArgs, GlobalArgs, TaskArgs, VerifyAllArgs},
    constants::CONTRACT_NAME,
    errors::ScriptError,
    networks,
    solidity::{constructor_calldata, deploy_code, HardhatArtifact, IAdvancedONFT721Gasless},
    trusted_remote::{register_trusted_remotes, OnftContract},
    utils::{setup_client, write_deployed_address},
    verify::{build_verify_command, run_verify_batch, VerifyOutcome},
};

/// Deploy the contract to the selected network with that network's
/// constructor arguments, recording the deployed address
pub async fn deploy(args: DeployArgs, globals: &GlobalArgs) -> Result<(), ScriptError> {
    let network = globals.network()?;
    let tables = globals.tables()?;

    let contract_args = tables.contract_args(network.name)?;
    let endpoint = tables.endpoint(network.name)?;
    let stablecoin = tables.stablecoin(network.name);

    let (client, deployer) =
        setup_client(globals.priv_key()?, network, globals.rpc_url.as_deref()).await?;
    info!(">>> your address: {}", deployer);
    info!("{:?}", contract_args);
    info!("[{}] LayerZero Endpoint address: {:#x}", network.name, endpoint);

    let artifact = HardhatArtifact::from_file(&args.artifact)?;
    let code = deploy_code(
        &artifact,
        &constructor_calldata(contract_args, endpoint, stablecoin),
    )?;

    let tx = TransactionRequest::default()
        .with_from(deployer)
        .with_deploy_code(code);
    let receipt = client
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "deployment reverted in tx {}",
            receipt.transaction_hash
        )));
    }
    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment("receipt has no contract address".to_string())
    })?;

    info!(
        "[{}] deployed {} at {:#x} (tx: {})",
        network.name, CONTRACT_NAME, address, receipt.transaction_hash
    );
    write_deployed_address(&args.deployments, network.name, CONTRACT_NAME, address)
}

/// Register the contract on the selected network as trusting its
/// counterparts on every other network of the environment
pub async fn setup_milady(args: TaskArgs, globals: &GlobalArgs) -> Result<(), ScriptError> {
    let network = globals.network()?;
    let tables = globals.tables()?;

    let addr = args.addr(globals)?;

    let (client, _) =
        setup_client(globals.priv_key()?, network, globals.rpc_url.as_deref()).await?;
    let contract: OnftContract = IAdvancedONFT721Gasless::new(addr, client);

    let report = register_trusted_remotes(
        &contract,
        network.name,
        args.environment.networks(),
        addr,
        &tables,
    )
    .await;

    let registered = report.into_result()?;
    info!(
        "[{}] trusted remotes set for {} networks",
        network.name,
        registered.len()
    );
    Ok(())
}

/// Verify the contract on every network of the environment, one concurrent
/// verifier process per network
pub async fn verify_all(args: VerifyAllArgs, globals: &GlobalArgs) -> Result<(), ScriptError> {
    let tables = globals.tables()?;
    let env = args.task.environment;
    let addr = args.task.addr(globals)?;

    let mut commands = Vec::new();
    let mut unbuilt = Vec::new();
    for &network in env.networks() {
        warn_missing_explorer_key(network);

        match build_verify_command(&args.verifier, &args.contract, network, addr, &tables) {
            Ok(command) => commands.push(command),
            Err(e) => {
                error!("[{}] cannot build verification command: {}", network, e);
                unbuilt.push(VerifyOutcome {
                    network: network.to_string(),
                    result: Err(e),
                });
            }
        }
    }

    let mut report = run_verify_batch(commands).await;
    report.outcomes.extend(unbuilt);

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(status) if status.success() => info!("✅ [{}] verified", outcome.network),
            Ok(status) => error!("[{}] verifier exited with {}", outcome.network, status),
            Err(e) => error!("[{}] {}", outcome.network, e),
        }
    }

    report.into_result()
}

/// Check that the configuration tables cover every network of the environment
pub fn check_config(args: CheckConfigArgs, globals: &GlobalArgs) -> Result<(), ScriptError> {
    let tables = globals.tables()?;
    let env = args.environment;

    for network in tables.stablecoin_fallbacks(env) {
        info!("[{}] no stablecoin, falling back to {}", network, Address::ZERO);
    }

    let issues = tables.check_environment(env);
    for issue in &issues {
        error!("{}", issue);
    }

    if !issues.is_empty() {
        return Err(ScriptError::MissingConfig(format!(
            "{} issues in the {} configuration",
            issues.len(),
            env
        )));
    }

    info!("{} configuration covers {} networks", env, env.networks().len());
    Ok(())
}

/// Warn if the block explorer API key for the network is not set
fn warn_missing_explorer_key(network: &str) {
    match networks::lookup(network) {
        Ok(descriptor) => {
            if let Some(var) = descriptor.explorer_key_env {
                if descriptor.explorer_api_key().is_none() {
                    warn!("[{}] {} is not set, verification may fail", network, var);
                }
            }
        }
        Err(e) => warn!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy::primitives::address;

    use crate::{
        cli::{CheckConfigArgs, DeployArgs, GlobalArgs, TaskArgs, VerifyAllArgs},
        constants::{CONTRACT_NAME, DEFAULT_DEPLOYMENTS_PATH, VERIFY_CONTRACT_PATH},
        errors::ScriptError,
        networks::Environment,
        utils::write_deployed_address,
    };

    use super::{check_config, deploy, verify_all};

    /// Global options pointing at the repository's constants directory
    fn globals(network: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            network: network.map(String::from),
            priv_key: None,
            rpc_url: None,
            constants_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../constants"),
        }
    }

    #[test]
    fn test_check_config_repository_tables() {
        for environment in [Environment::Mainnet, Environment::Testnet] {
            check_config(CheckConfigArgs { environment }, &globals(None)).unwrap();
        }
    }

    #[test]
    fn test_check_config_missing_dir() {
        let mut globals = globals(None);
        globals.constants_dir = PathBuf::from("/nonexistent/constants");
        let res = check_config(
            CheckConfigArgs {
                environment: Environment::Mainnet,
            },
            &globals,
        );
        assert!(matches!(res, Err(ScriptError::ReadFile(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_verify_all_reports_exit_statuses() {
        let task = || TaskArgs {
            environment: Environment::Testnet,
            addr: Some(address!("abcdef0123456789abcdef0123456789abcdef01")),
            deployments: PathBuf::from(DEFAULT_DEPLOYMENTS_PATH),
        };

        let ok = VerifyAllArgs {
            task: task(),
            verifier: "true".parse().unwrap(),
            contract: VERIFY_CONTRACT_PATH.to_string(),
        };
        verify_all(ok, &globals(None)).await.unwrap();

        let failing = VerifyAllArgs {
            task: task(),
            verifier: "false".parse().unwrap(),
            contract: VERIFY_CONTRACT_PATH.to_string(),
        };
        let res = verify_all(failing, &globals(None)).await;
        assert!(matches!(res, Err(ScriptError::Verification(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_verify_all_reads_recorded_address() {
        let dir = tempfile::tempdir().unwrap();
        let deployments = dir.path().join("deployments.json");
        let addr = address!("abcdef0123456789abcdef0123456789abcdef01");
        write_deployed_address(&deployments, "fuji", CONTRACT_NAME, addr).unwrap();

        let task = TaskArgs {
            environment: Environment::Testnet,
            addr: None,
            deployments,
        };
        assert_eq!(task.addr(&globals(Some("fuji"))).unwrap(), addr);
        assert!(matches!(
            task.addr(&globals(Some("goerli"))),
            Err(ScriptError::ReadFile(_))
        ));

        let args = VerifyAllArgs {
            task,
            verifier: "true".parse().unwrap(),
            contract: VERIFY_CONTRACT_PATH.to_string(),
        };
        verify_all(args, &globals(Some("fuji"))).await.unwrap();
    }

    #[test]
    fn test_task_address_requires_network_or_flag() {
        let task = TaskArgs {
            environment: Environment::Testnet,
            addr: None,
            deployments: PathBuf::from("/nonexistent/deployments.json"),
        };
        assert!(matches!(task.addr(&globals(None)), Err(ScriptError::MissingConfig(_))));
        assert!(matches!(
            task.addr(&globals(Some("fuji"))),
            Err(ScriptError::ReadFile(_))
        ));
    }

    #[tokio::test]
    async fn test_deploy_requires_network() {
        let args = DeployArgs {
            artifact: PathBuf::from("artifact.json"),
            deployments: PathBuf::from(DEFAULT_DEPLOYMENTS_PATH),
        };
        let res = deploy(args, &globals(None)).await;
        assert!(matches!(res, Err(ScriptError::MissingConfig(_))));
    }

    #[tokio::test]
    async fn test_deploy_requires_private_key() {
        let args = DeployArgs {
            artifact: PathBuf::from("artifact.json"),
            deployments: PathBuf::from(DEFAULT_DEPLOYMENTS_PATH),
        };
        let res = deploy(args, &globals(Some("fuji"))).await;
        assert!(matches!(res, Err(ScriptError::MissingConfig(_))));
    }
}
