//! Construction and execution of contract verification commands
//!
//! Verification is delegated to an external tool, invoked once per network.
//! The tool is executed directly, without a shell; the rendered command line
//! is only used for logging.

use std::{
    fmt::{self, Display},
    process::{ExitStatus, Stdio},
    str::FromStr,
};

use alloy::primitives::Address;
use itertools::Itertools;
use serde_json::Value;
use tokio::{process::Command, task::JoinSet};
use tracing::{error, info, warn};

use crate::{
    config::{ConfigTables, VerifyArgs},
    errors::ScriptError,
};

/// The external command performing the verification, e.g. `npx hardhat verify`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierInvocation {
    /// The program to execute
    program: String,
    /// Arguments placed before the per-contract arguments
    prefix: Vec<String>,
}

impl FromStr for VerifierInvocation {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| ScriptError::VerifierExecution("empty verifier command".to_string()))?;

        Ok(Self {
            program,
            prefix: parts.collect(),
        })
    }
}

/// A single command line argument
#[derive(Debug, Clone, PartialEq, Eq)]
struct Arg {
    /// The value passed to the process
    value: String,
    /// Whether the value is quoted when the command line is rendered
    quoted: bool,
}

impl Arg {
    /// An argument rendered as-is
    fn plain(value: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            quoted: false,
        }
    }

    /// An argument rendered in double quotes
    fn quoted(value: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            quoted: true,
        }
    }

    /// An address, in the lowercase hex form used by the configuration tables
    fn address(addr: Address) -> Self {
        Self::plain(format!("{addr:#x}"))
    }
}

impl Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// A verification command for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCommand {
    /// The network verified by this command
    pub network: String,
    /// The program to execute
    program: String,
    /// The arguments of the program
    args: Vec<Arg>,
}

impl VerifyCommand {
    /// The program to execute
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the program, unquoted
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.value.as_str())
    }
}

impl Display for VerifyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.iter().join(" "))?;
        }
        Ok(())
    }
}

/// Render a JSON value the way it appears on a command line
fn json_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build the command verifying the contract at `addr` on `network`
///
/// Positional verification arguments are passed through, each quoted. Named
/// arguments are completed with the network's endpoint and stablecoin, the
/// stablecoin falling back to the zero address.
pub fn build_verify_command(
    invocation: &VerifierInvocation,
    contract_path: &str,
    network: &str,
    addr: Address,
    tables: &ConfigTables,
) -> Result<VerifyCommand, ScriptError> {
    let mut args: Vec<Arg> = invocation.prefix.iter().map(Arg::plain).collect();
    args.extend([
        Arg::plain("--contract"),
        Arg::quoted(contract_path),
        Arg::plain("--network"),
        Arg::plain(network),
        Arg::address(addr),
    ]);

    match tables.verify_args() {
        VerifyArgs::Positional(values) => {
            args.extend(values.iter().map(|v| Arg::quoted(json_arg(v))));
        }
        VerifyArgs::Named(named) => {
            let endpoint = tables.endpoint(network)?;
            let stablecoin = tables.stablecoin(network);
            args.extend([
                Arg::quoted(&named.name),
                Arg::plain(&named.symbol),
                Arg::address(endpoint),
                Arg::plain(named.start_mint_id),
                Arg::plain(named.end_mint_id),
                Arg::plain(named.max_tokens_per_mint),
                Arg::quoted(&named.base_token_uri),
                Arg::quoted(&named.hidden_uri),
                Arg::address(stablecoin),
            ]);
        }
    }

    Ok(VerifyCommand {
        network: network.to_string(),
        program: invocation.program.clone(),
        args,
    })
}

/// The result of verifying on one network
#[derive(Debug)]
pub struct VerifyOutcome {
    /// The network
    pub network: String,
    /// The exit status of the verifier, or the reason it could not run
    pub result: Result<ExitStatus, ScriptError>,
}

impl VerifyOutcome {
    /// Whether the verifier ran and exited successfully
    pub fn succeeded(&self) -> bool {
        matches!(&self.result, Ok(status) if status.success())
    }
}

/// The outcomes of a verification batch
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// One outcome per network
    pub outcomes: Vec<VerifyOutcome>,
}

impl VerifyReport {
    /// The networks on which verification did not succeed
    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded())
            .map(|outcome| outcome.network.as_str())
            .collect()
    }

    /// Convert the report into an error if verification failed anywhere
    pub fn into_result(self) -> Result<(), ScriptError> {
        let failed = self.failed();
        if failed.is_empty() {
            return Ok(());
        }

        Err(ScriptError::Verification(format!(
            "{} of {} networks failed: {}",
            failed.len(),
            self.outcomes.len(),
            failed.join(", ")
        )))
    }
}

/// Run every command concurrently and collect the exit statuses
///
/// Outcomes are reported in the order the commands were given. A command
/// whose task did not complete is reported as failed.
pub async fn run_verify_batch(commands: Vec<VerifyCommand>) -> VerifyReport {
    let networks: Vec<String> = commands.iter().map(|command| command.network.clone()).collect();

    let mut tasks = JoinSet::new();
    for (idx, command) in commands.into_iter().enumerate() {
        tasks.spawn(async move {
            info!("{}", command);
            let result = run_verify_command(&command).await;
            let outcome = VerifyOutcome {
                network: command.network,
                result,
            };
            (idx, outcome)
        });
    }

    let mut finished = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => finished.push(outcome),
            Err(e) => error!("verification task aborted: {}", e),
        }
    }

    VerifyReport {
        outcomes: order_outcomes(networks, finished),
    }
}

/// Order the finished outcomes by command index, filling in a failure for
/// every command that has none
fn order_outcomes(
    networks: Vec<String>,
    finished: Vec<(usize, VerifyOutcome)>,
) -> Vec<VerifyOutcome> {
    let mut slots: Vec<Option<VerifyOutcome>> = networks.iter().map(|_| None).collect();
    for (idx, outcome) in finished {
        if let Some(slot) = slots.get_mut(idx) {
            *slot = Some(outcome);
        }
    }

    networks
        .into_iter()
        .zip(slots)
        .map(|(network, slot)| {
            slot.unwrap_or_else(|| VerifyOutcome {
                result: Err(ScriptError::VerifierExecution(format!(
                    "[{}] verification task did not complete",
                    network
                ))),
                network,
            })
        })
        .collect()
}

/// Run a single verification command, logging its output under the network name
async fn run_verify_command(command: &VerifyCommand) -> Result<ExitStatus, ScriptError> {
    let output = Command::new(command.program())
        .args(command.args())
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ScriptError::VerifierExecution(format!("{}: {}", command.program(), e)))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        info!("[{}] {}", command.network, line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        warn!("[{}] {}", command.network, line);
    }

    Ok(output.status)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use alloy::primitives::address;

    use crate::{
        config::{
            tests::{test_tables, TEST_ARGS},
            ConfigTables,
        },
        constants::{DEFAULT_VERIFIER_COMMAND, VERIFY_CONTRACT_PATH},
        errors::ScriptError,
    };

    use super::{
        build_verify_command, order_outcomes, run_verify_batch, VerifierInvocation, VerifyOutcome,
        VerifyReport,
    };

    #[test]
    fn test_named_args_command() {
        let tables = test_tables(TEST_ARGS);
        let invocation = VerifierInvocation::from_str(DEFAULT_VERIFIER_COMMAND).unwrap();
        let addr = address!("abcdef0123456789abcdef0123456789abcdef01");

        let command =
            build_verify_command(&invocation, VERIFY_CONTRACT_PATH, "goerli", addr, &tables)
                .unwrap();

        assert_eq!(
            command.to_string(),
            "npx hardhat verify \
             --contract \"contracts/token/onft/extension/AdvancedONFT721Gasless.sol:AdvancedONFT721Gasless\" \
             --network goerli 0xabcdef0123456789abcdef0123456789abcdef01 \
             \"Milady\" MIL 0xbfd2135bffbb0b5378b56643c2df8a87552bfa23 1 100 5 \
             \"ipfs://x/\" \"ipfs://y\" 0x07865c6e87b9f70255377e024ace6630c1eaa37f"
        );
        assert_eq!(command.program(), "npx");
        assert_eq!(command.args().nth(3), Some(VERIFY_CONTRACT_PATH));
    }

    #[test]
    fn test_bundled_addresses_kept_as_configured() {
        let tables = ConfigTables::bundled().unwrap();
        let invocation = VerifierInvocation::from_str(DEFAULT_VERIFIER_COMMAND).unwrap();
        let addr = address!("abcdef0123456789abcdef0123456789abcdef01");

        let command =
            build_verify_command(&invocation, VERIFY_CONTRACT_PATH, "ethereum", addr, &tables)
                .unwrap();
        let rendered = command.to_string();

        for literal in [
            "0xabcdef0123456789abcdef0123456789abcdef01",
            "0x66a71dcef29a0ffbdbe3c6a460a3b5bc225cd675",
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
        ] {
            assert!(rendered.contains(literal), "{literal} missing from `{rendered}`");
        }
    }

    #[test]
    fn test_named_args_zero_stablecoin() {
        let tables = test_tables(TEST_ARGS);
        let invocation = VerifierInvocation::from_str(DEFAULT_VERIFIER_COMMAND).unwrap();
        let addr = address!("4444444444444444444444444444444444444444");

        let command =
            build_verify_command(&invocation, VERIFY_CONTRACT_PATH, "fuji", addr, &tables).unwrap();

        assert_eq!(
            command.args().last(),
            Some("0x0000000000000000000000000000000000000000")
        );
    }

    #[test]
    fn test_named_args_require_endpoint() {
        let tables = test_tables(TEST_ARGS);
        let invocation = VerifierInvocation::from_str(DEFAULT_VERIFIER_COMMAND).unwrap();
        let addr = address!("4444444444444444444444444444444444444444");

        let res = build_verify_command(&invocation, VERIFY_CONTRACT_PATH, "mumbai", addr, &tables);
        assert!(matches!(res, Err(ScriptError::MissingConfig(_))));
    }

    #[test]
    fn test_positional_args_command() {
        let tables = test_tables(r#"["Milady", "MIL", 1, "ipfs://x/"]"#);
        let invocation = VerifierInvocation::from_str("verifier").unwrap();
        let addr = address!("4444444444444444444444444444444444444444");

        // Positional args do not need an endpoint entry
        let command =
            build_verify_command(&invocation, "C.sol:C", "mumbai", addr, &tables).unwrap();

        assert_eq!(
            command.to_string(),
            "verifier --contract \"C.sol:C\" --network mumbai \
             0x4444444444444444444444444444444444444444 \"Milady\" \"MIL\" \"1\" \"ipfs://x/\""
        );
    }

    #[test]
    fn test_empty_verifier_rejected() {
        assert!(VerifierInvocation::from_str("  ").is_err());
    }

    #[test]
    fn test_incomplete_tasks_reported_failed() {
        let networks = vec!["goerli".to_string(), "fuji".to_string(), "mumbai".to_string()];
        let finished = vec![(
            2,
            VerifyOutcome {
                network: "mumbai".to_string(),
                result: Err(ScriptError::VerifierExecution("boom".to_string())),
            },
        )];

        let report = VerifyReport {
            outcomes: order_outcomes(networks, finished),
        };
        let networks: Vec<&str> = report.outcomes.iter().map(|o| o.network.as_str()).collect();
        assert_eq!(networks, vec!["goerli", "fuji", "mumbai"]);
        assert_eq!(report.failed(), vec!["goerli", "fuji", "mumbai"]);
        assert!(matches!(report.into_result(), Err(ScriptError::Verification(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_batch_collects_exit_statuses() {
        let tables = test_tables(TEST_ARGS);
        let addr = address!("4444444444444444444444444444444444444444");
        let ok = VerifierInvocation::from_str("true").unwrap();
        let fail = VerifierInvocation::from_str("false").unwrap();
        let missing = VerifierInvocation::from_str("/nonexistent/verifier").unwrap();

        let commands = vec![
            build_verify_command(&ok, VERIFY_CONTRACT_PATH, "goerli", addr, &tables).unwrap(),
            build_verify_command(&fail, VERIFY_CONTRACT_PATH, "fuji", addr, &tables).unwrap(),
            build_verify_command(&missing, VERIFY_CONTRACT_PATH, "goerli", addr, &tables).unwrap(),
        ];

        let report = run_verify_batch(commands).await;
        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].succeeded());
        assert!(!report.outcomes[1].succeeded());
        assert!(matches!(
            report.outcomes[2].result,
            Err(ScriptError::VerifierExecution(_))
        ));
        assert_eq!(report.failed(), vec!["fuji", "goerli"]);
        assert!(matches!(report.into_result(), Err(ScriptError::Verification(_))));
    }
}
