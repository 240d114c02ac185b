//! Definitions of errors that can occur during the execution of the contract management scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the contract management scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading a file
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
    /// Error parsing a configuration table
    ConfigParsing(String),
    /// A configuration entry required by the operation is absent
    MissingConfig(String),
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error spawning or running the verification command
    VerifierExecution(String),
    /// Trusted remote registration failed for some networks
    TrustSetup(String),
    /// Verification failed for some networks
    Verification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ConfigParsing(s) => write!(f, "error parsing config: {}", s),
            ScriptError::MissingConfig(s) => write!(f, "missing config: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::VerifierExecution(s) => write!(f, "error running verifier: {}", s),
            ScriptError::TrustSetup(s) => write!(f, "trusted remote setup incomplete: {}", s),
            ScriptError::Verification(s) => write!(f, "verification incomplete: {}", s),
        }
    }
}

impl Error for ScriptError {}
