//! Constants used in the deploy scripts

/// The name of the contract deployed by the scripts
pub const CONTRACT_NAME: &str = "AdvancedONFT721Gasless";

/// The fully qualified path of the contract, as passed to the verifier
pub const VERIFY_CONTRACT_PATH: &str =
    "contracts/token/onft/extension/AdvancedONFT721Gasless.sol:AdvancedONFT721Gasless";

/// The default location of the compiled contract artifact
pub const DEFAULT_ARTIFACT_PATH: &str =
    "artifacts/contracts/token/onft/extension/AdvancedONFT721Gasless.sol/AdvancedONFT721Gasless.json";

/// The default command used to verify a deployed contract
pub const DEFAULT_VERIFIER_COMMAND: &str = "npx hardhat verify";

/// The default directory holding the JSON configuration tables
pub const DEFAULT_CONSTANTS_DIR: &str = "constants";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The file mapping network names to bridging chain ids
pub const CHAIN_IDS_FILE: &str = "chainIds.json";

/// The file mapping network names to LayerZero endpoint addresses
pub const ENDPOINTS_FILE: &str = "layerzeroEndpoints.json";

/// The file mapping network names to stablecoin addresses
pub const STABLECOINS_FILE: &str = "usd.json";

/// The file mapping network names to constructor arguments
pub const CONTRACT_ARGS_FILE: &str = "milady.json";

/// The file holding the constructor arguments used for verification
pub const VERIFY_ARGS_FILE: &str = "miladyXargs.json";

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of bytes in a trusted remote path, i.e. two packed addresses
pub const NUM_BYTES_TRUSTED_REMOTE_PATH: usize = 2 * NUM_BYTES_ADDRESS;

/// The name of the environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The name of the environment variable selecting the target network
pub const NETWORK_ENV_VAR: &str = "NETWORK";
