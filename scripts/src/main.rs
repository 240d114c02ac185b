use clap::Parser;
use onft_scripts::{cli::Cli, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Key material may come from a `.env` file
    dotenvy::dotenv().ok();

    let Cli { globals, command } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    command.run(&globals).await
}
