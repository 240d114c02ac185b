//! Scripts for deploying and administering the omnichain NFT contract.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod networks;
pub mod solidity;
pub mod trusted_remote;
pub mod utils;
pub mod verify;
