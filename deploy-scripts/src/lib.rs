//! Scripts for deploying and initializing the Balloons token and DEX contracts.

pub mod artifacts;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod interfaces;
pub mod pipeline;
pub mod solidity;
pub mod types;
pub mod utils;
