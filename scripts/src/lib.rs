//! Scripts for deploying and wiring up the Sentinel liquidity controller.

#![deny(missing_docs)]

pub mod artifacts;
pub mod authorization;
pub mod cli;
pub mod client;
mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod networks;
pub mod oracle;
pub mod orchestrator;
pub mod record;
mod solidity;

#[cfg(test)]
mod test_helpers;
