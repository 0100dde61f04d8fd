//! # MedChain RPC
//!
//! Reaches an Ethereum-compatible node for the submission gateway:
//! - [`abi`] encodes the three remote operations as contract calldata
//! - [`client::JsonRpcClient`] implements `medchain_core::ChainClient` over JSON-RPC

#![warn(rust_2018_idioms)]

pub mod abi;
pub mod client;

pub use client::JsonRpcClient;
