//! barbt: single-asset, bar-by-bar strategy backtester.
//!
//! Hexagonal architecture: the simulation core lives in [`domain`], port
//! traits in [`ports`], concrete data/config/report implementations in
//! [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
