//! Core types for the link-navigation game engine
//!
//! This crate provides the abstractions every strategy is written against:
//! - `Link` / `Page`: the data model for hyperlinks and offline page data
//! - `PageNavigator`: the live game session (browser, server, or simulation)
//! - `GraphDataStore`: read access to a precomputed link graph
//! - `Strategy`: the policy contract driven by `GameRunner`
//! - `SimulatedNavigator`: a deterministic navigator over an in-memory graph

pub mod graph_store;
pub mod model;
pub mod navigator;
pub mod runner;
pub mod simulated;
pub mod strategy;

// Re-export main types for convenience
pub use graph_store::{GraphDataStore, GraphStoreError, InMemoryGraphStore};
pub use model::{topic_title, GameOutcome, Link, Page};
pub use navigator::{NavigatorError, PageNavigator};
pub use runner::{GameRunner, RunnerConfig, SessionState};
pub use simulated::{Round, SimulatedNavigator, World};
pub use strategy::{StepOutcome, StopSignal, Strategy, StrategyError};
