//! Core of an endless lane runner: a chain of recycled track segments filled
//! with hazards, pickups and lane-dodging agents, simulated headless on a
//! `hecs` world at a fixed step.

pub mod agent;
pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod scene;
pub mod score;
pub mod systems;

pub use app::{GameApp, RunSummary};
pub use config::RunnerConfig;
