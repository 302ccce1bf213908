//! Ignitor Core -- the ignition decision engine for liquid-fueled rockets.
//!
//! This crate models whether an engine can ignite and keep burning given a
//! finite supply of ignition charges, optional resource requirements, and
//! the fuel-flow stability produced by the ullage simulator in
//! [`ignitor_ullage`].
//!
//! # Per-Tick Pipeline
//!
//! Each call to [`controller::EngineIgnitionController::tick`] advances one
//! engine by one fixed timestep:
//!
//! 1. **Ullage** -- Integrate the continuous band model with this tick's
//!    kinematics and boil-off venting.
//! 2. **Assess** -- Derive effective fuel-flow stability, applying the
//!    pressure-fed override from connected-source pressurization.
//! 3. **Desire** -- Recompute the desired ignition state from raw engine
//!    telemetry.
//! 4. **Transition** -- Evaluate the discrete transitions: ignition attempts
//!    spend charges, request resources, and draw randomness; hot engines
//!    relight for free; everything else is identity.
//! 5. **Enforce** -- Force a shutdown on failed or unfunded attempts, and
//!    run the sustained-burn instability check while ignited.
//!
//! Engines are processed independently and sequentially; within one tick the
//! simulator update always completes before the transition logic runs.
//!
//! # Key Types
//!
//! - [`controller::EngineIgnitionController`] -- Per-engine state machine.
//! - [`controller::TickContext`] -- Injected collaborators for one tick.
//! - [`budget::IgnitionBudget`] -- Finite/unlimited charge accounting.
//! - [`registry::ExternalIgnitorRegistry`] -- Injected, per-tick-pruned
//!   collection of external igniter devices.
//! - [`engine::EngineHandle`] -- Telemetry/control boundary over the host's
//!   native engine variants.
//! - [`resources::ResourceLedger`] -- Resource network boundary, plus the
//!   pressurization and boil-off capability ports.
//! - [`rng::SimRng`] -- Deterministic draws for every probabilistic decision.

pub mod budget;
pub mod config;
pub mod controller;
pub mod engine;
pub mod event;
pub mod fixed;
pub mod id;
pub mod registry;
pub mod resources;
pub mod rng;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
