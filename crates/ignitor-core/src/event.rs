//! Ignition events, fired on state transitions.
//!
//! Events accumulate on the controller during a tick and are drained by the
//! host afterward (UI messages, audio, telemetry). They fire only on
//! transitions, never every tick.

use crate::budget::ChargeCount;
use crate::fixed::{Fixed64, Ticks};
use serde::{Deserialize, Serialize};

/// Why the controller forced an engine to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShutdownReason {
    /// An ignition attempt failed; shut down rather than leave the engine
    /// in limbo. The operator may retry.
    IgnitionFailed,
    /// No charges remain and no external source is reachable.
    ChargesExhausted,
    /// The sustained-burn instability check failed.
    UnstableFuelFlow,
}

/// A discrete outcome of the ignition state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum IgnitionEvent {
    IgnitionSucceeded {
        tick: Ticks,
    },
    IgnitionFailed {
        /// The attempt's combined success potential at draw time.
        potential: Fixed64,
        tick: Ticks,
    },
    /// An attempt was rejected outright: no charges and no external source.
    /// No resources were requested and no randomness was drawn.
    IgnitionBlocked {
        tick: Ticks,
    },
    ChargeConsumed {
        remaining: ChargeCount,
        tick: Ticks,
    },
    /// Relight from residual heat; no charge consumed.
    AutoIgnited {
        tick: Ticks,
    },
    EngineShutdown {
        reason: ShutdownReason,
        tick: Ticks,
    },
    /// The containing part was destroyed by sustained instability.
    EngineDestroyed {
        tick: Ticks,
    },
    IgnitorReloaded {
        added: u32,
        tick: Ticks,
    },
}
