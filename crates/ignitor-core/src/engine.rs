//! Engine telemetry and control boundary.
//!
//! The host game exposes more than one native engine implementation; the
//! controller depends only on this trait, never on a concrete variant.
//! Telemetry methods are read-only per tick; control actions are invoked by
//! the controller when it forces a shutdown, restart, or destruction.

use crate::id::{PartId, ResourceId};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One propellant consumed by an engine, as declared by its native module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Propellant {
    pub name: String,
    pub resource: ResourceId,
}

impl Propellant {
    pub fn new(name: impl Into<String>, resource: ResourceId) -> Self {
        Self {
            name: name.into(),
            resource,
        }
    }
}

/// Read/control interface over one native engine instance.
pub trait EngineHandle {
    // -- Telemetry --

    /// Thrust currently commanded of the engine.
    fn requested_thrust(&self) -> f32;

    /// Main throttle position in [0, 1].
    fn current_throttle(&self) -> f32;

    /// Throttle cannot be varied (solid motors).
    fn throttle_locked(&self) -> bool;

    /// The engine has flamed out.
    fn flameout(&self) -> bool;

    /// The engine can be shut down at all (false for most solids).
    fn allow_shutdown(&self) -> bool;

    /// The engine is activated: its shutdown action is currently live.
    fn is_activated(&self) -> bool;

    /// Temperature of the containing part.
    fn part_temperature(&self) -> f32;

    /// Propellants this engine draws from the resource network.
    fn propellants(&self) -> &[Propellant];

    /// The containing part.
    fn part(&self) -> PartId;

    /// World position of the containing part.
    fn position(&self) -> Vector3<f32>;

    // -- Control actions --

    /// Zero the vessel's main throttle.
    fn cut_throttle(&mut self);

    /// Trigger the flameout visual/audio effect.
    fn burst_flameout_groups(&mut self);

    /// Mark the engine's running effect groups active or inactive.
    fn set_running_groups_active(&mut self, active: bool);

    /// Invoke the engine's native shutdown action.
    fn shutdown(&mut self);

    /// Invoke the engine's native activate action.
    fn activate(&mut self);

    /// Destroy the containing part. Terminal for this engine.
    fn explode(&mut self);
}
