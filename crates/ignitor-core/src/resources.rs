//! Resource network boundary and tank adapter ports.
//!
//! The vessel's resource network is an external collaborator; the core only
//! needs "request up to N units, learn what was granted" and "list the
//! connected sources for a resource", both atomic per call. Third-party tank
//! metadata (pressurization flags, boil-off rates) arrives through small
//! capability ports with no-op defaults, so the core degrades gracefully to
//! "always unpressurized, no boil-off" when that system is absent.

use crate::fixed::Fixed64;
use crate::id::{PartId, ResourceId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Ignition resource requirements
// ---------------------------------------------------------------------------

/// A named resource requirement, checked independently at ignition time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnitorResource {
    pub name: String,
    /// Units required per ignition attempt.
    pub amount: Fixed64,
}

impl IgnitorResource {
    pub fn new(name: impl Into<String>, amount: Fixed64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    /// The requirement, never negative.
    pub fn required(&self) -> Fixed64 {
        self.amount.max(Fixed64::ZERO)
    }
}

impl std::fmt::Display for IgnitorResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:.3})", self.name, self.required().to_num::<f64>())
    }
}

// ---------------------------------------------------------------------------
// Resource network
// ---------------------------------------------------------------------------

/// One connected propellant source as reported by the resource network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSource {
    pub tank: PartId,
    pub amount: Fixed64,
    pub max_amount: Fixed64,
    /// Network-reported pressurization flag; interpreted through a
    /// [`PressurizationQuery`].
    pub pressurized: bool,
}

/// The vessel's shared resource network.
pub trait ResourceLedger {
    /// Withdraw up to `amount` units of the named resource from connected
    /// tanks. Returns the amount actually granted, in `[0, amount]`.
    fn request(&mut self, resource: &str, amount: Fixed64) -> Fixed64;

    /// Sources currently connected to the engine for `resource`.
    fn connected_sources(&self, resource: ResourceId) -> Vec<TankSource>;
}

// ---------------------------------------------------------------------------
// Pressurization port
// ---------------------------------------------------------------------------

/// Capability port over the third-party tank system's pressurization data.
pub trait PressurizationQuery {
    fn is_pressurized(&self, source: &TankSource) -> bool;
}

/// Default when no tank system is present: nothing is pressurized.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPressurization;

impl PressurizationQuery for NoPressurization {
    fn is_pressurized(&self, _source: &TankSource) -> bool {
        false
    }
}

/// Trusts the network-reported flag; an empty tank holds no pressure head.
#[derive(Debug, Clone, Copy, Default)]
pub struct TankFlagPressurization;

impl PressurizationQuery for TankFlagPressurization {
    fn is_pressurized(&self, source: &TankSource) -> bool {
        source.pressurized && source.amount > Fixed64::ZERO
    }
}

// ---------------------------------------------------------------------------
// Boil-off port
// ---------------------------------------------------------------------------

/// Capability port for the venting acceleration produced by propellant
/// boil-off.
pub trait BoiloffQuery {
    fn venting_acceleration(&self) -> f32;
}

/// Default when no cryogenic tank system is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBoiloff;

impl BoiloffQuery for NoBoiloff {
    fn venting_acceleration(&self) -> f32 {
        0.0
    }
}

/// One cryogenic tank entry for the boil-off model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoiloffTank {
    pub amount: f64,
    pub max_amount: f64,
    /// Fractional loss per degree above the reference temperature,
    /// calibrated against `max_amount`.
    pub loss_rate: f64,
    /// Temperature at which the propellant stops boiling.
    pub reference_temperature: f32,
    /// Mass density of the stored resource.
    pub density: f64,
    /// Current temperature of the containing part.
    pub part_temperature: f32,
}

/// Venting acceleration from boil-off across a vessel's tanks.
///
/// Each warm, non-empty, lossy tank vents `max_amount * loss_rate * ΔT`
/// units (capped at what it holds); the summed mass rate times the venting
/// exhaust velocity, spread over the vessel's mass, is the felt acceleration.
pub fn venting_acceleration(tanks: &[BoiloffTank], venting_velocity: f32, vessel_mass: f32) -> f32 {
    if vessel_mass <= 0.0 {
        return 0.0;
    }
    let mut mass_rate = 0.0f64;
    for tank in tanks {
        if tank.amount > 0.0
            && tank.loss_rate > 0.0
            && tank.part_temperature > tank.reference_temperature
        {
            let delta_t = f64::from(tank.part_temperature - tank.reference_temperature);
            let loss = (tank.max_amount * tank.loss_rate * delta_t).min(tank.amount);
            mass_rate += loss * tank.density;
        }
    }
    mass_rate as f32 * venting_velocity / vessel_mass
}

/// Boil-off port over a snapshot of the vessel's cryogenic tanks.
#[derive(Debug, Clone, Default)]
pub struct VesselBoiloff {
    pub tanks: Vec<BoiloffTank>,
    pub venting_velocity: f32,
    pub vessel_mass: f32,
}

impl BoiloffQuery for VesselBoiloff {
    fn venting_acceleration(&self) -> f32 {
        venting_acceleration(&self.tanks, self.venting_velocity, self.vessel_mass)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
