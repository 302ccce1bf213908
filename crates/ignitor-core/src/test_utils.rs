//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so the doubles
//! are available to unit tests and, via the `test-utils` feature, to
//! integration tests.

use crate::config::IgnitorSettings;
use crate::controller::{EngineIgnitionController, EngineIgnitorConfig, TickContext};
use crate::engine::{EngineHandle, Propellant};
use crate::fixed::{Fixed64, Ticks, f64_to_fixed64};
use crate::id::{PartId, ResourceId};
use crate::registry::{ChargePackRegistry, ExternalIgnitorRegistry};
use crate::resources::{
    NoBoiloff, NoPressurization, ResourceLedger, TankFlagPressurization, TankSource,
};
use crate::rng::SimRng;
use ignitor_ullage::VesselFrame;
use nalgebra::Vector3;
use std::collections::HashMap;

pub fn fixed(v: f64) -> Fixed64 {
    f64_to_fixed64(v)
}

// ===========================================================================
// Engine double
// ===========================================================================

/// Scripted engine: telemetry is plain fields, control actions are recorded.
#[derive(Debug, Clone)]
pub struct MockEngine {
    pub requested_thrust: f32,
    pub current_throttle: f32,
    pub throttle_locked: bool,
    pub flameout: bool,
    pub allow_shutdown: bool,
    pub activated: bool,
    pub part_temperature: f32,
    pub propellants: Vec<Propellant>,
    pub part: PartId,
    pub position: Vector3<f32>,

    pub cut_throttle_calls: u32,
    pub flameout_bursts: u32,
    pub shutdown_calls: u32,
    pub activate_calls: u32,
    pub running_groups_active: Option<bool>,
    pub exploded: bool,
}

impl MockEngine {
    /// An activated engine commanding full thrust.
    pub fn firing() -> Self {
        Self {
            requested_thrust: 100.0,
            current_throttle: 1.0,
            throttle_locked: false,
            flameout: false,
            allow_shutdown: true,
            activated: true,
            part_temperature: 300.0,
            propellants: Vec::new(),
            part: PartId(1),
            position: Vector3::zeros(),
            cut_throttle_calls: 0,
            flameout_bursts: 0,
            shutdown_calls: 0,
            activate_calls: 0,
            running_groups_active: None,
            exploded: false,
        }
    }

    /// A deactivated engine with no thrust commanded.
    pub fn idle() -> Self {
        Self {
            requested_thrust: 0.0,
            current_throttle: 0.0,
            activated: false,
            ..Self::firing()
        }
    }
}

impl EngineHandle for MockEngine {
    fn requested_thrust(&self) -> f32 {
        self.requested_thrust
    }
    fn current_throttle(&self) -> f32 {
        self.current_throttle
    }
    fn throttle_locked(&self) -> bool {
        self.throttle_locked
    }
    fn flameout(&self) -> bool {
        self.flameout
    }
    fn allow_shutdown(&self) -> bool {
        self.allow_shutdown
    }
    fn is_activated(&self) -> bool {
        self.activated
    }
    fn part_temperature(&self) -> f32 {
        self.part_temperature
    }
    fn propellants(&self) -> &[Propellant] {
        &self.propellants
    }
    fn part(&self) -> PartId {
        self.part
    }
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn cut_throttle(&mut self) {
        self.cut_throttle_calls += 1;
        self.current_throttle = 0.0;
    }
    fn burst_flameout_groups(&mut self) {
        self.flameout_bursts += 1;
    }
    fn set_running_groups_active(&mut self, active: bool) {
        self.running_groups_active = Some(active);
    }
    fn shutdown(&mut self) {
        self.shutdown_calls += 1;
        self.activated = false;
    }
    fn activate(&mut self) {
        self.activate_calls += 1;
        self.activated = true;
    }
    fn explode(&mut self) {
        self.exploded = true;
        self.activated = false;
    }
}

// ===========================================================================
// Ledger double
// ===========================================================================

/// Ledger granting a fixed fraction of every request, with scripted
/// connected sources.
#[derive(Debug, Clone)]
pub struct StaticLedger {
    pub grant_ratio: f64,
    pub requests: Vec<(String, Fixed64)>,
    pub sources: HashMap<ResourceId, Vec<TankSource>>,
}

impl StaticLedger {
    /// Grants every request in full.
    pub fn full() -> Self {
        Self::fraction(1.0)
    }

    /// Grants the given fraction of every request.
    pub fn fraction(grant_ratio: f64) -> Self {
        Self {
            grant_ratio,
            requests: Vec::new(),
            sources: HashMap::new(),
        }
    }

    pub fn with_source(mut self, resource: ResourceId, source: TankSource) -> Self {
        self.sources.entry(resource).or_default().push(source);
        self
    }
}

impl ResourceLedger for StaticLedger {
    fn request(&mut self, resource: &str, amount: Fixed64) -> Fixed64 {
        self.requests.push((resource.to_string(), amount));
        amount * f64_to_fixed64(self.grant_ratio)
    }

    fn connected_sources(&self, resource: ResourceId) -> Vec<TankSource> {
        self.sources.get(&resource).cloned().unwrap_or_default()
    }
}

// ===========================================================================
// World harness
// ===========================================================================

/// Owns every tick collaborator so scenario tests stay short.
pub struct TestWorld {
    pub engine: MockEngine,
    pub ledger: StaticLedger,
    pub ignitors: ExternalIgnitorRegistry,
    pub packs: ChargePackRegistry,
    pub settings: IgnitorSettings,
    pub rng: SimRng,
    pub frame: VesselFrame,
    pub dt: f32,
    pub tick: Ticks,
    /// Interpret network pressurization flags instead of the no-op port.
    pub trust_tank_flags: bool,
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            engine: MockEngine::firing(),
            ledger: StaticLedger::full(),
            ignitors: ExternalIgnitorRegistry::new(),
            packs: ChargePackRegistry::new(),
            settings: IgnitorSettings::default(),
            rng: SimRng::new(1),
            frame: VesselFrame::default(),
            dt: 0.02,
            tick: 0,
            trust_tank_flags: false,
        }
    }

    /// Run one controller tick against this world.
    pub fn step(&mut self, controller: &mut EngineIgnitionController) {
        let flag_port = TankFlagPressurization;
        let noop_port = NoPressurization;
        let mut ctx = TickContext {
            engine: &mut self.engine,
            ledger: &mut self.ledger,
            ignitors: &mut self.ignitors,
            pressurization: if self.trust_tank_flags {
                &flag_port
            } else {
                &noop_port
            },
            boiloff: &NoBoiloff,
            settings: &self.settings,
            rng: &mut self.rng,
            frame: self.frame,
            dt: self.dt,
            tick: self.tick,
        };
        controller.tick(&mut ctx);
        self.tick += 1;
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Controller constructors
// ===========================================================================

/// A controller with `n` charges and the ullage simulation switched off.
pub fn controller_with_charges(n: u32) -> EngineIgnitionController {
    EngineIgnitionController::new(EngineIgnitorConfig {
        ignitions_available: crate::budget::ChargeCount::Count(n),
        use_ullage_simulation: false,
        ..EngineIgnitorConfig::default()
    })
}

/// A controller with unlimited charges and the ullage simulation off.
pub fn controller_unlimited() -> EngineIgnitionController {
    EngineIgnitionController::new(EngineIgnitorConfig {
        use_ullage_simulation: false,
        ..EngineIgnitorConfig::default()
    })
}

/// A pressure-fed controller with unlimited charges.
pub fn controller_pressure_fed() -> EngineIgnitionController {
    EngineIgnitionController::new(EngineIgnitorConfig {
        is_pressure_fed: true,
        ..EngineIgnitorConfig::default()
    })
}

/// Drive a controller from Invalid into NotIgnited with the engine idle.
pub fn settle_to_not_ignited(world: &mut TestWorld, controller: &mut EngineIgnitionController) {
    let saved = world.engine.clone();
    world.engine = MockEngine {
        requested_thrust: 0.0,
        current_throttle: 0.0,
        ..saved.clone()
    };
    world.step(controller);
    world.engine = saved;
}
