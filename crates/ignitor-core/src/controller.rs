//! Per-engine ignition state machine.
//!
//! The controller is the authority on whether thrust is permitted. Each tick
//! it advances the ullage simulator, derives an effective fuel-flow
//! stability (with pressure-fed overrides), recomputes the desired ignition
//! state from raw telemetry, and evaluates the discrete transitions. An
//! ignition attempt spends charges, requests resources, and draws
//! randomness; the outcome is then enforced on the engine, up to forced
//! shutdown or destruction of the containing part.
//!
//! All collaborators arrive through [`TickContext`]; the controller holds no
//! global state.

use crate::budget::{ChargeCount, IgnitionBudget};
use crate::config::IgnitorSettings;
use crate::engine::EngineHandle;
use crate::event::{IgnitionEvent, ShutdownReason};
use crate::fixed::{Fixed64, Ticks};
use crate::id::IgnitorType;
use crate::registry::{ChargePackRegistry, ExternalIgnitorRegistry};
use crate::resources::{BoiloffQuery, IgnitorResource, PressurizationQuery, ResourceLedger};
use crate::rng::SimRng;
use ignitor_ullage::{FuelFlowState, UllageSimulator, VesselFrame};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Ignition state of one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineIgnitionState {
    /// Pre-start; resolved on the first tick.
    #[default]
    Invalid,
    NotIgnited,
    /// Hot enough to relight without spending a charge.
    HighTemp,
    Ignited,
}

impl std::fmt::Display for EngineIgnitionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invalid => "Invalid",
            Self::NotIgnited => "Not Ignited",
            Self::HighTemp => "High Temp",
            Self::Ignited => "Ignited",
        };
        f.write_str(s)
    }
}

/// Fuel-flow indicator for one engine, as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelFlowStatus {
    /// Pressure-fed with every propellant on a pressurized source.
    Pressurized,
    /// Pressure-fed with some propellant lacking a pressurized source.
    Unpressurized,
    /// Pump-fed; the label tracks the simulator.
    Simulated(FuelFlowState),
}

impl std::fmt::Display for FuelFlowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pressurized => f.write_str("Pressurized"),
            Self::Unpressurized => f.write_str("Unpressurized"),
            Self::Simulated(state) => state.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-engine configuration
// ---------------------------------------------------------------------------

/// The per-engine persisted configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineIgnitorConfig {
    pub ignitions_available: ChargeCount,
    /// Part temperature at or above which the engine relights for free.
    pub auto_ignition_temperature: f32,
    pub ignitor_type: IgnitorType,
    pub use_ullage_simulation: bool,
    pub is_pressure_fed: bool,
    /// Ordered resource requirements, each checked independently per attempt.
    pub ignitor_resources: Vec<IgnitorResource>,
}

impl Default for EngineIgnitorConfig {
    fn default() -> Self {
        Self {
            ignitions_available: ChargeCount::Unlimited,
            auto_ignition_temperature: 800.0,
            ignitor_type: IgnitorType::default(),
            use_ullage_simulation: true,
            is_pressure_fed: false,
            ignitor_resources: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tick context
// ---------------------------------------------------------------------------

/// Everything one engine tick needs, injected by the host.
pub struct TickContext<'a> {
    pub engine: &'a mut dyn EngineHandle,
    pub ledger: &'a mut dyn ResourceLedger,
    pub ignitors: &'a mut ExternalIgnitorRegistry,
    pub pressurization: &'a dyn PressurizationQuery,
    pub boiloff: &'a dyn BoiloffQuery,
    pub settings: &'a IgnitorSettings,
    pub rng: &'a mut SimRng,
    /// Tank-frame kinematics for this tick.
    pub frame: VesselFrame,
    pub dt: f32,
    pub tick: Ticks,
}

// ---------------------------------------------------------------------------
// Reload errors
// ---------------------------------------------------------------------------

/// Why a charge replenishment did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReloadError {
    #[error("ignitor already at capacity")]
    AlreadyFull,

    #[error("no nearby ignitor unit")]
    NoSourceNearby,

    #[error("no matched ignitor unit")]
    NoMatchingSource,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The authoritative per-engine ignition state machine.
#[derive(Debug, Clone)]
pub struct EngineIgnitionController {
    config: EngineIgnitorConfig,
    budget: IgnitionBudget,
    state: EngineIgnitionState,
    ullage: UllageSimulator,
    flow: FuelFlowStatus,
    events: Vec<IgnitionEvent>,
    destroyed: bool,
}

impl EngineIgnitionController {
    /// A fresh controller with a full charge budget and settled bands.
    pub fn new(config: EngineIgnitorConfig) -> Self {
        let budget = IgnitionBudget::new(config.ignitions_available);
        Self::with_budget(config, budget)
    }

    /// Rebuild a controller from persisted fields.
    pub fn from_persisted(config: EngineIgnitorConfig, remaining: ChargeCount) -> Self {
        let budget = IgnitionBudget::from_persisted(config.ignitions_available, remaining);
        Self::with_budget(config, budget)
    }

    fn with_budget(config: EngineIgnitorConfig, budget: IgnitionBudget) -> Self {
        Self {
            config,
            budget,
            state: EngineIgnitionState::Invalid,
            ullage: UllageSimulator::new(),
            flow: FuelFlowStatus::Simulated(FuelFlowState::VeryStable),
            events: Vec::new(),
            destroyed: false,
        }
    }

    // -- Accessors --

    pub fn state(&self) -> EngineIgnitionState {
        self.state
    }

    pub fn fuel_flow_status(&self) -> FuelFlowStatus {
        self.flow
    }

    pub fn config(&self) -> &EngineIgnitorConfig {
        &self.config
    }

    pub fn budget(&self) -> &IgnitionBudget {
        &self.budget
    }

    pub fn remaining(&self) -> ChargeCount {
        self.budget.remaining()
    }

    pub fn available(&self) -> ChargeCount {
        self.budget.available()
    }

    pub fn ullage(&self) -> &UllageSimulator {
        &self.ullage
    }

    /// The containing part has been destroyed; the controller is inert.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Take the events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<IgnitionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Re-settle the bands and restart the state machine (engine activation
    /// or vessel reload).
    pub fn reset(&mut self) {
        self.ullage.reset();
        self.state = EngineIgnitionState::Invalid;
        self.flow = FuelFlowStatus::Simulated(FuelFlowState::VeryStable);
    }

    /// Return the charge budget to capacity (vessel re-configured/edited).
    pub fn reset_budget(&mut self) {
        self.budget.reset();
    }

    /// Raise charge capacity from a consumable ignitor unit mounted on the
    /// engine.
    pub fn extend_available(&mut self, extra: u32) {
        self.budget.extend_available(extra);
    }

    fn ullage_active(&self, settings: &IgnitorSettings) -> bool {
        settings.simulate_ullage && self.config.use_ullage_simulation
    }

    // -- Tick --

    /// Advance this engine by one fixed timestep.
    ///
    /// The simulator update completes before any transition logic runs; the
    /// transitions consume the simulator's latest stability.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if self.destroyed {
            return;
        }

        // Continuous integration first.
        let venting_acc = ctx.boiloff.venting_acceleration();
        self.ullage
            .update(&ctx.frame, ctx.dt, venting_acc, &ctx.settings.ullage);
        let stability = self.assess_fuel_flow(ctx);

        // Desired state from raw telemetry.
        let old_state = self.state;
        let mut new_state = self.desired_state(ctx.engine);

        ctx.ignitors.prune();
        let external = ctx.ignitors.find_match(
            &self.config.ignitor_type,
            ctx.engine.part(),
            ctx.engine.position(),
            &self.config.ignitor_resources,
        );

        let mut prefer_shutdown = false;

        // Discrete transitions.
        if old_state == EngineIgnitionState::NotIgnited && new_state == EngineIgnitionState::Ignited
        {
            if self.budget.has_charges() || external.is_some() {
                let external_provides = external
                    .and_then(|id| ctx.ignitors.get(id))
                    .is_some_and(|unit| unit.provides_resources);

                let mut potential = Fixed64::from_num(1);
                if !self.config.ignitor_resources.is_empty() {
                    if external_provides {
                        if let Some(id) = external {
                            ctx.ignitors.consume_stock(id, &self.config.ignitor_resources);
                        }
                    } else {
                        for resource in &self.config.ignitor_resources {
                            let required = resource.required();
                            if required > Fixed64::ZERO {
                                let granted = ctx.ledger.request(&resource.name, required);
                                potential = potential.min(granted / required);
                            }
                        }
                    }
                }
                if self.ullage_active(ctx.settings) {
                    potential *= Fixed64::from_num(stability);
                }

                if ctx.rng.roll(potential) {
                    self.events
                        .push(IgnitionEvent::IgnitionSucceeded { tick: ctx.tick });
                } else {
                    new_state = EngineIgnitionState::NotIgnited;
                    prefer_shutdown = true;
                    self.events.push(IgnitionEvent::IgnitionFailed {
                        potential,
                        tick: ctx.tick,
                    });
                }

                // The ignitor is spent whether or not it lit, unless an
                // external device did the work.
                if external.is_none() {
                    self.budget.consume();
                    self.events.push(IgnitionEvent::ChargeConsumed {
                        remaining: self.budget.remaining(),
                        tick: ctx.tick,
                    });
                }
            } else {
                // Out of charges with nothing external: rejected outright,
                // nothing requested, nothing drawn.
                new_state = EngineIgnitionState::NotIgnited;
                self.events
                    .push(IgnitionEvent::IgnitionBlocked { tick: ctx.tick });
            }
        } else if old_state == EngineIgnitionState::HighTemp
            && new_state == EngineIgnitionState::Ignited
        {
            self.events
                .push(IgnitionEvent::AutoIgnited { tick: ctx.tick });
        }

        self.state = new_state;

        // Enforce the outcome on the engine.
        if self.state == EngineIgnitionState::NotIgnited
            && ((self.budget.is_exhausted() && external.is_none()) || prefer_shutdown)
        {
            let reason = if prefer_shutdown {
                ShutdownReason::IgnitionFailed
            } else {
                ShutdownReason::ChargesExhausted
            };
            self.force_shutdown(ctx.engine, reason, ctx.tick);
        } else if self.state == EngineIgnitionState::Ignited
            && self.ullage_active(ctx.settings)
            && ctx.settings.shutdown_when_unstable
        {
            self.check_sustained_burn(ctx, stability);
        }
    }

    /// Desired state from raw telemetry, before transition rules.
    fn desired_state(&self, engine: &dyn EngineHandle) -> EngineIgnitionState {
        let cold_state = if engine.part_temperature() >= self.config.auto_ignition_temperature {
            EngineIgnitionState::HighTemp
        } else {
            EngineIgnitionState::NotIgnited
        };

        let stopped = !engine.is_activated() && engine.allow_shutdown();
        if engine.requested_thrust() == 0.0 || engine.flameout() || stopped {
            return cold_state;
        }
        // Residual telemetry with the throttle closed is not an ignition
        // command; solids with a locked throttle are exempt.
        if self.state != EngineIgnitionState::Ignited
            && engine.current_throttle() <= 0.0
            && !engine.throttle_locked()
        {
            return cold_state;
        }
        EngineIgnitionState::Ignited
    }

    /// Effective fuel-flow stability, with the pressure-fed override, and
    /// the matching operator-facing label.
    fn assess_fuel_flow(&mut self, ctx: &mut TickContext<'_>) -> f32 {
        let fuel_pressurized = {
            let ledger: &dyn ResourceLedger = &*ctx.ledger;
            let query = ctx.pressurization;
            ctx.engine.propellants().iter().all(|propellant| {
                ledger
                    .connected_sources(propellant.resource)
                    .iter()
                    .any(|source| query.is_pressurized(source))
            })
        };

        if self.ullage_active(ctx.settings) {
            if self.config.is_pressure_fed {
                if fuel_pressurized {
                    self.flow = FuelFlowStatus::Pressurized;
                    1.0
                } else {
                    self.flow = FuelFlowStatus::Unpressurized;
                    0.0
                }
            } else if fuel_pressurized {
                self.flow = FuelFlowStatus::Simulated(FuelFlowState::VeryStable);
                1.0
            } else {
                let probability = self.ullage.fuel_flow_stability();
                self.flow = FuelFlowStatus::Simulated(FuelFlowState::classify(probability));
                probability
            }
        } else {
            self.flow = if self.config.is_pressure_fed {
                FuelFlowStatus::Pressurized
            } else {
                FuelFlowStatus::Simulated(FuelFlowState::VeryStable)
            };
            1.0
        }
    }

    /// Sustained-burn instability: the per-tick survival probability is the
    /// stability raised to a small fractional exponent, spreading failures
    /// over many ticks.
    fn check_sustained_burn(&mut self, ctx: &mut TickContext<'_>, stability: f32) {
        let survival = Fixed64::from_num(stability.powf(0.03));
        if ctx.rng.roll(survival) {
            return;
        }
        if ctx.settings.explode_when_too_unstable {
            let explode_survival = Fixed64::from_num(stability.powf(0.01) + 0.01);
            if !ctx.rng.roll(explode_survival) {
                ctx.engine.explode();
                self.destroyed = true;
                self.events
                    .push(IgnitionEvent::EngineDestroyed { tick: ctx.tick });
                return;
            }
        }
        self.force_shutdown(ctx.engine, ShutdownReason::UnstableFuelFlow, ctx.tick);
    }

    /// Stop all thrust. Idempotent: a stopped engine is left alone.
    fn force_shutdown(
        &mut self,
        engine: &mut dyn EngineHandle,
        reason: ShutdownReason,
        tick: Ticks,
    ) {
        if !engine.is_activated() {
            return;
        }
        engine.cut_throttle();
        engine.burst_flameout_groups();
        engine.set_running_groups_active(false);
        engine.shutdown();
        self.events
            .push(IgnitionEvent::EngineShutdown { reason, tick });
    }

    // -- Reload --

    /// Replenish charges from a carried pack matching this engine's ignitor
    /// type. Withdraws up to the deficit; refilling from empty also
    /// restarts a stopped engine.
    pub fn reload(
        &mut self,
        packs: &mut ChargePackRegistry,
        engine: &mut dyn EngineHandle,
        tick: Ticks,
    ) -> Result<u32, ReloadError> {
        let deficit = match self.budget.deficit() {
            None | Some(0) => return Err(ReloadError::AlreadyFull),
            Some(d) => d,
        };

        packs.prune();
        if packs.is_empty() {
            return Err(ReloadError::NoSourceNearby);
        }
        let Some(pack) = packs.find_match(&self.config.ignitor_type) else {
            return Err(ReloadError::NoMatchingSource);
        };

        let was_empty = self.budget.is_exhausted();
        let withdrawn = packs.withdraw(pack, deficit);
        let added = self.budget.refill(withdrawn);
        if was_empty && added > 0 && !engine.is_activated() {
            engine.activate();
        }
        self.events
            .push(IgnitionEvent::IgnitorReloaded { added, tick });
        Ok(added)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
