//! Integration tests for the ignition state machine.
//!
//! These exercise end-to-end controller behavior: charge accounting,
//! resource-gated attempts, pressure-fed overrides, external igniters,
//! sustained-burn instability, and charge replenishment.

use ignitor_core::budget::ChargeCount;
use ignitor_core::controller::{
    EngineIgnitionController, EngineIgnitionState, EngineIgnitorConfig, FuelFlowStatus,
    ReloadError,
};
use ignitor_core::engine::Propellant;
use ignitor_core::event::{IgnitionEvent, ShutdownReason};
use ignitor_core::id::{IgnitorType, PartId, ResourceId};
use ignitor_core::registry::{ChargePack, ExternalIgnitorUnit, ResourceStock};
use ignitor_core::resources::{IgnitorResource, TankSource};
use ignitor_core::test_utils::*;
use nalgebra::Vector3;

fn pressurized_source(part: u64) -> TankSource {
    TankSource {
        tank: PartId(part),
        amount: fixed(100.0),
        max_amount: fixed(100.0),
        pressurized: true,
    }
}

fn nearby_unit() -> ExternalIgnitorUnit {
    ExternalIgnitorUnit {
        ignitor_type: IgnitorType::universal(),
        range: 1.5,
        position: Vector3::new(0.5, 0.0, 0.0),
        attached_parts: Vec::new(),
        provides_resources: false,
        charges: ChargeCount::Unlimited,
        stock: Vec::new(),
        alive: true,
    }
}

/// Put the engine back into a firing command after a shutdown or idle phase.
fn command_full_thrust(world: &mut TestWorld) {
    world.engine.requested_thrust = 100.0;
    world.engine.current_throttle = 1.0;
    world.engine.activated = true;
}

fn idle_engine(world: &mut TestWorld) {
    world.engine.requested_thrust = 0.0;
    world.engine.current_throttle = 0.0;
}

// ===========================================================================
// Scenario: clean ignition
// ===========================================================================

#[test]
fn clean_ignition_consumes_one_charge() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(3);
    settle_to_not_ignited(&mut world, &mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);

    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert_eq!(controller.remaining(), ChargeCount::Count(2));
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::IgnitionSucceeded { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        IgnitionEvent::ChargeConsumed { remaining: ChargeCount::Count(2), .. }
    )));
}

#[test]
fn first_tick_from_invalid_is_a_free_transition() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(3);

    // The engine is already running when the controller first sees it.
    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert_eq!(controller.remaining(), ChargeCount::Count(3));
    assert!(controller.drain_events().is_empty());
}

// ===========================================================================
// Scenario: charge accounting and exhaustion
// ===========================================================================

#[test]
fn exhausted_charges_block_without_request_or_draw() {
    let mut world = TestWorld::new();
    let mut controller = EngineIgnitionController::new(EngineIgnitorConfig {
        ignitions_available: ChargeCount::Count(2),
        use_ullage_simulation: false,
        ignitor_resources: vec![IgnitorResource::new("TEATEB", fixed(1.0))],
        ..EngineIgnitorConfig::default()
    });
    settle_to_not_ignited(&mut world, &mut controller);

    for expected_left in [1u32, 0] {
        command_full_thrust(&mut world);
        world.step(&mut controller);
        assert_eq!(controller.state(), EngineIgnitionState::Ignited);
        assert_eq!(controller.remaining(), ChargeCount::Count(expected_left));
        idle_engine(&mut world);
        world.step(&mut controller);
        assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
    }
    assert_eq!(world.ledger.requests.len(), 2);
    controller.drain_events();

    // The post-exhaustion idle tick already forced a shutdown.
    assert_eq!(world.engine.shutdown_calls, 1);
    assert!(!world.engine.activated);

    // Operator re-activates and commands thrust: rejected outright.
    command_full_thrust(&mut world);
    let rng_state = world.rng.state();
    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
    assert_eq!(controller.remaining(), ChargeCount::Count(0));
    assert_eq!(world.ledger.requests.len(), 2, "no resource request on a blocked attempt");
    assert_eq!(world.rng.state(), rng_state, "no randomness drawn on a blocked attempt");
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::IgnitionBlocked { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        IgnitionEvent::EngineShutdown { reason: ShutdownReason::ChargesExhausted, .. }
    )));
    assert_eq!(world.engine.shutdown_calls, 2);
}

#[test]
fn unlimited_charges_never_deplete_or_block() {
    let mut world = TestWorld::new();
    let mut controller = controller_unlimited();
    settle_to_not_ignited(&mut world, &mut controller);

    for _ in 0..5 {
        command_full_thrust(&mut world);
        world.step(&mut controller);
        assert_eq!(controller.state(), EngineIgnitionState::Ignited);
        assert_eq!(controller.remaining(), ChargeCount::Unlimited);
        idle_engine(&mut world);
        world.step(&mut controller);
    }
    let events = controller.drain_events();
    let ignitions = events
        .iter()
        .filter(|e| matches!(e, IgnitionEvent::IgnitionSucceeded { .. }))
        .count();
    assert_eq!(ignitions, 5);
    assert!(!events.iter().any(|e| matches!(e, IgnitionEvent::IgnitionBlocked { .. })));
}

// ===========================================================================
// Scenario: resource-starved ignition
// ===========================================================================

#[test]
fn resource_starved_attempt_fails_and_still_spends_a_charge() {
    let mut world = TestWorld::new();
    world.ledger = StaticLedger::fraction(0.4);
    let mut controller = EngineIgnitionController::new(EngineIgnitorConfig {
        ignitions_available: ChargeCount::Count(3),
        use_ullage_simulation: false,
        ignitor_resources: vec![IgnitorResource::new("TEATEB", fixed(10.0))],
        ..EngineIgnitorConfig::default()
    });
    settle_to_not_ignited(&mut world, &mut controller);

    // Seed 1's first draw lands at ~0.567, above the 0.4 potential.
    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
    assert_eq!(controller.remaining(), ChargeCount::Count(2));
    assert_eq!(world.ledger.requests, vec![("TEATEB".to_string(), fixed(10.0))]);

    let events = controller.drain_events();
    let failed = events.iter().find_map(|e| match e {
        IgnitionEvent::IgnitionFailed { potential, .. } => Some(*potential),
        _ => None,
    });
    let potential = failed.expect("ignition should have failed").to_num::<f64>();
    assert!((potential - 0.4).abs() < 1e-6, "potential was {potential}");

    // The failed attempt forces an immediate shutdown.
    assert_eq!(world.engine.cut_throttle_calls, 1);
    assert_eq!(world.engine.flameout_bursts, 1);
    assert_eq!(world.engine.shutdown_calls, 1);
    assert_eq!(world.engine.running_groups_active, Some(false));
    assert!(events.iter().any(|e| matches!(
        e,
        IgnitionEvent::EngineShutdown { reason: ShutdownReason::IgnitionFailed, .. }
    )));
}

#[test]
fn partially_granted_attempt_can_still_succeed() {
    let mut world = TestWorld::new();
    world.ledger = StaticLedger::fraction(0.4);
    // Seed 7's first draw lands at ~0.390, under the 0.4 potential.
    world.rng = ignitor_core::rng::SimRng::new(7);
    let mut controller = EngineIgnitionController::new(EngineIgnitorConfig {
        ignitions_available: ChargeCount::Count(3),
        use_ullage_simulation: false,
        ignitor_resources: vec![IgnitorResource::new("TEATEB", fixed(10.0))],
        ..EngineIgnitorConfig::default()
    });
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert_eq!(controller.remaining(), ChargeCount::Count(2));
}

// ===========================================================================
// Scenario: throttle guard
// ===========================================================================

#[test]
fn closed_throttle_telemetry_does_not_ignite() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(3);
    settle_to_not_ignited(&mut world, &mut controller);

    world.engine.requested_thrust = 100.0;
    world.engine.current_throttle = 0.0;
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
    assert_eq!(controller.remaining(), ChargeCount::Count(3));

    // A throttle-locked motor (solid) is exempt from the guard.
    world.engine.throttle_locked = true;
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert_eq!(controller.remaining(), ChargeCount::Count(2));
}

#[test]
fn flameout_forces_engine_out_of_ignited() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(3);
    settle_to_not_ignited(&mut world, &mut controller);
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::Ignited);

    world.engine.flameout = true;
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
}

// ===========================================================================
// Scenario: auto-relight from residual heat
// ===========================================================================

#[test]
fn hot_engine_relights_without_spending_a_charge() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(1);
    world.engine.part_temperature = 900.0;

    idle_engine(&mut world);
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::HighTemp);

    command_full_thrust(&mut world);
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert_eq!(controller.remaining(), ChargeCount::Count(1));
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::AutoIgnited { .. })));
    assert!(!events.iter().any(|e| matches!(e, IgnitionEvent::ChargeConsumed { .. })));
}

#[test]
fn instability_is_checked_on_the_relight_tick() {
    let mut world = TestWorld::new();
    let mut controller = EngineIgnitionController::new(EngineIgnitorConfig {
        is_pressure_fed: true,
        ..EngineIgnitorConfig::default()
    });
    world.engine.part_temperature = 900.0;
    world.engine.propellants = vec![Propellant::new("Aerozine50", ResourceId(1))];
    // No pressurized source anywhere: stability is 0 for a pressure-fed engine.

    idle_engine(&mut world);
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::HighTemp);

    command_full_thrust(&mut world);
    world.step(&mut controller);

    // The relight and the instability shutdown land on the same tick.
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::AutoIgnited { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        IgnitionEvent::EngineShutdown { reason: ShutdownReason::UnstableFuelFlow, .. }
    )));
    assert_eq!(world.engine.shutdown_calls, 1);
}

// ===========================================================================
// Scenario: pressure-fed override
// ===========================================================================

#[test]
fn pressurized_sources_override_band_state() {
    let mut world = TestWorld::new();
    world.trust_tank_flags = true;
    let fuel = ResourceId(1);
    let oxidizer = ResourceId(2);
    world.ledger = StaticLedger::full()
        .with_source(fuel, pressurized_source(10))
        .with_source(oxidizer, pressurized_source(11));
    let mut controller = controller_pressure_fed();
    world.engine.propellants = vec![
        Propellant::new("MMH", fuel),
        Propellant::new("NTO", oxidizer),
    ];
    // Wreck the bands; pressurization must win regardless.
    world.frame.local_acceleration = Vector3::new(50.0, 5.0, 0.0);
    world.frame.angular_velocity = Vector3::new(20.0, 0.0, 0.0);

    settle_to_not_ignited(&mut world, &mut controller);
    world.step(&mut controller);

    assert_eq!(controller.fuel_flow_status(), FuelFlowStatus::Pressurized);
    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
}

#[test]
fn unpressurized_pressure_fed_engine_cannot_ignite() {
    let mut world = TestWorld::new();
    world.trust_tank_flags = true;
    let fuel = ResourceId(1);
    let oxidizer = ResourceId(2);
    // Only one of the two propellants has a pressurized source.
    world.ledger = StaticLedger::full().with_source(fuel, pressurized_source(10));
    let mut controller = controller_pressure_fed();
    world.engine.propellants = vec![
        Propellant::new("MMH", fuel),
        Propellant::new("NTO", oxidizer),
    ];

    settle_to_not_ignited(&mut world, &mut controller);
    world.step(&mut controller);

    assert_eq!(controller.fuel_flow_status(), FuelFlowStatus::Unpressurized);
    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        IgnitionEvent::IgnitionFailed { .. }
    )));
}

#[test]
fn absent_tank_adapter_degrades_to_unpressurized() {
    let mut world = TestWorld::new();
    // trust_tank_flags stays false: the no-op port sees nothing pressurized
    // even though the network reports pressurized sources.
    let fuel = ResourceId(1);
    world.ledger = StaticLedger::full().with_source(fuel, pressurized_source(10));
    let mut controller = controller_pressure_fed();
    world.engine.propellants = vec![Propellant::new("MMH", fuel)];

    settle_to_not_ignited(&mut world, &mut controller);
    assert_eq!(controller.fuel_flow_status(), FuelFlowStatus::Unpressurized);
}

// ===========================================================================
// Scenario: sustained-burn instability
// ===========================================================================

/// Ignite a pressure-fed engine with pressurized sources, then cut the
/// pressurization so the sustained-burn check sees zero stability.
fn ignite_then_depressurize(world: &mut TestWorld) -> EngineIgnitionController {
    world.trust_tank_flags = true;
    let fuel = ResourceId(1);
    world.ledger = StaticLedger::full().with_source(fuel, pressurized_source(10));
    let mut controller = controller_pressure_fed();
    world.engine.propellants = vec![Propellant::new("MMH", fuel)];

    settle_to_not_ignited(world, &mut controller);
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    controller.drain_events();

    world.ledger.sources.clear();
    controller
}

#[test]
fn sustained_instability_forces_shutdown() {
    let mut world = TestWorld::new();
    let mut controller = ignite_then_depressurize(&mut world);

    world.step(&mut controller);

    assert!(world.engine.shutdown_calls >= 1);
    assert!(!world.engine.exploded);
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        IgnitionEvent::EngineShutdown { reason: ShutdownReason::UnstableFuelFlow, .. }
    )));

    // Telemetry catches up next tick and the state machine follows.
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
}

#[test]
fn sustained_instability_can_destroy_the_part() {
    let mut world = TestWorld::new();
    world.settings.explode_when_too_unstable = true;
    let mut controller = ignite_then_depressurize(&mut world);

    // Survival is 0 and the explosion survival floor is 0.01; seed 1's first
    // draw (~0.567) sails past it.
    world.step(&mut controller);

    assert!(world.engine.exploded);
    assert!(controller.is_destroyed());
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::EngineDestroyed { .. })));

    // A destroyed controller is inert.
    world.step(&mut controller);
    assert!(controller.drain_events().is_empty());
}

#[test]
fn stable_flow_survives_sustained_checks() {
    let mut world = TestWorld::new();
    let mut controller = EngineIgnitionController::new(EngineIgnitorConfig::default());
    settle_to_not_ignited(&mut world, &mut controller);
    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::Ignited);

    // Settled bands hold full stability; a long burn never trips the check.
    for _ in 0..500 {
        world.step(&mut controller);
        assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    }
    assert_eq!(world.engine.shutdown_calls, 0);
}

// ===========================================================================
// Scenario: external igniters
// ===========================================================================

#[test]
fn external_ignitor_substitutes_for_spent_charges() {
    let mut world = TestWorld::new();
    world.ignitors.insert(nearby_unit());
    let mut controller = controller_with_charges(0);
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert_eq!(controller.remaining(), ChargeCount::Count(0));
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::IgnitionSucceeded { .. })));
    assert!(!events.iter().any(|e| matches!(e, IgnitionEvent::ChargeConsumed { .. })));
}

#[test]
fn external_ignitor_spares_onboard_charges() {
    let mut world = TestWorld::new();
    world.ignitors.insert(nearby_unit());
    let mut controller = controller_with_charges(3);
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert_eq!(controller.remaining(), ChargeCount::Count(3));
}

#[test]
fn out_of_range_unattached_ignitor_does_not_help() {
    let mut world = TestWorld::new();
    let mut far = nearby_unit();
    far.position = Vector3::new(50.0, 0.0, 0.0);
    world.ignitors.insert(far);
    let mut controller = controller_with_charges(0);
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::IgnitionBlocked { .. })));
}

#[test]
fn attached_ignitor_ignores_range() {
    let mut world = TestWorld::new();
    let mut unit = nearby_unit();
    unit.position = Vector3::new(50.0, 0.0, 0.0);
    unit.attached_parts = vec![world.engine.part];
    world.ignitors.insert(unit);
    let mut controller = controller_with_charges(0);
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
}

#[test]
fn type_mismatched_ignitor_does_not_help() {
    let mut world = TestWorld::new();
    let mut unit = nearby_unit();
    unit.ignitor_type = IgnitorType::new("type9");
    world.ignitors.insert(unit);
    let mut controller = controller_with_charges(0);
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);
    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
}

#[test]
fn stale_ignitors_are_pruned_each_tick() {
    let mut world = TestWorld::new();
    let mut dead = nearby_unit();
    dead.alive = false;
    world.ignitors.insert(dead);
    let mut controller = controller_with_charges(0);
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::NotIgnited);
    assert!(world.ignitors.is_empty());
}

#[test]
fn providing_ignitor_supplies_its_own_resources() {
    let mut world = TestWorld::new();
    let mut unit = nearby_unit();
    unit.provides_resources = true;
    unit.stock = vec![ResourceStock {
        name: "TEATEB".to_string(),
        amount: fixed(5.0),
    }];
    let id = world.ignitors.insert(unit);
    let mut controller = EngineIgnitionController::new(EngineIgnitorConfig {
        ignitions_available: ChargeCount::Count(3),
        use_ullage_simulation: false,
        ignitor_resources: vec![IgnitorResource::new("TEATEB", fixed(2.0))],
        ..EngineIgnitorConfig::default()
    });
    settle_to_not_ignited(&mut world, &mut controller);

    world.step(&mut controller);

    assert_eq!(controller.state(), EngineIgnitionState::Ignited);
    assert!(world.ledger.requests.is_empty(), "engine network must be untouched");
    assert_eq!(world.ignitors.get(id).unwrap().stock[0].amount, fixed(3.0));
    assert_eq!(controller.remaining(), ChargeCount::Count(3));
}

// ===========================================================================
// Scenario: charge replenishment
// ===========================================================================

fn carried_pack(charges: u32) -> ChargePack {
    ChargePack {
        ignitor_type: IgnitorType::universal(),
        charges,
        carried: true,
        alive: true,
    }
}

#[test]
fn reload_withdraws_up_to_the_deficit() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(3);
    settle_to_not_ignited(&mut world, &mut controller);
    world.step(&mut controller);
    idle_engine(&mut world);
    world.step(&mut controller);
    command_full_thrust(&mut world);
    world.step(&mut controller);
    assert_eq!(controller.remaining(), ChargeCount::Count(1));

    let pack = world.packs.insert(carried_pack(5));
    let added = controller
        .reload(&mut world.packs, &mut world.engine, world.tick)
        .unwrap();

    assert_eq!(added, 2);
    assert_eq!(controller.remaining(), ChargeCount::Count(3));
    assert_eq!(world.packs.get(pack).unwrap().charges, 3);
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(e, IgnitionEvent::IgnitorReloaded { added: 2, .. })));
}

#[test]
fn reload_from_empty_restarts_a_stopped_engine() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(1);
    settle_to_not_ignited(&mut world, &mut controller);
    world.step(&mut controller);
    assert_eq!(controller.remaining(), ChargeCount::Count(0));

    // The engine wound down after the burn.
    idle_engine(&mut world);
    world.step(&mut controller);
    assert!(!world.engine.activated);

    world.packs.insert(carried_pack(1));
    let added = controller
        .reload(&mut world.packs, &mut world.engine, world.tick)
        .unwrap();

    assert_eq!(added, 1);
    assert_eq!(world.engine.activate_calls, 1);
    assert!(world.engine.activated);
}

#[test]
fn reload_reports_missing_and_mismatched_sources() {
    let mut world = TestWorld::new();
    let mut controller = controller_with_charges(2);
    settle_to_not_ignited(&mut world, &mut controller);
    world.step(&mut controller);
    assert_eq!(controller.remaining(), ChargeCount::Count(1));

    assert_eq!(
        controller.reload(&mut world.packs, &mut world.engine, world.tick),
        Err(ReloadError::NoSourceNearby)
    );

    world.packs.insert(ChargePack {
        ignitor_type: IgnitorType::new("type9"),
        ..carried_pack(5)
    });
    assert_eq!(
        controller.reload(&mut world.packs, &mut world.engine, world.tick),
        Err(ReloadError::NoMatchingSource)
    );
}

#[test]
fn reload_is_a_no_op_at_capacity_or_unlimited() {
    let mut world = TestWorld::new();
    world.packs.insert(carried_pack(5));

    let mut full = controller_with_charges(3);
    assert_eq!(
        full.reload(&mut world.packs, &mut world.engine, world.tick),
        Err(ReloadError::AlreadyFull)
    );

    let mut unlimited = controller_unlimited();
    assert_eq!(
        unlimited.reload(&mut world.packs, &mut world.engine, world.tick),
        Err(ReloadError::AlreadyFull)
    );
}

// ===========================================================================
// Persisted fields
// ===========================================================================

#[test]
fn persisted_config_round_trips_and_restores_budget() {
    let config = EngineIgnitorConfig {
        ignitions_available: ChargeCount::Count(4),
        auto_ignition_temperature: 650.0,
        ignitor_type: IgnitorType::new("type2"),
        use_ullage_simulation: true,
        is_pressure_fed: true,
        ignitor_resources: vec![IgnitorResource::new("TEATEB", fixed(1.5))],
    };
    let json = serde_json::to_string(&config).unwrap();
    let restored: EngineIgnitorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);

    let controller = EngineIgnitionController::from_persisted(restored, ChargeCount::Count(2));
    assert_eq!(controller.remaining(), ChargeCount::Count(2));
    assert_eq!(controller.available(), ChargeCount::Count(4));
}
