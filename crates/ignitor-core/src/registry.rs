//! Injected registries of external ignition providers.
//!
//! Both registries are rebuilt or pruned by the host every tick from live
//! game-world queries, never persisted. Stale entries (the owning vessel or
//! part is gone) are expected transient conditions: the host marks them dead
//! and [`ExternalIgnitorRegistry::prune`] drops them before any lookup.
//!
//! Lookup takes the first matching entry in registry iteration order; no
//! distance or priority ordering is applied.

use crate::budget::ChargeCount;
use crate::fixed::Fixed64;
use crate::id::{ChargePackId, ExternalIgnitorId, IgnitorType, PartId};
use crate::resources::IgnitorResource;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// External igniter devices
// ---------------------------------------------------------------------------

/// Onboard resource stock held by an external igniter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStock {
    pub name: String,
    pub amount: Fixed64,
}

/// An external igniter device currently present in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalIgnitorUnit {
    pub ignitor_type: IgnitorType,
    /// Maximum ignition distance, meters.
    pub range: f32,
    /// World position of the device.
    pub position: Vector3<f32>,
    /// Parts structurally linked to this device (attach nodes, children,
    /// direct mounts).
    pub attached_parts: Vec<PartId>,
    /// Supplies its own ignition resources instead of drawing the engine's
    /// network.
    pub provides_resources: bool,
    /// Remaining uses of the device itself.
    pub charges: ChargeCount,
    /// Onboard stock drawn down when providing resources.
    pub stock: Vec<ResourceStock>,
    /// The owning vessel/part reference is still valid.
    pub alive: bool,
}

impl ExternalIgnitorUnit {
    /// Enough onboard stock for one ignition's worth of `requirements`.
    fn covers(&self, requirements: &[IgnitorResource]) -> bool {
        requirements.iter().all(|req| {
            self.stock
                .iter()
                .any(|s| s.name == req.name && s.amount >= req.required())
        })
    }
}

/// The process-wide collection of external igniter devices, rebuilt from
/// live world queries and injected into each engine tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalIgnitorRegistry {
    units: SlotMap<ExternalIgnitorId, ExternalIgnitorUnit>,
}

impl ExternalIgnitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: ExternalIgnitorUnit) -> ExternalIgnitorId {
        self.units.insert(unit)
    }

    pub fn remove(&mut self, id: ExternalIgnitorId) -> Option<ExternalIgnitorUnit> {
        self.units.remove(id)
    }

    pub fn get(&self, id: ExternalIgnitorId) -> Option<&ExternalIgnitorUnit> {
        self.units.get(id)
    }

    pub fn get_mut(&mut self, id: ExternalIgnitorId) -> Option<&mut ExternalIgnitorUnit> {
        self.units.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Drop entries whose world references have gone stale.
    pub fn prune(&mut self) {
        self.units.retain(|_, unit| unit.alive);
    }

    /// First device that can ignite an engine of `required` type at
    /// `engine_position`: it must be within its own range of the engine or
    /// structurally attached to it, have uses left, and (when it supplies
    /// its own resources) carry enough stock for `requirements`.
    pub fn find_match(
        &self,
        required: &IgnitorType,
        engine_part: PartId,
        engine_position: Vector3<f32>,
        requirements: &[IgnitorResource],
    ) -> Option<ExternalIgnitorId> {
        self.units.iter().find_map(|(id, unit)| {
            if !unit.alive || matches!(unit.charges, ChargeCount::Count(0)) {
                return None;
            }
            if unit.provides_resources && !unit.covers(requirements) {
                return None;
            }
            let in_range = (unit.position - engine_position).norm() < unit.range;
            let attached = unit.attached_parts.contains(&engine_part);
            if (in_range || attached) && unit.ignitor_type.serves(required) {
                Some(id)
            } else {
                None
            }
        })
    }

    /// Draw one ignition's worth of `requirements` from the unit's own
    /// stock, saturating at zero.
    pub fn consume_stock(&mut self, id: ExternalIgnitorId, requirements: &[IgnitorResource]) {
        if let Some(unit) = self.units.get_mut(id) {
            for req in requirements {
                if let Some(stock) = unit.stock.iter_mut().find(|s| s.name == req.name) {
                    stock.amount = (stock.amount - req.required()).max(Fixed64::ZERO);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Carried charge packs
// ---------------------------------------------------------------------------

/// A portable ignitor charge pack carried by crew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargePack {
    pub ignitor_type: IgnitorType,
    pub charges: u32,
    /// Carried by the currently controlled crew member and within reach.
    pub carried: bool,
    /// The owning vessel reference is still valid.
    pub alive: bool,
}

/// The process-wide collection of reachable charge packs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChargePackRegistry {
    packs: SlotMap<ChargePackId, ChargePack>,
}

impl ChargePackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pack: ChargePack) -> ChargePackId {
        self.packs.insert(pack)
    }

    pub fn get(&self, id: ChargePackId) -> Option<&ChargePack> {
        self.packs.get(id)
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// Drop stale and spent packs.
    pub fn prune(&mut self) {
        self.packs.retain(|_, pack| pack.alive && pack.charges > 0);
    }

    /// First carried, non-empty pack serving `required`.
    pub fn find_match(&self, required: &IgnitorType) -> Option<ChargePackId> {
        self.packs.iter().find_map(|(id, pack)| {
            (pack.alive && pack.carried && pack.charges > 0 && pack.ignitor_type.serves(required))
                .then_some(id)
        })
    }

    /// Take up to `want` charges out of a pack. Returns the amount taken.
    pub fn withdraw(&mut self, id: ChargePackId, want: u32) -> u32 {
        let Some(pack) = self.packs.get_mut(id) else {
            return 0;
        };
        let taken = want.min(pack.charges);
        pack.charges -= taken;
        taken
    }
}

// ===========================================================================
// Tests
// ===========================================================================
