//! Finite ignition-charge accounting.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Charge counts
// ---------------------------------------------------------------------------

/// A count of ignition charges, possibly unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeCount {
    /// The engine can ignite as many times as it wants.
    Unlimited,
    Count(u32),
}

impl ChargeCount {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Unlimited => None,
            Self::Count(n) => Some(*n),
        }
    }
}

impl std::fmt::Display for ChargeCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlimited => f.write_str("Infinite"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// Per-engine ignition charge budget.
///
/// `remaining` never exceeds a finite `available` and is structurally never
/// negative. Unlimited budgets are never decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitionBudget {
    available: ChargeCount,
    remaining: ChargeCount,
}

impl IgnitionBudget {
    /// A fresh budget at full capacity.
    pub fn new(available: ChargeCount) -> Self {
        Self {
            available,
            remaining: available,
        }
    }

    /// Rebuild a budget from persisted fields, restoring the
    /// remaining-within-capacity invariant.
    pub fn from_persisted(available: ChargeCount, remaining: ChargeCount) -> Self {
        let remaining = match (available, remaining) {
            (ChargeCount::Count(a), ChargeCount::Count(r)) => ChargeCount::Count(r.min(a)),
            (_, r) => r,
        };
        Self {
            available,
            remaining,
        }
    }

    pub fn available(&self) -> ChargeCount {
        self.available
    }

    pub fn remaining(&self) -> ChargeCount {
        self.remaining
    }

    /// A charge could be spent right now.
    pub fn has_charges(&self) -> bool {
        !matches!(self.remaining, ChargeCount::Count(0))
    }

    /// Finite and empty.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.remaining, ChargeCount::Count(0))
    }

    /// Spend one charge. Unlimited budgets and empty budgets are unchanged.
    pub fn consume(&mut self) {
        if let ChargeCount::Count(n) = &mut self.remaining
            && *n > 0
        {
            *n -= 1;
        }
    }

    /// Charges needed to return to capacity. `None` when capacity is
    /// unlimited or the remaining count is.
    pub fn deficit(&self) -> Option<u32> {
        match (self.available, self.remaining) {
            (ChargeCount::Count(a), ChargeCount::Count(r)) => Some(a.saturating_sub(r)),
            _ => None,
        }
    }

    /// Add charges, saturating at capacity. Returns the amount taken up.
    pub fn refill(&mut self, charges: u32) -> u32 {
        match (self.available, &mut self.remaining) {
            (ChargeCount::Count(a), ChargeCount::Count(r)) => {
                let added = charges.min(a.saturating_sub(*r));
                *r += added;
                added
            }
            _ => 0,
        }
    }

    /// Return to full capacity (vessel re-configured or edited).
    pub fn reset(&mut self) {
        self.remaining = self.available;
    }

    /// Raise capacity, e.g. when a consumable ignitor unit mounted on the
    /// engine transfers its charges in. Unlimited capacity is unchanged.
    pub fn extend_available(&mut self, extra: u32) {
        if let ChargeCount::Count(a) = &mut self.available {
            *a = a.saturating_add(extra);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
