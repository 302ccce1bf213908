//! Ullage simulation module for the Ignitor engine core.
//!
//! Models the free surface of liquid propellant inside a tank as two
//! overlapping 1-D bands (one along the tank's long axis, one radial from
//! its centerline) driven by measured tank-frame acceleration and angular
//! velocity. Each tick the bands are translated, widened, or narrowed by the
//! disturbance inputs and relax toward a settled configuration, yielding a
//! scalar fuel-flow stability probability and a discrete state label.
//!
//! # Design
//!
//! - The band bounds live in [0, 1] of tank extent; 0 is the intake end.
//! - Disturbances act per update: axial acceleration shifts the axial band
//!   and widens the radial band, lateral acceleration widens both, yaw/pitch
//!   rotation centralizes the axial band, roll widens axially and narrows
//!   radially.
//! - Natural diffusion relaxes the bands toward [`UllageState::SETTLED`]
//!   unless continuous venting (boil-off) exceeds a threshold.
//! - Stability is a pure function of the current bands; the label maps the
//!   probability onto six ordered states.
//! - The update is a cheap surrogate for fluid dynamics and runs every
//!   physics tick for every active engine.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tuning parameters
// ---------------------------------------------------------------------------

/// Coefficients governing band motion. Loaded once at startup and shared by
/// every simulator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UllageParams {
    /// Relaxation rate of the axial band toward the settled bounds.
    pub axial_diffusion_rate: f32,
    /// Relaxation rate of the radial band toward the settled bounds.
    pub radial_diffusion_rate: f32,
    /// Axial band shift per unit of axial acceleration impulse.
    pub axial_translate_height: f32,
    /// Radial band widening per unit of absolute axial impulse.
    pub axial_translate_radial: f32,
    /// Axial band widening per unit of lateral impulse.
    pub lateral_translate_height: f32,
    /// Radial band widening per unit of lateral impulse.
    pub lateral_translate_radial: f32,
    /// Axial band centralization per unit of yaw/pitch rate.
    pub yaw_pitch_rotate_height: f32,
    /// Radial band widening per unit of yaw/pitch rate.
    pub yaw_pitch_rotate_radial: f32,
    /// Axial band widening per unit of roll rate.
    pub roll_rotate_height: f32,
    /// Radial band narrowing per unit of roll rate.
    pub roll_rotate_radial: f32,
    /// Effective exhaust velocity of boil-off venting (m/s).
    pub venting_velocity: f32,
    /// Venting acceleration above which natural diffusion stalls.
    pub venting_acc_threshold: f32,
}

impl Default for UllageParams {
    fn default() -> Self {
        Self {
            axial_diffusion_rate: 0.03,
            radial_diffusion_rate: 0.02,
            axial_translate_height: 0.06,
            axial_translate_radial: 0.06,
            lateral_translate_height: 0.02,
            lateral_translate_radial: 0.04,
            yaw_pitch_rotate_height: 0.004,
            yaw_pitch_rotate_radial: 0.003,
            roll_rotate_height: 0.006,
            roll_rotate_radial: 0.005,
            venting_velocity: 100.0,
            venting_acc_threshold: 4.0e-8,
        }
    }
}

// ---------------------------------------------------------------------------
// Band state
// ---------------------------------------------------------------------------

/// The two liquid bands for one engine's fuel source.
///
/// Invariant after every update: `0 <= height_min <= height_max <= 1` and
/// `0 <= radial_min <= radial_max <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UllageState {
    /// Lower bound of the liquid region along the tank axis (0 = intake end).
    pub height_min: f32,
    /// Upper bound of the liquid region along the tank axis.
    pub height_max: f32,
    /// Inner bound of the liquid region from the tank centerline.
    pub radial_min: f32,
    /// Outer bound of the liquid region from the tank centerline.
    pub radial_max: f32,
}

impl UllageState {
    /// The settled configuration the bands relax toward.
    pub const SETTLED: Self = Self {
        height_min: 0.05,
        height_max: 0.95,
        radial_min: 0.0,
        radial_max: 0.95,
    };

    /// Clamp every bound into its valid range and restore band ordering.
    fn normalize(&mut self) {
        self.height_min = self.height_min.clamp(0.0, 1.0);
        self.height_max = self.height_max.clamp(0.0, 1.0);
        self.radial_min = self.radial_min.clamp(0.0, 1.0);
        self.radial_max = self.radial_max.clamp(0.0, 1.0);
        self.height_min = self.height_min.min(self.height_max);
        self.radial_min = self.radial_min.min(self.radial_max);
    }
}

impl Default for UllageState {
    fn default() -> Self {
        Self::SETTLED
    }
}

// ---------------------------------------------------------------------------
// Kinematics input
// ---------------------------------------------------------------------------

/// One tick's worth of vessel kinematics, expressed in the tank frame.
///
/// The y axis is the tank's long axis (positive away from the intake); x and
/// z are lateral. Rotation about y is roll. Non-finite components are
/// treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselFrame {
    /// Linear acceleration, gravity removed.
    pub local_acceleration: Vector3<f32>,
    /// Angular velocity of the engine's rigid body.
    pub angular_velocity: Vector3<f32>,
    /// Local gravity, used in place of measured acceleration when the vessel
    /// rests on a surface under fast time-acceleration.
    pub local_gravity: Vector3<f32>,
    /// Vessel is landed or splashed down.
    pub landed: bool,
    /// Fast (non-physics) time-acceleration is active.
    pub high_warp: bool,
}

impl Default for VesselFrame {
    fn default() -> Self {
        Self {
            local_acceleration: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            local_gravity: Vector3::zeros(),
            landed: false,
            high_warp: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Fuel flow labels
// ---------------------------------------------------------------------------

/// Discrete label for a stability probability, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelFlowState {
    VeryStable,
    Stable,
    Risky,
    VeryRisky,
    Unstable,
    VeryUnstable,
}

impl FuelFlowState {
    /// Map a stability probability onto its label.
    pub fn classify(probability: f32) -> Self {
        if probability >= 0.996 {
            Self::VeryStable
        } else if probability >= 0.95 {
            Self::Stable
        } else if probability >= 0.75 {
            Self::Risky
        } else if probability >= 0.50 {
            Self::VeryRisky
        } else if probability >= 0.30 {
            Self::Unstable
        } else {
            Self::VeryUnstable
        }
    }
}

impl std::fmt::Display for FuelFlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::VeryStable => "Very Stable",
            Self::Stable => "Stable",
            Self::Risky => "Risky",
            Self::VeryRisky => "Very Risky",
            Self::Unstable => "Unstable",
            Self::VeryUnstable => "Very Unstable",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Continuous-time estimator of whether liquid covers the tank outlet.
///
/// Owned by one engine; [`UllageSimulator::update`] must run before the
/// engine's ignition transition logic each tick, since that logic consumes
/// the latest stability value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UllageSimulator {
    /// Current band state.
    pub state: UllageState,
}

/// Linear interpolation with the blend factor clamped to [0, 1].
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Replace non-finite vector components with zero.
fn finite_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.map(|c| if c.is_finite() { c } else { 0.0 })
}

impl UllageSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the settled band configuration.
    pub fn reset(&mut self) {
        self.state = UllageState::SETTLED;
    }

    /// Advance the bands by `dt` seconds of the given kinematics.
    ///
    /// `venting_acc` is the boil-off venting acceleration along the tank
    /// axis; while below the configured threshold it also throttles natural
    /// diffusion.
    pub fn update(&mut self, frame: &VesselFrame, dt: f32, venting_acc: f32, params: &UllageParams) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let venting_acc = if venting_acc.is_finite() { venting_acc } else { 0.0 };

        let mut accel = finite_or_zero(frame.local_acceleration);
        let mut rotation = finite_or_zero(frame.angular_velocity);

        if frame.high_warp {
            // Maneuvering acceleration is negligible at high warp multipliers;
            // only surface support or continuous venting remains.
            accel = if frame.landed {
                finite_or_zero(frame.local_gravity)
            } else {
                Vector3::new(0.0, venting_acc, 0.0)
            };
            rotation = Vector3::zeros();
        } else {
            accel.y += venting_acc;
        }
        let impulse = accel * dt;

        let s = &mut self.state;
        let settled = UllageState::SETTLED;

        // Natural diffusion, stalled while venting exceeds the threshold.
        if venting_acc <= params.venting_acc_threshold {
            let damping = 1.0 - venting_acc / params.venting_acc_threshold;
            let axial_t = params.axial_diffusion_rate * damping * dt;
            let radial_t = params.radial_diffusion_rate * damping * dt;
            s.height_min = lerp(s.height_min, settled.height_min, axial_t);
            s.height_max = lerp(s.height_max, settled.height_max, axial_t);
            s.radial_min = lerp(s.radial_min, settled.radial_min, radial_t);
            s.radial_max = lerp(s.radial_max, settled.radial_max, radial_t);
        }

        // Axial translation: signed shift of the axial band, radial widening.
        let axial = impulse.y;
        s.height_min = (s.height_min + axial * params.axial_translate_height).clamp(0.0, 0.9);
        s.height_max = (s.height_max + axial * params.axial_translate_height).clamp(0.1, 1.0);
        s.radial_min = (s.radial_min - axial.abs() * params.axial_translate_radial).clamp(0.0, 0.9);
        s.radial_max = (s.radial_max + axial.abs() * params.axial_translate_radial).clamp(0.1, 1.0);

        // Lateral translation: symmetric widening of both bands.
        let lateral = Vector3::new(impulse.x, 0.0, impulse.z).norm();
        s.height_min = (s.height_min - lateral * params.lateral_translate_height).clamp(0.0, 0.9);
        s.height_max = (s.height_max + lateral * params.lateral_translate_height).clamp(0.1, 1.0);
        s.radial_min = (s.radial_min + lateral * params.lateral_translate_radial).clamp(0.0, 0.9);
        s.radial_max = (s.radial_max + lateral * params.lateral_translate_radial).clamp(0.1, 1.0);

        // Yaw/pitch rotation centralizes the axial band and widens the radial.
        let yaw_pitch = Vector3::new(rotation.x, 0.0, rotation.z).norm();
        let pull = yaw_pitch * params.yaw_pitch_rotate_height;
        s.height_min = if s.height_min < 0.45 {
            (s.height_min + pull).clamp(0.0, 0.45)
        } else {
            (s.height_min - pull).clamp(0.45, 0.9)
        };
        s.height_max = if s.height_max < 0.55 {
            (s.height_max + pull).clamp(0.1, 0.55)
        } else {
            (s.height_max - pull).clamp(0.55, 1.0)
        };
        s.radial_min = (s.radial_min - yaw_pitch * params.yaw_pitch_rotate_radial).clamp(0.0, 0.9);
        s.radial_max = (s.radial_max + yaw_pitch * params.yaw_pitch_rotate_radial).clamp(0.1, 1.0);

        // Roll widens the axial band and narrows the radial band downward.
        let roll = rotation.y.abs();
        s.height_min = (s.height_min - roll * params.roll_rotate_height).clamp(0.0, 0.9);
        s.height_max = (s.height_max + roll * params.roll_rotate_height).clamp(0.1, 1.0);
        s.radial_min = (s.radial_min - roll * params.roll_rotate_radial).clamp(0.0, 0.9);
        s.radial_max = (s.radial_max - roll * params.roll_rotate_radial).clamp(0.1, 1.0);

        s.normalize();
    }

    /// Probability, in [0, 1], that propellant flow is currently undisrupted
    /// enough for reliable combustion.
    ///
    /// Risk grows as either band's lower bound moves past 0.1 (liquid pulling
    /// away from the intake) and with how far the band volume exceeds a tenth
    /// of the tank.
    pub fn fuel_flow_stability(&self) -> f32 {
        let s = &self.state;
        let volume = (s.height_max - s.height_min) * (s.radial_max - s.radial_min);
        let excess = (volume / 0.1 - 1.0).clamp(0.0, 10.0);
        let vertical_risk = ((s.height_min - 0.1) / 0.2).clamp(0.0, 1.0);
        let horizontal_risk = ((s.radial_min - 0.1) / 0.2).clamp(0.0, 1.0);
        (1.0 - vertical_risk * horizontal_risk * (0.75 + excess.sqrt())).max(0.0)
    }

    /// Label for the current stability probability.
    pub fn fuel_flow_state(&self) -> FuelFlowState {
        FuelFlowState::classify(self.fuel_flow_stability())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
