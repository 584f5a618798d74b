//! # Constants and type definitions for dmdist
//!
//! This module centralizes the **physical constants**, the **numerical settings of the
//! line-of-sight scan** and the **unit aliases** shared across the crate.
//!
//! ## Overview
//!
//! - Galactic geometry (Sun–Galactic-centre distance, warp radius)
//! - Validity radius of the Galactic electron-density model
//! - Step sizes, iteration budgets and clamps used by the integrator
//! - Thresholds used by the region-dominance combiner
//!
//! All distances are expressed in parsecs and all dispersion measures in pc cm⁻³.

// -------------------------------------------------------------------------------------------------
// Unit aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in parsecs
pub type Parsec = f64;
/// Dispersion measure in pc cm⁻³
pub type DispersionMeasure = f64;
/// Electron density in cm⁻³
pub type ElectronDensity = f64;
/// Scattering time in seconds
pub type Seconds = f64;

// -------------------------------------------------------------------------------------------------
// Galactic geometry
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Distance from the Sun to the Galactic centre (pc)
pub const R0: Parsec = 8_300.0;

/// Galactocentric cylindrical radius beyond which the disk is warped (pc)
pub const R_WARP: Parsec = 8_400.0;

/// Azimuth of the warp line of maximum elevation, measured from +x (rad)
pub const THETA_WARP_MAX: Radian = 0.0;

/// Galactocentric radius beyond which the Galactic model is no longer sampled (pc)
pub const GALACTIC_VALIDITY_RADIUS: Parsec = 35_000.0;

/// Mean electron density used to turn a target DM into a span estimate (cm⁻³)
pub const N0: ElectronDensity = 0.013;

// -------------------------------------------------------------------------------------------------
// Scan settings
// -------------------------------------------------------------------------------------------------

/// Default (and fine) step size (pc)
pub const DEFAULT_STEP: Parsec = 5.0;

/// Step size used in the intergalactic gap outside any Magellanic structure (pc)
pub const COARSE_STEP: Parsec = 200.0;

/// Minimum number of steps that must cover the estimated span
pub const MIN_STEPS: f64 = 200.0;

/// Sample budget for Galactic pulsars
pub const PULSAR_BUDGET: usize = 5_000;

/// Sample budget for Magellanic and FRB targets
pub const EXTRAGALACTIC_BUDGET: usize = 20_000;

/// Upper bound on any reported distance (pc)
pub const DISTANCE_CEILING: Parsec = 100_000.0;

/// Distance target used for FRB scans so they cross the whole Magellanic System (pc)
pub const FRB_SENTINEL_DISTANCE: Parsec = 100_000.0;

/// DM increments at or below this value are treated as zero
pub const DM_STEP_FLOOR: DispersionMeasure = 1e-6;

// -------------------------------------------------------------------------------------------------
// Region dominance
// -------------------------------------------------------------------------------------------------

/// Height of the Local Bubble boundary above which the Gum Nebula competes (pc)
pub const LOCAL_BUBBLE_HEIGHT: Parsec = 110.0;

/// Name of the parameter file expected inside a parameter directory
pub const PARAMETER_FILE: &str = "ymw16par.txt";
