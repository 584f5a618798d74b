//! # Electron-density sub-models
//!
//! The line-of-sight engine never evaluates the physics of individual Galactic structures
//! itself. It asks a [`DensityModel`] for the densities of every component at a
//! [`SamplePoint`] and lets the [combiner](crate::combiner) decide which one dominates.
//!
//! ## Component records
//!
//! - [`GalacticSample`] – thick disk, thin disk, spiral arms, Galactic centre, Gum Nebula,
//!   Local Bubble and Loop I densities, plus Fermi-bubble membership and the height used by
//!   the Local-Bubble test. Sampled while the scan is inside the Galactic validity radius.
//! - [`MagellanicSample`] – LMC, Bridge (30 Doradus) and SMC densities plus LMC/SMC
//!   membership. Sampled beyond the validity radius for Magellanic and FRB targets.
//!
//! ## Reference media
//!
//! - [`UniformMedium`](crate::density::uniform::UniformMedium) – constant density
//!   everywhere inside the Galaxy.
//! - [`SmoothDisk`](crate::density::smooth_disk::SmoothDisk) – the YMW16 thick disk alone.
//!
//! Any other implementation (a full YMW16 port, a tabulated field, a test stub) plugs in
//! through the same trait.

pub mod smooth_disk;
pub mod uniform;

use crate::{
    constants::{ElectronDensity, Parsec},
    coordinates::{Direction, SamplePoint},
    parameters::ModelParameters,
};

/// Bubble height reported by media without a Local Bubble, so that the bubble never
/// attenuates their disk.
pub const OUTSIDE_LOCAL_BUBBLE: Parsec = f64::INFINITY;

/// Densities of the Galactic components at one sample (cm⁻³).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GalacticSample {
    pub thick_disk: ElectronDensity,
    pub thin_disk: ElectronDensity,
    pub spiral_arms: ElectronDensity,
    pub galactic_center: ElectronDensity,
    pub gum_nebula: ElectronDensity,
    pub local_bubble: ElectronDensity,
    pub loop_i: ElectronDensity,
    /// Sample lies inside a Fermi bubble
    pub in_fermi_bubble: bool,
    /// Height of the sample with respect to the Local Bubble frame (pc)
    pub bubble_height: Parsec,
}

/// Densities of the Magellanic System at one sample (cm⁻³).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MagellanicSample {
    pub lmc: ElectronDensity,
    pub bridge: ElectronDensity,
    pub smc: ElectronDensity,
    /// Sample lies inside the LMC
    pub in_lmc: bool,
    /// Sample lies inside the SMC
    pub in_smc: bool,
}

impl MagellanicSample {
    pub fn total(&self) -> ElectronDensity {
        self.lmc + self.bridge + self.smc
    }

    /// True once the sample is inside the LMC or the SMC.
    pub fn entered(&self) -> bool {
        self.in_lmc || self.in_smc
    }
}

/// Source of per-component electron densities.
///
/// Implementations must return non-negative densities.
pub trait DensityModel {
    /// Galactic components at a sample inside the validity radius.
    fn galactic(&self, point: &SamplePoint, params: &ModelParameters) -> GalacticSample;

    /// Magellanic components at a sample beyond the validity radius.
    fn magellanic(
        &self,
        direction: &Direction,
        point: &SamplePoint,
        params: &ModelParameters,
    ) -> MagellanicSample;
}
