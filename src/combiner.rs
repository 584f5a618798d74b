//! # Region-dominance combiner
//!
//! Reduces the per-component densities of one sample to a single effective electron
//! density and the [`DominantRegion`] it comes from.
//!
//! The tests run in a fixed order, and that order is part of the model: changing it moves
//! the region boundaries.
//!
//! 1. Inside a Fermi bubble the thick disk is enhanced by `J_FB`.
//! 2. Disk baseline `ne0 = thick + max(thin, spiral)`.
//! 3. Local Bubble. Above [`LOCAL_BUBBLE_HEIGHT`] it must beat both `ne0` and the Gum
//!    Nebula. Below, it only has to beat `ne0`; when it does not, the thick disk is
//!    attenuated by `J_LB` and `ne0` is recomputed.
//! 4. Loop I wins if it exceeds the (possibly attenuated) `ne0`.
//! 5. The Gum Nebula wins if it exceeds `ne0`.
//! 6. Priority: Local Bubble, then Gum Nebula, then Loop I, then the disk. The disk branch
//!    is `ne0` plus the Galactic centre and any Magellanic density.

use std::fmt;

use crate::{
    constants::{ElectronDensity, LOCAL_BUBBLE_HEIGHT},
    density::{GalacticSample, MagellanicSample},
    parameters::ModelParameters,
};

/// Structure that sets the electron density at a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DominantRegion {
    /// Thick disk, thin disk or spiral arms, plus Galactic centre and Magellanic System
    Disk,
    LoopI,
    GumNebula,
    LocalBubble,
}

impl fmt::Display for DominantRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DominantRegion::Disk => "disk",
            DominantRegion::LoopI => "Loop I",
            DominantRegion::GumNebula => "Gum Nebula",
            DominantRegion::LocalBubble => "Local Bubble",
        };
        f.write_str(name)
    }
}

/// Density scaling factors applied by the combiner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFactors {
    /// `J_FB`: thick-disk enhancement inside a Fermi bubble
    pub fermi_enhancement: f64,
    /// `J_LB`: thick-disk attenuation inside the Local Bubble
    pub bubble_attenuation: f64,
}

impl RegionFactors {
    pub fn from_params(params: &ModelParameters) -> Self {
        RegionFactors {
            fermi_enhancement: params.fermi_bubble.j_fb,
            bubble_attenuation: params.local_bubble.j_lb,
        }
    }
}

/// Outcome of [`combine`] for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combined {
    pub region: DominantRegion,
    /// Effective electron density (cm⁻³)
    pub density: ElectronDensity,
    /// Disk baseline `ne0` after the Fermi and Local-Bubble adjustments
    pub baseline: ElectronDensity,
}

fn disk_baseline(thick: ElectronDensity, sample: &GalacticSample) -> ElectronDensity {
    thick + sample.thin_disk.max(sample.spiral_arms)
}

/// Decide the dominant region of a sample and its effective density.
///
/// Arguments
/// -----------------
/// * `galactic`: Galactic component densities at the sample.
/// * `magellanic`: Magellanic densities (all zero inside the Galaxy).
/// * `factors`: `J_FB` and `J_LB`.
pub fn combine(
    galactic: &GalacticSample,
    magellanic: &MagellanicSample,
    factors: &RegionFactors,
) -> Combined {
    let mut thick = galactic.thick_disk;
    if galactic.in_fermi_bubble {
        thick *= factors.fermi_enhancement;
    }
    let mut ne0 = disk_baseline(thick, galactic);

    let lb = galactic.local_bubble;
    let in_local_bubble = if galactic.bubble_height > LOCAL_BUBBLE_HEIGHT {
        lb > ne0 && lb > galactic.gum_nebula
    } else if lb > ne0 {
        true
    } else {
        thick *= factors.bubble_attenuation;
        ne0 = disk_baseline(thick, galactic);
        false
    };
    let in_loop_i = galactic.loop_i > ne0;
    let in_gum_nebula = galactic.gum_nebula > ne0;

    let (region, density) = if in_local_bubble {
        (DominantRegion::LocalBubble, lb)
    } else if in_gum_nebula {
        (DominantRegion::GumNebula, galactic.gum_nebula)
    } else if in_loop_i {
        (DominantRegion::LoopI, galactic.loop_i)
    } else {
        (
            DominantRegion::Disk,
            ne0 + galactic.galactic_center + magellanic.total(),
        )
    };

    Combined {
        region,
        density,
        baseline: ne0,
    }
}
