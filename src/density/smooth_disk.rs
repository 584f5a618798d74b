//! YMW16 thick disk on its own.
//!
//! ```text
//! n_e = n1 · g_d · sech²(z_w / H1)
//! g_d = 1                         if R < B_d
//!     = sech²((R − B_d) / A_d)    otherwise
//! ```
//!
//! `R` is the cylindrical radius and `z_w` the warp-corrected height. Every other component
//! is zero, so this medium gives the diffuse floor of the full model: a lower bound on DM
//! for any direction.

use crate::{
    coordinates::{Direction, SamplePoint},
    parameters::{ModelParameters, ThickDisk},
};

use super::{DensityModel, GalacticSample, MagellanicSample, OUTSIDE_LOCAL_BUBBLE};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothDisk;

fn sech2(x: f64) -> f64 {
    let s = 1.0 / x.cosh();
    s * s
}

/// Radial taper of the disk beyond `B_d`.
fn radial_taper(cylindrical_radius: f64, thick: &ThickDisk) -> f64 {
    if cylindrical_radius < thick.bd {
        1.0
    } else {
        sech2((cylindrical_radius - thick.bd) / thick.ad)
    }
}

impl DensityModel for SmoothDisk {
    fn galactic(&self, point: &SamplePoint, params: &ModelParameters) -> GalacticSample {
        let thick = &params.thick;
        let gd = radial_taper(point.cylindrical_radius, thick);
        GalacticSample {
            thick_disk: thick.n1 * gd * sech2(point.z_warped / thick.h1),
            bubble_height: OUTSIDE_LOCAL_BUBBLE,
            ..GalacticSample::default()
        }
    }

    fn magellanic(
        &self,
        _direction: &Direction,
        _point: &SamplePoint,
        _params: &ModelParameters,
    ) -> MagellanicSample {
        MagellanicSample::default()
    }
}
