//! # Line-of-sight geometry and Galactic warp
//!
//! Converts a sample taken at distance `d` along a Galactic direction `(l, b)` into
//! Galactocentric Cartesian coordinates, following the YMW16 conventions:
//!
//! ```text
//! x = d cos b sin l
//! y = R0 − d cos b cos l
//! z = d sin b + z_sun
//! ```
//!
//! with the Galactic centre at the origin and the Sun on the +y axis. Beyond the warp radius
//! the disk mid-plane is displaced vertically by
//! `z_warp = Γ_w (R − R_warp) cos(θ − θ_max)`, `θ = atan2(y, x)`, and the warped height
//! `z − z_warp` is what the disk components see.

use nalgebra::Vector3;

use crate::{
    constants::{Degree, Parsec, Radian, R0, RADEG, R_WARP, THETA_WARP_MAX},
    parameters::Warp,
};

/// A sky direction in Galactic coordinates with its trigonometric terms precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    /// Galactic longitude (deg)
    pub l: Degree,
    /// Galactic latitude (deg)
    pub b: Degree,
    pub sin_l: f64,
    pub cos_l: f64,
    pub sin_b: f64,
    pub cos_b: f64,
}

/// One sample point of a line-of-sight scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Distance from the Sun along the line of sight (pc)
    pub distance: Parsec,
    /// Galactocentric position `(x, y, z)` before the warp correction (pc)
    pub position: Vector3<f64>,
    /// Height corrected for the warp (pc)
    pub z_warped: Parsec,
    /// Galactocentric cylindrical radius `sqrt(x² + y²)` (pc)
    pub cylindrical_radius: Parsec,
    /// Galactocentric spherical radius using the warped height (pc)
    pub galactocentric_radius: Parsec,
    /// Azimuth used by the warp; zero inside the warp radius
    pub warp_angle: Radian,
    /// Vertical warp offset; zero inside the warp radius (pc)
    pub warp_offset: Parsec,
}

impl Direction {
    pub fn from_degrees(l: Degree, b: Degree) -> Self {
        let (sin_l, cos_l) = (l * RADEG).sin_cos();
        let (sin_b, cos_b) = (b * RADEG).sin_cos();
        Direction {
            l,
            b,
            sin_l,
            cos_l,
            sin_b,
            cos_b,
        }
    }

    /// Locate the point at `distance` pc along this direction.
    ///
    /// Arguments
    /// -----------------
    /// * `distance`: distance from the Sun (pc).
    /// * `warp`: Sun height and warp slope from the parameter bundle.
    ///
    /// Return
    /// ----------
    /// * The [`SamplePoint`], with `warp_angle` and `warp_offset` explicitly zero when the
    ///   cylindrical radius is inside [`R_WARP`].
    pub fn sample(&self, distance: Parsec, warp: &Warp) -> SamplePoint {
        let r = distance * self.cos_b;
        let x = r * self.sin_l;
        let y = R0 - r * self.cos_l;
        let z = distance * self.sin_b + warp.z_sun;
        let cylindrical_radius = x.hypot(y);

        let (warp_angle, warp_offset) = if cylindrical_radius < R_WARP {
            (0.0, 0.0)
        } else {
            let theta = y.atan2(x);
            let offset =
                warp.gamma_w * (cylindrical_radius - R_WARP) * (theta - THETA_WARP_MAX).cos();
            (theta, offset)
        };
        let z_warped = z - warp_offset;

        SamplePoint {
            distance,
            position: Vector3::new(x, y, z),
            z_warped,
            cylindrical_radius,
            galactocentric_radius: Vector3::new(x, y, z_warped).norm(),
            warp_angle,
            warp_offset,
        }
    }
}

impl SamplePoint {
    pub fn x(&self) -> Parsec {
        self.position.x
    }

    pub fn y(&self) -> Parsec {
        self.position.y
    }

    pub fn z(&self) -> Parsec {
        self.position.z
    }

    /// Position with the warp-corrected height, as seen by the disk components.
    pub fn warped_position(&self) -> Vector3<f64> {
        Vector3::new(self.position.x, self.position.y, self.z_warped)
    }
}
