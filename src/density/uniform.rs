use crate::{
    constants::ElectronDensity,
    coordinates::{Direction, SamplePoint},
    parameters::ModelParameters,
};

use super::{DensityModel, GalacticSample, MagellanicSample, OUTSIDE_LOCAL_BUBBLE};

/// Constant electron density inside the Galaxy, nothing in the Magellanic System.
///
/// The density is carried by the thin-disk slot so the combiner sees it as plain disk
/// material. With `ne` constant the accumulated DM is exactly `ne · d`, which makes this
/// medium the calibration field for the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformMedium {
    pub ne: ElectronDensity,
}

impl UniformMedium {
    pub fn new(ne: ElectronDensity) -> Self {
        UniformMedium { ne: ne.max(0.0) }
    }
}

impl DensityModel for UniformMedium {
    fn galactic(&self, _point: &SamplePoint, _params: &ModelParameters) -> GalacticSample {
        GalacticSample {
            thin_disk: self.ne,
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
