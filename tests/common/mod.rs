#![allow(dead_code)]

use dmdist::{
    constants::Parsec,
    coordinates::{Direction, SamplePoint},
    density::{DensityModel, GalacticSample, MagellanicSample},
    dispatch::{LineOfSightRequest, TargetType},
    integrator::ConversionDirection,
    parameters::ModelParameters,
};

pub fn builtin_params() -> ModelParameters {
    ModelParameters::builtin().unwrap()
}

pub fn request(
    l: f64,
    b: f64,
    value: f64,
    direction: ConversionDirection,
    target_type: TargetType,
) -> LineOfSightRequest {
    LineOfSightRequest::builder()
        .longitude(l)
        .latitude(b)
        .target_value(value)
        .direction(direction)
        .target_type(target_type)
        .build()
        .unwrap()
}

/// Disk material up to `disk_edge`, one LMC-like cloud between `cloud_start` and `cloud_end`.
///
/// Galactic and Magellanic contributions are easy to predict: `disk_ne · disk_edge` and
/// about `cloud_ne · (cloud_end − cloud_start)`.
#[derive(Debug, Clone, Copy)]
pub struct DiskAndCloud {
    pub disk_ne: f64,
    pub disk_edge: Parsec,
    pub cloud_ne: f64,
    pub cloud_start: Parsec,
    pub cloud_end: Parsec,
}

impl DensityModel for DiskAndCloud {
    fn galactic(&self, point: &SamplePoint, _params: &ModelParameters) -> GalacticSample {
        GalacticSample {
            thin_disk: if point.distance < self.disk_edge {
                self.disk_ne
            } else {
                0.0
            },
            bubble_height: f64::INFINITY,
            ..GalacticSample::default()
        }
    }

    fn magellanic(
        &self,
        _direction: &Direction,
        point: &SamplePoint,
        _params: &ModelParameters,
    ) -> MagellanicSample {
        let inside = (self.cloud_start..self.cloud_end).contains(&point.distance);
        MagellanicSample {
            lmc: if inside { self.cloud_ne } else { 0.0 },
            in_lmc: inside,
            ..MagellanicSample::default()
        }
    }
}
