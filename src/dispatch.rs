//! # Mode dispatcher
//!
//! Turns a [`LineOfSightRequest`] into a [`ScanConfig`], runs the
//! [integrator](crate::integrator) and applies the post-processing of each target type.
//!
//! ## Target types
//!
//! | Target            | Scan direction       | Budget | Beyond 35 kpc                  | Galactic snapshot |
//! |-------------------|----------------------|--------|--------------------------------|-------------------|
//! | Galactic pulsar   | as requested         | 5 000  | 5 pc steps, no Magellanic      | no                |
//! | Magellanic source | as requested         | 20 000 | 200 pc steps, 5 pc once inside | yes               |
//! | FRB               | always distance → DM | 20 000 | 5 pc steps                     | yes               |
//!
//! - **Galactic pulsar**: the scattering time comes from the given DM, or from the
//!   converged DM when a distance is given.
//! - **Magellanic source**: the DM accumulated when leaving the Galaxy is the Galactic part
//!   `G`, the rest is the Magellanic part `M`. The scattering time is
//!   `max(τ(G)/2, τ(M)/2)`. A source that never leaves the Galaxy keeps `G = DM`, `M = 0` and
//!   the unhalved `τ(DM)`.
//! - **FRB**: the scan runs to a 100 kpc sentinel so it crosses the whole Magellanic System,
//!   and the Galactic / Magellanic split is handed to a
//!   [`HostGalaxyReporter`](crate::report::HostGalaxyReporter) together with the host DM.
//!
//! ## Usage
//!
//! ```rust
//! use dmdist::density::uniform::UniformMedium;
//! use dmdist::dispatch::{compute_line_of_sight, LineOfSightRequest, ScanResult, TargetType};
//! use dmdist::integrator::ConversionDirection;
//! use dmdist::parameters::ModelParameters;
//!
//! let params = ModelParameters::builtin().unwrap();
//! let request = LineOfSightRequest::builder()
//!     .longitude(0.0)
//!     .latitude(0.0)
//!     .target_value(1000.0)
//!     .direction(ConversionDirection::DistanceToDm)
//!     .target_type(TargetType::GalacticPulsar)
//!     .build()
//!     .unwrap();
//!
//! let result = compute_line_of_sight(&request, &params, &UniformMedium::new(0.01));
//! if let ScanResult::Pulsar(solution) = result {
//!     assert!((solution.dm - 10.0).abs() < 1e-6);
//! }
//! ```

use camino::Utf8Path;
use log::debug;

use crate::{
    constants::{
        Degree, DispersionMeasure, Parsec, EXTRAGALACTIC_BUDGET, FRB_SENTINEL_DISTANCE,
        PULSAR_BUDGET,
    },
    coordinates::Direction,
    density::DensityModel,
    dmdist_errors::DmDistError,
    integrator::{ConversionDirection, Scan, ScanConfig, ScanEnd, ScanOutcome},
    parameters::ModelParameters,
    report::{HostGalaxyReporter, OutputFormat, Report},
    scattering::{log10_tau, tau_sc},
};

/// Kind of source at the end of the line of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    GalacticPulsar,
    /// Source in the LMC, SMC or Magellanic Bridge
    Magellanic,
    /// Fast radio burst
    Frb,
}

/// One line-of-sight computation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LineOfSightRequest {
    pub longitude: Degree,
    pub latitude: Degree,
    pub direction: ConversionDirection,
    pub target_type: TargetType,
    /// DM (pc cm⁻³) or distance (pc), depending on `direction`
    pub target_value: f64,
    /// Host-galaxy DM, only used for FRBs
    pub host_dm: DispersionMeasure,
    pub verbosity: u8,
    pub format: OutputFormat,
    /// Free text echoed at the end of the report line
    pub label: String,
}

impl LineOfSightRequest {
    pub fn builder() -> LineOfSightRequestBuilder {
        LineOfSightRequestBuilder::default()
    }

    pub fn sky_direction(&self) -> Direction {
        Direction::from_degrees(self.longitude, self.latitude)
    }
}

/// Builder for [`LineOfSightRequest`], with validation.
#[derive(Debug, Clone)]
pub struct LineOfSightRequestBuilder {
    request: LineOfSightRequest,
}

impl Default for LineOfSightRequestBuilder {
    fn default() -> Self {
        LineOfSightRequestBuilder {
            request: LineOfSightRequest {
                longitude: 0.0,
                latitude: 0.0,
                direction: ConversionDirection::DmToDistance,
                target_type: TargetType::GalacticPulsar,
                target_value: 0.0,
                host_dm: 0.0,
                verbosity: 0,
                format: OutputFormat::HumanReadable,
                label: String::new(),
            },
        }
    }
}

impl LineOfSightRequestBuilder {
    pub fn longitude(mut self, v: Degree) -> Self {
        self.request.longitude = v;
        self
    }
    pub fn latitude(mut self, v: Degree) -> Self {
        self.request.latitude = v;
        self
    }
    pub fn direction(mut self, v: ConversionDirection) -> Self {
        self.request.direction = v;
        self
    }
    pub fn target_type(mut self, v: TargetType) -> Self {
        self.request.target_type = v;
        self
    }
    pub fn target_value(mut self, v: f64) -> Self {
        self.request.target_value = v;
        self
    }
    pub fn host_dm(mut self, v: DispersionMeasure) -> Self {
        self.request.host_dm = v;
        self
    }
    pub fn verbosity(mut self, v: u8) -> Self {
        self.request.verbosity = v;
        self
    }
    pub fn format(mut self, v: OutputFormat) -> Self {
        self.request.format = v;
        self
    }
    pub fn label(mut self, v: impl Into<String>) -> Self {
        self.request.label = v.into();
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * longitude, latitude, target value and host DM must be finite;
    /// * `|latitude| ≤ 90`;
    /// * the target value must be non-negative.
    pub fn build(self) -> Result<LineOfSightRequest, DmDistError> {
        let r = &self.request;
        let finite = [
            ("longitude", r.longitude),
            ("latitude", r.latitude),
            ("target value", r.target_value),
            ("host DM", r.host_dm),
        ];
        if let Some((name, v)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DmDistError::InvalidRequest(format!("{name} is not finite: {v}")));
        }
        if r.latitude.abs() > 90.0 {
            return Err(DmDistError::InvalidRequest(format!(
                "latitude out of range: {}",
                r.latitude
            )));
        }
        if r.target_value < 0.0 {
            return Err(DmDistError::InvalidRequest(format!(
                "target value must be non-negative: {}",
                r.target_value
            )));
        }
        Ok(self.request)
    }
}

/// Scan settings for a request: the dispatch table above.
pub fn scan_plan(request: &LineOfSightRequest) -> ScanConfig {
    let mut config = match request.target_type {
        TargetType::GalacticPulsar => {
            ScanConfig::new(request.direction, request.target_value, PULSAR_BUDGET)
        }
        TargetType::Magellanic => {
            let mut config =
                ScanConfig::new(request.direction, request.target_value, EXTRAGALACTIC_BUDGET);
            config.sample_magellanic = true;
            config.fine_beyond_galaxy = false;
            config.snapshot_galactic = true;
            config
        }
        TargetType::Frb => {
            let mut config = ScanConfig::new(
                ConversionDirection::DistanceToDm,
                FRB_SENTINEL_DISTANCE,
                EXTRAGALACTIC_BUDGET,
            );
            config.sample_magellanic = true;
            config.snapshot_galactic = true;
            config.budget_bounded = true;
            config
        }
    };
    config.verbosity = request.verbosity;
    config
}

/// Distance, DM and scattering time of a resolved line of sight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOfSightSolution {
    pub distance: Parsec,
    pub dm: DispersionMeasure,
    /// log10 of the scattering time in seconds
    pub log_tau: f64,
    pub end: ScanEnd,
}

/// Split of the total DM of an extragalactic line of sight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmSplit {
    /// Accumulated inside the Galactic validity radius
    pub galactic: DispersionMeasure,
    /// Accumulated beyond it
    pub magellanic: DispersionMeasure,
}

/// Everything an FRB host-galaxy reporter needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrbHandoff {
    /// The caller's DM or distance, as given
    pub input_value: f64,
    pub input_was_distance: bool,
    pub dm_gal: DispersionMeasure,
    pub dm_mc: DispersionMeasure,
    pub dm_host: DispersionMeasure,
}

/// Final result of a line-of-sight computation, ready for formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult {
    Pulsar(LineOfSightSolution),
    Magellanic {
        solution: LineOfSightSolution,
        split: DmSplit,
    },
    Frb(FrbHandoff),
}

fn resolve_pulsar(request: &LineOfSightRequest, outcome: &ScanOutcome) -> ScanResult {
    let tau = match request.direction {
        ConversionDirection::DmToDistance => tau_sc(request.target_value),
        ConversionDirection::DistanceToDm => tau_sc(outcome.dm),
    };
    ScanResult::Pulsar(LineOfSightSolution {
        distance: outcome.distance,
        dm: outcome.dm,
        log_tau: log10_tau(tau),
        end: outcome.end,
    })
}

fn resolve_magellanic(outcome: &ScanOutcome) -> ScanResult {
    let total = outcome.dm;
    let (split, tau) = match (outcome.end, outcome.galactic_dm) {
        (ScanEnd::Crossed, None) => (
            DmSplit {
                galactic: total,
                magellanic: 0.0,
            },
            tau_sc(total),
        ),
        (_, galactic) => {
            let galactic = galactic.unwrap_or(0.0);
            let magellanic = total - galactic;
            let tau = (0.5 * tau_sc(galactic)).max(0.5 * tau_sc(magellanic));
            (
                DmSplit {
                    galactic,
                    magellanic,
                },
                tau,
            )
        }
    };
    ScanResult::Magellanic {
        solution: LineOfSightSolution {
            distance: outcome.distance,
            dm: total,
            log_tau: log10_tau(tau),
            end: outcome.end,
        },
        split,
    }
}

fn resolve_frb(request: &LineOfSightRequest, outcome: &ScanOutcome) -> ScanResult {
    let dm_gal = outcome.galactic_dm.unwrap_or(0.0);
    ScanResult::Frb(FrbHandoff {
        input_value: request.target_value,
        input_was_distance: request.direction == ConversionDirection::DistanceToDm,
        dm_gal,
        dm_mc: outcome.dm - dm_gal,
        dm_host: request.host_dm,
    })
}

/// Run one line-of-sight computation.
///
/// Arguments
/// -----------------
/// * `request`: direction, target and conversion settings.
/// * `params`: model parameters, borrowed for the whole scan.
/// * `model`: electron-density sub-models.
///
/// Return
/// ----------
/// * The [`ScanResult`] for the request's target type.
pub fn compute_line_of_sight<M: DensityModel + ?Sized>(
    request: &LineOfSightRequest,
    params: &ModelParameters,
    model: &M,
) -> ScanResult {
    let config = scan_plan(request);
    let outcome = Scan::new(model, params, request.sky_direction()).run(&config);

    if request.verbosity >= 1 {
        debug!(
            "{:?} scan ended {:?} after {} samples in the {} region",
            request.target_type, outcome.end, outcome.samples, outcome.last_region
        );
    }

    match request.target_type {
        TargetType::GalacticPulsar => resolve_pulsar(request, &outcome),
        TargetType::Magellanic => resolve_magellanic(&outcome),
        TargetType::Frb => resolve_frb(request, &outcome),
    }
}

/// Load the parameters, compute the line of sight and print the report line to stdout.
///
/// `parameter_dir = None` uses the parameter set embedded in the crate.
pub fn run_line_of_sight<M: DensityModel + ?Sized>(
    request: &LineOfSightRequest,
    parameter_dir: Option<&Utf8Path>,
    model: &M,
    reporter: &dyn HostGalaxyReporter,
) -> Result<ScanResult, DmDistError> {
    let params = match parameter_dir {
        Some(dir) => ModelParameters::from_dir(dir)?,
        None => ModelParameters::builtin()?,
    };
    let result = compute_line_of_sight(request, &params, model);
    println!("{}", Report::new(request, &result).render(reporter));
    Ok(result)
}

#[cfg(test)]
mod dispatch_test {
    use super::*;
    use crate::density::uniform::UniformMedium;
    use approx::assert_relative_eq;

    fn request(
        target_type: TargetType,
        direction: ConversionDirection,
        value: f64,
    ) -> LineOfSightRequest {
        LineOfSightRequest::builder()
            .longitude(30.0)
            .latitude(-5.0)
            .target_type(target_type)
            .direction(direction)
            .target_value(value)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_validation() {
        let err = LineOfSightRequest::builder()
            .latitude(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, DmDistError::InvalidRequest(_)));

        let err = LineOfSightRequest::builder()
            .latitude(91.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DmDistError::InvalidRequest("latitude out of range: 91".into())
        );

        assert!(LineOfSightRequest::builder()
            .target_value(-1.0)
            .build()
            .is_err());
    }

    #[test]
    fn test_plan_table() {
        let pulsar = scan_plan(&request(
            TargetType::GalacticPulsar,
            ConversionDirection::DmToDistance,
            50.0,
        ));
        assert_eq!(pulsar.budget, PULSAR_BUDGET);
        assert!(!pulsar.sample_magellanic);
        assert!(!pulsar.snapshot_galactic);

        let mc = scan_plan(&request(
            TargetType::Magellanic,
            ConversionDirection::DmToDistance,
            50.0,
        ));
        assert_eq!(mc.budget, EXTRAGALACTIC_BUDGET);
        assert_eq!(mc.direction, ConversionDirection::DmToDistance);
        assert!(mc.sample_magellanic && mc.snapshot_galactic && !mc.fine_beyond_galaxy);

        let frb = scan_plan(&request(TargetType::Frb, ConversionDirection::DmToDistance, 700.0));
        assert_eq!(frb.direction, ConversionDirection::DistanceToDm);
        assert_eq!(frb.target, FRB_SENTINEL_DISTANCE);
        assert!(frb.fine_beyond_galaxy);
        assert!(frb.budget_bounded);
        assert!(!pulsar.budget_bounded && !mc.budget_bounded);
    }

    #[test]
    fn test_pulsar_tau_from_given_dm() {
        let params = ModelParameters::builtin().unwrap();
        let req = request(
            TargetType::GalacticPulsar,
            ConversionDirection::DmToDistance,
            20.0,
        );
        match compute_line_of_sight(&req, &params, &UniformMedium::new(0.01)) {
            ScanResult::Pulsar(solution) => {
                assert_eq!(solution.dm, 20.0);
                assert_relative_eq!(solution.distance, 2000.0, max_relative = 1e-6);
                assert_relative_eq!(solution.log_tau, tau_sc(20.0).log10());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_magellanic_inside_galaxy_keeps_unhalved_tau() {
        let params = ModelParameters::builtin().unwrap();
        let req = request(TargetType::Magellanic, ConversionDirection::DistanceToDm, 3000.0);
        match compute_line_of_sight(&req, &params, &UniformMedium::new(0.01)) {
            ScanResult::Magellanic { solution, split } => {
                assert_relative_eq!(solution.dm, 30.0, max_relative = 1e-9);
                assert_eq!(split.galactic, solution.dm);
                assert_eq!(split.magellanic, 0.0);
                assert_relative_eq!(solution.log_tau, tau_sc(solution.dm).log10());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
