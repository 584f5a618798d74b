//! # Line-of-sight step integrator
//!
//! Marches a sample outward along a Galactic direction, accumulating dispersion measure
//! until either a target DM or a target distance is crossed.
//!
//! ## Stepping
//!
//! - The step starts at [`DEFAULT_STEP`] and is shortened so that at least [`MIN_STEPS`]
//!   steps cover the expected span (`DM / N0` for a DM target, the distance itself for a
//!   distance target).
//! - Samples sit at segment midpoints: the first one at half a step from the Sun.
//! - Inside [`GALACTIC_VALIDITY_RADIUS`] the Galactic components are sampled. Beyond it they
//!   are no longer re-sampled (the last sample is kept) and, for extragalactic targets, the
//!   Magellanic System is sampled instead, with a [`COARSE_STEP`] unless the scan asked for
//!   fine steps or an LMC/SMC region has already been entered.
//! - Each DM increment is `density × step`; increments at or below [`DM_STEP_FLOOR`] count as
//!   zero, so the accumulated DM never decreases.
//!
//! ## Termination
//!
//! The crossing test runs on every new sample *before* it is integrated:
//!
//! - **DM → distance**: accumulated DM ≥ target. The crossing distance is found by backing
//!   off from the end of the last segment along the last increment's slope.
//! - **distance → DM**: sample distance > target. The last increment's slope extends (or
//!   trims) the accumulated DM to the target distance.
//!
//! The sample budget is only a safety bound. Running out of samples reports the last
//! accumulated value with the distance clamped to [`DISTANCE_CEILING`], and logs a warning
//! unless the scan was configured as [`budget_bounded`](ScanConfig::budget_bounded).

use log::{debug, trace, warn};

use crate::{
    combiner::{combine, DominantRegion, RegionFactors},
    constants::{
        DispersionMeasure, Parsec, COARSE_STEP, DEFAULT_STEP, DISTANCE_CEILING, DM_STEP_FLOOR,
        GALACTIC_VALIDITY_RADIUS, MIN_STEPS, N0,
    },
    coordinates::Direction,
    density::{DensityModel, GalacticSample, MagellanicSample},
    parameters::ModelParameters,
};

/// Which quantity is given and which one the scan solves for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionDirection {
    /// DM given, distance wanted
    DmToDistance,
    /// Distance given, DM wanted
    DistanceToDm,
}

/// Per-scan settings, derived by the [dispatcher](crate::dispatch) from the request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub direction: ConversionDirection,
    /// Target DM (pc cm⁻³) or target distance (pc)
    pub target: f64,
    /// Maximum number of samples
    pub budget: usize,
    /// Sample the Magellanic System beyond the validity radius
    pub sample_magellanic: bool,
    /// Keep fine steps beyond the validity radius even outside Magellanic structures
    pub fine_beyond_galaxy: bool,
    /// Record the accumulated DM when the scan first leaves the validity radius
    pub snapshot_galactic: bool,
    /// Keep every `(distance, DM)` pair for inspection
    pub record_profile: bool,
    /// The scan is meant to run to the end of its budget, so exhausting it is not a warning
    pub budget_bounded: bool,
    pub verbosity: u8,
}

impl ScanConfig {
    pub fn new(direction: ConversionDirection, target: f64, budget: usize) -> Self {
        ScanConfig {
            direction,
            target,
            budget,
            sample_magellanic: false,
            fine_beyond_galaxy: true,
            snapshot_galactic: false,
            record_profile: false,
            budget_bounded: false,
            verbosity: 0,
        }
    }

    /// Span the scan expects to cover, used to size the initial step.
    pub fn expected_span(&self) -> Parsec {
        match self.direction {
            ConversionDirection::DmToDistance => self.target / N0,
            ConversionDirection::DistanceToDm => self.target,
        }
    }

    /// Initial step: [`DEFAULT_STEP`], shortened so at least [`MIN_STEPS`] steps cover the
    /// expected span. A non-positive span keeps the default step.
    pub fn initial_step(&self) -> Parsec {
        let span = self.expected_span();
        if span > 0.0 && span / DEFAULT_STEP < MIN_STEPS {
            span / MIN_STEPS
        } else {
            DEFAULT_STEP
        }
    }
}

/// Mutable working state of one scan. Created fresh for every call to [`Scan::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationState {
    /// Distance of the current sample (pc)
    pub distance: Parsec,
    /// Current step (pc)
    pub step: Parsec,
    /// Accumulated DM up to the end of the last integrated segment
    pub dm: DispersionMeasure,
    /// DM added by the last integrated segment
    pub last_increment: DispersionMeasure,
    /// Last Galactic component sample, kept once the scan leaves the validity radius
    pub galactic: GalacticSample,
    /// Last Magellanic sample, zero inside the Galaxy
    pub magellanic: MagellanicSample,
    /// An LMC or SMC region has been entered
    pub entered_magellanic: bool,
    /// Dominant region of the last integrated sample
    pub region: DominantRegion,
    /// Accumulated DM when the scan first left the validity radius
    pub galactic_dm: Option<DispersionMeasure>,
    /// Samples integrated so far
    pub samples: usize,
}

impl IntegrationState {
    pub fn new(step: Parsec) -> Self {
        IntegrationState {
            distance: -0.5 * step,
            step,
            dm: 0.0,
            last_increment: 0.0,
            galactic: GalacticSample::default(),
            magellanic: MagellanicSample::default(),
            entered_magellanic: false,
            region: DominantRegion::Disk,
            galactic_dm: None,
            samples: 0,
        }
    }

    /// Far end of the last integrated segment.
    fn segment_end(&self) -> Parsec {
        self.distance - 0.5 * self.step
    }
}

/// How a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// The target was crossed and the result interpolated
    Crossed,
    /// The sample budget ran out first
    BudgetExhausted,
}

/// Raw outcome of a scan, before any target-specific post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub end: ScanEnd,
    /// Crossing distance, target distance, or last distance on budget exhaustion (pc)
    pub distance: Parsec,
    /// Target DM, interpolated DM, or accumulated DM on budget exhaustion
    pub dm: DispersionMeasure,
    /// DM accumulated inside the Galactic validity radius, if the scan left it
    pub galactic_dm: Option<DispersionMeasure>,
    pub samples: usize,
    pub last_region: DominantRegion,
    /// `(distance, accumulated DM)` after each integrated sample, when requested
    pub profile: Vec<(Parsec, DispersionMeasure)>,
}

/// A line-of-sight scan through a density model.
pub struct Scan<'a, M: DensityModel + ?Sized> {
    model: &'a M,
    params: &'a ModelParameters,
    direction: Direction,
    factors: RegionFactors,
}

impl<'a, M: DensityModel + ?Sized> Scan<'a, M> {
    pub fn new(model: &'a M, params: &'a ModelParameters, direction: Direction) -> Self {
        Scan {
            model,
            params,
            direction,
            factors: RegionFactors::from_params(params),
        }
    }

    /// Run the scan to the target crossing or to the end of the budget.
    pub fn run(&self, config: &ScanConfig) -> ScanOutcome {
        let mut state = IntegrationState::new(config.initial_step());
        let mut profile = Vec::new();

        if config.verbosity >= 1 {
            debug!(
                "span={:.3} pc, nstep={:.3}, step={:.6} pc, budget={}",
                config.expected_span(),
                config.expected_span() / DEFAULT_STEP,
                state.step,
                config.budget
            );
        }

        for i in 1..=config.budget {
            state.distance += state.step;
            let point = self.direction.sample(state.distance, &self.params.warp);

            if let Some(outcome) = self.crossing(&state, config) {
                return ScanOutcome { profile, ..outcome };
            }

            if point.galactocentric_radius <= GALACTIC_VALIDITY_RADIUS {
                state.galactic = self.model.galactic(&point, self.params);
            } else if config.sample_magellanic {
                state.step = if config.fine_beyond_galaxy || state.entered_magellanic {
                    DEFAULT_STEP
                } else {
                    COARSE_STEP
                };
                state.magellanic = self.model.magellanic(&self.direction, &point, self.params);
                state.entered_magellanic |= state.magellanic.entered();
            } else {
                state.step = DEFAULT_STEP;
            }

            let combined = combine(&state.galactic, &state.magellanic, &self.factors);
            let mut increment = combined.density * state.step;
            if increment <= DM_STEP_FLOOR {
                increment = 0.0;
            }
            state.dm += increment;
            state.last_increment = increment;
            state.region = combined.region;
            state.samples = i;

            if config.verbosity >= 2 {
                trace!(
                    "d={:.3} x={:.3} y={:.3} z={:.3} R={:.3} theta_warp={:.6} z_warp={:.3} z_w={:.3}",
                    point.distance,
                    point.x(),
                    point.y(),
                    point.z(),
                    point.cylindrical_radius,
                    point.warp_angle,
                    point.warp_offset,
                    point.z_warped
                );
                trace!(
                    "ne={:.6} ({}) {:?} {:?} dm_step={:.6} step={:.3} dm={:.6}",
                    combined.density,
                    combined.region,
                    state.galactic,
                    state.magellanic,
                    increment,
                    state.step,
                    state.dm
                );
            }

            if config.snapshot_galactic
                && state.galactic_dm.is_none()
                && point.galactocentric_radius > GALACTIC_VALIDITY_RADIUS
            {
                state.galactic_dm = Some(state.dm);
            }

            if config.record_profile {
                profile.push((state.segment_end() + state.step, state.dm));
            }
        }

        if !config.budget_bounded {
            warn!(
                "sample budget of {} exhausted before crossing target {}",
                config.budget, config.target
            );
        } else if config.verbosity >= 1 {
            debug!("scan ran its full budget of {} samples", config.budget);
        }
        ScanOutcome {
            end: ScanEnd::BudgetExhausted,
            distance: (state.distance + 0.5 * state.step).min(DISTANCE_CEILING),
            dm: state.dm,
            galactic_dm: state.galactic_dm,
            samples: state.samples,
            last_region: state.region,
            profile,
        }
    }

    /// Interpolated result if the newly placed sample lies past the target.
    fn crossing(&self, state: &IntegrationState, config: &ScanConfig) -> Option<ScanOutcome> {
        let (distance, dm) = match config.direction {
            ConversionDirection::DmToDistance => {
                if state.dm < config.target {
                    return None;
                }
                let overshoot = state.dm - config.target;
                let distance = if overshoot == 0.0 {
                    state.segment_end()
                } else if state.last_increment > 0.0 {
                    state.segment_end() - state.step * overshoot / state.last_increment
                } else {
                    // no slope to interpolate along: midpoint of the last segment.
                    // not reached from `run`: after a zero increment the DM is the one the
                    // previous check already found below the target
                    state.distance - state.step
                };
                (distance.clamp(0.0, DISTANCE_CEILING), config.target)
            }
            ConversionDirection::DistanceToDm => {
                if state.distance <= config.target {
                    return None;
                }
                let slope = state.last_increment / state.step;
                (
                    config.target,
                    state.dm + slope * (config.target - state.segment_end()),
                )
            }
        };

        Some(ScanOutcome {
            end: ScanEnd::Crossed,
            distance,
            dm,
            galactic_dm: state.galactic_dm,
            samples: state.samples,
            last_region: state.region,
            profile: Vec::new(),
        })
    }
}
