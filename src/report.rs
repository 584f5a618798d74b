//! # Report lines
//!
//! One line per computation, in one of two layouts:
//!
//! - [`OutputFormat::HumanReadable`]: labelled, fixed-width fields.
//! - [`OutputFormat::Compact`]: `;`-separated fields, for scripts.
//!
//! Every line starts with the target prefix (`Gal`, `MC` or `FRB`) and the echoed direction.
//!
//! | Prefix | Input    | Compact fields after `l;b`                        |
//! |--------|----------|---------------------------------------------------|
//! | `Gal`  | DM       | `DM;DM_Gal;Dist;log_tau;label`                    |
//! | `Gal`  | distance | `Dist;DM;log_tau;label`                           |
//! | `MC`   | DM       | `DM;DM_Gal;DM_MC;Dist;log_tau;label`              |
//! | `MC`   | distance | `Dist;DM_Gal;DM_MC;DM;log_tau;label`              |
//! | `FRB`  | either   | whatever the [`HostGalaxyReporter`] returns       |
//!
//! Distances use one decimal, DMs two, angles and `log10(τ_sc / s)` three.

use itertools::Itertools;
use log::debug;

use crate::{
    constants::{DispersionMeasure, Parsec},
    dispatch::{FrbHandoff, LineOfSightRequest, ScanResult},
    integrator::ConversionDirection,
};

/// Layout of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// `;`-separated values
    Compact,
    #[default]
    HumanReadable,
}

/// Receives the DM split of an FRB line of sight and renders the extragalactic part of the
/// report.
pub trait HostGalaxyReporter {
    /// Arguments
    /// -----------------
    /// * `handoff`: input value, Galactic / Magellanic split and host DM.
    /// * `format`: layout of the line being built.
    /// * `verbosity`: 0 is silent, ≥ 1 enables diagnostics.
    /// * `label`: free text to append.
    ///
    /// Return
    /// ----------
    /// * The part of the line following the `FRB` prefix and the direction.
    fn report(
        &self,
        handoff: &FrbHandoff,
        format: OutputFormat,
        verbosity: u8,
        label: &str,
    ) -> String;
}

/// Default FRB reporter: prints the DM budget of the burst.
///
/// For a DM input the remainder `DM − DM_Gal − DM_MC − DM_Host` is what is left for the
/// intergalactic medium. For a distance input only the local contributions are known, so
/// their sum is reported instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrbSummary;

impl FrbSummary {
    fn local_dm(handoff: &FrbHandoff) -> DispersionMeasure {
        handoff.dm_gal + handoff.dm_mc + handoff.dm_host
    }
}

impl HostGalaxyReporter for FrbSummary {
    fn report(
        &self,
        handoff: &FrbHandoff,
        format: OutputFormat,
        verbosity: u8,
        label: &str,
    ) -> String {
        let local = Self::local_dm(handoff);
        if verbosity >= 1 {
            debug!(
                "FRB DM budget: Gal={:.3} MC={:.3} Host={:.3}",
                handoff.dm_gal, handoff.dm_mc, handoff.dm_host
            );
        }

        match (format, handoff.input_was_distance) {
            (OutputFormat::Compact, false) => [
                dm(handoff.input_value),
                dm(handoff.dm_gal),
                dm(handoff.dm_mc),
                dm(handoff.dm_host),
                dm(handoff.input_value - local),
                label.to_string(),
            ]
            .iter()
            .join(";"),
            (OutputFormat::Compact, true) => [
                dist(handoff.input_value),
                dm(handoff.dm_gal),
                dm(handoff.dm_mc),
                dm(handoff.dm_host),
                dm(local),
                label.to_string(),
            ]
            .iter()
            .join(";"),
            (OutputFormat::HumanReadable, false) => format!(
                "DM={:8.2} DM_Gal:{:8.2} DM_MC:{:8.2} DM_Host:{:8.2} DM_IGM:{:8.2} {}",
                handoff.input_value,
                handoff.dm_gal,
                handoff.dm_mc,
                handoff.dm_host,
                handoff.input_value - local,
                label
            ),
            (OutputFormat::HumanReadable, true) => format!(
                "Dist={:9.1} DM_Gal:{:8.2} DM_MC:{:8.2} DM_Host:{:8.2} DM_local:{:8.2} {}",
                handoff.input_value, handoff.dm_gal, handoff.dm_mc, handoff.dm_host, local, label
            ),
        }
    }
}

fn dm(v: DispersionMeasure) -> String {
    format!("{v:.2}")
}

fn dist(v: Parsec) -> String {
    format!("{v:.1}")
}

fn angle(v: f64) -> String {
    format!("{v:.3}")
}

/// A request and its result, ready to print.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    request: &'a LineOfSightRequest,
    result: &'a ScanResult,
}

impl<'a> Report<'a> {
    pub fn new(request: &'a LineOfSightRequest, result: &'a ScanResult) -> Self {
        Report { request, result }
    }

    fn prefix(&self) -> &'static str {
        match self.result {
            ScanResult::Pulsar(_) => "Gal",
            ScanResult::Magellanic { .. } => "MC",
            ScanResult::Frb(_) => "FRB",
        }
    }

    /// Render the line in the request's format. FRB results go through `reporter`.
    pub fn render(&self, reporter: &dyn HostGalaxyReporter) -> String {
        match self.request.format {
            OutputFormat::Compact => self.render_compact(reporter),
            OutputFormat::HumanReadable => self.render_human(reporter),
        }
    }

    fn render_compact(&self, reporter: &dyn HostGalaxyReporter) -> String {
        let r = self.request;
        let dm_input = r.direction == ConversionDirection::DmToDistance;
        let mut fields = vec![
            self.prefix().to_string(),
            angle(r.longitude),
            angle(r.latitude),
        ];
        match self.result {
            ScanResult::Pulsar(s) if dm_input => fields.extend([
                dm(r.target_value),
                dm(s.dm),
                dist(s.distance),
                angle(s.log_tau),
            ]),
            ScanResult::Pulsar(s) => {
                fields.extend([dist(r.target_value), dm(s.dm), angle(s.log_tau)])
            }
            ScanResult::Magellanic { solution, split } if dm_input => fields.extend([
                dm(r.target_value),
                dm(split.galactic),
                dm(split.magellanic),
                dist(solution.distance),
                angle(solution.log_tau),
            ]),
            ScanResult::Magellanic { solution, split } => fields.extend([
                dist(r.target_value),
                dm(split.galactic),
                dm(split.magellanic),
                dm(solution.dm),
                angle(solution.log_tau),
            ]),
            ScanResult::Frb(handoff) => {
                fields.push(reporter.report(handoff, OutputFormat::Compact, r.verbosity, &r.label));
                return fields.iter().join(";");
            }
        }
        fields.push(r.label.clone());
        fields.iter().join(";")
    }

    fn render_human(&self, reporter: &dyn HostGalaxyReporter) -> String {
        let r = self.request;
        let dm_input = r.direction == ConversionDirection::DmToDistance;
        let head = format!(
            "{}: gl={:8.3} gb={:8.3}",
            self.prefix(),
            r.longitude,
            r.latitude
        );
        let body = match self.result {
            ScanResult::Pulsar(s) if dm_input => format!(
                "DM={:8.2} DM_Gal:{:8.2} Dist:{:9.1} log(tau_sc):{:7.3} {}",
                r.target_value, s.dm, s.distance, s.log_tau, r.label
            ),
            ScanResult::Pulsar(s) => format!(
                "Dist={:9.1} DM:{:8.2} log(tau_sc):{:7.3} {}",
                r.target_value, s.dm, s.log_tau, r.label
            ),
            ScanResult::Magellanic { solution, split } if dm_input => format!(
                "DM={:8.2} DM_Gal:{:8.2} DM_MC:{:8.2} Dist:{:9.1} log(tau_sc):{:7.3} {}",
                r.target_value,
                split.galactic,
                split.magellanic,
                solution.distance,
                solution.log_tau,
                r.label
            ),
            ScanResult::Magellanic { solution, split } => format!(
                "Dist={:9.1} DM_Gal:{:8.2} DM_MC:{:8.2} DM:{:8.2} log(tau_sc):{:7.3} {}",
                r.target_value,
                split.galactic,
                split.magellanic,
                solution.dm,
                solution.log_tau,
                r.label
            ),
            ScanResult::Frb(handoff) => {
                reporter.report(handoff, OutputFormat::HumanReadable, r.verbosity, &r.label)
            }
        };
        format!("{head} {body}")
    }
}
