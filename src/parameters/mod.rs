//! # Galactic electron-density model parameters
//!
//! This module defines [`ModelParameters`], the read-only bundle of calibrated constants for
//! every structural component of the YMW16 electron-density model, and the loader that reads
//! them from a parameter directory.
//!
//! ## File format
//!
//! The parameter directory must contain a `ymw16par.txt` file made of `key value` lines:
//!
//! ```text
//! # thick disk
//! Ad          2500.
//! Bd          15000.
//! n1          0.01132   # mid-plane density
//! ```
//!
//! - Blank lines and everything after a `#` are ignored.
//! - Unknown keys are ignored, so newer files remain readable.
//! - Every key used by a component struct is mandatory; a missing key is reported by name.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use dmdist::parameters::ModelParameters;
//!
//! let params = ModelParameters::from_dir(Utf8Path::new("data")).unwrap();
//! println!("Sun height above the plane: {} pc", params.warp.z_sun);
//!
//! // Or the calibrated set shipped with the crate
//! let builtin = ModelParameters::builtin().unwrap();
//! ```
//!
//! The bundle is loaded once per computation and only ever borrowed afterwards.

use std::collections::HashMap;

use camino::Utf8Path;
use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{multispace0, space1},
    combinator::opt,
    number::complete::double,
    sequence::{preceded, separated_pair, terminated},
    IResult, Parser,
};

use crate::{
    constants::{ElectronDensity, Parsec, PARAMETER_FILE},
    dmdist_errors::DmDistError,
};

static BUILTIN_PARAMETERS: &str = include_str!("data/ymw16par.txt");

/// Position of the Sun relative to the Galactic plane and slope of the outer-disk warp.
#[derive(Debug, Clone, PartialEq)]
pub struct Warp {
    /// Height of the Sun above the Galactic plane (pc)
    pub z_sun: Parsec,
    /// Warp slope: vertical offset per parsec beyond the warp radius
    pub gamma_w: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThickDisk {
    pub ad: Parsec,
    pub bd: Parsec,
    pub n1: ElectronDensity,
    pub h1: Parsec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThinDisk {
    pub a2: Parsec,
    pub b2: Parsec,
    pub n2: ElectronDensity,
    pub k2: f64,
}

/// Four-arm logarithmic spiral plus the Local arm, with the Carina and Sagittarius tweaks.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralArms {
    pub b2s: Parsec,
    pub ka: f64,
    pub narm: [ElectronDensity; 5],
    pub warm: [Parsec; 5],
    pub aa: Parsec,
    pub ncn: f64,
    pub wcn: f64,
    pub thetacn: f64,
    pub nsg: f64,
    pub wsg: f64,
    pub thetasg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalacticCenter {
    pub ngc: ElectronDensity,
    pub agc: Parsec,
    pub hgc: Parsec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GumNebula {
    pub ngn: ElectronDensity,
    pub wgn: Parsec,
    pub agn: Parsec,
    pub kgn: f64,
}

/// Local Bubble shells. `j_lb` attenuates the thick disk inside the bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBubble {
    pub j_lb: f64,
    pub nlb1: ElectronDensity,
    pub detlb1: Parsec,
    pub wlb1: Parsec,
    pub hlb1: Parsec,
    pub thetalb1: f64,
    pub nlb2: ElectronDensity,
    pub detlb2: Parsec,
    pub wlb2: Parsec,
    pub hlb2: Parsec,
    pub thetalb2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopI {
    pub nli: ElectronDensity,
    pub rli: Parsec,
    pub wli: Parsec,
    pub detthli: f64,
    pub thetali: f64,
}

/// Fermi bubbles. `j_fb` enhances the thick disk inside the bubbles.
#[derive(Debug, Clone, PartialEq)]
pub struct FermiBubble {
    pub j_fb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lmc {
    pub nlmc: ElectronDensity,
}

/// 30 Doradus region bridging into the LMC.
#[derive(Debug, Clone, PartialEq)]
pub struct Bridge {
    pub n30d: ElectronDensity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Smc {
    pub nsmc: ElectronDensity,
}

/// Complete set of model constants, one struct per structural component.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub warp: Warp,
    pub thick: ThickDisk,
    pub thin: ThinDisk,
    pub spiral: SpiralArms,
    pub galactic_center: GalacticCenter,
    pub gum: GumNebula,
    pub local_bubble: LocalBubble,
    pub loop_i: LoopI,
    pub fermi_bubble: FermiBubble,
    pub lmc: Lmc,
    pub bridge: Bridge,
    pub smc: Smc,
}

/// Raw `key → value` map read from a parameter file.
struct ParameterTable(HashMap<String, f64>);

impl ParameterTable {
    fn get(&self, key: &str) -> Result<f64, DmDistError> {
        self.0
            .get(key)
            .copied()
            .ok_or_else(|| DmDistError::MissingParameter(key.to_string()))
    }

    fn get_array<const N: usize>(&self, prefix: &str) -> Result<[f64; N], DmDistError> {
        let mut values = [0.0; N];
        for (i, v) in values.iter_mut().enumerate() {
            *v = self.get(&format!("{prefix}{}", i + 1))?;
        }
        Ok(values)
    }
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn strip_comment(input: &str) -> IResult<&str, Option<&str>> {
    opt(take_until("#")).parse(input)
}

fn parse_entry(input: &str) -> IResult<&str, (&str, f64)> {
    terminated(
        separated_pair(preceded(multispace0, take_while1(is_key_char)), space1, double),
        multispace0,
    )
    .parse(input)
}

/// Parse one non-empty line into a `(key, value)` pair. Comment-only lines give `None`.
fn parse_line(line: &str) -> Result<Option<(String, f64)>, DmDistError> {
    let content = match strip_comment(line) {
        Ok((_, Some(before))) => before,
        _ => line,
    };
    if content.trim().is_empty() {
        return Ok(None);
    }

    match parse_entry(content) {
        Ok(("", (key, value))) => Ok(Some((key.to_string(), value))),
        _ => Err(DmDistError::ParameterParsing(line.to_string())),
    }
}

impl ModelParameters {
    /// Parse a parameter file already held in memory.
    ///
    /// Return
    /// ----------
    /// * The parsed bundle, or [`DmDistError::ParameterParsing`] for a malformed line and
    ///   [`DmDistError::MissingParameter`] for an absent key.
    pub fn parse(text: &str) -> Result<Self, DmDistError> {
        let table = ParameterTable(
            text.lines()
                .filter_map(|line| parse_line(line).transpose())
                .collect::<Result<HashMap<_, _>, DmDistError>>()?,
        );

        Ok(ModelParameters {
            warp: Warp {
                z_sun: table.get("z_Sun")?,
                gamma_w: table.get("Gamma_w")?,
            },
            thick: ThickDisk {
                ad: table.get("Ad")?,
                bd: table.get("Bd")?,
                n1: table.get("n1")?,
                h1: table.get("H1")?,
            },
            thin: ThinDisk {
                a2: table.get("A2")?,
                b2: table.get("B2")?,
                n2: table.get("n2")?,
                k2: table.get("K2")?,
            },
            spiral: SpiralArms {
                b2s: table.get("B2s")?,
                ka: table.get("Ka")?,
                narm: table.get_array("narm")?,
                warm: table.get_array("warm")?,
                aa: table.get("Aa")?,
                ncn: table.get("ncn")?,
                wcn: table.get("wcn")?,
                thetacn: table.get("thetacn")?,
                nsg: table.get("nsg")?,
                wsg: table.get("wsg")?,
                thetasg: table.get("thetasg")?,
            },
            galactic_center: GalacticCenter {
                ngc: table.get("ngc")?,
                agc: table.get("Agc")?,
                hgc: table.get("Hgc")?,
            },
            gum: GumNebula {
                ngn: table.get("ngn")?,
                wgn: table.get("Wgn")?,
                agn: table.get("Agn")?,
                kgn: table.get("Kgn")?,
            },
            local_bubble: LocalBubble {
                j_lb: table.get("J_LB")?,
                nlb1: table.get("nlb1")?,
                detlb1: table.get("detlb1")?,
                wlb1: table.get("wlb1")?,
                hlb1: table.get("hlb1")?,
                thetalb1: table.get("thetalb1")?,
                nlb2: table.get("nlb2")?,
                detlb2: table.get("detlb2")?,
                wlb2: table.get("wlb2")?,
                hlb2: table.get("hlb2")?,
                thetalb2: table.get("thetalb2")?,
            },
            loop_i: LoopI {
                nli: table.get("nli")?,
                rli: table.get("Rli")?,
                wli: table.get("Wli")?,
                detthli: table.get("detthli")?,
                thetali: table.get("thetali")?,
            },
            fermi_bubble: FermiBubble {
                j_fb: table.get("J_FB")?,
            },
            lmc: Lmc {
                nlmc: table.get("nlmc")?,
            },
            bridge: Bridge {
                n30d: table.get("n30D")?,
            },
            smc: Smc {
                nsmc: table.get("nsmc")?,
            },
        })
    }

    /// Load `ymw16par.txt` from a parameter directory.
    ///
    /// Arguments
    /// -----------------
    /// * `dir`: directory holding the parameter file.
    ///
    /// Return
    /// ----------
    /// * The parsed bundle, [`DmDistError::ParameterDirNotFound`] if `dir` is not a directory,
    ///   or any I/O / parsing error raised while reading the file.
    pub fn from_dir(dir: &Utf8Path) -> Result<Self, DmDistError> {
        if !dir.is_dir() {
            return Err(DmDistError::ParameterDirNotFound(dir.to_string()));
        }
        let text = std::fs::read_to_string(dir.join(PARAMETER_FILE))?;
        Self::parse(&text)
    }

    /// The calibrated YMW16 parameter set embedded in the crate.
    pub fn builtin() -> Result<Self, DmDistError> {
        Self::parse(BUILTIN_PARAMETERS)
    }
}
