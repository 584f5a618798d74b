//! Line-of-sight dispersion measure ↔ distance conversion through the YMW16 Galactic
//! electron-density model.
//!
//! The entry point is [`dispatch::compute_line_of_sight`]: it scans a direction through a
//! [`density::DensityModel`], resolves the dominant structure of every sample with the
//! [`combiner`] and returns the distance, DM and scattering time for a Galactic pulsar, a
//! Magellanic source or a fast radio burst.

pub mod combiner;
pub mod constants;
pub mod coordinates;
pub mod density;
pub mod dispatch;
pub mod dmdist_errors;
pub mod integrator;
pub mod parameters;
pub mod report;
pub mod scattering;
