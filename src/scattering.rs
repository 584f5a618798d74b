//! # Pulse scattering time
//!
//! Closed-form relation between the dispersion measure of a line of sight and the
//! pulse-broadening time it induces at 1 GHz (Krishnakumar et al. 2015, as adopted by YMW16):
//!
//! ```text
//! τ_sc(DM) = 4.1e-11 · DM^2.2 · (1 + 1.94e-3 · DM²)   [s]
//! ```

use crate::constants::{DispersionMeasure, Seconds};

/// Scattering time (s) for a given dispersion measure.
///
/// Negative inputs are treated as zero.
pub fn tau_sc(dm: DispersionMeasure) -> Seconds {
    if dm <= 0.0 {
        return 0.0;
    }
    4.1e-11 * dm.powf(2.2) * (1.0 + 0.00194 * dm * dm)
}

/// `log10` of a scattering time, the quantity every report prints.
///
/// A zero scattering time yields `-inf`.
pub fn log10_tau(tau: Seconds) -> f64 {
    tau.log10()
}

#[cfg(test)]
mod scattering_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_dm() {
        assert_eq!(tau_sc(0.0), 0.0);
        assert_eq!(tau_sc(-3.0), 0.0);
        assert_eq!(log10_tau(tau_sc(0.0)), f64::NEG_INFINITY);
    }

    #[test]
    fn test_reference_values() {
        // 4.1e-11 * 10^2.2 * (1 + 0.194)
        assert_relative_eq!(tau_sc(10.0), 7.758_686_134e-9, max_relative = 1e-9);
        assert_relative_eq!(
            tau_sc(100.0),
            4.1e-11 * 100f64.powf(2.2) * 20.4,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_strictly_increasing() {
        let dms = [1e-3, 0.5, 1.0, 10.0, 57.3, 100.0, 500.0, 1500.0];
        for pair in dms.windows(2) {
            assert!(tau_sc(pair[1]) > tau_sc(pair[0]), "{pair:?}");
        }
    }
}
