//! Derivative function of the respiratory-tract compartment model
//!
//! Five coupled compartments track the inhaled nanocarrier and its freed
//! volatile reporter:
//!
//! - nanocarrier: lumen <-> tissue diffusion, with phagocytic loss and two
//!   saturable (Michaelis-Menten) cleavage sinks in tissue, one for the
//!   specific enzyme and one for the nonspecific pool, both acting on the
//!   same substrate;
//! - reporter: produced in tissue by both cleavage terms, then
//!   tissue -> lumen -> collection chamber, with clearance into blood at the
//!   tissue stage. Tissue concentration is rescaled by the tissue:air
//!   partition coefficient before the diffusive-flux comparison, and by
//!   tissue:blood for the clearance term.
//!
//! [`diffeq`] is pure: no hidden state, no side effects, bit-identical output
//! for identical input. The BDF solver evaluates it at trial points out of
//! chronological order, and its Newton iteration uses the analytic Jacobian
//! action in [`diffeq_jac_mul`]. Transient negative concentrations from
//! solver overshoot are left untouched; every term stays evaluable.

use crate::params::ParameterSet;
use crate::simulator::{T, V};

pub const NP_LUMEN: usize = 0;
pub const NP_TISSUE: usize = 1;
pub const REPORTER_TISSUE: usize = 2;
pub const REPORTER_LUMEN: usize = 3;
pub const REPORTER_CHAMBER: usize = 4;

/// Length of the state vector; indices above are fixed for the whole run.
pub const NSTATES: usize = 5;

/// Michaelis-Menten rate `k_cat * e * s / (km + s)`
#[inline]
fn saturable_rate(k_cat: f64, e: f64, km: f64, s: f64) -> f64 {
    k_cat * e * s / (km + s)
}

/// Derivative of [`saturable_rate`] with respect to the substrate
#[inline]
fn saturable_rate_slope(k_cat: f64, e: f64, km: f64, s: f64) -> f64 {
    let den = km + s;
    k_cat * e * km / (den * den)
}

/// Evaluate `dx = f(t, x)` for the five-compartment system.
///
/// Each exchange flux and cleavage rate is computed once and reused on both
/// sides of the transfer, so paired source/sink terms cancel exactly and the
/// only true sinks are phagocytosis and blood clearance.
pub fn diffeq(x: &V, p: &ParameterSet, _t: T, dx: &mut V) {
    let np_exchange = p.k_np_tissue * (x[NP_LUMEN] - x[NP_TISSUE]);
    let cleavage = saturable_rate(p.k_cat, p.ne, p.km, x[NP_TISSUE])
        + saturable_rate(p.ns_k_cat, p.ns_e, p.ns_km, x[NP_TISSUE]);
    let reporter_exchange =
        p.k_reporter_tissue * (x[REPORTER_TISSUE] / p.h_tissue_air - x[REPORTER_LUMEN]);
    let ventilation = p.qmc * (x[REPORTER_LUMEN] - x[REPORTER_CHAMBER]);

    dx[NP_LUMEN] = -np_exchange;
    dx[NP_TISSUE] = np_exchange - p.k_np_phago * x[NP_TISSUE] - cleavage;
    dx[REPORTER_TISSUE] = -reporter_exchange
        - p.k_reporter_clear * x[REPORTER_TISSUE] / p.h_tissue_blood
        + cleavage;
    dx[REPORTER_LUMEN] = reporter_exchange - ventilation;
    dx[REPORTER_CHAMBER] = ventilation;
}

/// Evaluate the Jacobian action `jv = J(t, x) * v`.
///
/// The system is linear except for the two Michaelis-Menten terms, whose
/// local slope is taken at the current tissue nanocarrier concentration.
pub fn diffeq_jac_mul(x: &V, p: &ParameterSet, _t: T, v: &V, jv: &mut V) {
    let np_exchange = p.k_np_tissue * (v[NP_LUMEN] - v[NP_TISSUE]);
    let cleavage_slope = saturable_rate_slope(p.k_cat, p.ne, p.km, x[NP_TISSUE])
        + saturable_rate_slope(p.ns_k_cat, p.ns_e, p.ns_km, x[NP_TISSUE]);
    let cleavage = cleavage_slope * v[NP_TISSUE];
    let reporter_exchange =
        p.k_reporter_tissue * (v[REPORTER_TISSUE] / p.h_tissue_air - v[REPORTER_LUMEN]);
    let ventilation = p.qmc * (v[REPORTER_LUMEN] - v[REPORTER_CHAMBER]);

    jv[NP_LUMEN] = -np_exchange;
    jv[NP_TISSUE] = np_exchange - p.k_np_phago * v[NP_TISSUE] - cleavage;
    jv[REPORTER_TISSUE] = -reporter_exchange
        - p.k_reporter_clear * v[REPORTER_TISSUE] / p.h_tissue_blood
        + cleavage;
    jv[REPORTER_LUMEN] = reporter_exchange - ventilation;
    jv[REPORTER_CHAMBER] = ventilation;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Reporter, Species};
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    fn mouse_pfc1() -> ParameterSet {
        ParameterSet::new(Species::Mouse, Reporter::PFC1).unwrap()
    }

    fn state(values: [f64; NSTATES]) -> V {
        DVector::from_row_slice(&values)
    }

    #[test]
    fn diffeq_is_referentially_transparent() {
        let p = mouse_pfc1();
        let x = state([3.2, 1.7, 0.4, 0.2, 0.05]);
        let mut dx1 = V::zeros(NSTATES);
        let mut dx2 = V::zeros(NSTATES);
        diffeq(&x, &p, 12.5, &mut dx1);
        diffeq(&x, &p, 12.5, &mut dx2);
        assert_eq!(dx1, dx2);
    }

    #[test]
    fn zero_state_is_a_fixed_point() {
        let p = mouse_pfc1();
        let x = V::zeros(NSTATES);
        let mut dx = V::zeros(NSTATES);
        diffeq(&x, &p, 0.0, &mut dx);
        assert_eq!(dx, V::zeros(NSTATES));
    }

    #[test]
    fn mass_is_conserved_without_sinks() {
        // With phagocytosis and blood clearance off, every remaining term is
        // an internal transfer and the derivative sum cancels exactly.
        let mut p = mouse_pfc1();
        p.k_np_phago = 0.0;
        p.k_reporter_clear = 0.0;

        let x = state([10.0, 4.0, 1.5, 0.8, 0.3]);
        let mut dx = V::zeros(NSTATES);
        diffeq(&x, &p, 1.0, &mut dx);
        assert_eq!(dx.sum(), 0.0);

        // A fortiori with the enzymatic terms suppressed as well.
        p.ne = 0.0;
        p.ns_e = 0.0;
        diffeq(&x, &p, 1.0, &mut dx);
        assert_eq!(dx.sum(), 0.0);
    }

    #[test]
    fn derivative_sum_equals_the_two_sinks() {
        let p = mouse_pfc1();
        let x = state([8.0, 3.0, 1.2, 0.6, 0.2]);
        let mut dx = V::zeros(NSTATES);
        diffeq(&x, &p, 0.0, &mut dx);

        let sinks = -p.k_np_phago * x[NP_TISSUE]
            - p.k_reporter_clear * x[REPORTER_TISSUE] / p.h_tissue_blood;
        assert_relative_eq!(dx.sum(), sinks, max_relative = 1e-12);
    }

    #[test]
    fn small_negative_concentrations_stay_evaluable() {
        let p = mouse_pfc1();
        let x = state([10.0, -1e-12, -1e-13, 0.0, 0.0]);
        let mut dx = V::zeros(NSTATES);
        diffeq(&x, &p, 0.0, &mut dx);
        assert!(dx.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn jacobian_action_matches_finite_differences() {
        let p = mouse_pfc1();
        let x = state([6.0, 2.5, 0.9, 0.4, 0.1]);
        let v = state([0.3, -0.7, 1.1, 0.2, -0.4]);

        let mut jv = V::zeros(NSTATES);
        diffeq_jac_mul(&x, &p, 0.0, &v, &mut jv);

        let h = 1e-6;
        let mut fwd = V::zeros(NSTATES);
        let mut bwd = V::zeros(NSTATES);
        diffeq(&(&x + &v * h), &p, 0.0, &mut fwd);
        diffeq(&(&x - &v * h), &p, 0.0, &mut bwd);
        let fd = (fwd - bwd) / (2.0 * h);

        for i in 0..NSTATES {
            assert_relative_eq!(jv[i], fd[i], max_relative = 1e-6, epsilon = 1e-8);
        }
    }
}
