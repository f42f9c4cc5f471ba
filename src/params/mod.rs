//! Parameter bundles for the respiratory-tract compartmental model
//!
//! A [`ParameterSet`] collects the physiological, transport, and enzymatic
//! constants for one `(species, reporter)` combination. It is built once at
//! setup, stays immutable for the whole run, and is the only configuration
//! the simulator reads.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Simulated species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Mouse,
    Human,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Mouse => write!(f, "mouse"),
            Species::Human => write!(f, "human"),
        }
    }
}

/// Volatile reporter chemistry carried by the nanosensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reporter {
    PFC1,
    PFC3,
    PFC5,
    PFC7,
}

impl fmt::Display for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporter::PFC1 => write!(f, "PFC1"),
            Reporter::PFC3 => write!(f, "PFC3"),
            Reporter::PFC5 => write!(f, "PFC5"),
            Reporter::PFC7 => write!(f, "PFC7"),
        }
    }
}

/// The combinations with a defined parameter bundle.
///
/// Human bundles exist only for PFC1; the other three reporters have no
/// reported human constants and are rejected at construction.
pub const SUPPORTED: [(Species, Reporter); 5] = [
    (Species::Mouse, Reporter::PFC1),
    (Species::Mouse, Reporter::PFC3),
    (Species::Mouse, Reporter::PFC5),
    (Species::Mouse, Reporter::PFC7),
    (Species::Human, Reporter::PFC1),
];

/// Errors raised while selecting or validating a simulation configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The requested `(species, reporter)` pair has no defined constants
    #[error("no parameter set is defined for {species} with reporter {reporter}")]
    UnsupportedCombination { species: Species, reporter: Reporter },

    /// A run setting is out of its valid range
    #[error("invalid setting: {param} = {value}")]
    InvalidParameter { param: &'static str, value: f64 },
}

/// Constants for one species/reporter combination
///
/// Units are minutes and µM throughout. Derived fields (`qmc`, `ns_k_cat`,
/// `ns_km`, `h_tissue_blood`) are computed by [`ParameterSet::new`] and never
/// recomputed mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub species: Species,
    pub reporter: Reporter,

    /// Minute ventilation (mL/min)
    pub qm: f64,
    /// Tidal volume (mL)
    pub vl: f64,
    /// Breathing-rate-corrected flow, `qm / vl` (1/min)
    pub qmc: f64,

    /// Nanocarrier lumen<->tissue exchange rate (1/min)
    pub k_np_tissue: f64,
    /// Nanocarrier loss to macrophage phagocytosis (1/min)
    pub k_np_phago: f64,

    /// Reporter tissue<->lumen exchange rate (1/min)
    pub k_reporter_tissue: f64,
    /// Reporter clearance from tissue into blood (1/min)
    pub k_reporter_clear: f64,

    /// Specific enzyme concentration in tissue (µM)
    pub ne: f64,
    /// Specific enzyme turnover number (1/min)
    pub k_cat: f64,
    /// Specific enzyme Michaelis constant (µM)
    pub km: f64,

    /// Nonspecific enzyme pool concentration (µM)
    pub ns_e: f64,
    /// Nonspecific turnover, `k_cat / 60` (1/min)
    pub ns_k_cat: f64,
    /// Nonspecific Michaelis constant, `km * 35` (µM)
    pub ns_km: f64,

    /// Blood:air partition coefficient of the reporter
    pub h_blood_air: f64,
    /// Tissue:air partition coefficient of the reporter
    pub h_tissue_air: f64,
    /// Tissue:blood partition coefficient, `h_tissue_air / h_blood_air`
    pub h_tissue_blood: f64,
}

/// Reporter-specific primaries shared between the species bundles
struct ReporterConstants {
    k_cat: f64,
    km: f64,
    h_blood_air: f64,
    h_tissue_air: f64,
}

fn reporter_constants(reporter: Reporter) -> ReporterConstants {
    match reporter {
        Reporter::PFC1 => ReporterConstants {
            k_cat: 264.0,
            km: 150.0,
            h_blood_air: 0.52,
            h_tissue_air: 1.36,
        },
        Reporter::PFC3 => ReporterConstants {
            k_cat: 186.0,
            km: 210.0,
            h_blood_air: 0.41,
            h_tissue_air: 1.18,
        },
        Reporter::PFC5 => ReporterConstants {
            k_cat: 132.0,
            km: 280.0,
            h_blood_air: 0.33,
            h_tissue_air: 1.04,
        },
        Reporter::PFC7 => ReporterConstants {
            k_cat: 90.0,
            km: 350.0,
            h_blood_air: 0.27,
            h_tissue_air: 0.94,
        },
    }
}

impl ParameterSet {
    /// Build the parameter bundle for one `(species, reporter)` selection.
    ///
    /// Pure and side-effect-free. All derived fields are populated here.
    ///
    /// # Errors
    /// [`ConfigurationError::UnsupportedCombination`] for any pair outside
    /// [`SUPPORTED`].
    pub fn new(species: Species, reporter: Reporter) -> Result<Self, ConfigurationError> {
        let rc = match (species, reporter) {
            (Species::Mouse, r) => reporter_constants(r),
            (Species::Human, Reporter::PFC1) => reporter_constants(Reporter::PFC1),
            (Species::Human, _) => {
                return Err(ConfigurationError::UnsupportedCombination { species, reporter })
            }
        };

        let (qm, vl, ne) = match species {
            Species::Mouse => (24.0, 0.15, 0.34),
            Species::Human => (6000.0, 500.0, 0.17),
        };

        Ok(Self {
            species,
            reporter,
            qm,
            vl,
            qmc: qm / vl,
            k_np_tissue: 0.019,
            k_np_phago: 6.0e-4,
            k_reporter_tissue: 30.8,
            k_reporter_clear: 0.34,
            ne,
            k_cat: rc.k_cat,
            km: rc.km,
            ns_e: 17.0,
            ns_k_cat: rc.k_cat / 60.0,
            ns_km: rc.km * 35.0,
            h_blood_air: rc.h_blood_air,
            h_tissue_air: rc.h_tissue_air,
            h_tissue_blood: rc.h_tissue_air / rc.h_blood_air,
        })
    }
}
