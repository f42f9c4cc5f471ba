pub mod breath;
pub mod error;
pub mod export;
pub mod model;
pub mod params;
pub mod simulator;

pub use breath::{BreathPeak, BreathProfile};
pub use error::BreathsolError;
pub use params::{ParameterSet, Reporter, Species};
pub use simulator::{simulate, SimulationSetup, Trajectory};

/// Run the full chain for one `(species, reporter)` selection: construct the
/// parameter bundle, integrate the compartmental system over the requested
/// span, and convert the chamber trajectory to a breath profile.
///
/// Every value involved (parameters, state, trajectory, profile) is local to
/// this call; repeated invocations are independent.
///
/// ```ignore
/// use breathsol::prelude::*;
///
/// let profile = simulate_breath(Species::Mouse, Reporter::PFC1, &SimulationSetup::default())?;
/// let peak = profile.peak().unwrap();
/// println!("peak {:.1} ppb at {:.1} min", peak.cmax_ppb, peak.tmax_min);
/// ```
pub fn simulate_breath(
    species: Species,
    reporter: Reporter,
    setup: &SimulationSetup,
) -> Result<BreathProfile, BreathsolError> {
    let params = ParameterSet::new(species, reporter)?;
    let trajectory = simulate(&params, setup)?;
    Ok(BreathProfile::from_trajectory(&trajectory))
}

pub mod prelude {
    pub use crate::breath::{micromolar_to_ppb, ppb_to_micromolar, BreathPeak, BreathProfile};
    pub use crate::error::BreathsolError;
    pub use crate::export::{write_breath_signal, write_csv, BREATH_SIGNAL_FILE};
    pub use crate::params::{ConfigurationError, ParameterSet, Reporter, Species, SUPPORTED};
    pub use crate::simulate_breath;
    pub use crate::simulator::{simulate, IntegrationError, SimulationSetup, Trajectory};
}
