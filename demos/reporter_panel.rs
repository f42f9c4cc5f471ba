//! Compare the four reporter chemistries in the mouse model: same dose, same
//! span, different kinetic and partitioning constants.

use breathsol::prelude::*;

fn main() {
    let setup = SimulationSetup::default();

    println!(
        "{:>8} {:>14} {:>12} {:>16}",
        "reporter", "cmax (ppb)", "tmax (min)", "t=120 min (ppb)"
    );
    for reporter in [Reporter::PFC1, Reporter::PFC3, Reporter::PFC5, Reporter::PFC7] {
        let profile =
            simulate_breath(Species::Mouse, reporter, &setup).expect("supported mouse reporter");
        let peak = profile.peak().expect("non-empty series");
        let last = profile.ppb().last().copied().unwrap_or_default();
        println!(
            "{reporter:>8} {:>14.1} {:>12.1} {:>16.1}",
            peak.cmax_ppb, peak.tmax_min, last
        );
    }
}
