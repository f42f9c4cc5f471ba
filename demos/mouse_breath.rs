//! Reproduce the default mouse/PFC1 exhaled-breath curve, print the peak,
//! and write the export artifacts to the current directory.

use std::path::Path;

use breathsol::prelude::*;

fn main() {
    let setup = SimulationSetup::default();
    let profile =
        simulate_breath(Species::Mouse, Reporter::PFC1, &setup).expect("default mouse run");

    let peak = profile.peak().expect("non-empty series");
    println!("=== mouse / PFC1, {} µM dose, 0-{} min ===", setup.dose, setup.t1);
    println!("peak: {:.1} ppb at t = {:.1} min", peak.cmax_ppb, peak.tmax_min);
    println!();
    println!("{:>10} {:>14}", "t (min)", "breath (ppb)");
    for (t, ppb) in profile.points().step_by(100) {
        println!("{t:>10.1} {ppb:>14.2}");
    }

    let artifact = write_breath_signal(Path::new("."), &profile).expect("write artifact");
    write_csv(Path::new("breath_series.csv"), &profile).expect("write csv");
    println!();
    println!("wrote {} and breath_series.csv", artifact.display());
}
