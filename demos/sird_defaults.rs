use epimod::model::{Params, Variant};
use epimod::sim::Simulation;

fn main() -> anyhow::Result<()> {
    // Default SIRD scenario: 1% infected seed, 160 samples over [0, 160].
    let sim = Simulation::default();
    let traj = sim.run(Variant::Sird, Params::default_for(Variant::Sird))?;

    // Print every 8th sample as CSV.
    println!("t,S,I,R");
    for (idx, t) in traj.t.iter().enumerate() {
        if idx % 8 != 0 {
            continue;
        }
        let row: Vec<String> = traj
            .series
            .iter()
            .map(|s| format!("{:.4}", s.values[idx]))
            .collect();
        println!("{:.1},{}", t, row.join(","));
    }

    Ok(())
}
