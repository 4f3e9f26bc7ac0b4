use anyhow::Context;

use crate::sim::Trajectory;

/// Write a plain-text run log: a params header followed by a
/// `t,<compartments>` CSV body. Returns the created path.
pub fn write_trajectory_log(
    out_dir: impl AsRef<std::path::Path>,
    run_id: &str,
    traj: &Trajectory,
) -> anyhow::Result<std::path::PathBuf> {
    use std::io::Write;

    std::fs::create_dir_all(out_dir.as_ref()).context("create logs dir failed")?;
    let path = out_dir
        .as_ref()
        .join(format!("{}_{}.txt", traj.variant.as_str().to_lowercase(), run_id));
    let mut f = std::fs::File::create(&path)
        .with_context(|| format!("create trajectory log file failed (path={:?})", path))?;

    writeln!(f, "run_id={}", run_id)?;
    writeln!(f, "variant={}", traj.variant)?;
    for (name, value) in traj.params.named() {
        writeln!(f, "{}={:.6}", name, value)?;
    }
    writeln!(f, "t_end={:.6}", traj.t.last().copied().unwrap_or(0.0))?;
    writeln!(f, "samples={}", traj.t.len())?;
    for w in &traj.warnings {
        writeln!(f, "warning={}", w)?;
    }
    writeln!(f)?;

    let keys: Vec<&str> = traj.series.iter().map(|s| s.key).collect();
    writeln!(f, "t,{}", keys.join(","))?;

    for s in &traj.series {
        anyhow::ensure!(
            s.values.len() == traj.t.len(),
            "series `{}` not aligned with time axis",
            s.key
        );
    }
    for (idx, t) in traj.t.iter().enumerate() {
        let row: Vec<String> = traj
            .series
            .iter()
            .map(|s| format!("{:.6}", s.values[idx]))
            .collect();
        writeln!(f, "{:.6},{}", t, row.join(","))?;
    }

    Ok(path)
}
