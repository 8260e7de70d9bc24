use anyhow::Context;

use crate::config::RunConfig;
use crate::math::range::Sample;
use crate::io::snapshot::column_names;

/// Write a plain-text record of a finished run to `out_dir/rk4_<field>.txt`:
/// a `key=value` header, a blank line, then fixed-precision CSV rows.
pub fn write_run_log(
    out_dir: impl AsRef<std::path::Path>,
    cfg: &RunConfig,
    samples: &[Sample],
) -> anyhow::Result<std::path::PathBuf> {
    use std::io::Write;

    std::fs::create_dir_all(out_dir.as_ref()).context("create run log dir failed")?;
    let path = out_dir.as_ref().join(format!("rk4_{}.txt", cfg.field.label()));
    let mut f = std::fs::File::create(&path)
        .with_context(|| format!("create run log file failed (path={:?})", path))?;

    let init: Vec<String> = cfg.initial_state.iter().map(|v| format!("{:.6}", v)).collect();
    writeln!(f, "field={}", cfg.field)?;
    writeln!(f, "scheme={}", cfg.scheme)?;
    writeln!(f, "t0={:.6}", cfg.t0)?;
    writeln!(f, "t_end={:.6}", cfg.t_end)?;
    writeln!(f, "dt={:.6}", cfg.dt)?;
    writeln!(f, "init={}", init.join(","))?;
    writeln!(f, "samples={}", samples.len())?;
    writeln!(f, "config={}", serde_json::to_string(cfg).context("serialize run config failed")?)?;
    writeln!(f)?;

    let dim = cfg.initial_state.len();
    writeln!(f, "t,{}", column_names(dim).join(","))?;
    for s in samples {
        anyhow::ensure!(s.state.len() == dim, "sample dimension mismatch at t={}", s.t);
        let row: Vec<String> = s.state.iter().map(|v| format!("{:.6}", v)).collect();
        writeln!(f, "{:.6},{}", s.t, row.join(","))?;
    }

    Ok(path)
}
