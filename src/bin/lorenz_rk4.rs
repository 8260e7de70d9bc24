use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lorenz_rk4::io::run_log::write_run_log;
use lorenz_rk4::io::snapshot::{write_snapshots, OutputFormat};
use lorenz_rk4::{Field, RunConfig, StepScheme};

#[derive(Debug, Parser)]
#[command(name = "lorenz-rk4")]
#[command(about = "Integrate the Lorenz system with a fixed-step RK4 stepper")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Vector field: lorenz, lorenz-canonical or simple
    #[arg(long, default_value = "lorenz")]
    field: Field,

    /// Stage evaluation: literal or classical
    #[arg(long, default_value = "literal")]
    scheme: StepScheme,

    /// Initial time
    #[arg(long, default_value_t = 0.0)]
    t0: f64,

    /// Final time (exclusive)
    #[arg(long, default_value_t = 1.0)]
    t_end: f64,

    /// Time step, must be positive
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Initial state as comma-separated values (`--init=-1,2,3` when it starts negative)
    #[arg(long, value_delimiter = ',', default_values_t = [1.0, 1.0, 1.0])]
    init: Vec<f64>,

    /// Snapshot format on stdout: csv or list
    #[arg(long, default_value = "csv")]
    format: OutputFormat,

    /// Also write a run log into this directory
    #[arg(long)]
    run_log: Option<PathBuf>,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            field: self.field,
            scheme: self.scheme,
            t0: self.t0,
            t_end: self.t_end,
            dt: self.dt,
            initial_state: self.init.clone(),
        }
    }
}

/// Validate the run described by `cli`, stream its snapshots to `out` and,
/// when asked, write the run log. Returns the number of samples written.
fn run<W: Write>(cli: &Cli, out: W) -> anyhow::Result<usize> {
    let cfg = cli.run_config();
    cfg.check().context("invalid run configuration")?;

    tracing::info!(
        field = %cfg.field,
        scheme = %cfg.scheme,
        t0 = cfg.t0,
        t_end = cfg.t_end,
        dt = cfg.dt,
        samples = ?cfg.params().sample_count(),
        "starting run"
    );

    let traj = cfg.start()?;
    let written = match &cli.run_log {
        None => write_snapshots(out, cli.format, traj)?,
        Some(dir) => {
            let mut kept = Vec::new();
            let result = write_snapshots(
                out,
                cli.format,
                traj.inspect(|item| {
                    if let Ok(s) = item {
                        kept.push(s.clone());
                    }
                }),
            );
            let path = write_run_log(dir, &cfg, &kept)?;
            tracing::info!(path = %path.display(), "run log written");
            result?
        }
    };

    tracing::info!(samples = written, "run finished");
    Ok(written)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lorenz_rk4=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli, BufWriter::new(io::stdout().lock()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorenz_rk4::{IntegrationError, LorenzField, SimpleField};

    #[test]
    fn defaults_map_to_default_run_config() {
        let cli = Cli::try_parse_from(["lorenz-rk4"]).unwrap();
        assert_eq!(cli.run_config(), RunConfig::default());
        assert_eq!(cli.format, OutputFormat::Csv);
        assert!(cli.run_log.is_none());
    }

    #[test]
    fn flags_map_to_run_config() {
        let cli = Cli::try_parse_from([
            "lorenz-rk4",
            "--field",
            "lorenz-canonical",
            "--scheme",
            "classical",
            "--t0",
            "-1",
            "--t-end",
            "2.5",
            "--dt",
            "0.05",
            "--init=-1,0.5,3",
            "--format",
            "list",
        ])
        .unwrap();
        let cfg = cli.run_config();
        assert_eq!(cfg.field, Field::Lorenz(LorenzField::canonical()));
        assert_eq!(cfg.scheme, StepScheme::Classical);
        assert_eq!((cfg.t0, cfg.t_end, cfg.dt), (-1.0, 2.5, 0.05));
        assert_eq!(cfg.initial_state, vec![-1.0, 0.5, 3.0]);
        assert_eq!(cli.format, OutputFormat::List);
    }

    #[test]
    fn unknown_field_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["lorenz-rk4", "--field", "rossler"]).is_err());
    }

    #[test]
    fn streams_csv_and_writes_run_log() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().to_str().expect("utf-8 temp path");
        let cli = Cli::try_parse_from([
            "lorenz-rk4",
            "--field",
            "simple",
            "--t-end",
            "0.05",
            "--run-log",
            dir,
        ])
        .unwrap();

        let mut out = Vec::new();
        let written = run(&cli, &mut out).unwrap();
        assert_eq!(written, 5);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "t,x,y,z");
        assert_eq!(lines[1], "0.0,1.0,1.0,1.0");

        let log = std::fs::read_to_string(tmp.path().join("rk4_simple.txt")).unwrap();
        assert!(log.contains("samples=5\n"));
        assert_eq!(log.lines().filter(|l| l.starts_with("0.0")).count(), 5);
    }

    #[test]
    fn failing_run_still_logs_the_samples_before_the_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cli = Cli {
            field: Field::Simple(SimpleField),
            init: vec![0.0, 1.0, 1.0],
            run_log: Some(tmp.path().to_path_buf()),
            ..Cli::try_parse_from(["lorenz-rk4"]).unwrap()
        };

        let mut out = Vec::new();
        let err = run(&cli, &mut out).unwrap_err();
        assert_eq!(
            err.downcast_ref::<IntegrationError>(),
            Some(&IntegrationError::DivisionByZero { component: 0 })
        );
        assert_eq!(String::from_utf8(out).unwrap(), "t,x,y,z\n0.0,0.0,1.0,1.0\n");

        let log = std::fs::read_to_string(tmp.path().join("rk4_simple.txt")).unwrap();
        assert!(log.contains("samples=1\n"));
    }

    #[test]
    fn invalid_step_fails_before_any_output() {
        let cli = Cli::try_parse_from(["lorenz-rk4", "--dt", "0"]).unwrap();
        let mut out = Vec::new();
        let err = run(&cli, &mut out).unwrap_err();
        assert_eq!(
            err.downcast_ref::<IntegrationError>(),
            Some(&IntegrationError::InvalidStepSize(0.0))
        );
        assert!(out.is_empty());
    }
}
