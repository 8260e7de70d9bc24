use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::IntegrationResult;
use crate::math::range::Sample;

/// Text layout of the snapshot stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `t,x,y,z` header followed by one row per sample.
    #[default]
    Csv,
    /// One `[x, y, z] ,` line per sample, no time column.
    List,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::List => "list",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "list" => Ok(Self::List),
            other => Err(format!("unknown format '{other}' (expected csv or list)")),
        }
    }
}

/// Column names for a state of dimension `n`.
pub fn column_names(n: usize) -> Vec<String> {
    if n == 3 {
        return vec!["x".into(), "y".into(), "z".into()];
    }
    (0..n).map(|i| format!("y{}", i)).collect()
}

/// Python-style rendering of a state vector, e.g. `[1.0, 2.5, -3.0]`.
pub fn format_state(state: &[f64]) -> String {
    let parts: Vec<String> = state.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", parts.join(", "))
}

/// Stream `samples` to `out` in step order, one line per sample.
///
/// Rows already written are flushed before an integration error is returned.
/// Returns the number of samples written.
pub fn write_snapshots<W, I>(out: W, format: OutputFormat, samples: I) -> anyhow::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = IntegrationResult<Sample>>,
{
    match format {
        OutputFormat::Csv => write_csv(out, samples),
        OutputFormat::List => write_list(out, samples),
    }
}

fn write_csv<W, I>(out: W, samples: I) -> anyhow::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = IntegrationResult<Sample>>,
{
    let mut wtr = csv::Writer::from_writer(out);
    let mut written = 0usize;

    for item in samples {
        let sample = match item {
            Ok(s) => s,
            Err(e) => {
                wtr.flush().context("flush snapshot stream failed")?;
                return Err(e).with_context(|| format!("integration failed after {} samples", written));
            }
        };
        if written == 0 {
            let mut header = vec!["t".to_string()];
            header.extend(column_names(sample.state.len()));
            wtr.write_record(&header).context("write csv header failed")?;
        }
        let mut record = Vec::with_capacity(sample.state.len() + 1);
        record.push(format!("{:?}", sample.t));
        record.extend(sample.state.iter().map(|v| format!("{:?}", v)));
        wtr.write_record(&record)
            .with_context(|| format!("write csv row failed at t={}", sample.t))?;
        written += 1;
    }

    wtr.flush().context("flush snapshot stream failed")?;
    Ok(written)
}

fn write_list<W, I>(mut out: W, samples: I) -> anyhow::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = IntegrationResult<Sample>>,
{
    let mut written = 0usize;

    for item in samples {
        let sample = match item {
            Ok(s) => s,
            Err(e) => {
                out.flush().context("flush snapshot stream failed")?;
                return Err(e).with_context(|| format!("integration failed after {} samples", written));
            }
        };
        writeln!(out, "{} ,", format_state(&sample.state))
            .with_context(|| format!("write snapshot failed at t={}", sample.t))?;
        written += 1;
    }

    out.flush().context("flush snapshot stream failed")?;
    Ok(written)
}
