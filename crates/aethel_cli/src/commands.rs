//! Subcommand implementations, writer-generic so they can be tested

use aethel_animation::MotionValue;
use aethel_app::{
    run_loaded_scenario, AethelSite, HeadlessRunConfig, HeadlessScenario, SiteConfig,
};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Default configuration unless a path is given
pub fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load_from_dir(path),
        None => Ok(SiteConfig::default()),
    }
}

/// Replay `scenario`; returns whether every step passed
pub fn run<W: Write>(
    config: SiteConfig,
    scenario: &Path,
    report: Option<&Path>,
    out: &mut W,
) -> Result<bool> {
    let scenario = HeadlessScenario::from_path(scenario)?;
    let run_cfg = HeadlessRunConfig::from_site(&config);
    let mut site = AethelSite::new(config)?;

    let outcome = run_loaded_scenario(&mut site, &scenario, run_cfg)?;
    let passed = !outcome.is_failed();
    let report_data = outcome.into_report();
    if !passed {
        warn!(
            step = ?report_data.failed_step_index,
            code = ?report_data.code,
            "scenario failed"
        );
    }

    match report {
        Some(path) => {
            report_data.write_to_path(path)?;
            writeln!(out, "report written to {}", path.display())?;
        }
        None => report_data.write_to_writer(out)?,
    }
    Ok(passed)
}

/// One scroll sweep request
#[derive(Clone, Debug)]
pub struct Sweep {
    pub output: String,
    pub from: f32,
    pub to: Option<f32>,
    pub steps: usize,
    pub frames: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub scroll_y: f32,
    pub value: MotionValue,
}

/// Scroll through `sweep` and read the output at each position
pub fn sample(config: SiteConfig, sweep: &Sweep) -> Result<Vec<Sample>> {
    if sweep.steps == 0 {
        bail!("steps must be at least 1");
    }
    let dt = config.headless.tick_ms as f32 / 1000.0;
    let mut site = AethelSite::new(config)?;
    let to = sweep.to.unwrap_or_else(|| site.geometry().max_scroll());
    if !sweep.from.is_finite() || !to.is_finite() {
        bail!("scroll positions must be finite");
    }
    debug!(output = sweep.output.as_str(), from = sweep.from, to, "sampling");

    let mut samples = Vec::with_capacity(sweep.steps + 1);
    for i in 0..=sweep.steps {
        let target = sweep.from + (to - sweep.from) * i as f32 / sweep.steps as f32;
        site.scroll_to(target);
        for _ in 0..sweep.frames {
            site.frame(dt);
        }
        let value = site
            .output(&sweep.output)
            .with_context(|| format!("Unknown output '{}'", sweep.output))?;
        samples.push(Sample {
            scroll_y: site.geometry().scroll_y,
            value,
        });
    }
    Ok(samples)
}

pub fn write_json<W: Write>(samples: &[Sample], out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, samples)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_table<W: Write>(output: &str, samples: &[Sample], out: &mut W) -> Result<()> {
    writeln!(out, "{:>10}  {}", "scroll_y", output)?;
    for sample in samples {
        writeln!(out, "{:>10.1}  {}", sample.scroll_y, format_value(&sample.value))?;
    }
    Ok(())
}

pub fn print_config<W: Write>(config: &SiteConfig, out: &mut W) -> Result<()> {
    out.write_all(config.to_toml()?.as_bytes())?;
    Ok(())
}

fn format_value(value: &MotionValue) -> String {
    match value {
        MotionValue::Scalar(v) => format!("{v:.4}"),
        MotionValue::Color(c) => c.to_string(),
        MotionValue::Offset(v) => format!("({:.4}, {:.4})", v.x, v.y),
    }
}
