//! Scenario runner that drives a site through recorded input.

use crate::headless_assert::{evaluate_assert_category, evaluate_assert_near, AssertionResult};
use crate::headless_report::HeadlessReport;
use crate::headless_runtime::{FrameSchedule, HeadlessClock, HeadlessRunConfig};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::site::{AethelSite, SiteSnapshot};
use aethel_core::{Point, Size};
use anyhow::Result;
use tracing::debug;

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn into_report(self) -> HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against `site` with its configured frame pacing.
pub fn run_scenario(site: &mut AethelSite, input: &str) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    let runtime_cfg = HeadlessRunConfig::from_site(site.config());
    run_loaded_scenario(site, &scenario, runtime_cfg)
}

/// Execute a pre-loaded scenario.
pub fn run_loaded_scenario(
    site: &mut AethelSite,
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
) -> Result<RunOutcome> {
    scenario.validate()?;
    let mut clock = HeadlessClock::new(runtime_cfg)?;
    let mut latest_snapshot: Option<SiteSnapshot> = None;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        debug!(step_index, ?step, "scenario step");
        match step {
            ScenarioStep::PointerMove { x, y } => {
                site.pointer_move(Point::new(*x, *y));
                latest_snapshot = None;
            }
            ScenarioStep::PointerDown { x, y } => {
                site.pointer_down(Point::new(*x, *y));
                latest_snapshot = None;
            }
            ScenarioStep::PointerUp { x, y } => {
                site.pointer_up(Point::new(*x, *y));
                latest_snapshot = None;
            }
            ScenarioStep::Orientation { alpha, beta, gamma } => {
                site.orientation(*alpha, *beta, *gamma);
                latest_snapshot = None;
            }
            ScenarioStep::Scroll { y } => {
                site.scroll_to(*y);
                latest_snapshot = None;
            }
            ScenarioStep::Resize { width, height } => {
                site.resize(Size::new(*width, *height));
                latest_snapshot = None;
            }
            ScenarioStep::Wait { ms } => {
                let schedule = clock.wait(*ms);
                run_frames(site, &mut clock, schedule, &mut latest_snapshot);
            }
            ScenarioStep::Tick { frames } => {
                let schedule = clock.ticks(*frames);
                run_frames(site, &mut clock, schedule, &mut latest_snapshot);
            }
            ScenarioStep::AssertNear {
                output,
                value,
                tolerance,
            } => {
                let snapshot = latest_snapshot.get_or_insert_with(|| site.snapshot());
                if let AssertionResult::Failed { code, message } =
                    evaluate_assert_near(output, *value, *tolerance, snapshot)
                {
                    return Ok(failed(site, "assert_near", step_index, code, message, &clock));
                }
            }
            ScenarioStep::AssertCategory { category } => {
                let snapshot = latest_snapshot.get_or_insert_with(|| site.snapshot());
                if let AssertionResult::Failed { code, message } =
                    evaluate_assert_category(category, snapshot)
                {
                    return Ok(failed(
                        site,
                        "assert_category",
                        step_index,
                        code,
                        message,
                        &clock,
                    ));
                }
            }
        }
    }

    let report = HeadlessReport::passed(clock.elapsed_frames(), clock.elapsed_ms())
        .with_snapshot(site.snapshot());
    Ok(RunOutcome::Passed { report })
}

fn failed(
    site: &AethelSite,
    assertion: &str,
    step_index: usize,
    code: String,
    message: String,
    clock: &HeadlessClock,
) -> RunOutcome {
    debug!(step_index, %message, "scenario assertion failed");
    let report = HeadlessReport::failed(
        assertion,
        step_index,
        code,
        message,
        clock.elapsed_frames(),
        clock.elapsed_ms(),
    )
    .with_snapshot(site.snapshot());
    RunOutcome::Failed { report }
}

/// Play a frame schedule; an empty one still refreshes the snapshot
fn run_frames(
    site: &mut AethelSite,
    clock: &mut HeadlessClock,
    schedule: FrameSchedule,
    latest_snapshot: &mut Option<SiteSnapshot>,
) {
    if schedule.is_empty() {
        *latest_snapshot = Some(site.snapshot());
        return;
    }
    for frame in schedule {
        site.frame(clock.advance(&frame));
        if frame.probe {
            *latest_snapshot = Some(site.snapshot());
        }
    }
}
