//! Scenario definition for headless motion runs.

use aethel_animation::MotionValue;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest simulated time a single `wait` may ask for
pub const MAX_WAIT_MS: u64 = 10 * 60 * 1000;
/// Most frames a single `tick` may ask for
pub const MAX_TICK_FRAMES: u32 = 60 * 60 * 10;

/// Sequence of input, timing and assertion steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessScenario {
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(input).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject timing steps too long to simulate
    pub fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                ScenarioStep::Wait { ms } if *ms > MAX_WAIT_MS => {
                    bail!("step {index}: wait of {ms} ms exceeds {MAX_WAIT_MS} ms")
                }
                ScenarioStep::Tick { frames } if *frames > MAX_TICK_FRAMES => {
                    bail!("step {index}: tick of {frames} frames exceeds {MAX_TICK_FRAMES}")
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw)
    }
}

fn default_tolerance() -> f32 {
    1e-3
}

/// One scenario step.
///
/// Input steps take effect immediately; time only passes on `tick` and
/// `wait`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    PointerMove {
        x: f32,
        y: f32,
    },
    /// Primary button press; moves the pointer first if needed
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    /// Device orientation in degrees; missing angles are reported as absent
    Orientation {
        #[serde(default)]
        alpha: Option<f32>,
        #[serde(default)]
        beta: Option<f32>,
        #[serde(default)]
        gamma: Option<f32>,
    },
    Scroll {
        y: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },
    /// Named output within `tolerance` of `value`
    AssertNear {
        output: String,
        value: MotionValue,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    /// Current hover category
    AssertCategory {
        category: String,
    },
}

impl ScenarioStep {
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            ScenarioStep::AssertNear { .. } | ScenarioStep::AssertCategory { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aethel_animation::Color;

    #[test]
    fn parses_every_step_kind() {
        let scenario = HeadlessScenario::from_json(
            r##"{
                "steps": [
                    { "type": "pointer_move", "x": 10, "y": 20 },
                    { "type": "orientation", "beta": 45.0 },
                    { "type": "pointer_down", "x": 10, "y": 20 },
                    { "type": "pointer_up", "x": 30, "y": 20 },
                    { "type": "scroll", "y": 1200 },
                    { "type": "resize", "width": 800, "height": 600 },
                    { "type": "wait", "ms": 250 },
                    { "type": "tick", "frames": 3 },
                    { "type": "assert_near", "output": "cursor.size", "value": 80 },
                    { "type": "assert_near", "output": "about.word.0.color", "value": "#ffffff", "tolerance": 0.01 },
                    { "type": "assert_category", "category": "project" }
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 11);
        assert!(matches!(
            scenario.steps[1],
            ScenarioStep::Orientation { alpha: None, beta: Some(b), gamma: None } if b == 45.0
        ));
        assert!(matches!(scenario.steps[3], ScenarioStep::PointerUp { x, .. } if x == 30.0));
        match &scenario.steps[8] {
            ScenarioStep::AssertNear { value, tolerance, .. } => {
                assert_eq!(*value, MotionValue::Scalar(80.0));
                assert_eq!(*tolerance, 1e-3);
            }
            other => panic!("unexpected step {other:?}"),
        }
        match &scenario.steps[9] {
            ScenarioStep::AssertNear { value, .. } => {
                assert_eq!(*value, MotionValue::Color(Color::WHITE));
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert!(scenario.steps[10].is_assertion());
        assert!(!scenario.steps[0].is_assertion());
    }

    #[test]
    fn overlong_timing_steps_are_rejected() {
        let ok = format!(r#"{{ "steps": [ {{ "type": "wait", "ms": {MAX_WAIT_MS} }} ] }}"#);
        assert!(HeadlessScenario::from_json(&ok).is_ok());

        let err = HeadlessScenario::from_json(
            r#"{ "steps": [ { "type": "tick", "frames": 1 }, { "type": "wait", "ms": 18446744073709551615 } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("step 1"));

        let frames = MAX_TICK_FRAMES + 1;
        let err = HeadlessScenario::from_json(&format!(
            r#"{{ "steps": [ {{ "type": "tick", "frames": {frames} }} ] }}"#
        ));
        assert!(err.is_err());
    }

    #[test]
    fn unknown_step_is_an_error() {
        let err = HeadlessScenario::from_json(r#"{ "steps": [ { "type": "jump" } ] }"#);
        assert!(err.is_err());
    }
}
