//! Aethel Site Assembly
//!
//! Wires the motion layer into a complete page: configuration loading, page
//! layout, scroll bindings per section, and a deterministic headless runner
//! that replays recorded input against the assembled site.
//!
//! # Example
//!
//! ```rust
//! use aethel_app::prelude::*;
//!
//! let mut site = AethelSite::new(SiteConfig::default()).unwrap();
//! site.scroll_to(250.0);
//! let y = site.output("hero.line_1.y").and_then(|v| v.as_scalar()).unwrap();
//! assert!((y + 100.0).abs() < 1e-4);
//!
//! let outcome = run_scenario(
//!     &mut site,
//!     r#"{ "steps": [ { "type": "tick", "frames": 4 } ] }"#,
//! )
//! .unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod config;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod layout;
pub mod site;

pub use config::{
    AboutConfig, HeroConfig, HoverConfig, NavConfig, ProjectConfig, ScrollBinding, SiteConfig,
    WorkConfig, CONFIG_FILE,
};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use headless_runtime::{FrameSchedule, HeadlessClock, HeadlessRunConfig, ScheduledFrame};
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use layout::PageLayout;
pub use site::{nav_offset, ActiveOverlay, AethelSite, SiteSnapshot};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::SiteConfig;
    pub use crate::headless_runner::{run_scenario, RunOutcome};
    pub use crate::headless_scenario::HeadlessScenario;
    pub use crate::site::{AethelSite, SiteSnapshot};

    pub use aethel_animation::{Color, MotionValue};
    pub use aethel_core::{Point, Size, Vec2};
}
