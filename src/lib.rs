//! llm-inside: an interactive terminal walkthrough of LLM inference.
//!
//! The pipeline is shown as five stages (overview, tokenization, embedding,
//! transformer block, prediction). Each stage gets:
//! - an illustrative ASCII scene
//! - a short explanation fetched on demand from a text-generation service,
//!   debounced and guarded so stale answers never replace newer ones
//!
//! No model is run; every number shown is an illustrative constant.

pub mod config;
pub mod error;

pub mod app;
pub mod insight;
pub mod navigation;
pub mod render;
pub mod stage;

pub use app::{Command, Visualizer};
pub use config::{AppConfig, DisplayConfig, InsightConfig, ServiceConfig};
pub use error::{Error, Result};
pub use insight::{
    ExplanationService, GeminiClient, InsightCoordinator, InsightEvent, InsightOutcome,
    InsightPhase, InsightState,
};
pub use navigation::{NavigationController, StageObserver};
pub use render::RenderSurface;
pub use stage::{STAGES, Stage, StageId, concept_label};
