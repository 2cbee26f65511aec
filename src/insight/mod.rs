//! On-demand stage explanations from a remote text-generation service.

pub mod coordinator;
pub mod service;

pub use coordinator::{
    Epoch, InsightCoordinator, InsightEvent, InsightOutcome, InsightPhase, InsightState,
};
pub use service::{ExplanationService, GeminiClient, explanation_prompt, prediction_prompt};
