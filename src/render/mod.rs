//! Render surface - turns the active stage tag into a text scene.
//!
//! The surface only ever learns the stage id; nothing flows back from it.

pub mod scenes;
pub mod widgets;

pub use scenes::{INPUT_TOKENS, NEXT_WORD_CANDIDATES, SCENE_WIDTH, scene};
pub use widgets::{box_text, display_width, pad, probability_bars, segment_bar, wrap};

use crate::navigation::StageObserver;
use crate::stage::{Stage, StageId};

/// Draws the scene for whichever stage it was last told about.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    stage: StageId,
}

impl RenderSurface {
    /// Create a surface showing the overview scene.
    pub fn new() -> Self {
        Self {
            stage: StageId::Intro,
        }
    }

    /// Stage currently displayed.
    pub fn stage(&self) -> StageId {
        self.stage
    }

    /// Scene for the current stage.
    pub fn scene(&self) -> String {
        scene(self.stage)
    }

    /// Floating stage indicator.
    pub fn stage_tag_line(&self) -> String {
        format!("PIPELINE STAGE: {}", self.stage)
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl StageObserver for RenderSurface {
    fn on_stage_changed(&mut self, stage: &Stage) {
        self.stage = stage.id;
    }
}
