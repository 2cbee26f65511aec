//! Navigation controller - bounded stage stepping with change notification.
//!
//! Transitions saturate at both ends of the registry; a transition that
//! does not move notifies nobody.

use crate::stage::{STAGES, Stage};

/// Receives the new stage after every successful transition.
pub trait StageObserver {
    /// Called synchronously with the newly active stage.
    fn on_stage_changed(&mut self, stage: &Stage);
}

/// A no-op observer.
impl StageObserver for () {
    fn on_stage_changed(&mut self, _stage: &Stage) {}
}

impl<T: StageObserver + ?Sized> StageObserver for &mut T {
    fn on_stage_changed(&mut self, stage: &Stage) {
        (**self).on_stage_changed(stage);
    }
}

/// Notifies `A` first, then `B`.
impl<A: StageObserver, B: StageObserver> StageObserver for (A, B) {
    fn on_stage_changed(&mut self, stage: &Stage) {
        self.0.on_stage_changed(stage);
        self.1.on_stage_changed(stage);
    }
}

/// Holds the current position in the stage registry.
#[derive(Debug, Clone)]
pub struct NavigationController {
    stages: &'static [Stage],
    current_index: usize,
}

impl NavigationController {
    /// Start at the first stage of the built-in registry.
    pub fn new() -> Self {
        Self {
            stages: &STAGES,
            current_index: 0,
        }
    }

    /// The active stage.
    pub fn current(&self) -> &'static Stage {
        let stages = self.stages;
        &stages[self.current_index]
    }

    /// Index of the active stage.
    pub fn index(&self) -> usize {
        self.current_index
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; the registry is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// At the first stage (retreat would be a no-op).
    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    /// At the last stage (advance would be a no-op).
    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.stages.len()
    }

    /// Fraction of the pipeline reached, counting the active stage.
    pub fn progress(&self) -> f32 {
        (self.current_index + 1) as f32 / self.stages.len() as f32
    }

    /// Step forward without notifying anyone.
    pub fn advance(&mut self) -> bool {
        self.advance_with(&mut ())
    }

    /// Step back without notifying anyone.
    pub fn retreat(&mut self) -> bool {
        self.retreat_with(&mut ())
    }

    /// Step forward; on success notify `observer` and return true.
    pub fn advance_with(&mut self, observer: &mut impl StageObserver) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_index += 1;
        observer.on_stage_changed(self.current());
        true
    }

    /// Step back; on success notify `observer` and return true.
    pub fn retreat_with(&mut self, observer: &mut impl StageObserver) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_index -= 1;
        observer.on_stage_changed(self.current());
        true
    }

    /// Notify `observer` of the active stage without moving.
    pub fn announce(&self, observer: &mut impl StageObserver) {
        observer.on_stage_changed(self.current());
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}
