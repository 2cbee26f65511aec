//! Integration tests for NavigationController.

use llm_inside::{NavigationController, STAGES, Stage, StageId, StageObserver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Default)]
struct Recorder {
    seen: Vec<StageId>,
}

impl StageObserver for Recorder {
    fn on_stage_changed(&mut self, stage: &Stage) {
        self.seen.push(stage.id);
    }
}

#[test]
fn test_walk_to_prediction_and_clamp() {
    let mut nav = NavigationController::new();
    assert_eq!(nav.current().id, StageId::Intro);

    for _ in 0..4 {
        assert!(nav.advance());
    }
    assert_eq!(nav.index(), 4);
    assert_eq!(nav.current().id, StageId::Prediction);

    // Fifth advance is a no-op
    assert!(!nav.advance());
    assert_eq!(nav.index(), 4);
}

#[test]
fn test_retreat_from_prediction() {
    let mut nav = NavigationController::new();
    while nav.advance() {}

    assert!(nav.retreat());
    assert_eq!(nav.index(), 3);
    assert_eq!(nav.current().id, StageId::Transformer);
    assert_eq!(nav.current().concept(), "Transformer 模块");
}

#[test]
fn test_retreat_at_start_is_noop() {
    let mut nav = NavigationController::new();
    assert!(!nav.retreat());
    assert_eq!(nav.index(), 0);
}

#[test]
fn test_index_stays_in_bounds_for_any_sequence() {
    let mut nav = NavigationController::new();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..1000 {
        if rng.gen_bool(1.0 / 3.0) {
            nav.retreat();
        } else {
            nav.advance();
        }
        assert!(nav.index() < STAGES.len());
    }
}

#[test]
fn test_observer_sees_each_transition_in_order() {
    let mut nav = NavigationController::new();
    let mut rec = Recorder::default();

    nav.advance_with(&mut rec);
    nav.advance_with(&mut rec);
    nav.retreat_with(&mut rec);
    nav.retreat_with(&mut rec);
    nav.retreat_with(&mut rec); // no-op at index 0

    assert_eq!(
        rec.seen,
        vec![
            StageId::Tokenization,
            StageId::Embedding,
            StageId::Tokenization,
            StageId::Intro,
        ]
    );
}

#[test]
fn test_announce_does_not_move() {
    let nav = NavigationController::new();
    let mut rec = Recorder::default();

    nav.announce(&mut rec);

    assert_eq!(rec.seen, vec![StageId::Intro]);
    assert_eq!(nav.index(), 0);
}
