use tagpress::history::{HistoryStack, MAX_SNAPSHOTS};
use tagpress::Document;

#[test]
fn undo_then_redo_round_trips_a_mutation() {
    let mut doc = Document::default();
    let mut history = HistoryStack::new();
    let before = doc.clone();

    history.record(&doc);
    doc.add_element();
    let after = doc.clone();

    assert!(history.undo(&mut doc));
    assert_eq!(doc, before);

    assert!(history.redo(&mut doc));
    assert_eq!(doc, after);
}

#[test]
fn undo_on_empty_history_is_a_no_op() {
    let mut doc = Document::default();
    let untouched = doc.clone();
    let mut history = HistoryStack::new();
    assert!(!history.undo(&mut doc));
    assert!(!history.redo(&mut doc));
    assert_eq!(doc, untouched);
}

#[test]
fn past_is_bounded_to_twenty_most_recent_snapshots() {
    let mut doc = Document::default();
    let mut history = HistoryStack::new();

    // 25 mutating actions, each snapshotting first.
    for step in 0..25 {
        history.record(&doc);
        doc.move_element("t1", 100.0 + step as f32, 300.0);
    }
    assert_eq!(history.undo_depth(), MAX_SNAPSHOTS);

    // Unwinding the whole stack lands on the pre-mutation state of step 5
    // (steps 0..5 were evicted).
    for _ in 0..MAX_SNAPSHOTS {
        assert!(history.undo(&mut doc));
    }
    assert!(!history.undo(&mut doc));
    assert_eq!(doc.element("t1").unwrap().x, 104.0);
}

#[test]
fn new_action_after_undo_clears_the_future() {
    let mut doc = Document::default();
    let mut history = HistoryStack::new();

    history.record(&doc);
    doc.add_element();
    history.undo(&mut doc);
    assert!(history.can_redo());

    history.record(&doc);
    doc.move_element("t1", 10.0, 10.0);
    assert!(!history.can_redo());
    assert_eq!(history.redo_depth(), 0);
}
