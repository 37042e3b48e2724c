//! Integration tests for the undoable annotation store.

use std::cell::RefCell;
use std::rc::Rc;

use labelkit::geometry::BoundingBox;
use labelkit::model::{Annotation, AnnotationId, AnnotationPatch, ImageId};
use labelkit::store::{AnnotationAction, AnnotationState, AnnotationStore, MAX_HISTORY};

fn boxed(id: &str, image: &str) -> Annotation {
    Annotation::new_box(id, image, "label-cat", BoundingBox::new(1.0, 2.0, 3.0, 4.0))
}

#[test]
fn add_undo_redo_cycle() {
    let mut store = AnnotationStore::new();
    store.add_annotation(boxed("a1", "img1"));

    assert!(store.undo());
    assert!(!store.annotations().contains_key(&ImageId::from("img1")));

    assert!(store.redo());
    let restored = store.get_annotations(&ImageId::from("img1"));
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].id, AnnotationId::from("a1"));
}

#[test]
fn history_is_capped() {
    let mut store = AnnotationStore::new();
    for i in 0..55 {
        store.add_annotation(boxed(&format!("a{i}"), "img1"));
    }
    assert!(store.undo_len() <= MAX_HISTORY);

    while store.undo() {}
    // The five oldest snapshots were evicted.
    assert_eq!(store.get_annotations(&ImageId::from("img1")).len(), 5);
}

#[test]
fn new_edit_clears_redo() {
    let mut store = AnnotationStore::new();
    store.add_annotation(boxed("a1", "img1"));
    store.add_annotation(boxed("a2", "img1"));
    store.undo();
    assert!(store.can_redo());

    store.update_annotation(
        &AnnotationId::from("a1"),
        &ImageId::from("img1"),
        AnnotationPatch::label("label-dog"),
    );
    assert!(!store.can_redo());
    assert_eq!(store.get_annotations(&ImageId::from("img1"))[0].label_id.as_str(), "label-dog");
}

#[test]
fn load_replaces_everything_and_clears_history() {
    let mut store = AnnotationStore::new();
    store.add_annotation(boxed("a1", "img1"));
    store.undo();

    let mut fresh = labelkit::model::AnnotationCollection::new();
    fresh.insert(ImageId::from("img9"), vec![boxed("z", "img9")]);
    store.load_annotations(fresh);

    assert!(!store.can_undo());
    assert!(!store.can_redo());
    assert_eq!(store.annotations().len(), 1);
}

#[test]
fn reducer_is_pure() {
    let before = AnnotationState::default();
    let after = before.reduce(AnnotationAction::Add(boxed("a1", "img1")));

    assert!(before.annotations().is_empty());
    assert_eq!(after.get_annotations(&ImageId::from("img1")).len(), 1);
    assert_eq!(after.undo_len(), 1);
}

#[test]
fn subscribers_see_each_change_once() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut store = AnnotationStore::new();
    let sink = Rc::clone(&seen);
    store.subscribe(move |state| sink.borrow_mut().push(state.undo_len()));

    store.add_annotation(boxed("a1", "img1"));
    store.undo();
    // Nothing left to undo: no notification.
    store.undo();

    assert_eq!(*seen.borrow(), vec![1, 0]);
}
