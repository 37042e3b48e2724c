//! Undoable annotation store.
//!
//! [`AnnotationState`] holds the collection plus its undo and redo stacks
//! and changes only through [`AnnotationAction`]s. [`AnnotationStore`] owns
//! one state, exposes the familiar method-per-operation surface and notifies
//! subscribers after every transition that changed something.
//!
//! ```
//! use labelkit::geometry::BoundingBox;
//! use labelkit::model::{Annotation, ImageId};
//! use labelkit::store::AnnotationStore;
//!
//! let mut store = AnnotationStore::new();
//! store.add_annotation(Annotation::new_box("a1", "img1", "cat", BoundingBox::new(0.0, 0.0, 5.0, 5.0)));
//! assert!(store.can_undo());
//!
//! store.undo();
//! assert!(store.get_annotations(&ImageId::from("img1")).is_empty());
//! ```

mod state;

pub use state::{AnnotationAction, AnnotationState, HistoryConfig, Snapshot, MAX_HISTORY};

use std::fmt;

use crate::model::{Annotation, AnnotationCollection, AnnotationId, AnnotationPatch, ImageId};

/// Handle returned by [`AnnotationStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AnnotationState)>;

/// An [`AnnotationState`] plus change listeners.
#[derive(Default)]
pub struct AnnotationStore {
    state: AnnotationState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self::from_state(AnnotationState::new(config))
    }

    /// Starts from an existing collection with empty history.
    pub fn with_annotations(annotations: AnnotationCollection) -> Self {
        Self::from_state(AnnotationState::with_annotations(
            annotations,
            HistoryConfig::default(),
        ))
    }

    pub fn from_state(state: AnnotationState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &AnnotationState {
        &self.state
    }

    /// Registers a callback run after every transition that changed state.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&AnnotationState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Applies one action, then notifies listeners if anything changed.
    pub fn dispatch(&mut self, action: AnnotationAction) -> bool {
        let changed = self.state.apply(action);
        if changed {
            for (_, listener) in &mut self.listeners {
                listener(&self.state);
            }
        }
        changed
    }

    pub fn annotations(&self) -> &AnnotationCollection {
        self.state.annotations()
    }

    pub fn get_annotations(&self, image_id: &ImageId) -> &[Annotation] {
        self.state.get_annotations(image_id)
    }

    pub fn find_image_of(&self, annotation_id: &AnnotationId) -> Option<&ImageId> {
        self.state.find_image_of(annotation_id)
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.dispatch(AnnotationAction::Add(annotation));
    }

    /// Merges `patch` into the annotation; a missing id changes nothing and
    /// records no history.
    pub fn update_annotation(&mut self, id: &AnnotationId, image_id: &ImageId, patch: AnnotationPatch) {
        self.dispatch(AnnotationAction::Update {
            id: id.clone(),
            image_id: image_id.clone(),
            patch,
        });
    }

    pub fn remove_annotation(&mut self, id: &AnnotationId, image_id: &ImageId) {
        self.dispatch(AnnotationAction::Remove {
            id: id.clone(),
            image_id: image_id.clone(),
        });
    }

    pub fn set_annotations(&mut self, image_id: &ImageId, annotations: Vec<Annotation>) {
        self.dispatch(AnnotationAction::Set {
            image_id: image_id.clone(),
            annotations,
        });
    }

    /// Replaces the whole collection and clears both history stacks.
    pub fn load_annotations(&mut self, annotations: AnnotationCollection) {
        self.dispatch(AnnotationAction::Load(annotations));
    }

    pub fn undo(&mut self) -> bool {
        self.dispatch(AnnotationAction::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.dispatch(AnnotationAction::Redo)
    }

    pub fn undo_len(&self) -> usize {
        self.state.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.state.redo_len()
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }
}
