//! Pure state transitions for the annotation collection and its history.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::model::{Annotation, AnnotationCollection, AnnotationId, AnnotationPatch, ImageId};

/// Default undo depth.
pub const MAX_HISTORY: usize = 50;

/// History limits for an [`AnnotationState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept on the undo stack.
    pub max_history: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY,
        }
    }
}

/// A full copy of the collection, shared between the stacks and the current
/// state until one of them is written to.
pub type Snapshot = Arc<AnnotationCollection>;

/// Every transition the store knows about.
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationAction {
    /// Append to the annotation's image.
    Add(Annotation),
    /// Merge `patch` into the annotation `id` within `image_id` only.
    Update {
        id: AnnotationId,
        image_id: ImageId,
        patch: AnnotationPatch,
    },
    /// Drop the annotation `id` from `image_id`.
    Remove { id: AnnotationId, image_id: ImageId },
    /// Replace one image's list.
    Set {
        image_id: ImageId,
        annotations: Vec<Annotation>,
    },
    /// Replace everything and forget all history.
    Load(AnnotationCollection),
    Undo,
    Redo,
}

impl AnnotationAction {
    fn name(&self) -> &'static str {
        match self {
            AnnotationAction::Add(_) => "add",
            AnnotationAction::Update { .. } => "update",
            AnnotationAction::Remove { .. } => "remove",
            AnnotationAction::Set { .. } => "set",
            AnnotationAction::Load(_) => "load",
            AnnotationAction::Undo => "undo",
            AnnotationAction::Redo => "redo",
        }
    }
}

/// The `(annotations, undo_stack, redo_stack)` triple.
///
/// Every mutating action pushes the pre-mutation collection onto the undo
/// stack (evicting the oldest beyond the configured depth) and clears the
/// redo stack. `Load` clears both stacks instead. `Undo` and `Redo` are
/// no-ops when their stack is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationState {
    annotations: Snapshot,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    config: HistoryConfig,
}

impl AnnotationState {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Starts from an existing collection with empty history.
    pub fn with_annotations(annotations: AnnotationCollection, config: HistoryConfig) -> Self {
        Self {
            annotations: Arc::new(annotations),
            config,
            ..Default::default()
        }
    }

    pub fn annotations(&self) -> &AnnotationCollection {
        &self.annotations
    }

    /// The image's annotations, or an empty slice for an unknown image.
    pub fn get_annotations(&self, image_id: &ImageId) -> &[Annotation] {
        self.annotations
            .get(image_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first image holding an annotation with this id.
    pub fn find_image_of(&self, annotation_id: &AnnotationId) -> Option<&ImageId> {
        self.annotations
            .iter()
            .find(|(_, anns)| anns.iter().any(|ann| &ann.id == annotation_id))
            .map(|(image_id, _)| image_id)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// Returns the state after `action`, leaving `self` untouched.
    #[must_use]
    pub fn reduce(&self, action: AnnotationAction) -> AnnotationState {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    /// Applies `action` in place. Returns false if nothing changed.
    pub fn apply(&mut self, action: AnnotationAction) -> bool {
        trace!(action = action.name(), "applying annotation action");

        match action {
            AnnotationAction::Add(annotation) => {
                self.push_history();
                self.collection_mut()
                    .entry(annotation.image_id.clone())
                    .or_default()
                    .push(annotation);
                true
            }
            AnnotationAction::Update { id, image_id, patch } => {
                let Some(index) = self
                    .get_annotations(&image_id)
                    .iter()
                    .position(|ann| ann.id == id)
                else {
                    debug!(annotation = %id, image = %image_id, "update target not found");
                    return false;
                };
                self.push_history();
                if let Some(anns) = self.collection_mut().get_mut(&image_id) {
                    patch.apply_to(&mut anns[index]);
                }
                true
            }
            AnnotationAction::Remove { id, image_id } => {
                self.push_history();
                self.collection_mut()
                    .entry(image_id)
                    .or_default()
                    .retain(|ann| ann.id != id);
                true
            }
            AnnotationAction::Set {
                image_id,
                annotations,
            } => {
                self.push_history();
                self.collection_mut().insert(image_id, annotations);
                true
            }
            AnnotationAction::Load(annotations) => {
                self.annotations = Arc::new(annotations);
                self.undo_stack.clear();
                self.redo_stack.clear();
                true
            }
            AnnotationAction::Undo => {
                let Some(previous) = self.undo_stack.pop() else {
                    return false;
                };
                let current = std::mem::replace(&mut self.annotations, previous);
                self.redo_stack.push(current);
                true
            }
            AnnotationAction::Redo => {
                let Some(next) = self.redo_stack.pop() else {
                    return false;
                };
                let current = std::mem::replace(&mut self.annotations, next);
                self.undo_stack.push(current);
                true
            }
        }
    }

    fn push_history(&mut self) {
        self.undo_stack.push(Arc::clone(&self.annotations));
        let overflow = self.undo_stack.len().saturating_sub(self.config.max_history);
        if overflow > 0 {
            self.undo_stack.drain(..overflow);
            debug!(evicted = overflow, "history limit reached");
        }
        self.redo_stack.clear();
    }

    fn collection_mut(&mut self) -> &mut AnnotationCollection {
        Arc::make_mut(&mut self.annotations)
    }
}
