//! View and interaction state around an [`AnnotationStore`].
//!
//! [`SessionState`] tracks the tool, active label, selection, current
//! image, viewport, lock and favorites, and carries out the [`Command`]s
//! produced by the shortcut table.

use tracing::{debug, info};

use crate::drawing::{BoxEdit, CompletedPolygon, EditKind, Viewport};
use crate::geometry::BoundingBox;
use crate::model::{Annotation, AnnotationId, AnnotationPatch, AnnotationType, ImageId, LabelId};
use crate::shortcuts::{Command, Mode, Tool};
use crate::store::AnnotationStore;

/// Most favorites a session keeps; one per digit key.
pub const MAX_FAVORITES: usize = 9;

/// What applying a command amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State changed.
    Applied,
    /// Nothing to do (no selection, last image, locked, ...).
    Ignored,
    /// The host should run its export.
    ExportRequested,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub tool: Tool,
    pub mode: Mode,
    pub active_label: Option<LabelId>,
    pub selected_annotation: Option<AnnotationId>,
    pub viewport: Viewport,
    locked: bool,
    image_ids: Vec<ImageId>,
    current_image: usize,
    favorites: Vec<LabelId>,
    next_id: u64,
    box_edit: BoxEdit,
}

impl SessionState {
    /// Starts on the first of `image_ids` with the draw tool.
    pub fn new(image_ids: Vec<ImageId>) -> Self {
        Self {
            tool: Tool::default(),
            mode: Mode::default(),
            active_label: None,
            selected_annotation: None,
            viewport: Viewport::default(),
            locked: false,
            image_ids,
            current_image: 0,
            favorites: Vec::new(),
            next_id: 0,
            box_edit: BoxEdit::new(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Seeds favorites; anything past the ninth is dropped.
    pub fn with_favorites(mut self, favorites: Vec<LabelId>) -> Self {
        self.set_favorites(favorites);
        self
    }

    pub fn image_count(&self) -> usize {
        self.image_ids.len()
    }

    pub fn current_image_index(&self) -> usize {
        self.current_image
    }

    pub fn current_image(&self) -> Option<&ImageId> {
        self.image_ids.get(self.current_image)
    }

    /// Jumps to `index` and clears the selection. Out-of-range indices are
    /// ignored.
    pub fn set_current_image(&mut self, index: usize) -> bool {
        if index >= self.image_ids.len() {
            return false;
        }
        self.current_image = index;
        self.selected_annotation = None;
        true
    }

    pub fn next_image(&mut self) -> bool {
        self.set_current_image(self.current_image + 1)
    }

    pub fn prev_image(&mut self) -> bool {
        match self.current_image.checked_sub(1) {
            Some(index) => self.set_current_image(index),
            None => false,
        }
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Locking while a drawing tool is active falls back to select.
    /// Locking also drops any box edit in progress.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.box_edit.release();
            if matches!(self.tool, Tool::Draw | Tool::Polygon) {
                self.tool = Tool::Select;
            }
        }
    }

    pub fn favorites(&self) -> &[LabelId] {
        &self.favorites
    }

    pub fn set_favorites(&mut self, mut favorites: Vec<LabelId>) {
        favorites.truncate(MAX_FAVORITES);
        self.favorites = favorites;
    }

    /// Appends a favorite unless it is already present or the list is full.
    pub fn add_favorite(&mut self, label_id: LabelId) -> bool {
        if self.favorites.len() >= MAX_FAVORITES || self.favorites.contains(&label_id) {
            return false;
        }
        self.favorites.push(label_id);
        true
    }

    pub fn remove_favorite(&mut self, label_id: &LabelId) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|id| id != label_id);
        self.favorites.len() != before
    }

    fn next_annotation_id(&mut self) -> AnnotationId {
        self.next_id += 1;
        AnnotationId::new(format!("ann-{}", self.next_id))
    }

    /// Target image and label for a new shape, unless locked.
    fn drawing_target(&self) -> Option<(ImageId, LabelId)> {
        if self.locked {
            return None;
        }
        Some((self.current_image()?.clone(), self.active_label.clone()?))
    }

    /// Stores a finished box on the current image with the active label.
    pub fn commit_box(&mut self, bbox: BoundingBox, store: &mut AnnotationStore) -> Option<AnnotationId> {
        let (image_id, label_id) = self.drawing_target()?;
        let id = self.next_annotation_id();
        store.add_annotation(Annotation::new(id.clone(), image_id, label_id, bbox));
        Some(id)
    }

    /// Stores a finished polygon on the current image with the active label.
    pub fn commit_polygon(
        &mut self,
        polygon: CompletedPolygon,
        store: &mut AnnotationStore,
    ) -> Option<AnnotationId> {
        let (image_id, label_id) = self.drawing_target()?;
        let id = self.next_annotation_id();
        let annotation = Annotation::new(id.clone(), image_id, label_id, polygon.bounds)
            .with_type(AnnotationType::Polygon)
            .with_polygon(polygon.points);
        store.add_annotation(annotation);
        Some(id)
    }

    /// Starts moving or resizing `annotation` with the select tool, and
    /// selects it. Ignored under any other tool or while locked.
    pub fn press_box(&mut self, annotation: &Annotation, canvas_x: f64, canvas_y: f64) -> Option<EditKind> {
        if self.tool != Tool::Select || self.locked {
            return None;
        }
        self.selected_annotation = Some(annotation.id.clone());
        let kind = self.box_edit.press(annotation, canvas_x, canvas_y, &self.viewport);
        debug!(annotation = %annotation.id, ?kind, "box edit started");
        Some(kind)
    }

    /// Writes the edited box for this pointer position to the store.
    pub fn drag_box(&mut self, canvas_x: f64, canvas_y: f64, store: &mut AnnotationStore) -> Option<BoundingBox> {
        if self.locked {
            return None;
        }
        let bbox = self.box_edit.drag(canvas_x, canvas_y, &self.viewport)?;
        let (id, image_id) = self.box_edit.target()?;
        store.update_annotation(id, image_id, AnnotationPatch::bbox(bbox));
        Some(bbox)
    }

    pub fn release_box(&mut self) -> bool {
        self.box_edit.release()
    }

    /// Adds a classification with `label_id` to the current image, or
    /// removes it if one is already there.
    pub fn toggle_classification(&mut self, label_id: &LabelId, store: &mut AnnotationStore) -> bool {
        let Some(image_id) = self.current_image().cloned() else {
            return false;
        };

        let existing = store
            .get_annotations(&image_id)
            .iter()
            .find(|ann| {
                ann.effective_type() == AnnotationType::Classification && &ann.label_id == label_id
            })
            .map(|ann| ann.id.clone());

        match existing {
            Some(id) => store.remove_annotation(&id, &image_id),
            None => {
                let id = self.next_annotation_id();
                store.add_annotation(Annotation::new_classification(id, image_id, label_id.clone()));
            }
        }
        true
    }

    /// Carries out a shortcut command.
    pub fn apply(&mut self, command: Command, store: &mut AnnotationStore) -> CommandOutcome {
        let applied = match command {
            Command::ToggleLock => {
                self.set_locked(!self.locked);
                info!(locked = self.locked, "view lock toggled");
                true
            }
            Command::ConfirmImage | Command::NextImage => self.next_image(),
            Command::PrevImage => self.prev_image(),
            Command::SetTool(tool) => {
                self.tool = tool;
                true
            }
            Command::DeleteSelected => self.delete_selected(store),
            Command::Undo => store.undo(),
            Command::Redo => store.redo(),
            Command::ZoomIn => {
                self.viewport.zoom_in();
                true
            }
            Command::ZoomOut => {
                self.viewport.zoom_out();
                true
            }
            Command::Export => return CommandOutcome::ExportRequested,
            Command::SelectLabel(label_id) => {
                self.active_label = Some(label_id);
                true
            }
            Command::ToggleClassification(label_id) => self.toggle_classification(&label_id, store),
        };

        if applied {
            CommandOutcome::Applied
        } else {
            CommandOutcome::Ignored
        }
    }

    /// Removes the selected annotation from whichever image holds it, then
    /// clears the selection.
    fn delete_selected(&mut self, store: &mut AnnotationStore) -> bool {
        let Some(selected) = self.selected_annotation.take() else {
            return false;
        };
        match store.find_image_of(&selected).cloned() {
            Some(image_id) => {
                store.remove_annotation(&selected, &image_id);
                true
            }
            None => {
                debug!(annotation = %selected, "selected annotation no longer exists");
                false
            }
        }
    }
}
