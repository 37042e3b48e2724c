//! Resolving a key event to a command.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::action::{ShortcutAction, ShortcutMap};
use super::chord::{matches_shortcut, KeyEvent};
use crate::model::{Label, LabelId};

/// Canvas interaction tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Draw,
    Select,
    Polygon,
    Pan,
}

/// Whether the widget draws shapes or tags whole images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Annotate,
    Classify,
}

/// What a resolved shortcut asks the host to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleLock,
    /// Advance to the next image, if there is one.
    ConfirmImage,
    SetTool(Tool),
    /// Delete the selected annotation from whichever image holds it.
    DeleteSelected,
    Undo,
    Redo,
    NextImage,
    PrevImage,
    ZoomIn,
    ZoomOut,
    Export,
    /// Make this the label for new shapes.
    SelectLabel(LabelId),
    /// Add or remove a classification with this label on the current image.
    ToggleClassification(LabelId),
}

/// Per-label keys used in classify mode, as `(label id, key)` pairs in
/// binding order. When two labels share a key the later pair wins.
pub type LabelKeyBindings = Vec<(LabelId, String)>;

/// Everything outside the chord table that resolution depends on.
#[derive(Clone, Copy, Debug)]
pub struct DispatchContext<'a> {
    pub mode: Mode,
    pub locked: bool,
    pub labels: &'a [Label],
    pub favorites: &'a [LabelId],
    pub label_key_bindings: Option<&'a LabelKeyBindings>,
}

impl<'a> DispatchContext<'a> {
    pub fn new(labels: &'a [Label]) -> Self {
        Self {
            mode: Mode::Annotate,
            locked: false,
            labels,
            favorites: &[],
            label_key_bindings: None,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_favorites(mut self, favorites: &'a [LabelId]) -> Self {
        self.favorites = favorites;
        self
    }

    pub fn with_label_key_bindings(mut self, bindings: &'a LabelKeyBindings) -> Self {
        self.label_key_bindings = Some(bindings);
        self
    }
}

/// Resolves `event` against `map`; the first matching rule wins.
///
/// Order: lock toggle, confirm, draw and polygon tools (annotate mode only),
/// select, pan, delete (or Backspace), undo, redo, next, previous, zoom in,
/// zoom out, export, digits 1-9, then classify-mode label keys. While locked,
/// drawing tools, delete, history, digits and label keys resolve to nothing.
pub fn resolve(map: &ShortcutMap, event: &KeyEvent, ctx: &DispatchContext<'_>) -> Option<Command> {
    let command = resolve_inner(map, event, ctx);
    trace!(key = %event.key, ?command, locked = ctx.locked, "resolved shortcut");
    command
}

fn resolve_inner(map: &ShortcutMap, event: &KeyEvent, ctx: &DispatchContext<'_>) -> Option<Command> {
    let hit = |action: ShortcutAction| matches_shortcut(event, map.chord(action));
    let unless_locked = |command: Command| (!ctx.locked).then_some(command);

    if hit(ShortcutAction::ViewLock) {
        return Some(Command::ToggleLock);
    }
    if hit(ShortcutAction::ImageConfirm) {
        return Some(Command::ConfirmImage);
    }

    if ctx.mode == Mode::Annotate {
        if hit(ShortcutAction::ToolDraw) {
            return unless_locked(Command::SetTool(Tool::Draw));
        }
        if hit(ShortcutAction::ToolPolygon) {
            return unless_locked(Command::SetTool(Tool::Polygon));
        }
    }

    if hit(ShortcutAction::ToolSelect) {
        return Some(Command::SetTool(Tool::Select));
    }
    if hit(ShortcutAction::ToolPan) {
        return Some(Command::SetTool(Tool::Pan));
    }
    if hit(ShortcutAction::AnnotationDelete) || event.key == "Backspace" {
        return unless_locked(Command::DeleteSelected);
    }
    if hit(ShortcutAction::HistoryUndo) {
        return unless_locked(Command::Undo);
    }
    if hit(ShortcutAction::HistoryRedo) {
        return unless_locked(Command::Redo);
    }
    if hit(ShortcutAction::ImageNext) {
        return Some(Command::NextImage);
    }
    if hit(ShortcutAction::ImagePrev) {
        return Some(Command::PrevImage);
    }
    if hit(ShortcutAction::ZoomIn) {
        return Some(Command::ZoomIn);
    }
    if hit(ShortcutAction::ZoomOut) {
        return Some(Command::ZoomOut);
    }
    if hit(ShortcutAction::Export) {
        return Some(Command::Export);
    }

    if let Some(index) = quick_label_index(event) {
        if ctx.locked {
            return None;
        }
        let label_id = quick_label(ctx, index)?.clone();
        return Some(match ctx.mode {
            Mode::Classify => Command::ToggleClassification(label_id),
            Mode::Annotate => Command::SelectLabel(label_id),
        });
    }

    if ctx.mode == Mode::Classify && !event.primary() {
        let label_id = bound_label(ctx, &event.key)?;
        return unless_locked(Command::ToggleClassification(label_id.clone()));
    }

    None
}

/// Zero-based slot for a bare digit 1-9.
fn quick_label_index(event: &KeyEvent) -> Option<usize> {
    if event.primary() {
        return None;
    }
    let mut chars = event.key.chars();
    match (chars.next(), chars.next()) {
        (Some(digit @ '1'..='9'), None) => Some(digit as usize - '1' as usize),
        _ => None,
    }
}

/// Favorites take priority; the full label list is used only when there
/// are no favorites at all.
fn quick_label<'a>(ctx: &DispatchContext<'a>, index: usize) -> Option<&'a LabelId> {
    if ctx.favorites.is_empty() {
        ctx.labels.get(index).map(|label| &label.id)
    } else {
        ctx.favorites.get(index)
    }
}

/// The label bound to `key`; if several share a key the last one wins.
fn bound_label<'a>(ctx: &DispatchContext<'a>, key: &str) -> Option<&'a LabelId> {
    let key = key.to_lowercase();
    ctx.label_key_bindings?
        .iter()
        .filter(|(_, bound)| bound.to_lowercase() == key)
        .map(|(label_id, _)| label_id)
        .last()
}

impl ShortcutMap {
    /// Shorthand for [`resolve`] with this table.
    pub fn resolve(&self, event: &KeyEvent, ctx: &DispatchContext<'_>) -> Option<Command> {
        resolve(self, event, ctx)
    }
}
