//! Shortcut actions and the chord table.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LabelkitError;

/// A logical action a chord can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShortcutAction {
    #[serde(rename = "tool.draw")]
    ToolDraw,
    #[serde(rename = "tool.select")]
    ToolSelect,
    #[serde(rename = "tool.polygon")]
    ToolPolygon,
    #[serde(rename = "tool.pan")]
    ToolPan,
    #[serde(rename = "annotation.delete")]
    AnnotationDelete,
    #[serde(rename = "history.undo")]
    HistoryUndo,
    #[serde(rename = "history.redo")]
    HistoryRedo,
    #[serde(rename = "image.next")]
    ImageNext,
    #[serde(rename = "image.prev")]
    ImagePrev,
    #[serde(rename = "zoom.in")]
    ZoomIn,
    #[serde(rename = "zoom.out")]
    ZoomOut,
    #[serde(rename = "label.quick")]
    LabelQuick,
    #[serde(rename = "export")]
    Export,
    #[serde(rename = "view.lock")]
    ViewLock,
    #[serde(rename = "image.confirm")]
    ImageConfirm,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 15] = [
        ShortcutAction::ToolDraw,
        ShortcutAction::ToolSelect,
        ShortcutAction::ToolPolygon,
        ShortcutAction::ToolPan,
        ShortcutAction::AnnotationDelete,
        ShortcutAction::HistoryUndo,
        ShortcutAction::HistoryRedo,
        ShortcutAction::ImageNext,
        ShortcutAction::ImagePrev,
        ShortcutAction::ZoomIn,
        ShortcutAction::ZoomOut,
        ShortcutAction::LabelQuick,
        ShortcutAction::Export,
        ShortcutAction::ViewLock,
        ShortcutAction::ImageConfirm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShortcutAction::ToolDraw => "tool.draw",
            ShortcutAction::ToolSelect => "tool.select",
            ShortcutAction::ToolPolygon => "tool.polygon",
            ShortcutAction::ToolPan => "tool.pan",
            ShortcutAction::AnnotationDelete => "annotation.delete",
            ShortcutAction::HistoryUndo => "history.undo",
            ShortcutAction::HistoryRedo => "history.redo",
            ShortcutAction::ImageNext => "image.next",
            ShortcutAction::ImagePrev => "image.prev",
            ShortcutAction::ZoomIn => "zoom.in",
            ShortcutAction::ZoomOut => "zoom.out",
            ShortcutAction::LabelQuick => "label.quick",
            ShortcutAction::Export => "export",
            ShortcutAction::ViewLock => "view.lock",
            ShortcutAction::ImageConfirm => "image.confirm",
        }
    }

    /// The chord bound to this action out of the box.
    pub fn default_chord(&self) -> &'static str {
        match self {
            ShortcutAction::ToolDraw => "d",
            ShortcutAction::ToolSelect => "v",
            ShortcutAction::ToolPolygon => "p",
            ShortcutAction::ToolPan => "h",
            ShortcutAction::AnnotationDelete => "Delete",
            ShortcutAction::HistoryUndo => "ctrl+z",
            ShortcutAction::HistoryRedo => "ctrl+shift+z",
            ShortcutAction::ImageNext => "ArrowRight",
            ShortcutAction::ImagePrev => "ArrowLeft",
            ShortcutAction::ZoomIn => "ctrl+=",
            ShortcutAction::ZoomOut => "ctrl+-",
            ShortcutAction::LabelQuick => "1-9",
            ShortcutAction::Export => "ctrl+s",
            ShortcutAction::ViewLock => "l",
            ShortcutAction::ImageConfirm => "Enter",
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutAction {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ShortcutAction::ALL
            .into_iter()
            .find(|action| action.as_str() == raw)
            .ok_or_else(|| format!("unknown shortcut action '{raw}'"))
    }
}

/// Action → chord table, defaults merged with any overrides.
///
/// `label.quick` is listed for display only: digits 1-9 are always the
/// quick-label keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShortcutMap {
    chords: BTreeMap<ShortcutAction, String>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let chords = ShortcutAction::ALL
            .into_iter()
            .map(|action| (action, action.default_chord().to_string()))
            .collect();
        Self { chords }
    }
}

impl ShortcutMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chord(&self, action: ShortcutAction) -> &str {
        self.chords
            .get(&action)
            .map(String::as_str)
            .unwrap_or_else(|| action.default_chord())
    }

    /// Rebinds one action.
    pub fn set(&mut self, action: ShortcutAction, chord: impl Into<String>) {
        self.chords.insert(action, chord.into());
    }

    /// Rebinds every action present in `overrides`.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (ShortcutAction, String)>,
    {
        for (action, chord) in overrides {
            self.set(action, chord);
        }
        self
    }

    /// Actions and their chords in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (ShortcutAction, &str)> {
        self.chords.iter().map(|(action, chord)| (*action, chord.as_str()))
    }

    /// Parses an `action: chord` YAML mapping and merges it over the defaults.
    ///
    /// `path` only labels errors.
    pub fn from_yaml_str(yaml: &str, path: &Path) -> Result<Self, LabelkitError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: BTreeMap<String, String> =
            serde_yaml::from_str(yaml).map_err(|source| LabelkitError::ShortcutConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut overrides = Vec::with_capacity(raw.len());
        for (name, chord) in raw {
            let action = name
                .parse::<ShortcutAction>()
                .map_err(|message| LabelkitError::ShortcutConfigInvalid {
                    path: path.to_path_buf(),
                    message,
                })?;
            if chord.trim().is_empty() {
                return Err(LabelkitError::ShortcutConfigInvalid {
                    path: path.to_path_buf(),
                    message: format!("empty chord for '{action}'"),
                });
            }
            debug!(%action, %chord, "shortcut override");
            overrides.push((action, chord));
        }

        Ok(Self::default().with_overrides(overrides))
    }

    /// Reads overrides from a YAML file.
    pub fn load_yaml(path: &Path) -> Result<Self, LabelkitError> {
        let yaml = fs::read_to_string(path).map_err(LabelkitError::Io)?;
        Self::from_yaml_str(&yaml, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_action() {
        let map = ShortcutMap::default();
        assert_eq!(map.iter().count(), 15);
        assert_eq!(map.chord(ShortcutAction::HistoryRedo), "ctrl+shift+z");
        assert_eq!(map.chord(ShortcutAction::ImageConfirm), "Enter");
    }

    #[test]
    fn action_names_round_trip() {
        for action in ShortcutAction::ALL {
            assert_eq!(action.as_str().parse::<ShortcutAction>(), Ok(action));
        }
        assert!("tool.laser".parse::<ShortcutAction>().is_err());
    }

    #[test]
    fn yaml_overrides_merge_over_defaults() {
        let yaml = "tool.draw: b\nhistory.redo: ctrl+y\n";
        let map = ShortcutMap::from_yaml_str(yaml, Path::new("keys.yaml")).expect("parse");
        assert_eq!(map.chord(ShortcutAction::ToolDraw), "b");
        assert_eq!(map.chord(ShortcutAction::HistoryRedo), "ctrl+y");
        assert_eq!(map.chord(ShortcutAction::ToolSelect), "v");
    }

    #[test]
    fn yaml_unknown_action_is_rejected() {
        let err = ShortcutMap::from_yaml_str("tool.laser: x\n", Path::new("keys.yaml")).unwrap_err();
        assert!(matches!(err, LabelkitError::ShortcutConfigInvalid { .. }));
        assert!(err.to_string().contains("tool.laser"));
    }

    #[test]
    fn yaml_syntax_error_is_reported() {
        let err = ShortcutMap::from_yaml_str("[not, a, map", Path::new("keys.yaml")).unwrap_err();
        assert!(matches!(err, LabelkitError::ShortcutConfigParse { .. }));
    }
}
