//! Matching keyboard events against chord strings.

/// The parts of a keydown event the dispatch table looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key value, e.g. `"z"`, `"Z"`, `"ArrowRight"`.
    pub key: String,
    /// Physical key code, e.g. `"KeyZ"`. May be empty.
    pub code: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Returns true if `event` triggers `chord`.
///
/// A chord is a `+`-joined, case-insensitive list whose last token is the
/// key. `ctrl` accepts either ctrl or meta. A held ctrl/meta or shift that
/// the chord does not name rejects the match, so plain `s` does not fire on
/// ctrl+s. The key matches `event.key` or an `event.code` of `Key<key>`.
pub fn matches_shortcut(event: &KeyEvent, chord: &str) -> bool {
    let chord = chord.to_lowercase();
    let parts: Vec<&str> = chord.split('+').collect();
    let Some(&key) = parts.last() else {
        return false;
    };

    let need_ctrl = parts.contains(&"ctrl");
    let need_shift = parts.contains(&"shift");
    let need_alt = parts.contains(&"alt");
    let need_meta = parts.contains(&"meta");

    if need_ctrl && !event.primary() {
        return false;
    }
    if need_shift && !event.shift {
        return false;
    }
    if need_alt && !event.alt {
        return false;
    }
    if need_meta && !event.meta {
        return false;
    }
    if !need_ctrl && event.primary() && key != "ctrl" && key != "meta" {
        return false;
    }
    if !need_shift && event.shift && key != "shift" {
        return false;
    }

    event.key.to_lowercase() == key || event.code.to_lowercase() == format!("key{key}")
}
