//! Keyboard shortcut resolution.
//!
//! Key presses are described platform-agnostically by [`KeyPress`]; the
//! browser layer builds them from `KeyboardEvent`s. Shortcuts are written as
//! `+`-joined combos such as `"Mod+M"` where `Mod` accepts Ctrl or Meta.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// A key press with modifier state.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyPress {
    /// Key name as reported by `KeyboardEvent.key` (`"m"`, `"Enter"`, `"Backspace"`).
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyPress {
    /// Plain key with no modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn is_backspace(&self) -> bool {
        self.key == "Backspace" && !self.ctrl && !self.alt && !self.meta
    }

    fn has_modifiers(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }
}

/// How a combo constrains the primary modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Primary {
    None,
    Ctrl,
    Meta,
    /// Ctrl or Meta.
    Either,
}

/// A parsed shortcut.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCombo {
    key: String,
    primary: Primary,
    alt: bool,
    shift: bool,
}

impl KeyCombo {
    /// Whether `press` triggers this combo.
    pub fn matches(&self, press: &KeyPress) -> bool {
        let primary_ok = match self.primary {
            Primary::None => !press.ctrl && !press.meta,
            Primary::Ctrl => press.ctrl && !press.meta,
            Primary::Meta => press.meta && !press.ctrl,
            Primary::Either => press.ctrl != press.meta,
        };
        primary_ok
            && press.alt == self.alt
            && press.shift == self.shift
            && press.key.eq_ignore_ascii_case(&self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EditorError::InvalidShortcut {
            combo: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = match parts.pop() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(invalid("missing key")),
        };

        let mut combo = KeyCombo {
            key,
            primary: Primary::None,
            alt: false,
            shift: false,
        };
        for modifier in parts {
            let next = match modifier.to_ascii_lowercase().as_str() {
                "mod" => Primary::Either,
                "ctrl" | "control" => Primary::Ctrl,
                "meta" | "cmd" | "super" => Primary::Meta,
                "alt" | "option" => {
                    combo.alt = true;
                    continue;
                }
                "shift" => {
                    combo.shift = true;
                    continue;
                }
                "" => return Err(invalid("empty modifier")),
                _ => return Err(invalid("unknown modifier")),
            };
            if combo.primary != Primary::None {
                return Err(invalid("more than one of Mod/Ctrl/Meta"));
            }
            combo.primary = next;
        }
        Ok(combo)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary {
            Primary::None => {}
            Primary::Ctrl => f.write_str("Ctrl+")?,
            Primary::Meta => f.write_str("Meta+")?,
            Primary::Either => f.write_str("Mod+")?,
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.key)
    }
}

/// Editor-level shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    InsertMath,
    InsertText,
}

/// Shortcut table.
#[derive(Clone, Debug)]
pub struct Keymap {
    insert_math: KeyCombo,
    insert_text: KeyCombo,
}

impl Keymap {
    pub fn new(insert_math: &str, insert_text: &str) -> Result<Self, EditorError> {
        Ok(Self {
            insert_math: insert_math.parse()?,
            insert_text: insert_text.parse()?,
        })
    }

    /// Resolve a key press to a shortcut. Unmodified keys never match.
    pub fn resolve(&self, press: &KeyPress) -> Option<Shortcut> {
        if !press.has_modifiers() {
            return None;
        }
        if self.insert_math.matches(press) {
            Some(Shortcut::InsertMath)
        } else if self.insert_text.matches(press) {
            Some(Shortcut::InsertText)
        } else {
            None
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            insert_math: KeyCombo {
                key: "m".into(),
                primary: Primary::Either,
                alt: false,
                shift: false,
            },
            insert_text: KeyCombo {
                key: "Enter".into(),
                primary: Primary::Either,
                alt: false,
                shift: false,
            },
        }
    }
}
