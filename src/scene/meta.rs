//! Elevation hints from a heightmap's `.meta` sidecar
//!
//! Some tiles record their range as plain `minHeight: <n>` and
//! `maxHeight: <n>` lines next to the heightmap.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Elevation bounds read from a sidecar. Either side may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeightHints {
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

impl HeightHints {
    pub fn is_empty(&self) -> bool {
        self.min_height.is_none() && self.max_height.is_none()
    }

    /// Read hints from a sidecar file. Missing or unreadable files give
    /// `None`; the sidecar is optional.
    pub fn load(path: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        let hints = Self::parse(&text);
        (!hints.is_empty()).then_some(hints)
    }

    /// Parse sidecar text.
    pub fn parse(text: &str) -> Self {
        Self {
            min_height: plain_value(text, "minHeight:"),
            max_height: plain_value(text, "maxHeight:"),
        }
    }
}

/// Number following the first word-boundary occurrence of `key`.
fn plain_value(text: &str, key: &str) -> Option<f64> {
    let mut search = 0;
    while let Some(offset) = text[search..].find(key) {
        let at = search + offset;
        search = at + key.len();

        let boundary = text[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        if !boundary {
            continue;
        }

        let rest = text[search..].trim_start();
        let number: String = rest
            .char_indices()
            .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')))
            .map(|(_, c)| c)
            .collect();
        if let Ok(v) = number.parse::<f64>() {
            return Some(v);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let text = "TextureImporter:\n  minHeight: -80\n  maxHeight: 6000.5\n";
        let hints = HeightHints::parse(text);
        assert_eq!(hints.min_height, Some(-80.0));
        assert_eq!(hints.max_height, Some(6000.5));
    }

    #[test]
    fn test_word_boundary_and_garbage() {
        let text = "xminHeight: 4\nmaxHeight: tall\nmaxHeight: 900\n";
        let hints = HeightHints::parse(text);
        assert_eq!(hints.min_height, None);
        assert_eq!(hints.max_height, Some(900.0));
    }

    #[test]
    fn test_missing_file() {
        assert_eq!(HeightHints::load(Path::new("/nonexistent/height.png.meta")), None);
    }
}
