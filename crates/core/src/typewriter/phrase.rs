use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One entry in a typewriter rotation.
///
/// Wraps `Arc<str>` so reconfiguring or cloning a config never copies the
/// text, and caches the character count since the engine compares against
/// it on every tick. All lengths and prefixes count Unicode scalar values,
/// not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phrase {
    text: Arc<str>,
    chars: usize,
}

impl Phrase {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            text: Arc::from(text),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    #[inline]
    pub fn char_len(&self) -> usize {
        self.chars
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    /// The first `chars` characters, saturating at the whole phrase.
    pub fn prefix(&self, chars: usize) -> &str {
        if chars >= self.chars {
            return &self.text;
        }
        let end = self
            .text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(byte, _)| byte);
        &self.text[..end]
    }
}

impl std::ops::Deref for Phrase {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for Phrase {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<&str> for Phrase {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.text == *other
    }
}

impl From<&str> for Phrase {
    fn from(s: &str) -> Self {
        Phrase::new(s)
    }
}

impl From<String> for Phrase {
    fn from(s: String) -> Self {
        Phrase::new(&s)
    }
}

impl std::fmt::Display for Phrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.text.fmt(f)
    }
}

// Plain string on the wire; the char count is rebuilt on load.
impl Serialize for Phrase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Phrase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Phrase::new(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_counts_characters() {
        let p = Phrase::from("héllo");
        assert_eq!(p.char_len(), 5);
        assert_eq!(p.prefix(0), "");
        assert_eq!(p.prefix(2), "hé");
        assert_eq!(p.prefix(5), "héllo");
        assert_eq!(p.prefix(99), "héllo");
    }

    #[test]
    fn prefix_of_multibyte_phrase() {
        let p = Phrase::from("开发者🚀");
        assert_eq!(p.char_len(), 4);
        assert_eq!(p.prefix(3), "开发者");
        assert_eq!(p.prefix(4), "开发者🚀");
    }

    #[test]
    fn empty_phrase() {
        let p = Phrase::from("");
        assert!(p.is_empty());
        assert_eq!(p.prefix(1), "");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let p: Phrase = serde_json::from_str("\"Rustacean\"").unwrap();
        assert_eq!(p, "Rustacean");
        assert_eq!(p.char_len(), 9);
    }
}
