//! Display-localization used for label comparison.
//!
//! Labels are compared as the user sees them: both the stored label and the
//! queried one go through the same [`Localizer`] first. Two different source
//! strings that render to the same display string therefore collide.
use std::borrow::Cow;

use rustc_hash::FxHashMap;

pub trait Localizer {
    fn localize<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Displays every label exactly as stored.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct IdentityLocalizer;

impl Localizer for IdentityLocalizer {
    fn localize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Source-string to display-string lookup; unknown strings display unchanged.
#[derive(Clone, Debug, Default)]
pub struct TranslationTable {
    entries: FxHashMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl Into<String>, display: impl Into<String>) -> Self {
        self.insert(source, display);
        self
    }

    pub fn insert(&mut self, source: impl Into<String>, display: impl Into<String>) {
        self.entries.insert(source.into(), display.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for TranslationTable {
    fn localize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.entries.get(text) {
            Some(display) => Cow::Owned(display.clone()),
            None => Cow::Borrowed(text),
        }
    }
}

impl<F> Localizer for F
where
    F: Fn(&str) -> String,
{
    fn localize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(text))
    }
}

/// Compare two labels after localizing both. Case-sensitive.
pub fn same_label(localizer: &dyn Localizer, a: &str, b: &str) -> bool {
    localizer.localize(a) == localizer.localize(b)
}
