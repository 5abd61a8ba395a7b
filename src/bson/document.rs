//! Ordered BSON document.
use super::value::Bson;

/// An ordered sequence of key/value pairs.
///
/// Keys are kept in the order they were decoded. Duplicate keys are allowed
/// by the wire format, so they are stored as they come.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    elements: Vec<(String, Bson)>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element at the end of the document.
    pub fn push(&mut self, key: String, value: Bson) {
        self.elements.push((key, value));
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Bson> {
        self.elements
            .iter()
            .find(|(element_key, _)| element_key == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bson)> {
        self.elements
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Bson> {
        self.elements.iter().map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<(String, Bson)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Bson)>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}
