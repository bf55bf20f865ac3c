use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Job identifier -> status string, in the order the server sent the keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap(IndexMap<String, String>);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("status body is not a JSON object of strings: {message}")]
    Malformed { message: String },
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a `GET /status` body. Repeated keys keep their first position
    /// and take the last value.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(bytes).map_err(|err| DecodeError::Malformed {
            message: err.to_string(),
        })
    }

    pub fn insert(&mut self, id: impl Into<String>, status: impl Into<String>) {
        self.0.insert(id.into(), status.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, status)| (id.as_str(), status.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for StatusMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, status)| (id.into(), status.into()))
                .collect(),
        )
    }
}
