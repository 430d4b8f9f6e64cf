use serde::{Deserialize, Serialize};

/// How records of a resource are addressed in write paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Human-chosen, URL-safe, immutable after creation.
    Slug,
    /// Numeric id assigned by the backend.
    Id,
}

/// Identity of one record: its slug or its backend id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceKey {
    Slug(String),
    Id(i64),
}

impl ResourceKey {
    /// Parse a key typed by an operator for a resource keyed by `kind`.
    pub fn parse(kind: KeyKind, raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("Key cannot be empty".to_string());
        }
        match kind {
            KeyKind::Slug => {
                if raw.contains('/') || raw.contains(char::is_whitespace) {
                    return Err(format!("Invalid slug '{}'", raw));
                }
                Ok(ResourceKey::Slug(raw.to_string()))
            }
            KeyKind::Id => raw
                .parse::<i64>()
                .map(ResourceKey::Id)
                .map_err(|_| format!("Invalid id '{}': expected a number", raw)),
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            ResourceKey::Slug(_) => KeyKind::Slug,
            ResourceKey::Id(_) => KeyKind::Id,
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKey::Slug(slug) => write!(f, "{}", slug),
            ResourceKey::Id(id) => write!(f, "{}", id),
        }
    }
}
