//! Declarative form schemas.
//!
//! A schema lists the editable fields of one entity: how each is coerced at
//! submit time, whether it is required, its create-mode default, and where
//! its value lives in the backend record. Dotted names (`benchmarks.passmark`)
//! nest into sub-objects of the payload.

/// How a raw draft string is coerced when the payload is assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// `true`/`false` (also accepts yes/no, 1/0, on/off).
    Flag,
    /// Comma-separated list of strings.
    List,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Draft field name and payload path.
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Create-mode default, as it would be typed.
    pub default: Option<&'static str>,
    /// Record path to read from when editing, if different from `name`.
    pub source: Option<&'static str>,
    /// The identifying slug; locked while editing.
    pub key: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            source: None,
            key: false,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn decimal(name: &'static str) -> Self {
        Self::new(name, FieldKind::Decimal)
    }

    pub const fn flag(name: &'static str) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    pub const fn list(name: &'static str) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub const fn choice(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Choice(allowed))
    }

    pub const fn slug() -> Self {
        let mut spec = Self::text("slug");
        spec.required = true;
        spec.key = true;
        spec
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub const fn source(mut self, path: &'static str) -> Self {
        self.source = Some(path);
        self
    }

    /// Record path holding this field's value.
    pub fn read_path(&self) -> &'static str {
        self.source.unwrap_or(self.name)
    }
}

/// One column of a repeating row table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowColumn {
    /// Column name in the draft row.
    pub name: &'static str,
    /// Key under which the coerced value is sent.
    pub payload_key: &'static str,
    pub kind: FieldKind,
}

/// A repeating table of rows assembled into a keyed object, such as the
/// FPS-by-game table: `{ "<name>": { "1080p": 90, ... } }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSpec {
    /// Payload path of the assembled object.
    pub target: &'static str,
    /// Column whose value becomes the object key.
    pub key_column: &'static str,
    pub columns: &'static [RowColumn],
    /// Key-column values of the rows a new draft starts with.
    pub default_rows: &'static [&'static str],
}

impl RowSpec {
    pub fn column(&self, name: &str) -> Option<&RowColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == self.key_column || self.column(name).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSchema {
    pub fields: &'static [FieldSpec],
    pub rows: Option<RowSpec>,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn key_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key)
    }
}
