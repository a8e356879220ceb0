use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::NAME_COLUMN;
use crate::error::{DirectoryError, Result};

/// A single worksheet cell.
///
/// Exports carry free text (including the "Yes"/"No" service flags), the
/// occasional numeric or boolean cell, and blanks. Nested arrays or objects
/// are not valid cells and are rejected at the input boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl FieldValue {
    /// Convert one parsed JSON cell, rejecting shapes a worksheet cell
    /// cannot hold.
    pub fn from_json(cell: &serde_json::Value) -> Result<Self> {
        match cell {
            serde_json::Value::Null => Ok(FieldValue::Empty),
            serde_json::Value::Bool(flag) => Ok(FieldValue::Bool(*flag)),
            serde_json::Value::Number(number) => {
                number.as_f64().map(FieldValue::Number).ok_or_else(|| {
                    DirectoryError::InvalidInput(format!("unrepresentable numeric cell: {}", number))
                })
            }
            serde_json::Value::String(text) => Ok(FieldValue::Text(text.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(DirectoryError::InvalidInput(
                    "nested arrays and objects are not valid worksheet cells".to_string(),
                ))
            }
        }
    }

    /// The cell as text, if it is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this cell is an affirmative service flag ("yes" in any casing).
    /// Only text cells count; a native boolean is not a flag.
    pub fn is_yes_flag(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.to_lowercase() == "yes")
    }
}

/// One raw record from the worksheet export: an ordered list of
/// (column name, cell) pairs. Column order is whatever the export used;
/// there is no predeclared schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResource {
    columns: Vec<(String, FieldValue)>,
}

impl RawResource {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append a column-value pair, preserving insertion order.
    pub fn insert(&mut self, column: impl Into<String>, value: FieldValue) {
        self.columns.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterate column-value pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Materialize one record from a parsed JSON row. Anything other than a
    /// column-value object is invalid input.
    pub fn from_value(row: &serde_json::Value) -> Result<Self> {
        let object = row.as_object().ok_or_else(|| {
            DirectoryError::InvalidInput(format!(
                "expected a column-value object, got {}",
                json_kind(row)
            ))
        })?;

        let mut columns = Vec::with_capacity(object.len());
        for (column, cell) in object {
            columns.push((column.clone(), FieldValue::from_json(cell)?));
        }
        Ok(Self { columns })
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl Serialize for RawResource {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawResource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColumnsVisitor;

        impl<'de> Visitor<'de> for ColumnsVisitor {
            type Value = RawResource;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of column names to worksheet cells")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((column, value)) = access.next_entry::<String, FieldValue>()? {
                    columns.push((column, value));
                }
                Ok(RawResource { columns })
            }
        }

        deserializer.deserialize_map(ColumnsVisitor)
    }
}

/// A cleaned record ready for the display layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanResource {
    /// Zero-based position of the record in the input sequence. Assigned
    /// before sorting and never reassigned, so it survives reordering.
    pub id: usize,
    /// Services offered, in discovery order: flag-derived names first (in
    /// column order), then any names from the "Other" free-text list.
    /// Duplicates are kept.
    pub services: Vec<String>,
    /// Every original column-value pair, copied verbatim.
    pub columns: RawResource,
}

impl CleanResource {
    /// The resource's `Name` column as text. Every record in a directory
    /// must carry one.
    pub fn name(&self) -> Result<&str> {
        match self.columns.get(NAME_COLUMN) {
            Some(value) => value.as_text().ok_or_else(|| {
                DirectoryError::TypeMismatch(format!(
                    "resource {} has a non-text \"{}\" value",
                    self.id, NAME_COLUMN
                ))
            }),
            None => Err(DirectoryError::TypeMismatch(format!(
                "resource {} is missing the \"{}\" column",
                self.id, NAME_COLUMN
            ))),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.columns.get(column)
    }
}

impl Serialize for CleanResource {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Flat object: id, services, then every column inline. A raw column
        // literally named "id" or "services" wins over the derived field and
        // is emitted once, at its column position.
        let mut map = serializer.serialize_map(None)?;
        if self.columns.get("id").is_none() {
            map.serialize_entry("id", &self.id)?;
        }
        if self.columns.get("services").is_none() {
            map.serialize_entry("services", &self.services)?;
        }
        for (column, value) in self.columns.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
