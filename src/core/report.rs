use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

const NOT_FOUND: &str = "Not Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValue {
    Text(String),
    Located { version: String, path: String },
    NotFound,
}

impl ItemValue {
    pub fn text(value: impl Into<String>) -> Self {
        ItemValue::Text(value.into())
    }

    pub fn located(version: impl Into<String>, path: impl Into<String>) -> Self {
        ItemValue::Located {
            version: version.into(),
            path: path.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ItemValue::NotFound)
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::Text(s) => f.write_str(s),
            ItemValue::Located { version, path } => write!(f, "{version} - {path}"),
            ItemValue::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

impl Serialize for ItemValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemValue::Text(s) => serializer.serialize_str(s),
            ItemValue::Located { version, path } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("version", version)?;
                map.serialize_entry("path", path)?;
                map.end()
            }
            ItemValue::NotFound => serializer.serialize_str(NOT_FOUND),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub value: ItemValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<Item>,
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            map.serialize_entry(&item.name, &item.value)?;
        }
        map.end()
    }
}

/// Environment diagnostics grouped by category, in probe order.
///
/// Serializes as `{"<category>": {"<item>": <value>}}` with insertion order
/// preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub categories: Vec<Category>,
}

impl DiagnosticReport {
    pub fn to_text(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        let _ = writeln!(out);
        for category in &self.categories {
            let _ = writeln!(out, "  {}:", category.name);
            for item in &category.items {
                let _ = writeln!(out, "    {}: {}", item.name, item.value);
            }
        }
        out
    }
}

impl Serialize for DiagnosticReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, category)?;
        }
        map.end()
    }
}
