use binpack_codec::{Format, Value};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::validator::validate_definition;

/// One named field of a layout document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    pub token: String,
}

/// A layout document as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutDef {
    /// Layout name. May be omitted in files loaded from a directory, where it
    /// defaults to the file stem.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
}

/// A validated layout: field names plus their parsed format.
#[derive(Debug, Clone)]
pub struct Layout {
    def: LayoutDef,
    format: Format,
}

impl Layout {
    /// Validate a definition with default config.
    pub fn new(def: LayoutDef) -> Result<Self> {
        Self::with_config(def, &LayoutConfig::default())
    }

    /// Validate a definition with explicit config.
    pub fn with_config(def: LayoutDef, config: &LayoutConfig) -> Result<Self> {
        let format = validate_definition(&def, config)?;
        Ok(Self { def, format })
    }

    /// Parse and validate a layout from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn description(&self) -> Option<&str> {
        self.def.description.as_deref()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.def.fields
    }

    pub fn definition(&self) -> &LayoutDef {
        &self.def
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Encoded record size in bytes.
    pub fn size(&self) -> usize {
        self.format.size()
    }

    /// Pack positional values, one per field.
    pub fn pack(&self, values: &[Value]) -> Result<Bytes> {
        Ok(self.format.pack(values)?)
    }

    /// Pack named values, placing each in its field's position.
    ///
    /// Every field needs exactly one value and every name must match a field.
    pub fn pack_named<K: AsRef<str>>(&self, values: &[(K, Value)]) -> Result<Bytes> {
        let mut slots: Vec<Option<&Value>> = vec![None; self.def.fields.len()];
        for (name, value) in values {
            let name = name.as_ref();
            let index = self
                .field_index(name)
                .ok_or_else(|| LayoutError::UnknownField {
                    layout: self.def.name.clone(),
                    field: name.to_string(),
                })?;
            if slots[index].replace(value).is_some() {
                return Err(LayoutError::DuplicateField {
                    layout: self.def.name.clone(),
                    field: name.to_string(),
                });
            }
        }

        let ordered = self
            .def
            .fields
            .iter()
            .zip(slots)
            .map(|(field, slot)| {
                slot.cloned().ok_or_else(|| LayoutError::MissingField {
                    layout: self.def.name.clone(),
                    field: field.name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.pack(&ordered)
    }

    /// Unpack a record from the front of `buf`.
    pub fn unpack(&self, buf: &[u8]) -> Result<Record> {
        let values = self.format.unpack(buf)?;
        let fields = self
            .def
            .fields
            .iter()
            .map(|field| field.name.clone())
            .zip(values)
            .collect();
        Ok(Record { fields })
    }

    /// Position of the field called `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.def.fields.iter().position(|field| field.name == name)
    }
}

/// A decoded record: field names paired with values, in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Value of the field called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop the names and keep the values in layout order.
    pub fn into_values(self) -> Vec<Value> {
        self.fields.into_iter().map(|(_, value)| value).collect()
    }
}
