use std::sync::{Arc, OnceLock};

use crate::error::ScenarioError;
use crate::value::Value;

const INLINE_OPTION: &str = "inline";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// Serialization tag: `name[,option...]`.
    pub tag: Option<String>,
    pub exported: bool,
}

/// Lookup names derived from a schema's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    /// `(field index, lookup name)` for every exported field, in declaration
    /// order.
    pub direct: Vec<(usize, String)>,
    /// Indices of exported fields tagged `inline`, in declaration order.
    pub inline: Vec<usize>,
}

#[derive(Debug)]
pub struct RecordSchema {
    type_name: String,
    fields: Vec<FieldDef>,
    table: OnceLock<FieldTable>,
}

impl RecordSchema {
    pub fn builder(type_name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Derived once per schema and reused by every lookup.
    pub fn field_table(&self) -> &FieldTable {
        self.table.get_or_init(|| build_field_table(&self.fields))
    }
}

fn build_field_table(fields: &[FieldDef]) -> FieldTable {
    let mut table = FieldTable::default();
    for (index, field) in fields.iter().enumerate() {
        if !field.exported {
            continue;
        }
        let mut name = field.name.to_lowercase();
        if let Some(tag) = &field.tag {
            let mut parts = tag.split(',');
            // The tag name replaces the derived one even when empty.
            name = parts.next().unwrap_or_default().to_string();
            if parts.any(|option| option == INLINE_OPTION) {
                table.inline.push(index);
            }
        }
        table.direct.push((index, name));
    }
    table
}

pub struct RecordSchemaBuilder {
    type_name: String,
    fields: Vec<FieldDef>,
}

impl RecordSchemaBuilder {
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            tag: None,
            exported: true,
        });
        self
    }

    pub fn tagged_field(mut self, name: impl Into<String>, tag: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            tag: Some(tag.into()),
            exported: true,
        });
        self
    }

    pub fn private_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            tag: None,
            exported: false,
        });
        self
    }

    pub fn build(self) -> Arc<RecordSchema> {
        Arc::new(RecordSchema {
            type_name: self.type_name,
            fields: self.fields,
            table: OnceLock::new(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl Record {
    pub fn new(schema: &Arc<RecordSchema>, values: Vec<Value>) -> Result<Self, ScenarioError> {
        if values.len() != schema.fields().len() {
            return Err(ScenarioError::new(
                "RECORD_FIELD_COUNT",
                format!(
                    "Record \"{}\" declares {} fields, got {} values.",
                    schema.type_name(),
                    schema.fields().len(),
                    values.len()
                ),
            ));
        }
        Ok(Self {
            schema: Arc::clone(schema),
            values,
        })
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn field(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.type_name() == other.schema.type_name() && self.values == other.values
    }
}
