//! Model field metadata consumed by type mapping and migrations.

/// Logical data type of a model field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Bytes,
    /// Database type text passed through unchanged.
    Custom(String),
}

/// A model field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name as used in code.
    pub name: String,
    /// Column name in the database.
    pub db_name: String,
    pub data_type: DataType,
    /// Bit width for numbers, character/byte length for strings and bytes.
    /// Zero means unspecified.
    pub size: u32,
    /// Tag column of a super-table rather than a data column.
    pub tag: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        let name = name.into();
        Self {
            db_name: name.clone(),
            name,
            data_type,
            size: 0,
            tag: false,
        }
    }

    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn tag(mut self) -> Self {
        self.tag = true;
        self
    }
}

/// A model: its table name and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub table: String,
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(table: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            table: table.into(),
            fields,
        }
    }

    /// Find a field by code name or column name.
    pub fn look_up_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.db_name == name))
    }

    /// Data (non-tag) fields, in declaration order.
    pub fn data_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.tag)
    }

    /// Tag fields, in declaration order.
    pub fn tag_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.tag)
    }
}
