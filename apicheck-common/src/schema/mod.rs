//! Interface schemas and the registry that holds them.
//!
//! Schemas are registered once through [`SchemaRegistryBuilder`] and are
//! immutable afterwards. The built registry is a plain owned table, so every
//! lookup is a read of immutable data without locking.

mod kind;
pub mod sales;

pub use kind::ValueKind;

use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while registering or looking up schemas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field was declared both required and optional.
    #[error("schema {schema}: field '{field}' is declared both required and optional")]
    SchemaConflict { schema: String, field: String },

    /// A field name was listed twice in the same field set.
    #[error("schema {schema}: field '{field}' is declared more than once")]
    DuplicateField { schema: String, field: String },

    /// A schema name was registered twice.
    #[error("schema {0} is already registered")]
    DuplicateSchema(String),

    /// No schema with this name exists.
    #[error("schema {0} is not registered")]
    SchemaNotFound(String),
}

/// A named contract for one flat response object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSchema {
    name: String,
    required: Vec<String>,
    optional: Vec<String>,
    field_kinds: Vec<(String, ValueKind)>,
}

impl InterfaceSchema {
    /// Build a schema, rejecting overlapping required/optional declarations.
    ///
    /// Field order is preserved so diagnostics list fields as declared.
    pub fn new<R, O, K, S>(
        name: impl Into<String>,
        required: R,
        optional: O,
        field_kinds: K,
    ) -> Result<Self, SchemaError>
    where
        R: IntoIterator<Item = S>,
        O: IntoIterator<Item = S>,
        K: IntoIterator<Item = (S, ValueKind)>,
        S: Into<String>,
    {
        let name = name.into();
        let required = unique_fields(&name, required)?;
        let optional = unique_fields(&name, optional)?;

        if let Some(field) = required.iter().find(|field| optional.contains(field)) {
            return Err(SchemaError::SchemaConflict {
                schema: name,
                field: field.clone(),
            });
        }

        let mut kinds: Vec<(String, ValueKind)> = Vec::new();
        for (field, kind) in field_kinds {
            let field = field.into();
            if kinds.iter().any(|(existing, _)| *existing == field) {
                return Err(SchemaError::DuplicateField {
                    schema: name,
                    field,
                });
            }
            kinds.push((field, kind));
        }

        Ok(Self {
            name,
            required,
            optional,
            field_kinds: kinds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    pub fn optional_fields(&self) -> &[String] {
        &self.optional
    }

    /// Declared kinds in declaration order.
    pub fn field_kinds(&self) -> &[(String, ValueKind)] {
        &self.field_kinds
    }

    /// Declared kind for one field, if any.
    pub fn kind_of(&self, field: &str) -> Option<ValueKind> {
        self.field_kinds
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, kind)| *kind)
    }
}

fn unique_fields<S: Into<String>>(
    schema: &str,
    fields: impl IntoIterator<Item = S>,
) -> Result<Vec<String>, SchemaError> {
    let mut out: Vec<String> = Vec::new();
    for field in fields {
        let field = field.into();
        if out.contains(&field) {
            return Err(SchemaError::DuplicateField {
                schema: schema.to_string(),
                field,
            });
        }
        out.push(field);
    }
    Ok(out)
}

/// Collects schema registrations before freezing them into a registry.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: Vec<InterfaceSchema>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema by its parts.
    ///
    /// Fails with [`SchemaError::SchemaConflict`] when a field is both
    /// required and optional, and [`SchemaError::DuplicateSchema`] when the
    /// name is taken.
    pub fn register<R, O, K, S>(
        &mut self,
        name: impl Into<String>,
        required: R,
        optional: O,
        field_kinds: K,
    ) -> Result<&mut Self, SchemaError>
    where
        R: IntoIterator<Item = S>,
        O: IntoIterator<Item = S>,
        K: IntoIterator<Item = (S, ValueKind)>,
        S: Into<String>,
    {
        let schema = InterfaceSchema::new(name, required, optional, field_kinds)?;
        self.insert(schema)
    }

    /// Register an already constructed schema.
    pub fn insert(&mut self, schema: InterfaceSchema) -> Result<&mut Self, SchemaError> {
        if self.schemas.iter().any(|s| s.name == schema.name) {
            return Err(SchemaError::DuplicateSchema(schema.name));
        }
        self.schemas.push(schema);
        Ok(self)
    }

    /// Freeze the registrations.
    pub fn build(self) -> SchemaRegistry {
        let index = self
            .schemas
            .iter()
            .enumerate()
            .map(|(i, schema)| (schema.name.clone(), i))
            .collect();
        SchemaRegistry {
            schemas: self.schemas,
            index,
        }
    }
}

/// Immutable table of named interface schemas.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<InterfaceSchema>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Look up a schema by name.
    pub fn lookup(&self, name: &str) -> Result<&InterfaceSchema, SchemaError> {
        self.index
            .get(name)
            .map(|&i| &self.schemas[i])
            .ok_or_else(|| SchemaError::SchemaNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &InterfaceSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
