//! Field-tag assignments and the process-wide schema registry
//!
//! A tag, once assigned, keeps its name and kind forever. Revisions may add
//! tags or mark existing ones deprecated; they may never drop or repurpose
//! one. `check_evolution` enforces that between two revisions.

use crate::codec::wire::{WireType, MAX_FIELD_NUMBER};
use crate::error::SchemaError;
use std::collections::{HashMap, HashSet};
use std::fmt;

pub const DATA_HASH_TAG: u32 = 1;
pub const DATA_TAG: u32 = 2;
pub const ERROR_CODE_TAG: u32 = 3;
pub const ERROR_TAG: u32 = 4;

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bytes,
    Int32,
    String,
}

impl FieldKind {
    pub fn wire_type(self) -> WireType {
        match self {
            FieldKind::Bytes | FieldKind::String => WireType::LengthDelimited,
            FieldKind::Int32 => WireType::Varint,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Bytes => write!(f, "bytes"),
            FieldKind::Int32 => write!(f, "int32"),
            FieldKind::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub number: u32,
    pub name: &'static str,
    pub kind: FieldKind,
    /// No longer populated by producers; the tag stays reserved
    pub deprecated: bool,
}

impl FieldDescriptor {
    pub const fn new(number: u32, name: &'static str, kind: FieldKind) -> Self {
        Self {
            number,
            name,
            kind,
            deprecated: false,
        }
    }

    pub const fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// One revision of a message's field set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub package: &'static str,
    pub message: &'static str,
    pub fields: &'static [FieldDescriptor],
}

/// `TW.TxCompiler.Proto.PreSigningOutput`
pub const PRE_SIGNING_OUTPUT_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    package: "TW.TxCompiler.Proto",
    message: "PreSigningOutput",
    fields: &[
        FieldDescriptor::new(DATA_HASH_TAG, "data_hash", FieldKind::Bytes),
        FieldDescriptor::new(DATA_TAG, "data", FieldKind::Bytes),
        FieldDescriptor::new(ERROR_CODE_TAG, "error_code", FieldKind::Int32),
        FieldDescriptor::new(ERROR_TAG, "error", FieldKind::String),
    ],
};

impl SchemaDescriptor {
    /// Fully qualified name, e.g. `TW.TxCompiler.Proto.PreSigningOutput`
    pub fn identity(&self) -> String {
        format!("{}.{}", self.package, self.message)
    }

    pub fn field(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Reject invalid or duplicated tags
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in self.fields {
            if field.number == 0 || field.number > MAX_FIELD_NUMBER {
                return Err(SchemaError::InvalidTag {
                    schema: self.identity(),
                    tag: field.number,
                });
            }
            if !seen.insert(field.number) {
                return Err(SchemaError::DuplicateTag {
                    schema: self.identity(),
                    tag: field.number,
                });
            }
        }
        Ok(())
    }
}

/// Verify `new` is a legal successor of `old`
pub fn check_evolution(old: &SchemaDescriptor, new: &SchemaDescriptor) -> Result<(), SchemaError> {
    new.check()?;

    for old_field in old.fields {
        let Some(new_field) = new.field(old_field.number) else {
            return Err(SchemaError::TagRemoved {
                schema: new.identity(),
                tag: old_field.number,
                name: old_field.name,
            });
        };

        if new_field.name != old_field.name || new_field.kind != old_field.kind {
            return Err(SchemaError::TagRepurposed {
                schema: new.identity(),
                tag: old_field.number,
                old: format!("{} {}", old_field.kind, old_field.name),
                new: format!("{} {}", new_field.kind, new_field.name),
            });
        }
    }

    Ok(())
}

/// Maps schema identity to its current tag assignments
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, SchemaDescriptor>,
}

lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: SchemaRegistry = SchemaRegistry::builtin();
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every schema this crate encodes
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        if let Err(e) = registry.register(PRE_SIGNING_OUTPUT_SCHEMA) {
            crate::log_error!("schema", "Built-in schema rejected", error = e);
        }
        registry
    }

    /// Shared read-only registry, built on first use
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn register(&mut self, schema: SchemaDescriptor) -> Result<(), SchemaError> {
        schema.check()?;
        let identity = schema.identity();
        if self.schemas.contains_key(&identity) {
            return Err(SchemaError::DuplicateSchema(identity));
        }
        self.schemas.insert(identity, schema);
        Ok(())
    }

    /// Replace a registered schema with a newer revision
    pub fn upgrade(&mut self, schema: SchemaDescriptor) -> Result<(), SchemaError> {
        let identity = schema.identity();
        let current = self
            .schemas
            .get(&identity)
            .ok_or_else(|| SchemaError::UnknownSchema(identity.clone()))?;
        check_evolution(current, &schema)?;
        self.schemas.insert(identity, schema);
        Ok(())
    }

    pub fn get(&self, identity: &str) -> Option<&SchemaDescriptor> {
        self.schemas.get(identity)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVISION_2: SchemaDescriptor = SchemaDescriptor {
        package: "TW.TxCompiler.Proto",
        message: "PreSigningOutput",
        fields: &[
            FieldDescriptor::new(DATA_HASH_TAG, "data_hash", FieldKind::Bytes),
            FieldDescriptor::new(DATA_TAG, "data", FieldKind::Bytes),
            FieldDescriptor::new(ERROR_CODE_TAG, "error_code", FieldKind::Int32),
            FieldDescriptor::new(ERROR_TAG, "error", FieldKind::String).deprecated(),
            FieldDescriptor::new(5, "sighash_type", FieldKind::Int32),
        ],
    };

    #[test]
    fn test_builtin_schema_identity() {
        assert_eq!(
            PRE_SIGNING_OUTPUT_SCHEMA.identity(),
            "TW.TxCompiler.Proto.PreSigningOutput"
        );
        assert!(PRE_SIGNING_OUTPUT_SCHEMA.check().is_ok());
        assert_eq!(
            PRE_SIGNING_OUTPUT_SCHEMA.field(ERROR_CODE_TAG).map(|f| f.kind),
            Some(FieldKind::Int32)
        );
        assert!(PRE_SIGNING_OUTPUT_SCHEMA.field(9).is_none());
    }

    #[test]
    fn test_global_registry_contains_builtin() {
        let registry = SchemaRegistry::global();
        let schema = registry
            .get("TW.TxCompiler.Proto.PreSigningOutput")
            .expect("builtin schema registered");
        assert_eq!(schema, &PRE_SIGNING_OUTPUT_SCHEMA);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        const BAD: SchemaDescriptor = SchemaDescriptor {
            package: "test",
            message: "Dup",
            fields: &[
                FieldDescriptor::new(1, "a", FieldKind::Bytes),
                FieldDescriptor::new(1, "b", FieldKind::Bytes),
            ],
        };
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register(BAD),
            Err(SchemaError::DuplicateTag { tag: 1, .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_tag_zero_rejected() {
        const BAD: SchemaDescriptor = SchemaDescriptor {
            package: "test",
            message: "Zero",
            fields: &[FieldDescriptor::new(0, "a", FieldKind::Bytes)],
        };
        assert!(matches!(BAD.check(), Err(SchemaError::InvalidTag { tag: 0, .. })));
    }

    #[test]
    fn test_duplicate_schema_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(PRE_SIGNING_OUTPUT_SCHEMA).unwrap();
        assert!(matches!(
            registry.register(PRE_SIGNING_OUTPUT_SCHEMA),
            Err(SchemaError::DuplicateSchema(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_adding_and_deprecating_is_allowed() {
        assert!(check_evolution(&PRE_SIGNING_OUTPUT_SCHEMA, &REVISION_2).is_ok());

        let mut registry = SchemaRegistry::builtin();
        registry.upgrade(REVISION_2).unwrap();
        let current = registry.get("TW.TxCompiler.Proto.PreSigningOutput").unwrap();
        assert_eq!(current.fields.len(), 5);
        assert!(current.field(ERROR_TAG).unwrap().deprecated);
    }

    #[test]
    fn test_removing_tag_is_rejected() {
        const SHRUNK: SchemaDescriptor = SchemaDescriptor {
            package: "TW.TxCompiler.Proto",
            message: "PreSigningOutput",
            fields: &[
                FieldDescriptor::new(DATA_HASH_TAG, "data_hash", FieldKind::Bytes),
                FieldDescriptor::new(DATA_TAG, "data", FieldKind::Bytes),
                FieldDescriptor::new(ERROR_CODE_TAG, "error_code", FieldKind::Int32),
            ],
        };
        assert!(matches!(
            check_evolution(&PRE_SIGNING_OUTPUT_SCHEMA, &SHRUNK),
            Err(SchemaError::TagRemoved { tag: 4, name: "error", .. })
        ));
    }

    #[test]
    fn test_repurposing_tag_is_rejected() {
        const REPURPOSED: SchemaDescriptor = SchemaDescriptor {
            package: "TW.TxCompiler.Proto",
            message: "PreSigningOutput",
            fields: &[
                FieldDescriptor::new(DATA_HASH_TAG, "data_hash", FieldKind::Bytes),
                FieldDescriptor::new(DATA_TAG, "data", FieldKind::Bytes),
                FieldDescriptor::new(ERROR_CODE_TAG, "error_code", FieldKind::String),
                FieldDescriptor::new(ERROR_TAG, "error", FieldKind::String),
            ],
        };
        let mut registry = SchemaRegistry::builtin();
        assert!(matches!(
            registry.upgrade(REPURPOSED),
            Err(SchemaError::TagRepurposed { tag: 3, .. })
        ));
        // Failed upgrade leaves the registered revision untouched
        assert_eq!(
            registry.get("TW.TxCompiler.Proto.PreSigningOutput"),
            Some(&PRE_SIGNING_OUTPUT_SCHEMA)
        );
    }

    #[test]
    fn test_upgrade_unknown_schema() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.upgrade(PRE_SIGNING_OUTPUT_SCHEMA),
            Err(SchemaError::UnknownSchema(_))
        ));
    }
}
