//! Immutable type lookup built once from [`ScalarLocations`].
//!
//! Shared read-only by every concurrent transform; nothing here mutates after
//! construction.

use std::borrow::Cow;
use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::locations::{ObjectFieldTypes, ScalarLocations, TypeOrTypes};
use crate::types::{Direction, FieldTypeMap, TypeRef};

/// Conventional discriminator field carried by polymorphic records.
pub const DEFAULT_TYPE_TAG: &str = "__typename";

#[derive(Debug, Clone)]
pub struct TypeTable {
    scalars: BTreeSet<String>,
    input_fields: IndexMap<String, FieldTypeMap>,
    output_fields: IndexMap<String, FieldTypeMap>,
    operations: IndexMap<String, TypeRef>,
    type_tag: String,
}

impl Default for TypeTable {
    fn default() -> Self {
        TypeTable {
            scalars: BTreeSet::new(),
            input_fields: IndexMap::new(),
            output_fields: IndexMap::new(),
            operations: IndexMap::new(),
            type_tag: DEFAULT_TYPE_TAG.to_string(),
        }
    }
}

impl TypeTable {
    pub fn from_locations(locations: &ScalarLocations) -> Self {
        let scalars: BTreeSet<String> = locations.scalars.iter().cloned().collect();
        let input_fields = resolve_side(&scalars, &locations.input_object_field_types);
        let output_fields = resolve_side(&scalars, &locations.output_object_field_types);
        let operations = locations
            .operation_map
            .iter()
            .map(|(field, names)| (field.clone(), resolve_ref(&scalars, names)))
            .collect();
        TypeTable {
            scalars,
            input_fields,
            output_fields,
            operations,
            type_tag: DEFAULT_TYPE_TAG.to_string(),
        }
    }

    /// Override the discriminator field name (defaults to `__typename`).
    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = tag.into();
        self
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Field map governing a record at `type_ref`, on the given side of the
    /// cycle. For a candidate set this is the union of the members' maps,
    /// merged in declared order: on a same-named field collision the later
    /// member wins. Candidate sets used polymorphically must not declare
    /// conflicting types for same-named fields. Scalar/unknown references
    /// yield an empty map (no static descent).
    pub fn field_types_of(&self, direction: Direction, type_ref: &TypeRef) -> Cow<'_, FieldTypeMap> {
        let side = match direction {
            Direction::Encode => &self.input_fields,
            Direction::Decode => &self.output_fields,
        };
        match type_ref {
            TypeRef::Object(name) => side
                .get(name)
                .map(Cow::Borrowed)
                .unwrap_or_else(|| Cow::Owned(FieldTypeMap::new())),
            TypeRef::OneOf(names) => {
                let mut merged = FieldTypeMap::new();
                for name in names {
                    if let Some(fields) = side.get(name) {
                        for (field, ty) in fields {
                            merged.insert(field.clone(), ty.clone());
                        }
                    }
                }
                Cow::Owned(merged)
            }
            TypeRef::Scalar(_) | TypeRef::Unknown => Cow::Owned(FieldTypeMap::new()),
        }
    }

    /// Type governing a top-level result field, if the operation map knows
    /// it. Absent means the caller falls back to the value's discriminator.
    pub fn result_type_of(&self, field: &str) -> Option<&TypeRef> {
        self.operations.get(field)
    }

    /// Whether a declared variable of type `type_name` warrants a walk at
    /// all: a registered scalar encodes directly, a known input object type
    /// descends. Anything else passes through.
    pub fn variable_ref(&self, type_name: &str) -> Option<TypeRef> {
        if self.scalars.contains(type_name) {
            return Some(TypeRef::Scalar(type_name.to_string()));
        }
        if self.input_fields.contains_key(type_name) {
            return Some(TypeRef::Object(type_name.to_string()));
        }
        None
    }
}

fn resolve_ref(scalars: &BTreeSet<String>, names: &TypeOrTypes) -> TypeRef {
    match names {
        TypeOrTypes::One(name) if scalars.contains(name) => TypeRef::Scalar(name.clone()),
        TypeOrTypes::One(name) => TypeRef::Object(name.clone()),
        // candidate sets hold object type names; scalars never appear in one
        TypeOrTypes::Many(names) => TypeRef::OneOf(names.clone()),
    }
}

fn resolve_side(
    scalars: &BTreeSet<String>,
    side: &ObjectFieldTypes,
) -> IndexMap<String, FieldTypeMap> {
    side.iter()
        .map(|(type_name, fields)| {
            let resolved = fields
                .iter()
                .map(|(field, names)| (field.clone(), resolve_ref(scalars, names)))
                .collect();
            (type_name.clone(), resolved)
        })
        .collect()
}

// ------------------------------- Tests ------------------------------------ //
