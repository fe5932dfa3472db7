// Strongly-typed references into the schema. No serde_json::Value here.

use std::fmt;

use indexmap::IndexMap;

/// What governs a position in the value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Leaf with a registered wire codec.
    Scalar(String),
    /// Named object type with a field map in the table.
    Object(String),
    /// Interface/union position: the concrete type varies per value and is
    /// pinned down by the value's own discriminator where possible.
    OneOf(Vec<String>),
    /// Nothing statically known. Runtime discriminators may still resolve it.
    Unknown,
}

/// Field name → type reference, owned by exactly one named object type.
/// Declaration order is kept so polymorphic merges stay deterministic.
pub type FieldTypeMap = IndexMap<String, TypeRef>;

/// Which half of the request/response cycle is running. Selects encode vs
/// decode on the registry and the argument vs result side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => f.write_str("encode"),
            Direction::Decode => f.write_str("decode"),
        }
    }
}
