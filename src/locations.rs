//! Schema-derived scalar locations, as emitted by the codegen step.
//!
//! This is the registration input of the engine: which type names are custom
//! scalars, the declared type of every object field that can reach one (kept
//! separately for the argument and result directions, since input and output
//! schemas can diverge), and the type governing each top-level result field.
//! Loaded once at startup; maps preserve declaration order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One concrete type name, or the candidate set of an interface/union
/// position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeOrTypes {
    One(String),
    Many(Vec<String>),
}

/// object type name → (field name → declared type name(s))
pub type ObjectFieldTypes = IndexMap<String, IndexMap<String, TypeOrTypes>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarLocations {
    #[serde(default)]
    pub scalars: Vec<String>,
    #[serde(default)]
    pub input_object_field_types: ObjectFieldTypes,
    #[serde(default)]
    pub output_object_field_types: ObjectFieldTypes,
    #[serde(default)]
    pub operation_map: IndexMap<String, TypeOrTypes>,
}

impl ScalarLocations {
    /// Deserialize with JSON-path context in error messages.
    pub fn from_json(src: &str) -> Result<Self, String> {
        let de = &mut serde_json::Deserializer::from_str(src);
        match serde_path_to_error::deserialize::<_, Self>(de) {
            Ok(v) => Ok(v),
            Err(err) => {
                let path = err.path().to_string();
                Err(format!("at JSON path {path} → {}", err.into_inner()))
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
