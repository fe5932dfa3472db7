//! Request/response glue around the tree walk.
//!
//! The transport hands over an [`Operation`] before dispatch and an
//! [`OperationResult`] after receipt; the two drivers here rewrite their
//! scalar positions in place. Structural errors (unrecognized type
//! descriptors, table/registry mismatches) propagate to the pipeline stage
//! that invoked them; unresolvable positions simply pass through.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::registry::ScalarRegistry;
use crate::table::TypeTable;
use crate::types::{Direction, TypeRef};
use crate::walk;

/// The only operation kind whose trees are walked.
const QUERY_KIND: &str = "query";

// ------------------------------ Boundary records -------------------------- //

/// One declared variable of an outgoing request. The type descriptor stays an
/// opaque JSON node in graphql-AST shape (`NamedType`, `ListType`,
/// `NonNullType`); only [`unwrap_named_type`] interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    #[serde(rename = "type")]
    pub of_type: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub kind: String,
    #[serde(default)]
    pub declared_variables: Vec<VariableDef>,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub operation_kind: String,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

// ------------------------------ Type descriptors -------------------------- //

/// Strip list/non-null wrappers down to the underlying named type.
pub fn unwrap_named_type(descriptor: &Value) -> Result<&str, Error> {
    match descriptor.get("kind").and_then(Value::as_str) {
        Some("NamedType") => descriptor
            .pointer("/name/value")
            .and_then(Value::as_str)
            .ok_or_else(|| unsupported(descriptor)),
        Some("ListType") | Some("NonNullType") => match descriptor.get("type") {
            Some(inner) => unwrap_named_type(inner),
            None => Err(unsupported(descriptor)),
        },
        _ => Err(unsupported(descriptor)),
    }
}

fn unsupported(descriptor: &Value) -> Error {
    Error::UnsupportedTypeDescriptor { descriptor: descriptor.to_string() }
}

// ------------------------------ Drivers ----------------------------------- //

/// Encode declared query variables in place before the request is dispatched.
/// Variables whose named type the table does not know pass through unchanged;
/// non-query operations bypass entirely.
pub fn encode_variables(
    op: &mut Operation,
    table: &TypeTable,
    registry: &ScalarRegistry,
) -> Result<(), Error> {
    if op.kind != QUERY_KIND {
        log::trace!("no scalar encode for `{}` operations", op.kind);
        return Ok(());
    }
    for def in &op.declared_variables {
        let type_name = unwrap_named_type(&def.of_type)?;
        let Some(type_ref) = table.variable_ref(type_name) else {
            continue;
        };
        rewrite_field(&mut op.variables, &def.name, &type_ref, Direction::Encode, table, registry)?;
    }
    Ok(())
}

/// Decode top-level result fields in place after the response is received.
/// The operation map wins; otherwise the field's own discriminator (or, for
/// arrays, a tagged first element) decides. Unresolved fields pass through.
pub fn decode_result(
    result: &mut OperationResult,
    table: &TypeTable,
    registry: &ScalarRegistry,
) -> Result<(), Error> {
    if result.operation_kind != QUERY_KIND {
        log::trace!("no scalar decode for `{}` results", result.operation_kind);
        return Ok(());
    }
    let Some(data) = result.data.as_mut() else {
        return Ok(());
    };

    let field_names: Vec<String> = data.keys().cloned().collect();
    for name in &field_names {
        let type_ref = match table.result_type_of(name) {
            Some(r) => r.clone(),
            None => {
                let tagged = data
                    .get(name)
                    .and_then(|value| walk::tag_fallback(value, table.type_tag()));
                match tagged {
                    Some(r) => r,
                    None => {
                        log::trace!("no result type for `{name}`, passing through");
                        continue;
                    }
                }
            }
        };
        rewrite_field(data, name, &type_ref, Direction::Decode, table, registry)?;
    }
    Ok(())
}

/// Walk one entry of `map` and replace it only when the walk changed it.
/// Replacing through `insert` keeps the entry's position.
fn rewrite_field(
    map: &mut Map<String, Value>,
    name: &str,
    type_ref: &TypeRef,
    direction: Direction,
    table: &TypeTable,
    registry: &ScalarRegistry,
) -> Result<(), Error> {
    let rewritten = match map.get(name) {
        Some(current) => match walk::transform(current, type_ref, direction, table, registry)? {
            Cow::Owned(new) => Some(new),
            Cow::Borrowed(_) => None,
        },
        None => None,
    };
    if let Some(new) = rewritten {
        map.insert(name.to_string(), new);
    }
    Ok(())
}

// ------------------------------ Façade ------------------------------------ //

/// Both halves of the cycle bundled with their shared, immutable lookups.
#[derive(Debug)]
pub struct ScalarExchange {
    table: TypeTable,
    registry: ScalarRegistry,
}

impl ScalarExchange {
    pub fn new(table: TypeTable, registry: ScalarRegistry) -> Self {
        ScalarExchange { table, registry }
    }

    pub fn encode_request(&self, op: &mut Operation) -> Result<(), Error> {
        encode_variables(op, &self.table, &self.registry)
    }

    pub fn decode_response(&self, result: &mut OperationResult) -> Result<(), Error> {
        decode_result(result, &self.table, &self.registry)
    }

    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    pub fn registry(&self) -> &ScalarRegistry {
        &self.registry
    }
}

// ------------------------------- Tests ------------------------------------ //
