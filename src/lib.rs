//! Schema-guided rewrite of custom scalar values in JSON trees.
//!
//! Given a table saying which positions in a value tree hold which named
//! types, and a registry of encode/decode codec pairs, walk the tree and
//! rewrite every custom scalar position: request arguments into wire-safe
//! text before dispatch, result fields back into in-memory form after
//! receipt. Everything else is left exactly as found.
//!
//! Design goals:
//! - No runtime type checker: a static table plus the value's own
//!   discriminator field decide every position.
//! - Inputs are never mutated; rebuilt subtrees are copy-on-write.
//! - Positions that resolve to nothing pass through rather than fail.
//! - Table and registry are built once and shared read-only; any number of
//!   transforms may run against them concurrently.

pub mod codecs;
pub mod error;
pub mod exchange;
pub mod locations;
pub mod registry;
pub mod table;
pub mod types;
pub mod walk;

pub use error::Error;
pub use exchange::{
    Operation, OperationResult, ScalarExchange, VariableDef, decode_result, encode_variables,
    unwrap_named_type,
};
pub use locations::{ScalarLocations, TypeOrTypes};
pub use registry::{Codec, ScalarRegistry};
pub use table::{DEFAULT_TYPE_TAG, TypeTable};
pub use types::{Direction, FieldTypeMap, TypeRef};
pub use walk::transform;
