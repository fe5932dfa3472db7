use thiserror::Error;

use crate::types::Direction;

#[derive(Debug, Error)]
pub enum Error {
    /// A declared variable's type descriptor has a shape outside
    /// named/list/non-null. Schema and request were built from different
    /// worlds; never swallowed.
    #[error("unsupported variable type descriptor: {descriptor}")]
    UnsupportedTypeDescriptor { descriptor: String },

    /// The table names a scalar the registry never learned about. A
    /// configuration defect, not a per-value condition; the transform fails
    /// rather than silently applying a no-op where a codec was expected.
    #[error("no codec registered for scalar type `{name}`")]
    UnknownScalarCodec { name: String },

    /// A registered codec rejected the value it was handed.
    #[error("codec for `{scalar}` failed during {direction}")]
    Codec {
        scalar: String,
        direction: Direction,
        #[source]
        source: anyhow::Error,
    },
}
