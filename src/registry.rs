//! Codec registry: scalar type name → encode/decode pair over JSON values.
//!
//! Built once next to the [`TypeTable`](crate::table::TypeTable) and shared
//! read-only for the process lifetime.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::codecs;
use crate::error::Error;
use crate::types::Direction;

pub type CodecFn = Box<dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync>;

/// Both halves of a custom scalar's wire representation.
pub struct Codec {
    pub encode: CodecFn,
    pub decode: CodecFn,
}

#[derive(Default)]
pub struct ScalarRegistry {
    codecs: BTreeMap<String, Codec>,
}

impl ScalarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a codec pair under a scalar type name, replacing any
    /// previous pair for that name.
    pub fn register<E, D>(&mut self, name: impl Into<String>, encode: E, decode: D)
    where
        E: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
        D: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.codecs.insert(
            name.into(),
            Codec { encode: Box::new(encode), decode: Box::new(decode) },
        );
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<E, D>(mut self, name: impl Into<String>, encode: E, decode: D) -> Self
    where
        E: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
        D: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.register(name, encode, decode);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    /// Run the codec registered under `name` in the given direction.
    pub fn apply(&self, name: &str, direction: Direction, value: &Value) -> Result<Value, Error> {
        let codec = self
            .codecs
            .get(name)
            .ok_or_else(|| Error::UnknownScalarCodec { name: name.to_string() })?;
        let run = match direction {
            Direction::Encode => &codec.encode,
            Direction::Decode => &codec.decode,
        };
        run(value).map_err(|source| Error::Codec {
            scalar: name.to_string(),
            direction,
            source,
        })
    }

    /// Registry with the stock codecs under their conventional names.
    pub fn builtin() -> &'static ScalarRegistry {
        static BUILTIN: Lazy<ScalarRegistry> = Lazy::new(|| {
            ScalarRegistry::new()
                .with("DateTime", codecs::datetime::encode, codecs::datetime::decode)
                .with("Long", codecs::long::encode, codecs::long::decode)
        });
        &BUILTIN
    }
}

impl fmt::Debug for ScalarRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarRegistry")
            .field("scalars", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ------------------------------- Tests ------------------------------------ //
