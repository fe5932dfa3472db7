//! Recursive rewrite of custom scalar positions in a JSON value tree.
//!
//! The walk is a pure function of (value, type reference, direction): it
//! borrows its input and returns `Cow::Borrowed` whenever no descendant
//! changed, rebuilding only the path from each changed leaf up to the root.
//! Positions it cannot resolve a type for pass through untouched; that is
//! degraded operation, not a failure.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::error::Error;
use crate::registry::ScalarRegistry;
use crate::table::TypeTable;
use crate::types::{Direction, TypeRef};

/// Rewrite every reachable scalar position under `value`, treating `type_ref`
/// as the type governing this position.
pub fn transform<'v>(
    value: &'v Value,
    type_ref: &TypeRef,
    direction: Direction,
    table: &TypeTable,
    registry: &ScalarRegistry,
) -> Result<Cow<'v, Value>, Error> {
    match value {
        // no data beyond this point
        Value::Null => Ok(Cow::Borrowed(value)),

        // arrays are transparent: the declared type applies to every element,
        // and tagged elements re-resolve it individually on descent
        Value::Array(items) => {
            let mut changed: Vec<(usize, Value)> = Vec::new();
            for (i, item) in items.iter().enumerate() {
                if let Cow::Owned(new) = transform(item, type_ref, direction, table, registry)? {
                    changed.push((i, new));
                }
            }
            if changed.is_empty() {
                return Ok(Cow::Borrowed(value));
            }
            let mut rebuilt = items.clone();
            for (i, new) in changed {
                rebuilt[i] = new;
            }
            Ok(Cow::Owned(Value::Array(rebuilt)))
        }

        Value::Object(record) => {
            let effective = resolve_effective(type_ref, value, table.type_tag());
            if let TypeRef::Scalar(name) = &effective {
                // a custom scalar whose in-memory form is an object
                return registry.apply(name, direction, value).map(Cow::Owned);
            }
            descend_record(value, record, &effective, direction, table, registry)
        }

        _ => match type_ref {
            TypeRef::Scalar(name) => registry.apply(name, direction, value).map(Cow::Owned),
            _ => Ok(Cow::Borrowed(value)),
        },
    }
}

/// Pin down the type actually governing `value` when the declared reference
/// alone cannot: a candidate set collapses to the member named by the value's
/// discriminator, an unknown position adopts whatever the discriminator says.
/// Pure in (declared, value); everything else stays as declared.
fn resolve_effective(declared: &TypeRef, value: &Value, tag_field: &str) -> TypeRef {
    match declared {
        TypeRef::OneOf(names) => match runtime_tag(value, tag_field) {
            Some(tag) if names.iter().any(|n| n.as_str() == tag) => {
                TypeRef::Object(tag.to_string())
            }
            _ => declared.clone(),
        },
        TypeRef::Unknown => match runtime_tag(value, tag_field) {
            Some(tag) => TypeRef::Object(tag.to_string()),
            None => TypeRef::Unknown,
        },
        _ => declared.clone(),
    }
}

fn runtime_tag<'v>(value: &'v Value, tag_field: &str) -> Option<&'v str> {
    value.as_object()?.get(tag_field)?.as_str()
}

/// Fallback for a field the static map knows nothing about: consult the
/// field's own value. A tagged record descends as that type; an array whose
/// first element carries a tag descends as unknown so each element resolves
/// its own tag. Anything else stays untyped and passes through.
pub(crate) fn tag_fallback(value: &Value, tag_field: &str) -> Option<TypeRef> {
    match value {
        Value::Object(_) => runtime_tag(value, tag_field).map(|t| TypeRef::Object(t.to_string())),
        Value::Array(items) => items
            .first()
            .and_then(|el| runtime_tag(el, tag_field))
            .map(|_| TypeRef::Unknown),
        _ => None,
    }
}

fn descend_record<'v>(
    value: &'v Value,
    record: &'v Map<String, Value>,
    effective: &TypeRef,
    direction: Direction,
    table: &TypeTable,
    registry: &ScalarRegistry,
) -> Result<Cow<'v, Value>, Error> {
    let fields = table.field_types_of(direction, effective);

    let mut changed: Vec<(String, Value)> = Vec::new();
    for (name, field_value) in record {
        if field_value.is_null() {
            continue;
        }
        let field_ref = match fields.get(name) {
            Some(r) => r.clone(),
            None => match tag_fallback(field_value, table.type_tag()) {
                Some(r) => r,
                None => {
                    log::trace!("no type for field `{name}`, passing through");
                    continue;
                }
            },
        };
        if let Cow::Owned(new) = transform(field_value, &field_ref, direction, table, registry)? {
            changed.push((name.clone(), new));
        }
    }

    if changed.is_empty() {
        return Ok(Cow::Borrowed(value));
    }
    // shallow copy, overwriting only the entries that actually changed
    let mut rebuilt = record.clone();
    for (name, new) in changed {
        rebuilt.insert(name, new);
    }
    Ok(Cow::Owned(Value::Object(rebuilt)))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;
    use serde_json::json;

    use super::*;
    use crate::locations::ScalarLocations;

    static TABLE: Lazy<TypeTable> = Lazy::new(|| {
        let locations: ScalarLocations = serde_json::from_value(json!({
            "scalars": ["DateTime", "Long"],
            "inputObjectFieldTypes": {
                "EventFilter": { "after": "DateTime", "nested": "EventFilter" }
            },
            "outputObjectFieldTypes": {
                "Event": { "startedAt": "DateTime", "venue": "Venue" },
                "Venue": { "bookedUntil": "DateTime" }
            },
            "operationMap": { "events": "Event" }
        }))
        .unwrap();
        TypeTable::from_locations(&locations)
    });

    fn registry() -> &'static ScalarRegistry {
        ScalarRegistry::builtin()
    }

    const MS: i64 = 1704067200000; // 2024-01-01T00:00:00Z
    const ISO: &str = "2024-01-01T00:00:00.000Z";

    #[test]
    fn null_short_circuits_any_type() {
        let out = transform(
            &Value::Null,
            &TypeRef::Scalar("DateTime".into()),
            Direction::Encode,
            &TABLE,
            registry(),
        )
        .unwrap();
        assert!(matches!(out, Cow::Borrowed(Value::Null)));
    }

    #[test]
    fn identity_when_no_types_match() {
        let empty = TypeTable::from_locations(&ScalarLocations::default());
        let tree = json!({ "a": [1, {"b": "x"}], "c": null });
        let out = transform(
            &tree,
            &TypeRef::Object("Anything".into()),
            Direction::Decode,
            &empty,
            registry(),
        )
        .unwrap();
        assert!(matches!(out, Cow::Borrowed(_)), "untouched trees are shared, not copied");
        assert_eq!(*out, tree);
    }

    #[test]
    fn scalar_round_trip_law() {
        let original = json!(MS);
        let scalar = TypeRef::Scalar("DateTime".into());
        let wire =
            transform(&original, &scalar, Direction::Encode, &TABLE, registry()).unwrap();
        let back =
            transform(&wire, &scalar, Direction::Decode, &TABLE, registry()).unwrap();
        assert_eq!(*back, original);
    }

    #[test]
    fn arrays_are_transparent_under_a_scalar_ref() {
        let input = json!([MS, 0]);
        let out = transform(
            &input,
            &TypeRef::Scalar("DateTime".into()),
            Direction::Encode,
            &TABLE,
            registry(),
        )
        .unwrap();
        assert_eq!(*out, json!([ISO, "1970-01-01T00:00:00.000Z"]));
    }

    #[test]
    fn encode_walk_rewrites_argument_fields() {
        let filter = json!({ "after": MS, "keyword": "launch" });
        let out = transform(
            &filter,
            &TypeRef::Object("EventFilter".into()),
            Direction::Encode,
            &TABLE,
            registry(),
        )
        .unwrap();
        assert_eq!(*out, json!({ "after": ISO, "keyword": "launch" }));
    }

    #[test]
    fn decode_walk_descends_nested_object_types() {
        let data = json!({
            "startedAt": ISO,
            "title": "x",
            "venue": { "bookedUntil": ISO, "name": "hall" }
        });
        let out = transform(
            &data,
            &TypeRef::Object("Event".into()),
            Direction::Decode,
            &TABLE,
            registry(),
        )
        .unwrap();
        assert_eq!(
            *out,
            json!({
                "startedAt": MS,
                "title": "x",
                "venue": { "bookedUntil": MS, "name": "hall" }
            })
        );
    }

    #[test]
    fn nested_copy_on_write_rebuilds_the_changed_path_only() {
        let filter = json!({ "nested": { "after": MS }, "note": "keep" });
        let out = transform(
            &filter,
            &TypeRef::Object("EventFilter".into()),
            Direction::Encode,
            &TABLE,
            registry(),
        )
        .unwrap();
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(*out, json!({ "nested": { "after": ISO }, "note": "keep" }));
        // the original is untouched
        assert_eq!(filter["nested"]["after"], json!(MS));
    }

    #[test]
    fn null_fields_never_reach_a_codec() {
        let filter = json!({ "after": null });
        let out = transform(
            &filter,
            &TypeRef::Object("EventFilter".into()),
            Direction::Encode,
            &TABLE,
            registry(),
        )
        .unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn unresolved_fields_pass_through_while_siblings_transform() {
        let data = json!({
            "startedAt": ISO,
            "mystery": { "weird": true, "deep": [1, 2] }
        });
        let out = transform(
            &data,
            &TypeRef::Object("Event".into()),
            Direction::Decode,
            &TABLE,
            registry(),
        )
        .unwrap()
        .into_owned();
        assert_eq!(out["startedAt"], json!(MS));
        assert_eq!(out["mystery"], data["mystery"]);
    }

    #[test]
    fn interface_array_resolves_each_element_by_its_tag() {
        let feed = json!([
            { "__typename": "Event", "startedAt": ISO },
            { "__typename": "Venue", "bookedUntil": ISO }
        ]);
        let out = transform(&feed, &TypeRef::Unknown, Direction::Decode, &TABLE, registry())
            .unwrap()
            .into_owned();
        assert_eq!(out[0]["startedAt"], json!(MS));
        assert_eq!(out[1]["bookedUntil"], json!(MS));
    }

    #[test]
    fn untagged_union_position_merges_member_field_maps() {
        let one_of = TypeRef::OneOf(vec!["Event".into(), "Venue".into()]);
        let record = json!({ "startedAt": ISO, "bookedUntil": ISO });
        let out =
            transform(&record, &one_of, Direction::Decode, &TABLE, registry()).unwrap();
        assert_eq!(*out, json!({ "startedAt": MS, "bookedUntil": MS }));
    }

    #[test]
    fn tagged_record_narrows_a_union_to_one_member() {
        let one_of = TypeRef::OneOf(vec!["Event".into(), "Venue".into()]);
        let record = json!({ "__typename": "Venue", "bookedUntil": ISO, "startedAt": ISO });
        let out = transform(&record, &one_of, Direction::Decode, &TABLE, registry())
            .unwrap()
            .into_owned();
        assert_eq!(out["bookedUntil"], json!(MS));
        // startedAt belongs to Event, not Venue: untouched once narrowed
        assert_eq!(out["startedAt"], json!(ISO));
    }

    #[test]
    fn table_registry_disagreement_fails_the_transform() {
        let locations: ScalarLocations = serde_json::from_value(json!({
            "scalars": ["Missing"],
            "inputObjectFieldTypes": { "Args": { "x": "Missing" } }
        }))
        .unwrap();
        let table = TypeTable::from_locations(&locations);
        let err = transform(
            &json!({ "x": 1 }),
            &TypeRef::Object("Args".into()),
            Direction::Encode,
            &table,
            &ScalarRegistry::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownScalarCodec { name } if name == "Missing"));
    }

    #[test]
    fn codec_rejection_propagates_out_of_the_walk() {
        let err = transform(
            &json!({ "after": "not a number" }),
            &TypeRef::Object("EventFilter".into()),
            Direction::Encode,
            &TABLE,
            registry(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Codec { scalar, .. } if scalar == "DateTime"));
    }
}
