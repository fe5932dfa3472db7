//! End-to-end exercise: encode a query's variables, then decode a canned
//! response, printing both sides. Run with RUST_LOG=trace to watch the walk
//! skip untyped positions.

use serde_json::{Value, json};

use scalar_exchange::{
    Operation, OperationResult, ScalarExchange, ScalarLocations, ScalarRegistry, TypeTable,
    VariableDef, codecs,
};

fn main() {
    env_logger::init();

    // 1) registration input, as the codegen step would emit it
    let locations = ScalarLocations::from_json(
        r#"{
            "scalars": ["DateTime", "Long"],
            "inputObjectFieldTypes": {
                "EventFilter": { "after": "DateTime", "before": "DateTime" }
            },
            "outputObjectFieldTypes": {
                "Event": { "startedAt": "DateTime", "attendeeCount": "Long" },
                "Venue": { "bookedUntil": "DateTime" }
            },
            "operationMap": { "events": "Event", "search": ["Event", "Venue"] }
        }"#,
    )
    .expect("locations document parses");

    let registry = ScalarRegistry::new()
        .with("DateTime", codecs::datetime::encode, codecs::datetime::decode)
        .with("Long", codecs::long::encode, codecs::long::decode);
    let exchange = ScalarExchange::new(TypeTable::from_locations(&locations), registry);

    // 2) outgoing request: epoch-millisecond arguments become RFC 3339 text
    let mut op = Operation {
        kind: "query".into(),
        declared_variables: vec![VariableDef {
            name: "filter".into(),
            of_type: json!({ "kind": "NamedType", "name": { "kind": "Name", "value": "EventFilter" } }),
        }],
        variables: match json!({
            "filter": { "after": 1704067200000i64, "before": 1706745600000i64 }
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        },
    };
    exchange.encode_request(&mut op).expect("encode");
    println!(
        "encoded variables:\n{}",
        serde_json::to_string_pretty(&op.variables).unwrap()
    );

    // 3) incoming response: wire strings become numbers again
    let mut result = OperationResult {
        operation_kind: "query".into(),
        data: Some(
            match json!({
                "events": [{
                    "__typename": "Event",
                    "startedAt": "2024-01-01T00:00:00.000Z",
                    "attendeeCount": "9007199254740993",
                    "title": "launch"
                }],
                "search": [
                    { "__typename": "Venue", "bookedUntil": "2024-02-01T00:00:00.000Z" },
                    { "__typename": "Event", "startedAt": "2024-03-05T12:30:00.000Z", "attendeeCount": "12" }
                ]
            }) {
                Value::Object(m) => m,
                _ => unreachable!(),
            },
        ),
    };
    exchange.decode_response(&mut result).expect("decode");
    println!(
        "decoded data:\n{}",
        serde_json::to_string_pretty(result.data.as_ref().unwrap()).unwrap()
    );
}
