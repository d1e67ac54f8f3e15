use chrono::{TimeZone, Utc};
use datomic_query_core::{
    datomic,
    document::{AttrSpec, BindingForm, QueryDocument, RecursionLimit},
    validate::validate,
    value::Value,
};
use serde_json::json;

fn wire(doc: &QueryDocument) -> String {
    doc.to_json_string().unwrap()
}

#[test]
fn end_to_end_find_serializes_in_wire_order() {
    let doc = datomic::find(["?e", "?name"])
        .where_([("?e", "user/id")])
        .in_(["$", "?name"])
        .build();

    assert_eq!(
        wire(&doc),
        r#"{"find":["?e","?name"],"in":["$","?name"],"where":[["?e","user/id"]]}"#
    );
    validate(&doc).unwrap();
}

#[test]
fn build_args_never_leak_between_calls() {
    let builder = datomic::find(["?e"]);

    assert_eq!(wire(&builder.build_with(["a"])), r#"{"find":["?e"],"args":["a"]}"#);
    assert_eq!(wire(&builder.build_with(["b"])), r#"{"find":["?e"],"args":["b"]}"#);
    assert_eq!(wire(&builder.build()), r#"{"find":["?e"]}"#);
}

#[test]
fn pull_shapes() {
    assert_eq!(
        wire(&datomic::pull_one("?e", ["*"]).build()),
        r#"{"find":[{"pull":["*"],"entity":"?e"},"."]}"#
    );
    assert_eq!(
        wire(&datomic::pull_many("?e", ["*"]).build()),
        r#"{"find":[{"pull":["*"],"entity":"?e"},"..."]}"#
    );
}

#[test]
fn complex_values_are_tagged() {
    let date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

    assert_eq!(
        serde_json::to_value(datomic::uuid("9252e453-4439-4681-8baf-3a800f98c739")).unwrap(),
        json!({ "type": "uuid", "value": "9252e453-4439-4681-8baf-3a800f98c739" })
    );
    assert_eq!(
        serde_json::to_value(datomic::instant(date)).unwrap(),
        json!({ "type": "instant", "value": "2020-01-01T00:00:00.000Z" })
    );
    assert_eq!(
        datomic::instant("2020-01-01T00:00:00.000Z").as_str(),
        "2020-01-01T00:00:00.000Z"
    );
    assert_eq!(datomic::bytes([0u8, 255, 16]).as_str(), "00ff10");
}

#[test]
fn rule_usage_is_one_where_entry() {
    let doc = datomic::find(["?e"])
        .where_([datomic::rule(
            "user-rule",
            [Value::from("?e"), Value::from(500), Value::from("?userId")],
        )])
        .build();

    assert_eq!(
        wire(&doc),
        r#"{"find":["?e"],"where":[{"type":"rule","value":["user-rule","?e",500,"?userId"]}]}"#
    );
}

#[test]
fn documents_round_trip_through_the_wire() {
    let doc = datomic::pull_many(
        "?e",
        [
            AttrSpec::from("user/name"),
            AttrSpec::alias("user/email", "email"),
            AttrSpec::nested(
                "user/friends",
                [
                    AttrSpec::from("user/name"),
                    AttrSpec::recursive("user/friends", RecursionLimit::Depth(2)),
                ],
            ),
        ],
    )
    .in_([BindingForm::scalar("$"), BindingForm::collection("?ids")])
    .where_([("?e", "user/id", "?ids")])
    .build_with([Value::from(["a", "b"])]);

    let decoded = QueryDocument::from_json_str(&wire(&doc)).unwrap();

    assert_eq!(decoded, doc);
    validate(&decoded).unwrap();
}

#[test]
fn hand_written_documents_decode() {
    let doc = QueryDocument::from_json(json!({
        "find": ["?e", "?name", "?output"],
        "in": ["$", ["?a", "_"], [["?x", "?y"]]],
        "where": [
            ["?e", "user/name", "?name"],
            [["<", { "type": "instant", "value": "2020-01-01" }, "?t"]],
            [["a-clojure-function", "?name"], "?output"],
            { "type": "rule", "value": ["user-rule", "?e"] }
        ],
        "args": [["user/id", "1234"]]
    }))
    .unwrap();

    assert_eq!(doc.clauses.as_ref().map(Vec::len), Some(4));
    validate(&doc).unwrap();
}
