use super::*;
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use num_bigint::BigInt;
use serde_json::json;
use std::time::{Duration, SystemTime};

#[test]
fn uuid_passes_value_through() {
    let value = uuid("9252e453-4439-4681-8baf-3a800f98c739");

    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({ "type": "uuid", "value": "9252e453-4439-4681-8baf-3a800f98c739" })
    );
}

#[test]
fn uuid_is_not_validated() {
    assert_eq!(uuid("not-a-uuid").as_str(), "not-a-uuid");
}

#[test]
fn keyword_and_symbol_are_tagged() {
    assert_eq!(
        serde_json::to_value(keyword("db/ident")).unwrap(),
        json!({ "type": "keyword", "value": "db/ident" })
    );
    assert_eq!(
        serde_json::to_value(symbol("my-fn")).unwrap(),
        json!({ "type": "symbol", "value": "my-fn" })
    );
}

#[test]
fn instant_from_date_is_utc_millis() {
    let date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

    assert_eq!(
        instant(date),
        ComplexValue::Instant("2020-01-01T00:00:00.000Z".to_string())
    );
}

#[test]
fn instant_normalizes_offsets_to_utc() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let date = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_milli_opt(2, 30, 0, 250)
        .unwrap()
        .and_local_timezone(offset)
        .unwrap();

    assert_eq!(instant(date).as_str(), "2020-01-01T00:30:00.250Z");
}

#[test]
fn instant_from_system_time() {
    let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_577_836_800_123);

    assert_eq!(instant(time).as_str(), "2020-01-01T00:00:00.123Z");
}

#[test]
fn instant_string_is_unchanged() {
    assert_eq!(instant("2020-01-01").as_str(), "2020-01-01");
    assert_eq!(
        instant(String::from("2020-01-01T00:00:00.000Z")).as_str(),
        "2020-01-01T00:00:00.000Z"
    );
}

#[test]
fn bigint_uses_decimal_string() {
    assert_eq!(bigint(42).as_str(), "42");
    assert_eq!(bigint(-7_i64).as_str(), "-7");
    assert_eq!(bigint(u128::MAX).as_str(), u128::MAX.to_string());

    let huge: BigInt = "123456789012345678901234567890".parse().unwrap();
    assert_eq!(bigint(huge).as_str(), "123456789012345678901234567890");
    assert_eq!(bigint("99").kind(), "bigint");
}

#[test]
fn bigdec_uses_string_form() {
    assert_eq!(bigdec(1.5).as_str(), "1.5");
    assert_eq!(bigdec("3.14159").as_str(), "3.14159");
}

#[test]
fn uri_passes_through() {
    assert_eq!(
        uri("https://example.com/a?b=c"),
        ComplexValue::Uri("https://example.com/a?b=c".to_string())
    );
}

#[test]
fn bytes_encode_as_lowercase_hex_pairs() {
    assert_eq!(bytes([0u8, 255, 16]).as_str(), "00ff10");
    assert_eq!(bytes(vec![0xAB, 0x01]).as_str(), "ab01");
    assert_eq!(bytes(b"").as_str(), "");
}

#[test]
fn complex_values_compare_structurally() {
    assert_eq!(uuid("a"), uuid("a"));
    assert_ne!(uuid("a"), uri("a"));
    assert_ne!(keyword("a"), keyword("b"));
}

#[test]
fn rule_usage_serializes_name_then_args() {
    let usage = rule(
        "user-rule",
        [Value::from("?e"), Value::from(500), Value::from("?userId")],
    );

    assert_eq!(
        serde_json::to_value(&usage).unwrap(),
        json!({ "type": "rule", "value": ["user-rule", "?e", 500, "?userId"] })
    );
}

#[test]
fn rule_usage_decodes_from_wire() {
    let usage: RuleUsage =
        serde_json::from_value(json!({ "type": "rule", "value": ["r", "?e", true] })).unwrap();

    assert_eq!(usage.name(), "r");
    assert_eq!(usage.args(), &[Value::from("?e"), Value::Bool(true)]);
}

#[test]
fn rule_usage_rejects_other_tags() {
    let err = serde_json::from_value::<RuleUsage>(json!({ "type": "uuid", "value": ["x"] }))
        .unwrap_err();

    assert!(err.to_string().contains("expected type 'rule'"));
}

#[test]
fn value_decodes_nested_literals() {
    let value: Value = serde_json::from_value(json!([
        "user/id",
        1234,
        1.5,
        false,
        { "type": "instant", "value": "2020-01-01" },
        ["a", ["b"]]
    ]))
    .unwrap();

    assert_eq!(
        value,
        Value::List(vec![
            Value::from("user/id"),
            Value::Int(1234),
            Value::Float(1.5),
            Value::Bool(false),
            Value::Complex(instant("2020-01-01")),
            Value::List(vec![Value::from("a"), Value::from(["b"])]),
        ])
    );
}

#[test]
fn logic_var_detection() {
    assert!(Value::from("?e").is_logic_var());
    assert!(!Value::from("user/id").is_logic_var());
    assert!(!Value::Int(1).is_logic_var());
}
