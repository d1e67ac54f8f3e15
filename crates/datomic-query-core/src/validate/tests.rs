use super::*;
use crate::{
    builder::{find, pull_many, pull_one},
    document::{AttrSpec, BindingForm, FnCall, RecursionLimit, WhereClause},
    value::{Value, instant, keyword, rule},
};

fn issues(document: &QueryDocument) -> VisitorIssues {
    match validate(document) {
        Err(ValidateError::ValidationFailed(issues)) => issues,
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn end_to_end_document_is_valid() {
    let doc = find(["?e", "?name"])
        .where_([("?e", "user/id")])
        .in_(["$", "?name"])
        .build();

    validate(&doc).unwrap();
}

#[test]
fn rich_documents_are_valid() {
    let doc = find(["?e", "?name", "?out", "(count ?e)"])
        .keys(["e", "name", "out", "total"])
        .in_([
            BindingForm::scalar("$"),
            BindingForm::scalar("%"),
            BindingForm::collection("?ids"),
            BindingForm::tuple(["?a", "_"]),
            BindingForm::relation(["?x", "?y"]),
        ])
        .where_([
            WhereClause::from(("?e", "user/id", "?ids")),
            WhereClause::from(("$", "?e", ":user/name", "?name")),
            WhereClause::from(("?e", keyword("user/active"), true, "?tx", true)),
            FnCall::new("<").arg(instant("2020-01-01")).arg("?tx").into(),
            FnCall::new("str").arg("?name").bind("?out"),
        ])
        .where_([rule("user-rule", [Value::from("?e"), Value::from(500)])])
        .build_with([Value::from(["1", "2"])]);

    validate(&doc).unwrap();
}

#[test]
fn pull_documents_are_valid() {
    let doc = pull_many(
        "?e",
        [
            AttrSpec::Wildcard,
            AttrSpec::alias("user/name", "name"),
            AttrSpec::limit("user/friends", 10),
            AttrSpec::with_default("user/age", 0),
            AttrSpec::nested("user/address", ["address/city"]),
            AttrSpec::recursive("user/manager", RecursionLimit::Unbounded),
            AttrSpec::keyed("user/roles", ["role/name"]),
        ],
    )
    .where_([("?e", "user/id")])
    .build();

    validate(&doc).unwrap();
}

#[test]
fn every_violation_is_reported_with_its_path() {
    let doc = find(["e"])
        .in_(["name"])
        .where_([WhereClause::pattern([Value::from("?e")])])
        .build();

    let issues = issues(&doc);

    assert_eq!(issues.count(), 3);
    assert_eq!(issues.at("find[0]").len(), 1);
    assert_eq!(issues.at("in[0]").len(), 1);
    assert!(issues.at("where[0]")[0].contains("2 to 5 positions"));
}

#[test]
fn pull_entity_must_be_a_logic_variable() {
    let issues = issues(&pull_one("e", ["*"]).build());

    assert_eq!(
        issues.pairs().collect::<Vec<_>>(),
        vec![("find[0].entity", "expected a logic variable, got `e`")]
    );
}

#[test]
fn nested_pull_paths_are_rendered() {
    let doc = pull_one(
        "?e",
        [
            AttrSpec::from("user/name"),
            AttrSpec::nested("user/friends", ["name"]),
        ],
    )
    .build();

    let issues = issues(&doc);

    assert_eq!(issues.count(), 1);
    assert_eq!(issues.at("find[0].pull[1].user/friends[0]").len(), 1);
}

#[test]
fn option_and_recursion_limits_must_be_positive() {
    let doc = pull_one(
        "?e",
        [
            AttrSpec::limit("user/friends", 0),
            AttrSpec::recursive("user/manager", RecursionLimit::Depth(0)),
        ],
    )
    .build();

    let issues = issues(&doc);

    assert_eq!(issues.at("find[0].pull[0][2]"), ["limit must be positive"]);
    assert_eq!(
        issues.at("find[0].pull[1].user/manager"),
        ["recursion limit must be positive"]
    );
}

#[test]
fn empty_pull_pattern_is_rejected() {
    let issues = issues(&pull_one("?e", Vec::<AttrSpec>::new()).build());

    assert_eq!(issues.at("find[0].pull").len(), 1);
}

#[test]
fn scalar_and_collection_finds_are_valid() {
    let scalar = find(["?name", "."])
        .where_([("?e", "user/name", "?name")])
        .build();
    let collection = find(["?name", "..."])
        .where_([("?e", "user/name", "?name")])
        .build();

    validate(&scalar).unwrap();
    validate(&collection).unwrap();
}

#[test]
fn marker_must_follow_a_single_term() {
    let issues = issues(&find([".", "?e"]).build());

    assert_eq!(issues.count(), 1);
    assert!(issues.at("find[0]")[0].starts_with("cardinality marker `.`"));
}

#[test]
fn marker_after_two_variables_is_rejected() {
    let issues = issues(&find(["?e", "?name", "..."]).build());

    assert_eq!(issues.count(), 1);
    assert!(issues.at("find[2]")[0].starts_with("cardinality marker `...`"));
}

#[test]
fn marker_must_end_find() {
    let doc = QueryDocument::from_json_str(
        r#"{"find": [{"pull": ["*"], "entity": "?e"}, "...", "?x"]}"#,
    )
    .unwrap();

    let issues = issues(&doc);

    assert_eq!(issues.at("find[1]").len(), 1);
}

#[test]
fn empty_find_is_rejected() {
    let doc = QueryDocument::new(Vec::new());

    assert_eq!(
        issues(&doc).at("find"),
        ["find must contain at least one term"]
    );
}

#[test]
fn keys_must_align_with_find() {
    let doc = find(["?e", "?name"]).keys(["e"]).build();

    assert_eq!(
        issues(&doc).at("keys"),
        ["expected 2 keys to align with find, got 1"]
    );
}

#[test]
fn duplicate_keys_are_rejected() {
    let doc = find(["?e", "?name"]).keys(["e", "e"]).build();

    assert_eq!(issues(&doc).at("keys"), ["duplicate key `e`"]);
}

#[test]
fn args_must_not_exceed_inputs() {
    let doc = find(["?e"]).in_(["?x"]).build_with(["a", "b"]);

    assert_eq!(
        issues(&doc).at("args"),
        ["2 args supplied for 1 input bindings"]
    );
}

#[test]
fn binding_form_elements_are_checked() {
    let doc = find(["?e"])
        .in_([
            BindingForm::collection("ids"),
            BindingForm::relation(["?a", "b"]),
            BindingForm::tuple(Vec::<String>::new()),
        ])
        .build();

    let issues = issues(&doc);

    assert_eq!(issues.at("in[0][0]").len(), 1);
    assert_eq!(issues.at("in[1][0][1]").len(), 1);
    assert_eq!(
        issues.at("in[2]"),
        ["binding must name at least one variable"]
    );
}

#[test]
fn function_binding_is_checked_in_place() {
    let doc = find(["?e"])
        .where_([FnCall::new("f").arg("?e").bind("out")])
        .build();

    assert_eq!(issues(&doc).at("where[0][1]").len(), 1);
}

#[test]
fn pattern_positions_are_checked() {
    let doc = find(["?e"])
        .where_([
            WhereClause::from(("?e", "id")),
            WhereClause::from(("?e", "user/id", "?v", true)),
            WhereClause::from(("?e", "user/id", "?v", "?tx", "added")),
        ])
        .build();

    let issues = issues(&doc);

    assert_eq!(issues.count(), 3);
    assert_eq!(issues.at("where[0][1]").len(), 1);
    assert_eq!(issues.at("where[1][3]").len(), 1);
    assert_eq!(issues.at("where[2][4]").len(), 1);
}

#[test]
fn empty_names_are_rejected() {
    let doc = find(["?e"])
        .where_([
            WhereClause::Predicate(FnCall::new("")),
            WhereClause::from(rule("", Vec::<Value>::new())),
        ])
        .build();

    let issues = issues(&doc);

    assert_eq!(
        issues.at("where[0][0][0]"),
        ["function name must not be empty"]
    );
    assert_eq!(issues.at("where[1]"), ["rule name must not be empty"]);
}

#[test]
fn validate_json_decodes_then_checks() {
    let doc = validate_json(r#"{"find": ["?e"], "where": [["?e", "user/id"]]}"#).unwrap();
    assert_eq!(doc, find(["?e"]).where_([("?e", "user/id")]).build());

    assert!(matches!(
        validate_json(r#"{"where": []}"#),
        Err(ValidateError::Decode(_))
    ));
    assert!(matches!(
        validate_json(r#"{"find": ["e"]}"#),
        Err(ValidateError::ValidationFailed(_))
    ));
}

#[test]
fn builder_validate_delegates() {
    assert!(find(["?e"]).validate().is_ok());
    assert!(pull_one("e", ["*"]).validate().is_err());
}

#[test]
fn display_lists_one_issue_per_line() {
    let err = validate(&find(["e", "x"]).build()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "validation failed:\n\
         find[0]: expected a logic variable or aggregate, got `e`\n\
         find[1]: expected a logic variable or aggregate, got `x`"
    );
}

#[test]
fn tuple_elements_sit_directly_under_the_binding() {
    let doc = find(["?e"]).in_([BindingForm::tuple(["?a", "b"])]).build();

    assert_eq!(
        issues(&doc).pairs().collect::<Vec<_>>(),
        vec![("in[0][1]", "expected a logic variable or `_`, got `b`")]
    );
}

#[test]
fn decoded_paths_point_into_the_wire_document() {
    let relation = QueryDocument::from_json_str(r#"{"find":["?e"],"in":[[["?a","b"]]]}"#).unwrap();
    let relation_paths: Vec<_> = issues(&relation)
        .pairs()
        .map(|(path, _)| path.to_string())
        .collect();
    assert_eq!(relation_paths, ["in[0][0][1]"]);

    let predicate = QueryDocument::from_json_str(r#"{"find":["?e"],"where":[[[""]]]}"#).unwrap();
    let predicate_paths: Vec<_> = issues(&predicate)
        .pairs()
        .map(|(path, _)| path.to_string())
        .collect();
    assert_eq!(predicate_paths, ["where[0][0][0]"]);
}

#[test]
fn function_clause_name_and_binding_paths() {
    let doc = find(["?e"])
        .where_([FnCall::new("")
            .arg("?e")
            .bind(BindingForm::relation(["?a", "x"]))])
        .build();

    let issues = issues(&doc);

    assert_eq!(issues.count(), 2);
    assert_eq!(issues.at("where[0][0][0]"), ["function name must not be empty"]);
    assert_eq!(issues.at("where[0][1][0][1]").len(), 1);
}
