use indoc::indoc;
use mapslice::{
    Document, Error, Loose, NodeKind, ScalarTag, Tree, Value, document_to_tree, json_to_yaml,
    to_tree, to_yaml_string, yaml_to_document,
};

fn root_mapping(tree: &Tree) -> Vec<(String, NodeKind)> {
    let content = tree.document_content().expect("single-child document");
    let NodeKind::Mapping(pairs) = &tree.node(content).kind else {
        panic!("expected mapping root");
    };
    pairs
        .iter()
        .map(|(k, v)| {
            let NodeKind::Scalar { value, .. } = &tree.node(*k).kind else {
                panic!("expected scalar key");
            };
            (value.clone(), tree.node(*v).kind.clone())
        })
        .collect()
}

fn scalar(tag: ScalarTag, value: &str) -> NodeKind {
    NodeKind::Scalar {
        tag,
        value: value.to_owned(),
    }
}

#[test]
fn float_tag_is_rendered_with_a_decimal_point() {
    let doc = yaml_to_document(b"v: !!float 42\n").unwrap();
    let tree = document_to_tree(&doc).unwrap();
    assert_eq!(root_mapping(&tree), [("v".to_owned(), scalar(ScalarTag::Float, "42.0"))]);
    assert_eq!(to_yaml_string(&tree).unwrap(), "v: 42.0\n");
}

#[test]
fn generic_maps_are_sorted_and_documents_are_not() {
    let input: Loose = [
        (Loose::from("zeta"), Loose::from(1)),
        (Loose::from(10), Loose::from(true)),
        (Loose::from("alpha"), Loose::from(2.5)),
    ]
    .into_iter()
    .collect();
    let tree = to_tree(&input).unwrap();
    let keys: Vec<_> = root_mapping(&tree).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["10", "alpha", "zeta"]);

    let doc: Document = [("zeta", 1), ("alpha", 2)].into_iter().collect();
    let tree = to_tree(&Loose::Ordered(doc)).unwrap();
    let keys: Vec<_> = root_mapping(&tree).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["zeta", "alpha"]);
}

#[test]
fn generic_key_collisions_fail() {
    let input = Loose::Map(vec![
        (Loose::from(7), Loose::Null),
        (Loose::from("7"), Loose::Null),
    ]);
    assert!(matches!(to_tree(&input), Err(Error::KeyCollision { key }) if key == "7"));
}

#[test]
fn bytes_are_an_unsupported_type() {
    let input: Loose = [("blob", Loose::Bytes(b"raw".to_vec()))].into_iter().collect();
    let err = to_tree(&input).unwrap_err();
    assert!(matches!(err, Error::UnsupportedValueType { type_name: "bytes" }));
    assert!(err.to_string().contains("bytes"));
}

#[test]
fn yaml_round_trip_through_the_emitter() {
    let source = indoc! {r#"
        openapi: 3.0.0
        info:
          title: "Pets: the API"
          version: "1"
        servers:
          - url: http://example.com
            description: main
          - url: http://localhost
        x-flags: [true, false, null]
        x-numbers:
          int: -7
          float: 0.5
          big: 1.0e+300
        x-empty: {}
        x-none: []
        "42": numeric key kept as text
        x-nested:
          - - a
            - b
          - []
    "#};
    let doc = yaml_to_document(source.as_bytes()).unwrap();
    let emitted = doc.to_yaml().unwrap();
    let again = yaml_to_document(emitted.as_bytes()).unwrap();
    assert_eq!(again, doc, "emitted:\n{emitted}");
}

#[test]
fn strings_that_look_like_other_types_stay_strings() {
    let doc: Document = [
        ("a", "true"),
        ("b", "0.5"),
        ("c", "null"),
        ("d", ""),
        ("e", "2001-12-14"),
        ("f", "- dash"),
        ("g", "line\nbreak"),
    ]
    .into_iter()
    .collect();
    let again = yaml_to_document(doc.to_yaml().unwrap().as_bytes()).unwrap();
    assert_eq!(again, doc);
}

#[test]
fn json_to_yaml_keeps_order() {
    let yaml = json_to_yaml(br#"{"z":{"y":1,"x":[true,"s"]},"a":null}"#).unwrap();
    assert_eq!(
        yaml,
        indoc! {"
            z:
              y: 1
              x:
                - true
                - s
            a: null
        "}
    );
}

#[test]
fn aliases_are_expanded_when_emitting() {
    let tree = mapslice::parse_tree(b"base: &b {k: v}\ncopy: *b\n").unwrap();
    assert_eq!(
        to_yaml_string(&tree).unwrap(),
        indoc! {"
            base:
              k: v
            copy:
              k: v
        "}
    );
}

#[test]
fn values_convert_to_trees() {
    let tree = mapslice::value_to_tree(&Value::List(vec![Value::Uint(u64::MAX)])).unwrap();
    assert_eq!(to_yaml_string(&tree).unwrap(), "- 18446744073709551615\n");
}

#[test]
fn large_unsigned_integers_survive_json_to_yaml_and_back() {
    let doc = Document::from_json(br#"{"id":18446744073709551615,"edge":9223372036854775808}"#)
        .unwrap();
    assert_eq!(doc.get("id"), Some(&Value::Uint(u64::MAX)));

    let yaml = doc.to_yaml().unwrap();
    assert_eq!(yaml, "id: 18446744073709551615\nedge: 9223372036854775808\n");
    let again = yaml_to_document(yaml.as_bytes()).unwrap();
    assert!(matches!(again.get("id"), Some(Value::Uint(u64::MAX))), "{again:?}");
    assert!(matches!(again.get("edge"), Some(Value::Uint(9223372036854775808))), "{again:?}");
    assert_eq!(again.to_json().unwrap(), doc.to_json().unwrap());
}

#[test]
fn document_marker_text_is_quoted() {
    let doc: Document = [
        ("... x", Value::Int(1)),
        ("--- y", Value::Int(2)),
        ("b", Value::from("...")),
        ("c", Value::from("--- z")),
    ]
    .into_iter()
    .collect();
    let yaml = doc.to_yaml().unwrap();
    assert!(yaml.starts_with("\"... x\": 1\n"), "{yaml}");
    let again = yaml_to_document(yaml.as_bytes()).unwrap();
    assert_eq!(again, doc, "emitted:\n{yaml}");
}

#[test]
fn out_of_range_numeric_keys_are_quoted() {
    let doc: Document = [("18446744073709551616", 1), ("18446744073709551615", 2)]
        .into_iter()
        .collect();
    let yaml = doc.to_yaml().unwrap();
    assert_eq!(yaml, "\"18446744073709551616\": 1\n18446744073709551615: 2\n");
    assert_eq!(yaml_to_document(yaml.as_bytes()).unwrap(), doc);
}
