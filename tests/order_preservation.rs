use indoc::indoc;
use mapslice::{Document, Error, Value, yaml_to_document, yaml_to_json};

const PETSTORE: &str = indoc! {"
    swagger: '2.0'
    info:
      version: 1.0.0
      title: Swagger Petstore
      license:
        name: MIT
    host: petstore.swagger.io
    paths:
      /pets:
        get:
          summary: List all pets
          operationId: listPets
          tags:
            - pets
          parameters:
            - name: limit
              in: query
              required: false
              type: integer
              format: int32
          responses:
            '200':
              description: An paged array of pets
            default:
              description: unexpected error
"};

fn keys(doc: &Document) -> Vec<&str> {
    doc.keys().collect()
}

#[test]
fn key_order_is_kept_at_every_level() {
    let doc = yaml_to_document(PETSTORE.as_bytes()).unwrap();
    assert_eq!(keys(&doc), ["swagger", "info", "host", "paths"]);

    let info = doc.get("info").and_then(Value::as_document).unwrap();
    assert_eq!(keys(info), ["version", "title", "license"]);

    let get = doc
        .get("paths")
        .and_then(Value::as_document)
        .and_then(|p| p.get("/pets"))
        .and_then(Value::as_document)
        .and_then(|p| p.get("get"))
        .and_then(Value::as_document)
        .unwrap();
    assert_eq!(
        keys(get),
        ["summary", "operationId", "tags", "parameters", "responses"]
    );

    let param = get.get("parameters").and_then(Value::as_list).unwrap()[0]
        .as_document()
        .unwrap();
    assert_eq!(keys(param), ["name", "in", "required", "type", "format"]);

    let responses = get.get("responses").and_then(Value::as_document).unwrap();
    assert_eq!(keys(responses), ["200", "default"]);
}

#[test]
fn json_output_follows_source_order() {
    let json = yaml_to_json(PETSTORE.as_bytes()).unwrap();
    let text = String::from_utf8(json).unwrap();
    let swagger = text.find("\"swagger\"").unwrap();
    let info = text.find("\"info\"").unwrap();
    let paths = text.find("\"paths\"").unwrap();
    assert!(swagger < info && info < paths, "{text}");
    assert!(text.contains(r#""version":"1.0.0""#), "{text}");
    assert!(text.contains(r#""required":false"#), "{text}");
}

#[test]
fn json_round_trip_keeps_order_and_types() {
    let doc = yaml_to_document(PETSTORE.as_bytes()).unwrap();
    let again = Document::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(again, doc);
}

#[test]
fn duplicate_keys_are_preserved_in_order() {
    let doc = yaml_to_document(b"a: 1\nb: x\na: 2\n").unwrap();
    assert_eq!(keys(&doc), ["a", "b", "a"]);
    assert_eq!(
        doc.get_all("a").collect::<Vec<_>>(),
        [&Value::Int(1), &Value::Int(2)]
    );
    assert_eq!(yaml_to_json(b"a: 1\na: 2\n").unwrap(), br#"{"a":1,"a":2}"#);
}

#[test]
fn empty_containers_encode_as_empty_json() {
    let json = yaml_to_json(b"list: []\nmap: {}\nnothing:\n").unwrap();
    assert_eq!(json, br#"{"list":[],"map":{},"nothing":null}"#);
}

#[test]
fn non_object_roots_are_structural_errors() {
    for input in ["- a\n- b\n", "just text\n", "", "# only a comment\n"] {
        let err = yaml_to_document(input.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }), "{input:?}: {err}");
    }
}

#[test]
fn only_the_first_document_is_converted() {
    let json = yaml_to_json(b"---\na: 1\n---\nb: 2\n").unwrap();
    assert_eq!(json, br#"{"a":1}"#);
}

#[test]
fn syntax_errors_report_a_location() {
    let err = yaml_to_document(b"a: 1\nb: [unterminated\n").unwrap_err();
    assert!(matches!(err, Error::Scan { .. }), "{err:?}");
    let location = err.location().expect("location");
    assert!(location.line() >= 2, "{location:?}");
    assert!(err.to_string().contains("at line"), "{err}");
}
