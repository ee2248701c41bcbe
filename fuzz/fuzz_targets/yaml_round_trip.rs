#![no_main]

use libfuzzer_sys::fuzz_target;
use mapslice::{Document, yaml_to_document};

// Any input either fails cleanly or yields a document that survives both the
// JSON and the YAML round trip unchanged.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let Ok(doc) = yaml_to_document(data) else {
        return;
    };

    if let Ok(json) = doc.to_json() {
        let back = Document::from_json(&json).expect("own JSON must decode");
        assert_eq!(back, doc);
    }

    if let Ok(yaml) = doc.to_yaml() {
        if doc.to_json().is_ok() {
            let back = yaml_to_document(yaml.as_bytes()).expect("own YAML must parse");
            assert_eq!(back.to_json().ok(), doc.to_json().ok(), "emitted:\n{yaml}");
        }
    }
});
