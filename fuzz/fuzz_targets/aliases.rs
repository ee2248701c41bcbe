#![no_main]

use libfuzzer_sys::fuzz_target;

// Biases inputs toward anchors and aliases, including ones that may point at
// their own enclosing node. Conversion must terminate without panicking.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);

    let plain = format!("a: &A {s}\nb: *A\nseq: &S [1, *A]\nseq_alias: [*S, *S]\n");
    let nested = format!("root: &R\n  child: {s}\n  again: *R\n");

    let _ = mapslice::yaml_to_json(plain.as_bytes());
    let _ = mapslice::yaml_to_json(nested.as_bytes());
});
