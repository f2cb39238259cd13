#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ssl_pkey::KeySpecBuilder;

#[derive(Arbitrary, Debug)]
struct OptionBundleFuzzInput {
    options: Vec<(String, String)>,
    json: String,
}

fuzz_target!(|input: OptionBundleFuzzInput| {
    // Parsing must never panic, whatever the bundle holds
    if let Ok(builder) = KeySpecBuilder::from_options(input.options) {
        if let Ok(spec) = builder.build() {
            assert!(!spec.path().as_os_str().is_empty());
        }
    }

    if let Ok(builder) = KeySpecBuilder::from_json(&input.json) {
        let _ = builder.build();
    }
});
