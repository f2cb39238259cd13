#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ssl_pkey::keygen::inspect_pem;
use ssl_pkey::Passphrase;

#[derive(Arbitrary, Debug)]
struct InspectFuzzInput {
    pem: Vec<u8>,
    password: Option<String>,
}

fuzz_target!(|input: InspectFuzzInput| {
    let password = input.password.map(Passphrase::new);
    // Malformed or encrypted input must fail cleanly, never prompt or panic
    let _ = inspect_pem(&input.pem, password.as_ref());
});
