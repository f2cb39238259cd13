// Curve names are passed to OpenSSL as-is; only spellings it does not know
// as group names are rewritten here.

// NIST and SEC names mapped onto the OpenSSL short names of the same groups
const CURVE_ALIASES: &[(&str, &str)] = &[
    ("P-192", "prime192v1"),
    ("P-224", "secp224r1"),
    ("P-256", "prime256v1"),
    ("P-384", "secp384r1"),
    ("P-521", "secp521r1"),
    ("secp192r1", "prime192v1"),
    ("secp256r1", "prime256v1"),
];

/// The OpenSSL group name for `name`, resolving aliases
pub fn group_name(name: &str) -> &str {
    CURVE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Alias spellings accepted in addition to OpenSSL's own curve names
pub fn aliases() -> impl Iterator<Item = (&'static str, &'static str)> {
    CURVE_ALIASES.iter().copied()
}
