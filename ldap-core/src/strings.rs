//! String helpers shared by the name model and the schema objects

/// Trim leading and trailing ASCII spaces, then lowercase ASCII letters
///
/// Attribute type names and OIDs are pure ASCII, so this is all the
/// normalization a type ever needs without a schema.
pub fn trim_lower_ascii(s: &str) -> String {
    s.trim_matches(' ').to_ascii_lowercase()
}

/// Collapse every run of whitespace into one space, trim both ends and lowercase
///
/// # Example
/// `"  John   DOE "` becomes `"john doe"`.
pub fn deep_trim_to_lower(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Render bytes as uppercase hex pairs, without separator
pub fn dump_hex_pairs(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Render bytes as `0xNN ` groups, the debug dump used in toString forms
pub fn dump_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 5);
    for b in bytes {
        out.push_str(&format!("0x{:02X} ", b));
    }
    out
}

/// Value of a single hex digit
pub fn hex_value(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

/// Check if a string is a dotted-decimal numeric OID (`1.2.840.113549`)
pub fn is_numeric_oid(s: &str) -> bool {
    let mut arcs = 0;
    for arc in s.split('.') {
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        // Leading zeros are not allowed except for the single digit 0
        if arc.len() > 1 && arc.starts_with('0') {
            return false;
        }
        arcs += 1;
    }
    arcs >= 2
}
