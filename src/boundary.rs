use rand::rngs::OsRng;
use rand::RngCore;

pub const ALPHANUMERIC: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
pub const BOUNDARY_LENGTH: usize = 32;

/// Line width for base64 bodies recommended by RFC 2045.
pub const DEFAULT_LINE_WIDTH: usize = 76;

/// Splits `body` into lines of `width` bytes, each followed by `end`.
///
/// The last line carries the remainder and is terminated too. A line never
/// ends inside a multi-byte character; it is stretched to the next char
/// boundary instead. A `width` of zero leaves the input untouched.
pub fn chunk_split(body: &str, width: usize, end: &str) -> String {
    if width == 0 || body.is_empty() {
        return body.to_string();
    }

    let line_count = body.len() / width + 1;
    let mut result = String::with_capacity(body.len() + line_count * end.len());
    let mut rest = body;

    while !rest.is_empty() {
        let mut split_at = width.min(rest.len());
        while !rest.is_char_boundary(split_at) {
            split_at += 1;
        }
        let (line, tail) = rest.split_at(split_at);
        result.push_str(line);
        result.push_str(end);
        rest = tail;
    }

    result
}

/// Builds a string of `size` characters drawn from `alphabet`.
///
/// Each character is picked with one byte from the OS random source, reduced
/// modulo the alphabet length. The small bias this introduces does not matter
/// for boundary markers.
pub fn random_string(size: usize, alphabet: &str) -> String {
    let symbols: Vec<char> = alphabet.chars().collect();
    if symbols.is_empty() {
        return String::new();
    }

    let mut bytes = vec![0u8; size];
    OsRng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|b| symbols[*b as usize % symbols.len()])
        .collect()
}

/// Fresh multipart boundary marker.
pub fn generate_boundary() -> String {
    random_string(BOUNDARY_LENGTH, ALPHANUMERIC)
}
