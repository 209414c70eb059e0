//! Percent-encoding for query parameter values
//!
//! Everything outside the RFC 3986 unreserved set is escaped, including
//! spaces (`%20`) and the list separator (`%2C`).

use std::fmt::Write;

use super::LIST_SEPARATOR;

/// Percent-encode a string for use as a query parameter value
///
/// Encodes all characters except unreserved characters (`A-Z`, `a-z`, `0-9`,
/// `-`, `_`, `.`, `~`).
pub fn encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for c in input.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    let _ = write!(result, "%{b:02X}");
                }
            },
        }
    }
    result
}

/// Decode a percent-encoded value
///
/// Malformed escapes are kept verbatim; invalid UTF-8 is replaced.
pub fn decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Split an encoded list value into its decoded items
pub fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(LIST_SEPARATOR).map(decode).collect()
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_space_as_percent() {
        assert_eq!(encode("North Bound"), "North%20Bound");
    }

    #[test]
    fn encode_special_chars() {
        assert_eq!(encode("a&b=c,d"), "a%26b%3Dc%2Cd");
        assert_eq!(encode("1+1"), "1%2B1");
    }

    #[test]
    fn encode_unreserved_chars() {
        assert_eq!(encode("abc-123_test.file~v2"), "abc-123_test.file~v2");
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode(""), "");
    }

    #[test]
    fn encode_unicode() {
        assert_eq!(encode("Montrose Ave→"), "Montrose%20Ave%E2%86%92");
    }

    #[test]
    fn decode_reverses_encode() {
        for input in ["North Bound", "a,b", "Montrose Ave→", "plain", "%"] {
            assert_eq!(decode(&encode(input)), input);
        }
    }

    #[test]
    fn decode_keeps_malformed_escapes() {
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz1"), "%zz1");
        assert_eq!(decode("%4"), "%4");
    }

    #[test]
    fn split_list_decodes_items() {
        assert_eq!(split_list("3,81"), vec!["3", "81"]);
        assert_eq!(split_list("a%2Cb,c"), vec!["a,b", "c"]);
        assert!(split_list("").is_empty());
    }
}
