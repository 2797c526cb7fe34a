//! Hex text for frames on the command line.

use std::fmt::Write;

/// Parse hex text. Whitespace, `:` and `-` separators and a leading `0x` are ignored.
pub fn decode(input: &str) -> Result<Vec<u8>, String> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let digits: Vec<u8> = body
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':' && *b != b'-')
        .collect();

    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {input:?}"));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let hi = nibble(pair[0]);
            let lo = nibble(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(format!(
                    "invalid hex digit in {:?}",
                    String::from_utf8_lossy(pair)
                )),
            }
        })
        .collect()
}

fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Lowercase hex, one space between bytes.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_separators() {
        assert_eq!(decode("06 00:48-00").unwrap(), vec![0x06, 0x00, 0x48, 0x00]);
        assert_eq!(decode("0xABcd").unwrap(), vec![0xAB, 0xCD]);
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert!(decode("abc").is_err());
        assert!(decode("zz").is_err());
    }

    #[test]
    fn encode_spaces_bytes() {
        assert_eq!(encode(&[0x06, 0x00, 0xab]), "06 00 ab");
        assert_eq!(encode(&[]), "");
    }
}
