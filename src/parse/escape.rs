//! Decoding of backslash-escaped values in properties files.
//!
//! Values are stored as 8-bit text where every byte stands for the Latin-1 character with the
//! same number, and anything else is written as an escape like `\u0421`.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("truncated \\{escape} escape at byte {offset}")]
    Truncated { escape: char, offset: usize },
    #[error("escape at byte {offset} is not a valid code point")]
    OutOfRange { offset: usize },
    #[error("named escape at byte {offset} is not supported")]
    Named { offset: usize },
    #[error("backslash at end of value")]
    TrailingBackslash,
}

/// Read exactly `count` hex digits starting at `at`.
fn hex_digits(bytes: &[u8], at: usize, count: usize) -> Option<u32> {
    let digits = bytes.get(at..at + count)?;
    digits.iter().try_fold(0u32, |acc, &b| Some(acc * 16 + char::from(b).to_digit(16)?))
}

fn is_high_surrogate(value: u32) -> bool {
    (0xD800..0xDC00).contains(&value)
}

fn is_low_surrogate(value: u32) -> bool {
    (0xDC00..0xE000).contains(&value)
}

/// Expand the escapes in `bytes` and return the resulting text.
///
/// Recognized escapes are `\\`, `\'`, `\"`, `\a`, `\b`, `\f`, `\n`, `\r`, `\t`, `\v`, octal
/// `\ooo`, `\xhh`, `\uhhhh`, and `\Uhhhhhhhh`. A backslash before a newline removes both.
/// A backslash before any other character is kept as is.
///
/// Surrogate pairs written as two `\u` escapes are combined. Unpaired surrogates cannot be
/// represented in a Rust string and become U+FFFD.
pub fn unescape(bytes: &[u8]) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(char::from(b));
            i += 1;
            continue;
        }

        let offset = i;
        let Some(&c) = bytes.get(i + 1) else {
            return Err(EscapeError::TrailingBackslash);
        };
        i += 2;
        match c {
            b'\n' => (),
            b'\\' => out.push('\\'),
            b'\'' => out.push('\''),
            b'"' => out.push('"'),
            b'a' => out.push('\x07'),
            b'b' => out.push('\x08'),
            b'f' => out.push('\x0c'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'v' => out.push('\x0b'),
            b'0'..=b'7' => {
                let mut value = u32::from(c - b'0');
                for _ in 0..2 {
                    match bytes.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                        }
                        _ => break,
                    }
                }
                // at most 0o777, which is always a valid char
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'x' => {
                let value = hex_digits(bytes, i, 2)
                    .ok_or(EscapeError::Truncated { escape: 'x', offset })?;
                i += 2;
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'u' => {
                let mut value = hex_digits(bytes, i, 4)
                    .ok_or(EscapeError::Truncated { escape: 'u', offset })?;
                i += 4;
                if is_high_surrogate(value) && bytes.get(i..i + 2) == Some(&b"\\u"[..]) {
                    if let Some(low) = hex_digits(bytes, i + 2, 4).filter(|v| is_low_surrogate(*v))
                    {
                        value = 0x10000 + ((value - 0xD800) << 10) + (low - 0xDC00);
                        i += 6;
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'U' => {
                let value = hex_digits(bytes, i, 8)
                    .ok_or(EscapeError::Truncated { escape: 'U', offset })?;
                i += 8;
                if value > 0x10_FFFF {
                    return Err(EscapeError::OutOfRange { offset });
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'N' => return Err(EscapeError::Named { offset }),
            _ => {
                out.push('\\');
                out.push(char::from(c));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii() {
        assert_eq!(unescape(b"OIR AE of 1st AG VVS").unwrap(), "OIR AE of 1st AG VVS");
    }

    #[test]
    fn test_unicode_escapes() {
        let value = br"\u041e\u0418\u0420\u0410\u042d 1-\u0439 \u0410\u0413";
        assert_eq!(unescape(value).unwrap(), "ОИРАЭ 1-й АГ");
    }

    #[test]
    fn test_high_bytes_are_latin1() {
        assert_eq!(unescape(b"caf\xe9").unwrap(), "café");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(br"a\tb\nc\\d\'e").unwrap(), "a\tb\nc\\d'e");
        assert_eq!(unescape(br"\x41\101\0").unwrap(), "AA\0");
        assert_eq!(unescape(br"\U0001F600").unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(unescape(b"first \\\nsecond").unwrap(), "first second");
    }

    #[test]
    fn test_unknown_escape_kept() {
        assert_eq!(unescape(br"100\% \q").unwrap(), r"100\% \q");
    }

    #[test]
    fn test_surrogates() {
        assert_eq!(unescape(br"\ud83d\ude00").unwrap(), "\u{1F600}");
        assert_eq!(unescape(br"\ud83d!").unwrap(), "\u{FFFD}!");
        assert_eq!(unescape(br"\ude00").unwrap(), "\u{FFFD}");
    }

    #[test]
    fn test_errors() {
        assert_eq!(unescape(br"abc\"), Err(EscapeError::TrailingBackslash));
        assert_eq!(unescape(br"\u04"), Err(EscapeError::Truncated { escape: 'u', offset: 0 }));
        assert_eq!(unescape(br"ab\xZZ"), Err(EscapeError::Truncated { escape: 'x', offset: 2 }));
        assert_eq!(unescape(br"\U00110000"), Err(EscapeError::OutOfRange { offset: 0 }));
        assert_eq!(unescape(br"\N{DASH}"), Err(EscapeError::Named { offset: 0 }));
    }
}
