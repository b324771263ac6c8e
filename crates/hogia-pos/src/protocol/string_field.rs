//! Length-prefixed ASCII strings.
//!
//! Each identifier is written as one length byte followed by that many ASCII bytes. A missing,
//! empty or all-whitespace value is written as a lone `0` length byte.
use std::{borrow::Cow, fmt};

use tracing::debug;

use super::MAX_STRING_LEN;
use crate::{config::NonAsciiPolicy, Error, HPResult};

/// Identifier strings of the position message, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringField {
    VehicleRef,
    DriverRef,
    TaskRef,
    AccountRef,
}

impl StringField {
    pub fn name(self) -> &'static str {
        match self {
            StringField::VehicleRef => "vehicle_ref",
            StringField::DriverRef => "driver_ref",
            StringField::TaskRef => "task_ref",
            StringField::AccountRef => "account_ref",
        }
    }
}

impl fmt::Display for StringField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Append `value` to `out` as a length-prefixed ASCII string.
///
/// The length is checked before the characters, so an oversized value is always
/// [`Error::FieldTooLong`]. Nothing is appended on error.
pub fn write_string(
    out: &mut Vec<u8>,
    field: StringField,
    value: Option<&str>,
    policy: NonAsciiPolicy,
) -> HPResult<()> {
    let value = match value {
        Some(v) if !is_blank(Some(v)) => v,
        _ => {
            out.push(0);
            return Ok(());
        }
    };
    let len = ascii_len(value);
    let len = u8::try_from(len).map_err(|_| Error::FieldTooLong { field, len })?;
    let encoded = to_ascii(field, value, policy)?;
    debug_assert_eq!(encoded.len(), len as usize);
    out.push(len);
    out.extend_from_slice(&encoded);
    Ok(())
}

/// Number of bytes [`write_string`] appends for `value`, assuming it succeeds.
pub fn encoded_len(value: Option<&str>) -> usize {
    match value {
        Some(v) if !is_blank(Some(v)) => 1 + ascii_len(v).min(MAX_STRING_LEN),
        _ => 1,
    }
}

/// Missing, empty or all-whitespace values are sent as a zero length string.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// ASCII byte count of `value` with non-ASCII characters replaced. Replacement works on UTF-16
/// code units, so characters above U+FFFF take two bytes.
fn ascii_len(value: &str) -> usize {
    if value.is_ascii() {
        return value.len();
    }
    value.chars().map(char::len_utf16).sum()
}

fn to_ascii(field: StringField, value: &str, policy: NonAsciiPolicy) -> HPResult<Cow<'_, [u8]>> {
    let Some((index, ch)) = value.chars().enumerate().find(|(_, c)| !c.is_ascii()) else {
        return Ok(Cow::Borrowed(value.as_bytes()));
    };
    match policy {
        NonAsciiPolicy::Reject => Err(Error::NonAscii { field, ch, index }),
        NonAsciiPolicy::Replace => {
            debug!("{field}: replacing non-ASCII characters in {value:?}");
            let mut encoded = Vec::with_capacity(ascii_len(value));
            for c in value.chars() {
                if c.is_ascii() {
                    encoded.push(c as u8);
                } else {
                    encoded.extend(std::iter::repeat(b'?').take(c.len_utf16()));
                }
            }
            Ok(Cow::Owned(encoded))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lazy_init_tracing;

    fn write(value: Option<&str>, policy: NonAsciiPolicy) -> HPResult<Vec<u8>> {
        let mut out = Vec::new();
        write_string(&mut out, StringField::DriverRef, value, policy)?;
        Ok(out)
    }

    #[test]
    fn test_blank_values_are_zero_length() {
        for value in [None, Some(""), Some(" "), Some("\t\r\n"), Some("\u{2003}")] {
            let out = write(value, NonAsciiPolicy::Reject).unwrap();
            assert_eq!(out, [0], "value {:?}", value);
            assert_eq!(encoded_len(value), 1);
        }
    }

    #[test]
    fn test_blank_check_precedes_length_check() {
        let spaces = " ".repeat(1000);
        assert_eq!(write(Some(spaces.as_str()), NonAsciiPolicy::Reject).unwrap(), [0]);
    }

    #[test]
    fn test_value_is_length_prefixed() {
        let out = write(Some("4567.drivers"), NonAsciiPolicy::Reject).unwrap();
        assert_eq!(out[0], 12);
        assert_eq!(&out[1..], b"4567.drivers");
        assert_eq!(encoded_len(Some("4567.drivers")), out.len());
    }

    #[test]
    fn test_surrounding_whitespace_kept() {
        let out = write(Some(" 42 "), NonAsciiPolicy::Reject).unwrap();
        assert_eq!(out, b"\x04 42 ");
    }

    #[test]
    fn test_length_limit() {
        let max = "a".repeat(MAX_STRING_LEN);
        let out = write(Some(max.as_str()), NonAsciiPolicy::Reject).unwrap();
        assert_eq!(out.len(), 256);
        assert_eq!(out[0], 255);

        let mut out = vec![0xAA];
        let too_long = "a".repeat(MAX_STRING_LEN + 1);
        let err = write_string(
            &mut out,
            StringField::TaskRef,
            Some(too_long.as_str()),
            NonAsciiPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::FieldTooLong {
                field: StringField::TaskRef,
                len: 256
            }
        ));
        assert_eq!(out, [0xAA], "nothing appended on error");
        assert_eq!(err.to_string(), "task_ref is 256 bytes when ASCII encoded, max 255");
    }

    #[test]
    fn test_non_ascii_rejected() {
        let err = write(Some("bussförare"), NonAsciiPolicy::Reject).unwrap_err();
        match err {
            Error::NonAscii { field, ch, index } => {
                assert_eq!(field, StringField::DriverRef);
                assert_eq!(ch, 'ö');
                assert_eq!(index, 5);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_non_ascii_replaced() {
        lazy_init_tracing();
        let out = write(Some("bussförare"), NonAsciiPolicy::Replace).unwrap();
        assert_eq!(out, b"\x0abussf?rare");
        assert_eq!(encoded_len(Some("bussförare")), out.len());

        // one '?' per UTF-16 code unit, so a surrogate pair gives two
        let out = write(Some("a\u{1F68C}b"), NonAsciiPolicy::Replace).unwrap();
        assert_eq!(out, b"\x04a??b");
        assert_eq!(encoded_len(Some("a\u{1F68C}b")), out.len());
    }

    #[test]
    fn test_replaced_length_counts_chars() {
        // 255 two-byte chars fit once replaced
        let value = "é".repeat(MAX_STRING_LEN);
        let out = write(Some(value.as_str()), NonAsciiPolicy::Replace).unwrap();
        assert_eq!(out[0], 255);

        let value = "é".repeat(MAX_STRING_LEN + 1);
        let err = write(Some(value.as_str()), NonAsciiPolicy::Replace).unwrap_err();
        assert!(matches!(err, Error::FieldTooLong { len: 256, .. }));

        // 127 bus emoji are 254 bytes replaced, 128 are 256
        let value = "\u{1F68C}".repeat(127) + "a";
        let out = write(Some(value.as_str()), NonAsciiPolicy::Replace).unwrap();
        assert_eq!(out[0], 255);
        assert_eq!(encoded_len(Some(value.as_str())), 256);

        let value = "\u{1F68C}".repeat(128);
        let err = write(Some(value.as_str()), NonAsciiPolicy::Replace).unwrap_err();
        assert!(matches!(err, Error::FieldTooLong { len: 256, .. }));
    }

    #[test]
    fn test_length_checked_before_characters() {
        let value = "a".repeat(300) + "é";
        for policy in [NonAsciiPolicy::Reject, NonAsciiPolicy::Replace] {
            let err = write(Some(value.as_str()), policy).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::FieldTooLong {
                        field: StringField::DriverRef,
                        len: 301
                    }
                ),
                "{policy:?}: {err:?}"
            );
        }

        // fits, so the character is what fails
        let err = write(Some("a\u{1F68C}"), NonAsciiPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::NonAscii { index: 1, .. }));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t ")));
        assert!(!is_blank(Some(" x ")));
    }
}
