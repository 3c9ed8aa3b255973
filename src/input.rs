//! Whitespace-delimited integer input.

use std::io::Read;
use thiserror::Error;

/// Failure to read or parse a value list.
#[derive(Debug, Error)]
pub enum ParseValuesError {
    /// A token is not a non-negative base-10 integer that fits in `u64`.
    #[error("invalid value {token:?} at position {index}")]
    InvalidToken {
        /// Zero-based position of the token in the input.
        index: usize,
        /// The token as written.
        token: String,
        /// The integer parse failure.
        #[source]
        source: std::num::ParseIntError,
    },
    /// The reader failed.
    #[error("failed to read values")]
    Io(#[from] std::io::Error),
}

/// Parses whitespace-separated base-10 integers.
///
/// ```
/// assert_eq!(sleepsort::input::parse_values(" 3 1\n2 ").unwrap(), vec![3, 1, 2]);
/// assert!(sleepsort::input::parse_values("1 -2").is_err());
/// ```
pub fn parse_values(text: &str) -> Result<Vec<u64>, ParseValuesError> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token
                .parse::<u64>()
                .map_err(|source| ParseValuesError::InvalidToken {
                    index,
                    token: token.to_owned(),
                    source,
                })
        })
        .collect()
}

/// Reads everything from `reader` and parses it with [`parse_values`].
pub fn read_values(mut reader: impl Read) -> Result<Vec<u64>, ParseValuesError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_values(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    #[test]
    fn splits_on_any_whitespace() {
        assert_eq!(parse_values("5\t4\n\n3  2 1").unwrap(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn empty_and_blank_input_is_empty() {
        assert!(parse_values("").unwrap().is_empty());
        assert!(parse_values(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn bad_token_reports_position() {
        let err = parse_values("1 2 x3 4").unwrap_err();
        match err {
            ParseValuesError::InvalidToken { index, token, .. } => {
                assert_eq!(index, 2);
                assert_eq!(token, "x3");
            }
            ParseValuesError::Io(_) => panic!("unexpected io error"),
        }
    }

    #[test]
    fn negative_and_overflowing_values_are_rejected() {
        assert!(parse_values("-1").is_err());
        assert!(parse_values("18446744073709551616").is_err());
        assert_eq!(parse_values("18446744073709551615").unwrap(), vec![u64::MAX]);
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"10 9\n8\n").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(read_values(file).unwrap(), vec![10, 9, 8]);
    }

    #[test]
    fn invalid_utf8_is_io_error() {
        let err = read_values(&[0xff, 0xfe][..]).unwrap_err();
        assert!(matches!(err, ParseValuesError::Io(_)));
    }
}
