use std::time::Duration;
use thiserror::Error;

/// Error returned by [`parse_duration`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    /// The input was empty or only whitespace.
    #[error("empty duration")]
    Empty,
    /// A number was expected but not found.
    #[error("invalid duration {input:?}: expected a number")]
    InvalidNumber {
        /// The full input.
        input: String,
    },
    /// A number had no unit after it.
    #[error("invalid duration {input:?}: missing unit")]
    MissingUnit {
        /// The full input.
        input: String,
    },
    /// The unit suffix is not one of `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`.
    #[error("invalid duration {input:?}: unknown unit {unit:?}")]
    UnknownUnit {
        /// The full input.
        input: String,
        /// The unrecognized unit.
        unit: String,
    },
    /// The total does not fit in `u64` nanoseconds.
    #[error("invalid duration {input:?}: out of range")]
    Overflow {
        /// The full input.
        input: String,
    },
}

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        _ => return None,
    })
}

/// Parses a duration such as `"250us"`, `"1.5ms"` or `"1m30s"`.
///
/// The input is a sequence of decimal numbers, each followed by a unit. A bare
/// `"0"` is also accepted.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }
    let invalid_number = || DurationParseError::InvalidNumber {
        input: input.to_owned(),
    };
    let overflow = || DurationParseError::Overflow {
        input: input.to_owned(),
    };

    let mut total: u128 = 0;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_digits, after_int) = rest.split_at(int_len);
        let (frac_digits, after_number) = match after_int.strip_prefix('.') {
            Some(tail) => {
                let frac_len = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
                tail.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid_number());
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationParseError::MissingUnit {
                input: input.to_owned(),
            });
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationParseError::UnknownUnit {
            input: input.to_owned(),
            unit: unit.to_owned(),
        })?;

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;
        if !frac_digits.is_empty() {
            // Digits beyond nanosecond precision cannot change the result.
            let kept = &frac_digits[..frac_digits.len().min(18)];
            let frac: u128 = kept.parse().map_err(|_| invalid_number())?;
            let divisor = 10u128.pow(kept.len() as u32);
            nanos = nanos
                .checked_add(frac * scale / divisor)
                .ok_or_else(overflow)?;
        }
        total = total.checked_add(nanos).ok_or_else(overflow)?;
        rest = tail;
    }

    let nanos = u64::try_from(total).map_err(|_| overflow())?;
    Ok(Duration::from_nanos(nanos))
}
