use std::time::Duration;

use fanout_core::{DriverError, Scenario};

use crate::error::{AppError, AppResult, ValidationError};

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, _)) if key.trim().is_empty() => Err(ValidationError::EmptyHeaderName {
            value: s.to_owned(),
        }),
        Some((key, value)) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

pub(crate) fn parse_scenario(s: &str) -> Result<Scenario, DriverError> {
    s.parse()
}

pub(crate) fn parse_positive_usize(s: &str) -> AppResult<usize> {
    match s.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::from(ValidationError::NotPositive {
            value: s.to_owned(),
        })),
    }
}

/// Parses a duration such as `250ms`, `10s` or `2m`. A bare number is seconds.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty.into());
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        }
        .into());
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => Duration::from_secs(number.saturating_mul(60)),
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                value: value.to_owned(),
                unit: unit.to_owned(),
            }
            .into())
        }
    };
    Ok(duration)
}
