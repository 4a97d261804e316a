//! Formatting helpers for track durations.

use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Reasons a value could not be turned into a whole number of seconds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("negative duration: {0}")]
    Negative(f64),

    #[error("duration is not finite")]
    NonFinite,

    #[error("duration too large: {0}")]
    Overflow(f64),
}

/// A duration as handed in by the caller, before validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seconds {
    /// Integer input, kept exact.
    Whole(u64),
    /// Floating point input, truncated after validation.
    Fractional(f64),
}

/// Numeric values that can be read as a number of seconds.
pub trait AsSeconds {
    fn as_seconds(&self) -> Result<Seconds, FormatError>;
}

macro_rules! impl_as_seconds_unsigned {
    ($($ty:ty),*) => {
        $(
            impl AsSeconds for $ty {
                fn as_seconds(&self) -> Result<Seconds, FormatError> {
                    Ok(Seconds::Whole(*self as u64))
                }
            }
        )*
    };
}

macro_rules! impl_as_seconds_signed {
    ($($ty:ty),*) => {
        $(
            impl AsSeconds for $ty {
                fn as_seconds(&self) -> Result<Seconds, FormatError> {
                    u64::try_from(*self)
                        .map(Seconds::Whole)
                        .map_err(|_| FormatError::Negative(*self as f64))
                }
            }
        )*
    };
}

impl_as_seconds_unsigned!(u8, u16, u32, u64, usize);
impl_as_seconds_signed!(i8, i16, i32, i64, isize);

impl AsSeconds for f32 {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        Ok(Seconds::Fractional(f64::from(*self)))
    }
}

impl AsSeconds for f64 {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        Ok(Seconds::Fractional(*self))
    }
}

impl AsSeconds for Duration {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        Ok(Seconds::Whole(self.as_secs()))
    }
}

/// Text is never a duration, even when it looks numeric.
impl AsSeconds for str {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        Err(FormatError::NotANumber(self.to_string()))
    }
}

impl AsSeconds for String {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        self.as_str().as_seconds()
    }
}

impl AsSeconds for Seconds {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        Ok(*self)
    }
}

impl<T: AsSeconds + ?Sized> AsSeconds for &T {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        (**self).as_seconds()
    }
}

/// Validates `value` and truncates it to whole seconds.
pub fn whole_seconds(value: impl AsSeconds) -> Result<u64, FormatError> {
    let seconds = match value.as_seconds()? {
        Seconds::Whole(seconds) => return Ok(seconds),
        Seconds::Fractional(seconds) => seconds,
    };

    if !seconds.is_finite() {
        return Err(FormatError::NonFinite);
    }
    if seconds < 0.0 {
        return Err(FormatError::Negative(seconds));
    }
    if seconds >= u64::MAX as f64 {
        return Err(FormatError::Overflow(seconds));
    }

    Ok(seconds.trunc() as u64)
}

/// Format a number of seconds as `M:SS` (e.g. `125` -> `"2:05"`).
///
/// Minutes are never rolled over into hours, so `3600` becomes `"60:00"`.
/// Returns `None` and logs a warning when the value cannot be converted.
pub fn sec_to_min(value: impl AsSeconds) -> Option<String> {
    match whole_seconds(value) {
        Ok(total) => Some(format!("{}:{:02}", total / 60, total % 60)),
        Err(e) => {
            warn!("Failed to convert seconds to minutes:seconds format: {}", e);
            None
        }
    }
}
