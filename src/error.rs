//! Construction errors and the error class.

use std::fmt;

use thiserror::Error;

/// The two classes an [`HttpError`](crate::HttpError) may belong to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    /// `4xx`: the caller's fault. Causes are shown by default.
    Client,
    /// `5xx`: an internal fault. Causes are hidden by default.
    Server,
}

impl ErrorClass {
    /// The leading digit every status code of this class starts with.
    pub const fn digit(self) -> u16 {
        match self {
            Self::Client => 4,
            Self::Server => 5,
        }
    }

    /// Default for [`HttpError::display_cause`](crate::HttpError::display_cause).
    pub const fn displays_cause_by_default(self) -> bool {
        matches!(self, Self::Client)
    }

    pub(crate) const fn from_digit(digit: u16) -> Option<Self> {
        match digit {
            4 => Some(Self::Client),
            5 => Some(Self::Server),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Client => "client",
            Self::Server => "server",
        })
    }
}

/// Returned when an error value would be built from an invalid status code.
///
/// This is a programmer error surfacing at the construction site, not a
/// request failure. Nothing here is meant to reach a client.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum StatusError {
    #[error("{0} is not a http status code")]
    Unknown(u16),
    #[error("{0} is not a http error code")]
    NotAnError(u16),
    #[error("{code} is not a valid {expected} error code, must start with {}", .expected.digit())]
    WrongClass { code: u16, expected: ErrorClass },
}
