//! Transport method configuration

use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// The HTTP method a form is configured to submit with.
///
/// Transport itself is the caller's concern; the controller only holds the
/// configured method and rejects unknown configuration values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Submit via a request body.
    #[default]
    Post,
    /// Submit via query parameters.
    Get,
}

impl Method {
    /// Returns the method's lowercase configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Get => "get",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = FormError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "get" => Ok(Self::Get),
            _ => Err(FormError::UnknownMethod(value.to_string())),
        }
    }
}
