use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    InvalidIdPrefix {
        field: &'static str,
        prefix: &'static str,
        actual: String,
    },
    DotSegment {
        field: &'static str,
        value: String,
    },
    InsecureUrl {
        field: &'static str,
        url: String,
    },
    InvalidUrl {
        field: &'static str,
        input: String,
    },
    InvalidPhoneNumber {
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidIdPrefix {
                field,
                prefix,
                actual,
            } => write!(f, "invalid {field} format: {actual:?} (expected {prefix}...)"),
            Self::DotSegment { field, value } => {
                write!(f, "{field} must not be a relative path segment: {value:?}")
            }
            Self::InsecureUrl { field, url } => write!(f, "{field} must be HTTPS: {url}"),
            Self::InvalidUrl { field, input } => write!(f, "invalid {field}: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
