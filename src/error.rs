// error.rs - Idiomatic Rust error type for regvm.
//
// Groups the numeric error codes of `regerror` into semantic variants
// while keeping the code reachable through `code()`.

use std::fmt;

use crate::regerror::*;

/// Error type for compilation and matching.
///
/// Ordinary non-matches are never errors; they are `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// The AST cannot be compiled (bad lookbehind, bad backreference,
    /// bad repeat range).
    Pattern { code: i32, message: String },
    /// Contradictory compile options.
    InvalidOptions,
    /// Invalid argument passed to a function.
    InvalidArgument,
    /// Internal consistency fault: the compiler emitted bytecode the VM
    /// does not expect, or the AST is malformed.
    InternalBug { code: i32, message: String },
    /// Other error not covered by specific variants.
    Other(i32),
}

impl RegexError {
    pub(crate) fn pattern(code: i32, param: Option<&str>) -> Self {
        RegexError::Pattern {
            code,
            message: error_code_to_str(code, param),
        }
    }

    pub(crate) fn bug(code: i32) -> Self {
        RegexError::InternalBug {
            code,
            message: error_code_to_format(code).to_string(),
        }
    }

    /// Returns the numeric error code.
    pub fn code(&self) -> i32 {
        match self {
            RegexError::Pattern { code, .. } => *code,
            RegexError::InvalidOptions => REGERR_INVALID_COMBINATION_OF_OPTIONS,
            RegexError::InvalidArgument => REGERR_INVALID_ARGUMENT,
            RegexError::InternalBug { code, .. } => *code,
            RegexError::Other(code) => *code,
        }
    }
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Pattern { message, .. } => write!(f, "pattern error: {}", message),
            RegexError::InvalidOptions => write!(f, "invalid combination of options"),
            RegexError::InvalidArgument => write!(f, "invalid argument"),
            RegexError::InternalBug { message, .. } => write!(f, "internal error: {}", message),
            RegexError::Other(code) => write!(f, "error code {}", code),
        }
    }
}

impl std::error::Error for RegexError {}

impl From<i32> for RegexError {
    fn from(code: i32) -> Self {
        match code {
            REGERR_INVALID_ARGUMENT => RegexError::InvalidArgument,
            REGERR_INVALID_COMBINATION_OF_OPTIONS => RegexError::InvalidOptions,

            REGERR_TYPE_BUG | REGERR_PARSER_BUG | REGERR_STACK_BUG
            | REGERR_UNDEFINED_BYTECODE | REGERR_UNEXPECTED_BYTECODE => RegexError::bug(code),

            c if is_pattern_error(c) => RegexError::pattern(c, None),

            _ => RegexError::Other(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pattern_error() {
        let err = RegexError::from(REGERR_INVALID_LOOK_BEHIND_PATTERN);
        assert!(matches!(err, RegexError::Pattern { .. }));
        assert_eq!(err.code(), REGERR_INVALID_LOOK_BEHIND_PATTERN);
        assert_eq!(err.to_string(), "pattern error: invalid pattern in look-behind");
    }

    #[test]
    fn from_internal_bug() {
        let err = RegexError::from(REGERR_UNEXPECTED_BYTECODE);
        assert!(matches!(err, RegexError::InternalBug { .. }));
        assert_eq!(err.to_string(), "internal error: unexpected bytecode (bug)");
    }

    #[test]
    fn from_options_error() {
        let err = RegexError::from(REGERR_INVALID_COMBINATION_OF_OPTIONS);
        assert_eq!(err, RegexError::InvalidOptions);
        assert_eq!(err.code(), REGERR_INVALID_COMBINATION_OF_OPTIONS);
    }

    #[test]
    fn from_unknown_code() {
        let err = RegexError::from(-9999);
        assert!(matches!(err, RegexError::Other(-9999)));
    }

    #[test]
    fn named_reference_message() {
        let err = RegexError::pattern(REGERR_UNDEFINED_NAME_REFERENCE, Some("year"));
        assert_eq!(err.to_string(), "pattern error: undefined name <year> reference");
    }

    #[test]
    fn error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(RegexError::InvalidArgument);
        assert_eq!(err.to_string(), "invalid argument");
    }
}
