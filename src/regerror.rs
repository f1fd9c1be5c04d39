// regerror.rs - Error codes and their messages.
//
// Numeric codes follow the Oniguruma numbering.

// === Result Codes ===
pub const REG_MISMATCH: i32 = -1;

// === Internal Errors ===
pub const REGERR_TYPE_BUG: i32 = -6;
pub const REGERR_PARSER_BUG: i32 = -11;
pub const REGERR_STACK_BUG: i32 = -12;
pub const REGERR_UNDEFINED_BYTECODE: i32 = -13;
pub const REGERR_UNEXPECTED_BYTECODE: i32 = -14;

// === Argument Errors ===
pub const REGERR_INVALID_ARGUMENT: i32 = -30;

// === Pattern Errors ===
pub const REGERR_INVALID_LOOK_BEHIND_PATTERN: i32 = -122;
pub const REGERR_INVALID_REPEAT_RANGE_PATTERN: i32 = -123;
pub const REGERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE: i32 = -201;
pub const REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE: i32 = -202;
pub const REGERR_INVALID_BACKREF: i32 = -208;
pub const REGERR_UNDEFINED_NAME_REFERENCE: i32 = -217;
pub const REGERR_UNDEFINED_GROUP_REFERENCE: i32 = -218;

// === Option Errors ===
pub const REGERR_INVALID_COMBINATION_OF_OPTIONS: i32 = -403;

#[inline]
pub fn is_pattern_error(code: i32) -> bool {
    code <= -100 && code > -400
}

/// Message for an error code.
pub fn error_code_to_format(code: i32) -> &'static str {
    match code {
        REG_MISMATCH => "mismatch",
        REGERR_TYPE_BUG => "undefined type (bug)",
        REGERR_PARSER_BUG => "internal parser error (bug)",
        REGERR_STACK_BUG => "stack error (bug)",
        REGERR_UNDEFINED_BYTECODE => "undefined bytecode (bug)",
        REGERR_UNEXPECTED_BYTECODE => "unexpected bytecode (bug)",
        REGERR_INVALID_ARGUMENT => "invalid argument",
        REGERR_INVALID_LOOK_BEHIND_PATTERN => "invalid pattern in look-behind",
        REGERR_INVALID_REPEAT_RANGE_PATTERN => "invalid repeat range {lower,upper}",
        REGERR_TOO_BIG_NUMBER_FOR_REPEAT_RANGE => "too big number for repeat range",
        REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE => {
            "upper is smaller than lower in repeat range"
        }
        REGERR_INVALID_BACKREF => "invalid backref number/name",
        REGERR_UNDEFINED_NAME_REFERENCE => "undefined name <%n> reference",
        REGERR_UNDEFINED_GROUP_REFERENCE => "undefined group <%n> reference",
        REGERR_INVALID_COMBINATION_OF_OPTIONS => "invalid combination of options",
        _ => "undefined error code",
    }
}

pub fn is_error_code_needs_param(code: i32) -> bool {
    matches!(
        code,
        REGERR_UNDEFINED_NAME_REFERENCE | REGERR_UNDEFINED_GROUP_REFERENCE
    )
}

/// Message for an error code, with `%n` replaced by `param`.
pub fn error_code_to_str(code: i32, param: Option<&str>) -> String {
    let fmt = error_code_to_format(code);
    if is_error_code_needs_param(code) {
        fmt.replace("%n", param.unwrap_or(""))
    } else {
        fmt.to_string()
    }
}
