//! Dependency-error classification for definition creation failures

use crate::client::UserError;

/// Error codes that mean a referenced definition does not exist (yet)
const DEPENDENCY_CODES: &[&str] = &[
    "NOT_FOUND",
    "INVALID_REFERENCE",
    "METAOBJECT_DEFINITION_NOT_FOUND",
];

/// Message fragments (lower-case) used when no dependency code is present
const DEPENDENCY_PATTERNS: &[&str] = &[
    "not found",
    "does not exist",
    "invalid reference",
    "validations must be a valid metaobject",
];

/// Whether `error` says a referenced definition is missing
///
/// The structured code is checked first; the message is matched against
/// known fragments as a fallback.
#[must_use]
pub fn is_dependency_error(error: &UserError) -> bool {
    if error
        .code
        .as_deref()
        .is_some_and(|code| DEPENDENCY_CODES.contains(&code))
    {
        return true;
    }

    let message = error.message.to_lowercase();
    DEPENDENCY_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// Whether any error of a failed mutation is a dependency error
#[must_use]
pub fn is_dependency_failure(errors: &[UserError]) -> bool {
    errors.iter().any(is_dependency_error)
}
