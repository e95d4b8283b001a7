//! HTTP status code to ASP.NET Core result type table
//!
//! `new HttpStatusCodeResult(HttpStatusCode.X)` has no direct counterpart in
//! ASP.NET Core; each status code maps to its own result type. Codes without
//! an entry fall back to [`DEFAULT_RESULT`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `HttpStatusCode` member name to replacement type name
pub const STATUS_CODE_RESULTS: &[(&str, &str)] = &[
    ("Conflict", "ConflictResult"),
    ("NoContent", "NoContentResult"),
    ("NotFound", "NotFoundResult"),
    ("OK", "OkResult"),
    ("Unauthorized", "UnauthorizedResult"),
    ("UnprocessableEntity", "UnprocessableEntityResult"),
    ("UnsupportedMediaType", "UnsupportedMediaTypeResult"),
    (
        "InternalServerError",
        "System.Web.Http.InternalServerErrorResult",
    ),
];

/// Replacement for status codes missing from the table
pub const DEFAULT_RESULT: &str = "BadRequestResult";

static STATUS_CODE_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| STATUS_CODE_RESULTS.iter().copied().collect());

/// Replacement type name for an extracted status code member
///
/// Case-sensitive; `None` and unknown codes give [`DEFAULT_RESULT`].
pub fn resolve_status_code_result(key: Option<&str>) -> &'static str {
    match key {
        Some(key) => STATUS_CODE_INDEX.get(key).copied().unwrap_or_else(|| {
            tracing::debug!("No result type for status code '{}', using default", key);
            DEFAULT_RESULT
        }),
        None => {
            tracing::debug!("No status code extracted, using default");
            DEFAULT_RESULT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_resolves() {
        for &(code, result) in STATUS_CODE_RESULTS {
            assert_eq!(resolve_status_code_result(Some(code)), result);
        }
    }

    #[test]
    fn test_default() {
        assert_eq!(resolve_status_code_result(Some("Teapot")), "BadRequestResult");
        assert_eq!(resolve_status_code_result(Some("notFound")), DEFAULT_RESULT);
        assert_eq!(resolve_status_code_result(None), DEFAULT_RESULT);
    }
}
