//! `new HttpStatusCodeResult(HttpStatusCode.X)` to a dedicated result type
//!
//! ASP.NET Core has no general status-code result taking an
//! `HttpStatusCode`; each code has its own type taking no arguments. See
//! [`crate::status_codes`] for the mapping.

use shifter_core::{MigrationRule, Severity, SyntaxKind};

use crate::matchers::ConstructorArgumentMatcher;
use crate::rewriters::ConstructorRewriter;
use crate::status_codes::resolve_status_code_result;

/// Rule ID for the HttpStatusCodeResult replacement
pub const HTTP_STATUS_CODE_RESULT: &str = "migration/http-status-code-result";

/// Type constructed by ASP.NET MVC controllers
pub const OBSOLETE_TYPE: &str = "HttpStatusCodeResult";

pub fn http_status_code_result_rule() -> MigrationRule {
    MigrationRule::new(
        HTTP_STATUS_CODE_RESULT,
        [SyntaxKind::ObjectCreationExpression],
        ConstructorArgumentMatcher::new(OBSOLETE_TYPE),
        ConstructorRewriter::new(OBSOLETE_TYPE, resolve_status_code_result),
    )
    .with_title("HttpStatusCodeResult is not available in ASP.NET Core")
    .with_message("'{matched}' should be replaced with the matching status code result")
    .with_severity(Severity::Warning)
}
