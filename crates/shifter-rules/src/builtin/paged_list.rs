//! `using PagedList;` to `using PagedList.Core;`

use shifter_core::{MigrationRule, Severity, SyntaxKind};

use crate::matchers::DirectiveNameMatcher;
use crate::rewriters::DirectiveRewriter;

/// Rule ID for the PagedList namespace move
pub const PAGED_LIST_USING: &str = "migration/paged-list-using";

/// Namespace imported by ASP.NET MVC projects
pub const OBSOLETE_NAMESPACE: &str = "PagedList";

/// Namespace of the ASP.NET Core package
pub const REPLACEMENT_NAMESPACE: &str = "PagedList.Core";

pub fn paged_list_using_rule() -> MigrationRule {
    MigrationRule::new(
        PAGED_LIST_USING,
        [SyntaxKind::UsingDirective],
        DirectiveNameMatcher::new(OBSOLETE_NAMESPACE),
        DirectiveRewriter::new(REPLACEMENT_NAMESPACE),
    )
    .with_title("PagedList moved to PagedList.Core")
    .with_message("Namespace '{matched}' should be replaced with 'PagedList.Core'")
    .with_severity(Severity::Warning)
}
