//! Category-based authorization and the per-route role table

use super::guard::AuthContext;
use crate::utils::error::{AppError, Result};
use tracing::warn;

/// Categories that stand for each other
const ADMIN_ALIASES: [&str; 2] = ["admin", "administrador"];

/// Client-facing message for role rejections
pub const INSUFFICIENT_ROLE: &str = "Insufficient permissions";

/// Whether a category satisfies a declared role (case-insensitive)
pub fn role_matches(category: &str, role: &str) -> bool {
    let category = category.to_lowercase();
    let role = role.to_lowercase();

    category == role
        || (ADMIN_ALIASES.contains(&category.as_str()) && ADMIN_ALIASES.contains(&role.as_str()))
}

/// Compares the resolved subject's category with a route's roles
pub struct RoleGuard;

impl RoleGuard {
    /// Allow when no roles are declared, otherwise when any declared role matches
    pub fn check(context: Option<&AuthContext>, required: &[String]) -> Result<()> {
        if required.is_empty() {
            return Ok(());
        }

        let Some(context) = context else {
            warn!("Role check without an authenticated subject");
            return Err(AppError::forbidden(INSUFFICIENT_ROLE));
        };

        if required
            .iter()
            .any(|role| role_matches(&context.account.category, role))
        {
            return Ok(());
        }

        warn!(
            "Account {} with category '{}' lacks roles {:?}",
            context.account.id, context.account.category, required
        );
        Err(AppError::forbidden(INSUFFICIENT_ROLE))
    }
}

/// One row of the route table
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub method: String,
    /// Resource pattern as registered with the router, `{param}` placeholders included
    pub pattern: String,
    pub roles: Vec<String>,
}

impl RouteRule {
    fn matches(&self, method: &str, pattern: &str) -> bool {
        self.method.eq_ignore_ascii_case(method) && self.pattern == pattern
    }
}

/// Required roles per route, built once at startup
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; an empty role list means any authenticated subject
    pub fn route(mut self, method: &str, pattern: &str, roles: &[&str]) -> Self {
        self.rules.push(RouteRule {
            method: method.to_uppercase(),
            pattern: pattern.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        });
        self
    }

    /// Roles declared for a method and matched resource pattern, `None` when no rule exists
    pub fn required_roles(&self, method: &str, pattern: &str) -> Option<&[String]> {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, pattern))
            .map(|rule| rule.roles.as_slice())
    }

    /// All rules
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Table for the protected routes served by this application
    pub fn standard() -> Self {
        Self::new()
            .route("GET", "/auth/me", &[])
            .route("GET", "/users", &["admin"])
            .route("DELETE", "/users/{id}", &["admin"])
            .route("POST", "/mail/send", &["admin", "monitor"])
            .route("POST", "/mail/send-all", &["admin"])
    }
}
