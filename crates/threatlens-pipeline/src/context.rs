//! Per-request analysis context.

use serde::Serialize;
use threatlens_security::Role;
use uuid::Uuid;

/// Everything one analysis needs from its caller. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub request_id: Uuid,
    pub role: Role,
    pub text: String,
}

impl AnalysisRequest {
    /// Resolve `role_name` fail-closed; unknown names become `Observer`.
    pub fn new(role_name: &str, text: impl Into<String>) -> Self {
        Self::with_role(Role::from_name(role_name), text)
    }

    pub fn with_role(role: Role, text: impl Into<String>) -> Self {
        Self { request_id: Uuid::new_v4(), role, text: text.into() }
    }
}
