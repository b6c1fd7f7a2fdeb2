use crate::domain::models::role::Role;

const AGENT_PREFIXES: &[&str] = &[
    "/dashboard/agent",
    "/api/agent",
    "/api/notifications",
    "/api/profile",
];

const CLIENT_PREFIXES: &[&str] = &[
    "/dashboard/client",
    "/api/client",
    "/api/notifications",
    "/api/profile",
];

/// Prefixes a non-admin role may visit. Admin is not listed; it is allowed everywhere.
pub fn allowed_prefixes(role: &str) -> &'static [&'static str] {
    match role.parse::<Role>() {
        Ok(Role::Agent) => AGENT_PREFIXES,
        Ok(Role::Client) => CLIENT_PREFIXES,
        Ok(Role::Admin) | Err(_) => &[],
    }
}

pub fn is_path_allowed(role: &str, path: &str) -> bool {
    if role.parse::<Role>() == Ok(Role::Admin) {
        return true;
    }
    allowed_prefixes(role).iter().any(|prefix| matches_prefix(path, prefix))
}

// Segment-aware: "/api/agent" covers "/api/agent/tours" but not "/api/agents".
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}
