use std::path::Path;

use dataroom_core::{AppError, AppResult};
use dataroom_domain::{
    MenuSection, MenuSectionDefinition, UnknownCapabilityPolicy, resolve_menu_definitions,
};

/// Parses a JSON menu definition into validated sections.
pub fn load_menu_from_json(
    json: &str,
    policy: UnknownCapabilityPolicy,
) -> AppResult<Vec<MenuSection>> {
    let definitions: Vec<MenuSectionDefinition> = serde_json::from_str(json)
        .map_err(|error| AppError::Validation(format!("invalid menu definition: {error}")))?;

    let resolved = resolve_menu_definitions(definitions, policy)?;
    for (capability, path) in &resolved.unknown_capabilities {
        tracing::warn!(
            capability = capability.as_str(),
            path = path.as_str(),
            policy = policy.as_str(),
            "menu item references an unknown capability"
        );
    }

    Ok(resolved.sections)
}

/// Reads and parses a JSON menu definition file.
pub fn load_menu_from_file(
    path: &Path,
    policy: UnknownCapabilityPolicy,
) -> AppResult<Vec<MenuSection>> {
    let json = std::fs::read_to_string(path).map_err(|error| {
        AppError::Internal(format!(
            "failed to read menu definition '{}': {error}",
            path.display()
        ))
    })?;

    let sections = load_menu_from_json(json.as_str(), policy)?;
    tracing::info!(
        path = %path.display(),
        sections = sections.len(),
        "loaded menu definition"
    );

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use dataroom_domain::UnknownCapabilityPolicy;

    use super::{load_menu_from_file, load_menu_from_json};

    const MENU: &str = r#"[
        {
            "id": "overview",
            "label": "Overview",
            "default_open": true,
            "items": [
                { "label": "Dashboard", "path": "/", "required_capability": "dashboard.view" },
                { "label": "Legacy reports", "path": "/legacy", "required_capability": "reports.legacy" }
            ]
        },
        {
            "id": "admin",
            "label": "Administration",
            "items": [
                { "label": "Settings", "path": "/settings", "requires_admin": true }
            ]
        }
    ]"#;

    #[test]
    fn unknown_capabilities_are_hidden_by_default_policy() {
        let sections = load_menu_from_json(MENU, UnknownCapabilityPolicy::default());
        assert!(sections.is_ok());
        let sections = sections.unwrap_or_default();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].items().len(), 1);
        assert!(sections[1].items()[0].requires_admin());
    }

    #[test]
    fn allow_policy_keeps_unknown_capability_items() {
        let sections = load_menu_from_json(MENU, UnknownCapabilityPolicy::Allow).unwrap_or_default();
        assert_eq!(sections[0].items().len(), 2);
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        assert!(load_menu_from_json("{", UnknownCapabilityPolicy::Deny).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load_menu_from_file(
            Path::new("/nonexistent/menu.json"),
            UnknownCapabilityPolicy::Deny,
        );
        assert!(result.is_err());
    }
}
