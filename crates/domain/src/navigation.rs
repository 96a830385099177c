use std::collections::BTreeSet;
use std::str::FromStr;

use dataroom_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::Capability;

/// Console navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    label: NonEmptyString,
    path: NonEmptyString,
    icon: Option<String>,
    required_capability: Option<Capability>,
    requires_admin: bool,
    requires_subadmin: bool,
}

impl MenuItem {
    /// Creates an item without access requirements.
    pub fn new(
        label: impl Into<String>,
        path: impl Into<String>,
        icon: Option<String>,
    ) -> AppResult<Self> {
        let path = NonEmptyString::new(path)?;
        if !path.as_str().starts_with('/') {
            return Err(AppError::Validation(format!(
                "menu path '{}' must start with '/'",
                path.as_str()
            )));
        }

        let icon = icon.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            label: NonEmptyString::new(label)?,
            path,
            icon,
            required_capability: None,
            requires_admin: false,
            requires_subadmin: false,
        })
    }

    /// Requires the capability for the item to be visible.
    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.required_capability = Some(capability);
        self
    }

    /// Restricts the item to admins.
    #[must_use]
    pub fn admin_only(mut self) -> Self {
        self.requires_admin = true;
        self
    }

    /// Restricts the item to sub-admins and admins.
    #[must_use]
    pub fn subadmin_only(mut self) -> Self {
        self.requires_subadmin = true;
        self
    }

    /// Returns the item label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &NonEmptyString {
        &self.path
    }

    /// Returns the icon name.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the capability required to see the item.
    #[must_use]
    pub fn required_capability(&self) -> Option<Capability> {
        self.required_capability
    }

    /// Returns whether the item is restricted to admins.
    #[must_use]
    pub fn requires_admin(&self) -> bool {
        self.requires_admin
    }

    /// Returns whether the item is restricted to sub-admins and admins.
    #[must_use]
    pub fn requires_subadmin(&self) -> bool {
        self.requires_subadmin
    }

    /// Returns whether the item declares no requirement at all.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.required_capability.is_none() && !self.requires_admin && !self.requires_subadmin
    }
}

/// Ordered group of navigation entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
    id: NonEmptyString,
    label: NonEmptyString,
    default_open: bool,
    items: Vec<MenuItem>,
}

impl MenuSection {
    /// Creates a validated section. Item paths must be unique within it.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        default_open: bool,
        items: Vec<MenuItem>,
    ) -> AppResult<Self> {
        let id = NonEmptyString::new(id)?;
        let mut seen_paths = BTreeSet::new();
        for item in &items {
            if !seen_paths.insert(item.path().as_str()) {
                return Err(AppError::Validation(format!(
                    "duplicate menu path '{}' in section '{}'",
                    item.path().as_str(),
                    id.as_str()
                )));
            }
        }

        Ok(Self {
            id,
            label: NonEmptyString::new(label)?,
            default_open,
            items,
        })
    }

    /// Returns the stable section id.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the section label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns whether the section starts expanded.
    #[must_use]
    pub fn default_open(&self) -> bool {
        self.default_open
    }

    /// Returns the section items in display order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        self.items.as_slice()
    }

    /// Returns a copy of this section holding only the given items.
    #[must_use]
    pub fn with_items(&self, items: Vec<MenuItem>) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            default_open: self.default_open,
            items,
        }
    }
}

/// Handling of capability names a menu definition references but the
/// console does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCapabilityPolicy {
    /// Hide the item from everyone.
    #[default]
    Deny,
    /// Keep the item and ignore the unknown requirement.
    Allow,
}

impl UnknownCapabilityPolicy {
    /// Returns a stable configuration value for this policy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deny => "deny",
            Self::Allow => "allow",
        }
    }
}

impl FromStr for UnknownCapabilityPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deny" => Ok(Self::Deny),
            "allow" => Ok(Self::Allow),
            other => Err(AppError::Validation(format!(
                "unknown capability policy must be 'deny' or 'allow', got '{other}'"
            ))),
        }
    }
}

/// Transport shape of a menu item as written in a menu definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDefinition {
    /// Item label.
    pub label: String,
    /// Route path.
    pub path: String,
    /// Optional icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional capability transport name.
    #[serde(default)]
    pub required_capability: Option<String>,
    /// Admin-only flag.
    #[serde(default)]
    pub requires_admin: bool,
    /// Sub-admin flag.
    #[serde(default)]
    pub requires_subadmin: bool,
}

/// Transport shape of a menu section as written in a menu definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSectionDefinition {
    /// Section id.
    pub id: String,
    /// Section label.
    pub label: String,
    /// Whether the section starts expanded.
    #[serde(default)]
    pub default_open: bool,
    /// Section items.
    #[serde(default)]
    pub items: Vec<MenuItemDefinition>,
}

/// Menu built from definitions, with the capability names that did not
/// resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMenu {
    /// Validated sections in definition order.
    pub sections: Vec<MenuSection>,
    /// Unknown capability names with the path that referenced them.
    pub unknown_capabilities: Vec<(String, String)>,
}

/// Builds validated sections from definitions.
pub fn resolve_menu_definitions(
    definitions: Vec<MenuSectionDefinition>,
    policy: UnknownCapabilityPolicy,
) -> AppResult<ResolvedMenu> {
    let mut sections = Vec::with_capacity(definitions.len());
    let mut unknown_capabilities = Vec::new();
    let mut seen_sections = BTreeSet::new();

    for definition in definitions {
        if !seen_sections.insert(definition.id.clone()) {
            return Err(AppError::Validation(format!(
                "duplicate menu section '{}'",
                definition.id
            )));
        }

        let mut items = Vec::with_capacity(definition.items.len());
        for item_definition in definition.items {
            let mut item = MenuItem::new(
                item_definition.label,
                item_definition.path,
                item_definition.icon,
            )?;

            if let Some(name) = item_definition.required_capability {
                match Capability::from_transport(name.as_str()) {
                    Ok(capability) => item = item.with_capability(capability),
                    Err(_) => {
                        unknown_capabilities.push((name, item.path().as_str().to_owned()));
                        if policy == UnknownCapabilityPolicy::Deny {
                            continue;
                        }
                    }
                }
            }
            if item_definition.requires_admin {
                item = item.admin_only();
            }
            if item_definition.requires_subadmin {
                item = item.subadmin_only();
            }

            items.push(item);
        }

        sections.push(MenuSection::new(
            definition.id,
            definition.label,
            definition.default_open,
            items,
        )?);
    }

    Ok(ResolvedMenu {
        sections,
        unknown_capabilities,
    })
}

/// Returns the built-in console navigation.
pub fn console_menu() -> AppResult<Vec<MenuSection>> {
    Ok(vec![
        MenuSection::new(
            "overview",
            "Overview",
            true,
            vec![
                MenuItem::new("Dashboard", "/", Some("layout-dashboard".to_owned()))?
                    .with_capability(Capability::ViewDashboard),
                MenuItem::new("Analytics", "/analytics", Some("chart-line".to_owned()))?
                    .with_capability(Capability::ViewAnalytics),
                MenuItem::new("My profile", "/profile", Some("user".to_owned()))?
                    .with_capability(Capability::ViewOwnProfile),
            ],
        )?,
        MenuSection::new(
            "data_rooms",
            "Data rooms",
            false,
            vec![
                MenuItem::new("All data rooms", "/data-rooms", Some("folder-lock".to_owned()))?
                    .with_capability(Capability::ManageDataRooms),
                MenuItem::new("Create data room", "/data-rooms/new", Some("folder-plus".to_owned()))?
                    .with_capability(Capability::ManageDataRooms),
            ],
        )?,
        MenuSection::new(
            "people",
            "Users and groups",
            false,
            vec![
                MenuItem::new("Users", "/users", Some("users".to_owned()))?
                    .with_capability(Capability::AccessUsersManagement),
                MenuItem::new("Groups", "/groups", Some("users-round".to_owned()))?
                    .with_capability(Capability::AccessGroupsManagement),
                MenuItem::new("Sub-admins", "/subadmins", Some("user-cog".to_owned()))?
                    .admin_only(),
            ],
        )?,
        MenuSection::new(
            "monitoring",
            "Monitoring",
            false,
            vec![
                MenuItem::new("Activity", "/monitoring/activity", Some("activity".to_owned()))?
                    .subadmin_only(),
                MenuItem::new("Audit logs", "/audit-logs", Some("scroll-text".to_owned()))?
                    .with_capability(Capability::AccessAuditLogs),
                MenuItem::new("System health", "/monitoring/system", Some("server".to_owned()))?
                    .with_capability(Capability::AccessSystemMonitoring),
            ],
        )?,
        MenuSection::new(
            "administration",
            "Administration",
            false,
            vec![
                MenuItem::new("Roles and permissions", "/roles", Some("shield".to_owned()))?
                    .with_capability(Capability::ManageRoles),
                MenuItem::new("Settings", "/settings", Some("settings".to_owned()))?
                    .with_capability(Capability::AccessSettings),
            ],
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::{
        MenuItem, MenuItemDefinition, MenuSection, MenuSectionDefinition,
        UnknownCapabilityPolicy, console_menu, resolve_menu_definitions,
    };
    use crate::Capability;

    fn definitions_with_unknown_capability() -> Vec<MenuSectionDefinition> {
        vec![MenuSectionDefinition {
            id: "reports".to_owned(),
            label: "Reports".to_owned(),
            default_open: false,
            items: vec![
                MenuItemDefinition {
                    label: "Exports".to_owned(),
                    path: "/reports/exports".to_owned(),
                    icon: None,
                    required_capability: Some("reports.export".to_owned()),
                    requires_admin: false,
                    requires_subadmin: false,
                },
                MenuItemDefinition {
                    label: "Usage".to_owned(),
                    path: "/reports/usage".to_owned(),
                    icon: Some("chart-bar".to_owned()),
                    required_capability: Some("analytics.view".to_owned()),
                    requires_admin: false,
                    requires_subadmin: false,
                },
            ],
        }]
    }

    #[test]
    fn menu_item_requires_absolute_path() {
        assert!(MenuItem::new("Users", "users", None).is_err());
    }

    #[test]
    fn menu_item_without_requirements_is_unrestricted() {
        let item = MenuItem::new("Help", "/help", Some("  ".to_owned()));
        assert!(item.as_ref().is_ok_and(MenuItem::is_unrestricted));
        assert_eq!(item.ok().and_then(|item| item.icon().map(ToOwned::to_owned)), None);
    }

    #[test]
    fn menu_section_rejects_duplicate_paths() {
        let items = ["/users", "/users"]
            .into_iter()
            .filter_map(|path| MenuItem::new("Users", path, None).ok())
            .collect();
        assert!(MenuSection::new("people", "People", false, items).is_err());
    }

    #[test]
    fn console_menu_is_valid() {
        let menu = console_menu();
        assert!(menu.is_ok());
        let menu = menu.unwrap_or_default();
        assert_eq!(menu.len(), 5);
        assert!(menu.iter().all(|section| !section.items().is_empty()));
    }

    #[test]
    fn deny_policy_drops_items_with_unknown_capability() {
        let resolved = resolve_menu_definitions(
            definitions_with_unknown_capability(),
            UnknownCapabilityPolicy::Deny,
        );
        assert!(resolved.is_ok());
        let Ok(resolved) = resolved else { return };

        let paths: Vec<&str> = resolved.sections[0]
            .items()
            .iter()
            .map(|item| item.path().as_str())
            .collect();
        assert_eq!(paths, vec!["/reports/usage"]);
        assert_eq!(
            resolved.unknown_capabilities,
            vec![("reports.export".to_owned(), "/reports/exports".to_owned())]
        );
    }

    #[test]
    fn allow_policy_keeps_items_with_unknown_capability() {
        let resolved = resolve_menu_definitions(
            definitions_with_unknown_capability(),
            UnknownCapabilityPolicy::Allow,
        );
        let Ok(resolved) = resolved else {
            panic!("definitions should resolve");
        };

        let items = resolved.sections[0].items();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_unrestricted());
        assert_eq!(
            items[1].required_capability(),
            Some(Capability::ViewAnalytics)
        );
    }

    #[test]
    fn duplicate_section_ids_are_rejected() {
        let mut definitions = definitions_with_unknown_capability();
        definitions.extend(definitions_with_unknown_capability());
        assert!(resolve_menu_definitions(definitions, UnknownCapabilityPolicy::Deny).is_err());
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(
            "ALLOW".parse::<UnknownCapabilityPolicy>().ok(),
            Some(UnknownCapabilityPolicy::Allow)
        );
        assert!("maybe".parse::<UnknownCapabilityPolicy>().is_err());
    }
}
