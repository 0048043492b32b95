//! Dashboard side navigation, derived from the role alone so it can be tested
//! without rendering.
//!
//! Every role starts with its own dashboard; the remaining entries follow the
//! portal layout (student: profile and search, HR: hiring tools, admin: platform
//! management).

use crate::access::paths;
use crate::session::Role;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

impl NavItem {
    const fn new(label: &'static str, path: &'static str) -> Self {
        Self { label, path }
    }

    /// Exact path match, used to highlight the current page.
    #[must_use]
    pub fn is_active(&self, pathname: &str) -> bool {
        self.path == pathname
    }
}

const STUDENT_ITEMS: [NavItem; 3] = [
    NavItem::new("Profile", paths::STUDENT_PROFILE),
    NavItem::new("Find Internships", paths::STUDENT_INTERNSHIPS),
    NavItem::new("My Applications", paths::STUDENT_APPLICATIONS),
];

const HR_ITEMS: [NavItem; 4] = [
    NavItem::new("Profile", paths::HR_PROFILE),
    NavItem::new("Post Internship", paths::HR_POST),
    NavItem::new("Applications", paths::HR_APPLICATIONS),
    NavItem::new("Company Profile", paths::HR_COMPANY),
];

const ADMIN_ITEMS: [NavItem; 3] = [
    NavItem::new("Manage Users", paths::ADMIN_USERS),
    NavItem::new("Manage Internships", paths::ADMIN_INTERNSHIPS),
    NavItem::new("Manage Companies", paths::ADMIN_COMPANIES),
];

/// Ordered menu for `role`.
#[must_use]
pub fn nav_items(role: Role) -> Vec<NavItem> {
    let dashboard = NavItem::new("Dashboard", paths::dashboard_for(role.as_str()));
    let rest: &[NavItem] = match role {
        Role::Student => &STUDENT_ITEMS,
        Role::Hr => &HR_ITEMS,
        Role::Admin => &ADMIN_ITEMS,
    };

    std::iter::once(dashboard).chain(rest.iter().copied()).collect()
}

/// Title shown above the menu, e.g. "hr Portal".
#[must_use]
pub fn portal_title(role: Role) -> String {
    format!("{role} Portal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Navigation, RouteTable};
    use crate::session::Session;
    use secrecy::SecretString;

    fn labels(role: Role) -> Vec<&'static str> {
        nav_items(role).iter().map(|item| item.label).collect()
    }

    #[test]
    fn menus_follow_portal_order() {
        assert_eq!(
            labels(Role::Student),
            vec!["Dashboard", "Profile", "Find Internships", "My Applications"]
        );
        assert_eq!(
            labels(Role::Hr),
            vec![
                "Dashboard",
                "Profile",
                "Post Internship",
                "Applications",
                "Company Profile"
            ]
        );
        assert_eq!(
            labels(Role::Admin),
            vec![
                "Dashboard",
                "Manage Users",
                "Manage Internships",
                "Manage Companies"
            ]
        );
    }

    #[test]
    fn dashboard_entry_points_at_own_dashboard() {
        assert_eq!(nav_items(Role::Hr)[0].path, paths::HR_DASHBOARD);
        assert_eq!(nav_items(Role::Admin)[0].path, paths::ADMIN_DASHBOARD);
        assert_eq!(nav_items(Role::Student)[0].path, paths::STUDENT_DASHBOARD);
    }

    #[test]
    fn every_menu_entry_renders_for_its_role() -> anyhow::Result<()> {
        let table = RouteTable::standard()?;
        for role in Role::ALL {
            let session = Session {
                token: Some(SecretString::from("t".to_string())),
                role: Some(role.into()),
            };
            for item in nav_items(role) {
                assert_eq!(
                    table.navigate(item.path, &session),
                    Navigation::Render(item.path.to_string()),
                    "{role} cannot open {}",
                    item.path
                );
            }
        }
        Ok(())
    }

    #[test]
    fn active_item_matches_exact_path() {
        let item = NavItem::new("Profile", paths::HR_PROFILE);
        assert!(item.is_active("/hr/profile"));
        assert!(!item.is_active("/hr/profile/edit"));
        assert_eq!(portal_title(Role::Hr), "hr Portal");
    }
}
