//! Route paths shared by the guard, the menu and the auth flow.

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const NOT_FOUND: &str = "/404";

pub const STUDENT_DASHBOARD: &str = "/student/dashboard";
pub const STUDENT_PROFILE: &str = "/student/profile";
pub const STUDENT_INTERNSHIPS: &str = "/student/internships";
pub const STUDENT_APPLICATIONS: &str = "/student/applications";

pub const HR_DASHBOARD: &str = "/hr/dashboard";
pub const HR_PROFILE: &str = "/hr/profile";
pub const HR_POST: &str = "/hr/post";
pub const HR_APPLICATIONS: &str = "/hr/applications";
pub const HR_COMPANY: &str = "/hr/company";

pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
pub const ADMIN_USERS: &str = "/admin/users";
pub const ADMIN_INTERNSHIPS: &str = "/admin/internships";
pub const ADMIN_COMPANIES: &str = "/admin/companies";

/// Landing page for a role tag as returned by the backend. Unknown tags land on
/// the student dashboard.
#[must_use]
pub fn dashboard_for(role_tag: &str) -> &'static str {
    match role_tag.trim() {
        "admin" => ADMIN_DASHBOARD,
        "hr" => HR_DASHBOARD,
        _ => STUDENT_DASHBOARD,
    }
}
