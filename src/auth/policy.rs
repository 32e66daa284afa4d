//! The authorization predicate. Every role-gated endpoint asks this one
//! table instead of re-deriving role checks inline.

use derive_more::Display;

use crate::model::role::Role;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum Action {
    /// Create or update employee accounts.
    ManageAccounts,
    /// List and view employee profiles.
    ViewAccounts,
    /// Approve or reject leave requests.
    DecideLeave,
    /// See leave requests of other accounts.
    ViewAllLeaves,
    /// Create or update payroll records.
    ManagePayroll,
    /// See payroll records of other accounts.
    ViewAllPayroll,
    /// See attendance records of other accounts.
    ViewAllAttendance,
}

pub fn allows(role: Role, action: Action) -> bool {
    match action {
        Action::ViewAccounts => true,
        Action::ManageAccounts
        | Action::DecideLeave
        | Action::ViewAllLeaves
        | Action::ManagePayroll
        | Action::ViewAllPayroll
        | Action::ViewAllAttendance => role == Role::Admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_allowed_everything() {
        for action in [
            Action::ManageAccounts,
            Action::ViewAccounts,
            Action::DecideLeave,
            Action::ViewAllLeaves,
            Action::ManagePayroll,
            Action::ViewAllPayroll,
            Action::ViewAllAttendance,
        ] {
            assert!(allows(Role::Admin, action), "admin denied {action}");
        }
    }

    #[test]
    fn employee_is_limited_to_viewing_profiles() {
        assert!(allows(Role::Employee, Action::ViewAccounts));
        for action in [
            Action::ManageAccounts,
            Action::DecideLeave,
            Action::ViewAllLeaves,
            Action::ManagePayroll,
            Action::ViewAllPayroll,
            Action::ViewAllAttendance,
        ] {
            assert!(!allows(Role::Employee, action), "employee allowed {action}");
        }
    }
}
