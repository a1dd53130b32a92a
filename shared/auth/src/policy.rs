//! The fixed six-role capability matrix (spec §4.3). This is a closed,
//! compile-time table — there is no dynamic policy store to administer,
//! because the spec gives no role beyond these six and no way to add
//! one at runtime. Row/field-level rules that need data the role alone
//! can't answer (does this parent link to this student? does this
//! teacher own this class?) are *not* modeled here; they stay in the
//! service layer, which is the only place with access to the repository
//! needed to check them (spec §4.3 rules c, d).

use shared_context::Role;
use shared_error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageSchools,
    ManageDevices,
    ManageTenantUsers,
    ManageClasses,
    ManageStudents,
    ManageParentLinks,
    ManageSchedules,
    ManageDisplayTokens,
    ReadAllStudentsInTenant,
    ManageCounseling,
    ReadCounselingInternal,
    WriteOwnClassRecords,
    SubmitManualAttendance,
    ViewLiveFeed,
}

impl Capability {
    fn allowed_roles(self) -> &'static [Role] {
        use Role::*;
        match self {
            Capability::ManageSchools => &[PlatformAdmin],
            Capability::ManageDevices => &[PlatformAdmin],
            Capability::ManageTenantUsers => &[SchoolAdmin],
            Capability::ManageClasses => &[SchoolAdmin],
            Capability::ManageStudents => &[SchoolAdmin],
            Capability::ManageParentLinks => &[SchoolAdmin],
            Capability::ManageSchedules => &[SchoolAdmin],
            Capability::ManageDisplayTokens => &[SchoolAdmin],
            Capability::ReadAllStudentsInTenant => &[SchoolAdmin, Counselor],
            Capability::ManageCounseling => &[Counselor],
            Capability::ReadCounselingInternal => &[Counselor],
            Capability::WriteOwnClassRecords => &[HomeroomTeacher],
            Capability::SubmitManualAttendance => &[HomeroomTeacher, SchoolAdmin],
            Capability::ViewLiveFeed => &[SchoolAdmin, HomeroomTeacher],
        }
    }
}

/// Returns `Ok(())` if `role` holds `capability`, else
/// `AppError::Forbidden`. Callers still owe the row-level checks the
/// matrix can't express (class ownership, parent↔student link).
pub fn authorize(role: Role, capability: Capability) -> Result<(), AppError> {
    if capability.allowed_roles().contains(&role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{role}' does not have capability {capability:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_admin_manages_schedules() {
        assert!(authorize(Role::SchoolAdmin, Capability::ManageSchedules).is_ok());
        assert!(authorize(Role::Parent, Capability::ManageSchedules).is_err());
    }

    #[test]
    fn only_counselor_sees_internal_notes() {
        for role in [
            Role::PlatformAdmin,
            Role::SchoolAdmin,
            Role::HomeroomTeacher,
            Role::Parent,
            Role::Student,
        ] {
            assert!(authorize(role, Capability::ReadCounselingInternal).is_err());
        }
        assert!(authorize(Role::Counselor, Capability::ReadCounselingInternal).is_ok());
    }

    #[test]
    fn homeroom_and_school_admin_submit_manual_attendance() {
        assert!(authorize(Role::HomeroomTeacher, Capability::SubmitManualAttendance).is_ok());
        assert!(authorize(Role::SchoolAdmin, Capability::SubmitManualAttendance).is_ok());
        assert!(authorize(Role::Counselor, Capability::SubmitManualAttendance).is_err());
    }
}
