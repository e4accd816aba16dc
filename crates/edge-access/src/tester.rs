//! Access test report: every known application with its grant, plus the
//! resolver's answers for the same list.

use edge_core::{Application, ApplicationAccess};
use serde::Serialize;

use crate::resolver::{
    accessible_applications, has_any_application_access, has_application_access,
    primary_application_by,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantRow {
    pub application: Application,
    pub label: &'static str,
    pub has_access: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessReport {
    /// One row per known application, in catalogue order.
    pub grants: Vec<GrantRow>,
    pub accessible: Vec<Application>,
    pub primary: Option<Application>,
    pub has_any_access: bool,
}

impl AccessReport {
    #[must_use]
    pub fn build(access: &[ApplicationAccess], priority: &[Application]) -> Self {
        let grants = Application::ALL
            .iter()
            .map(|&application| GrantRow {
                application,
                label: application.label(),
                has_access: has_application_access(access, application),
            })
            .collect();
        Self {
            grants,
            accessible: accessible_applications(access),
            primary: primary_application_by(access, priority),
            has_any_access: has_any_application_access(access),
        }
    }
}
