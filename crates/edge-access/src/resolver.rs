//! Access queries over a user's application grants.
//!
//! Closed world: an application without a record is not accessible. When the
//! list carries several records for one application, the first one counts:
//! duplicates resolve first-wins, not any-wins, so a later grant cannot undo
//! an earlier denial.
//! Every function is total; an empty list yields `false`, `[]`, or `None`.

use std::collections::HashSet;

use edge_core::{Application, ApplicationAccess};

/// Whether `application` is granted.
#[must_use]
pub fn has_application_access(access: &[ApplicationAccess], application: Application) -> bool {
    access
        .iter()
        .find(|entry| entry.application == application)
        .is_some_and(|entry| entry.has_access)
}

/// Granted applications in input order.
#[must_use]
pub fn accessible_applications(access: &[ApplicationAccess]) -> Vec<Application> {
    let mut seen = HashSet::new();
    access
        .iter()
        .filter(|entry| seen.insert(entry.application))
        .filter(|entry| entry.has_access)
        .map(|entry| entry.application)
        .collect()
}

#[must_use]
pub fn has_any_application_access(access: &[ApplicationAccess]) -> bool {
    !accessible_applications(access).is_empty()
}

/// First granted application in input order.
#[must_use]
pub fn primary_application(access: &[ApplicationAccess]) -> Option<Application> {
    accessible_applications(access).first().copied()
}

/// First granted application in `priority` order, falling back to input order
/// for applications the priority list does not mention.
#[must_use]
pub fn primary_application_by(
    access: &[ApplicationAccess],
    priority: &[Application],
) -> Option<Application> {
    priority
        .iter()
        .copied()
        .find(|application| has_application_access(access, *application))
        .or_else(|| primary_application(access))
}

/// Collapse duplicate records, keeping the first per application.
#[must_use]
pub fn normalize(access: &[ApplicationAccess]) -> Vec<ApplicationAccess> {
    ApplicationAccess::dedupe(access.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use edge_core::Application::{CausalEdge, MarketEdge, ValueEdge};

    fn grant(application: Application, has_access: bool) -> ApplicationAccess {
        ApplicationAccess {
            application,
            has_access,
        }
    }

    fn mixed() -> Vec<ApplicationAccess> {
        vec![
            grant(MarketEdge, false),
            grant(CausalEdge, true),
            grant(ValueEdge, true),
        ]
    }

    #[test]
    fn mixed_grants_resolve_in_input_order() {
        let access = mixed();
        assert_eq!(accessible_applications(&access), vec![CausalEdge, ValueEdge]);
        assert_eq!(primary_application(&access), Some(CausalEdge));
        assert!(has_any_application_access(&access));
        assert!(!has_application_access(&access, MarketEdge));
        assert!(has_application_access(&access, ValueEdge));
    }

    #[test]
    fn empty_list_denies_everything() {
        let access: Vec<ApplicationAccess> = Vec::new();
        for application in Application::ALL {
            assert!(!has_application_access(&access, application));
        }
        assert!(accessible_applications(&access).is_empty());
        assert_eq!(primary_application(&access), None);
        assert_eq!(primary_application_by(&access, &[MarketEdge]), None);
        assert!(!has_any_application_access(&access));
    }

    #[test]
    fn missing_record_is_denied() {
        let access = vec![grant(CausalEdge, true)];
        assert!(!has_application_access(&access, MarketEdge));
        assert!(!has_application_access(&access, ValueEdge));
    }

    #[test]
    fn all_denied_has_no_primary() {
        let access = vec![grant(MarketEdge, false), grant(ValueEdge, false)];
        assert!(!has_any_application_access(&access));
        assert_eq!(primary_application(&access), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let access = vec![
            grant(MarketEdge, false),
            grant(CausalEdge, true),
            grant(MarketEdge, true),
        ];
        assert!(!has_application_access(&access, MarketEdge));
        assert_eq!(accessible_applications(&access), vec![CausalEdge]);
        assert_eq!(
            normalize(&access),
            vec![grant(MarketEdge, false), grant(CausalEdge, true)]
        );

        let reversed = vec![grant(MarketEdge, true), grant(MarketEdge, false)];
        assert!(has_application_access(&reversed, MarketEdge));
        assert_eq!(accessible_applications(&reversed), vec![MarketEdge]);
    }

    #[test]
    fn accessible_applications_is_deterministic() {
        let access = mixed();
        assert_eq!(
            accessible_applications(&access),
            accessible_applications(&access)
        );
    }

    #[rstest]
    #[case::priority_wins(&[ValueEdge, CausalEdge], Some(ValueEdge))]
    #[case::skips_denied(&[MarketEdge, ValueEdge], Some(ValueEdge))]
    #[case::falls_back_to_input_order(&[MarketEdge], Some(CausalEdge))]
    #[case::empty_priority(&[], Some(CausalEdge))]
    fn primary_by_priority(#[case] priority: &[Application], #[case] expected: Option<Application>) {
        assert_eq!(primary_application_by(&mixed(), priority), expected);
    }
}
