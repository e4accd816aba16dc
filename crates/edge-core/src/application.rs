//! Applications of the MarketEdge platform and per-user access grants.
//!
//! The backend sends one `{ application, has_access }` record per application.
//! Identifiers arrive in several spellings (`market_edge`, `MARKET_EDGE`), so
//! parsing is case-insensitive and accepts `-` as a separator. Unknown
//! identifiers are dropped rather than failing the whole response.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// A product application a user may be granted access to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    #[serde(alias = "MARKET_EDGE", alias = "market-edge")]
    MarketEdge,
    #[serde(alias = "CAUSAL_EDGE", alias = "causal-edge")]
    CausalEdge,
    #[serde(alias = "VALUE_EDGE", alias = "value-edge")]
    ValueEdge,
}

impl Application {
    /// Every known application, in catalogue order.
    pub const ALL: [Self; 3] = [Self::MarketEdge, Self::CausalEdge, Self::ValueEdge];

    /// Wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketEdge => "market_edge",
            Self::CausalEdge => "causal_edge",
            Self::ValueEdge => "value_edge",
        }
    }

    /// Human-readable product name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MarketEdge => "Market Edge",
            Self::CausalEdge => "Causal Edge",
            Self::ValueEdge => "Value Edge",
        }
    }

    /// Route of the application's landing page.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::MarketEdge => "/market-edge",
            Self::CausalEdge => "/causal-edge",
            Self::ValueEdge => "/value-edge",
        }
    }

    /// Icon identifier used by the switcher.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::MarketEdge => "chart-bar",
            Self::CausalEdge => "beaker",
            Self::ValueEdge => "currency-dollar",
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Application {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "market_edge" => Ok(Self::MarketEdge),
            "causal_edge" => Ok(Self::CausalEdge),
            "value_edge" => Ok(Self::ValueEdge),
            _ => Err(CoreError::UnknownApplication(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ApplicationAccess
// ---------------------------------------------------------------------------

/// A per-(user, application) boolean grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationAccess {
    pub application: Application,
    pub has_access: bool,
}

impl ApplicationAccess {
    #[must_use]
    pub const fn granted(application: Application) -> Self {
        Self {
            application,
            has_access: true,
        }
    }

    #[must_use]
    pub const fn denied(application: Application) -> Self {
        Self {
            application,
            has_access: false,
        }
    }

    /// Keep the first record per application, dropping later duplicates.
    #[must_use]
    pub fn dedupe(list: Vec<Self>) -> Vec<Self> {
        let mut seen = HashSet::with_capacity(list.len());
        list.into_iter()
            .filter(|entry| {
                let first = seen.insert(entry.application);
                if !first {
                    tracing::warn!(
                        application = %entry.application,
                        "duplicate application access record ignored"
                    );
                }
                first
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawAccess {
    application: String,
    #[serde(default)]
    has_access: bool,
}

/// Deserialize an access list from the backend.
///
/// `null` becomes an empty list, unknown applications are skipped, and
/// duplicates are collapsed to their first occurrence.
///
/// # Errors
///
/// Returns the deserializer error if the value is neither `null` nor a list of
/// `{ application, has_access }` objects.
pub fn deserialize_access_list<'de, D>(deserializer: D) -> Result<Vec<ApplicationAccess>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawAccess>>::deserialize(deserializer)?.unwrap_or_default();
    let parsed = raw
        .into_iter()
        .filter_map(|entry| match entry.application.parse::<Application>() {
            Ok(application) => Some(ApplicationAccess {
                application,
                has_access: entry.has_access,
            }),
            Err(error) => {
                tracing::warn!(%error, "skipping access record for unknown application");
                None
            }
        })
        .collect();
    Ok(ApplicationAccess::dedupe(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("market_edge", Application::MarketEdge)]
    #[case("MARKET_EDGE", Application::MarketEdge)]
    #[case("causal-edge", Application::CausalEdge)]
    #[case(" Value_Edge ", Application::ValueEdge)]
    fn parses_identifier_spellings(#[case] input: &str, #[case] expected: Application) {
        assert_eq!(input.parse::<Application>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_identifier() {
        let err = "pricing_edge".parse::<Application>().unwrap_err();
        assert_eq!(err, CoreError::UnknownApplication("pricing_edge".into()));
    }

    #[test]
    fn display_matches_wire_identifier() {
        for app in Application::ALL {
            let json = serde_json::to_value(app).unwrap();
            assert_eq!(json, serde_json::Value::String(app.to_string()));
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let list = vec![
            ApplicationAccess::denied(Application::MarketEdge),
            ApplicationAccess::granted(Application::CausalEdge),
            ApplicationAccess::granted(Application::MarketEdge),
        ];
        let deduped = ApplicationAccess::dedupe(list);
        assert_eq!(
            deduped,
            vec![
                ApplicationAccess::denied(Application::MarketEdge),
                ApplicationAccess::granted(Application::CausalEdge),
            ]
        );
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_access_list")]
        access: Vec<ApplicationAccess>,
    }

    #[test]
    fn null_list_deserializes_empty() {
        let holder: Holder = serde_json::from_str(r#"{"access": null}"#).unwrap();
        assert!(holder.access.is_empty());
    }

    #[test]
    fn missing_list_deserializes_empty() {
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert!(holder.access.is_empty());
    }

    #[test]
    fn unknown_applications_are_skipped() {
        let holder: Holder = serde_json::from_str(
            r#"{"access": [
                {"application": "PRICING_EDGE", "has_access": true},
                {"application": "VALUE_EDGE", "has_access": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            holder.access,
            vec![ApplicationAccess::granted(Application::ValueEdge)]
        );
    }

    #[test]
    fn missing_has_access_means_denied() {
        let holder: Holder =
            serde_json::from_str(r#"{"access": [{"application": "market_edge"}]}"#).unwrap();
        assert_eq!(
            holder.access,
            vec![ApplicationAccess::denied(Application::MarketEdge)]
        );
    }
}
