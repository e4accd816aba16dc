//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use edge_config::EdgeConfig;
use edge_core::Application;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_full_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://api.marketedge.test"
prefix = "/api/v2"
timeout_secs = 5

[session]
token_refresh_interval_secs = 300
refresh_buffer_secs = 30
activity_check_interval_secs = 15
idle_timeout_secs = 900
keyring_service = "marketedge-staging"
credentials_file = "/tmp/marketedge-creds"

[apps]
priority = ["value_edge", "causal_edge"]
selection_file = "/tmp/marketedge-last-app"
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(EdgeConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = EdgeConfig::from_figment(&figment).expect("valid config");

        assert_eq!(
            config.api.endpoint("/auth/me"),
            "https://api.marketedge.test/api/v2/auth/me"
        );
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.session.token_refresh_interval_secs, 300);
        assert_eq!(config.session.refresh_buffer_secs, 30);
        assert_eq!(config.session.activity_check_interval_secs, 15);
        assert_eq!(config.session.idle_timeout_secs, 900);
        assert_eq!(config.session.keyring_service, "marketedge-staging");
        assert_eq!(
            config.apps.priority_applications().expect("priority parses"),
            vec![Application::ValueEdge, Application::CausalEdge]
        );
        assert_eq!(
            config.apps.selection_path(),
            Some(std::path::PathBuf::from("/tmp/marketedge-last-app"))
        );
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[session]
idle_timeout_secs = 120
"#,
        )?;

        let config: EdgeConfig = Figment::from(Serialized::defaults(EdgeConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.session.idle_timeout_secs, 120);
        assert_eq!(config.session.token_refresh_interval_secs, 840);
        assert_eq!(config.api.base_url, "http://localhost:8000");
        Ok(())
    });
}

#[test]
fn unknown_priority_application_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[apps]
priority = ["pricing_edge"]
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(EdgeConfig::default()))
            .merge(Toml::file("config.toml"));
        let err = EdgeConfig::from_figment(&figment).unwrap_err();
        assert!(err.to_string().contains("pricing_edge"));
        Ok(())
    });
}
