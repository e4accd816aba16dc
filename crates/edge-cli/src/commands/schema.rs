use edge_core::{Application, ApplicationAccess, Role, Tenant, User, WhoAmI};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `medge schema`.
pub const SCHEMA_NAMES: [&str; 6] = [
    "user",
    "tenant",
    "whoami",
    "application",
    "application_access",
    "role",
];

/// JSON Schema for a wire type, looked up by name.
pub fn schema_by_name(name: &str) -> Option<serde_json::Value> {
    let schema = match name.to_ascii_lowercase().replace('-', "_").as_str() {
        "user" => schema_for!(User),
        "tenant" => schema_for!(Tenant),
        "whoami" => schema_for!(WhoAmI),
        "application" => schema_for!(Application),
        "application_access" => schema_for!(ApplicationAccess),
        "role" => schema_for!(Role),
        _ => return None,
    };
    serde_json::to_value(schema).ok()
}

/// Handle `medge schema <type>`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(schema) = schema_by_name(&args.type_name) else {
        anyhow::bail!(
            "unknown schema type '{}'; expected one of: {}",
            args.type_name,
            SCHEMA_NAMES.join(", ")
        );
    };
    output(&schema, flags.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in SCHEMA_NAMES {
            let schema = schema_by_name(name).expect(name);
            assert!(schema.is_object(), "{name} schema should be an object");
        }
    }

    #[test]
    fn user_schema_names_wire_fields() {
        let schema = schema_by_name("User").expect("user schema");
        let properties = &schema["properties"];
        assert!(properties.get("role").is_some());
        assert!(properties.get("application_access").is_some());
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(schema_by_name("invoice").is_none());
    }
}
