use edge_access::AccessReport;
use edge_auth::AuthState;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub fn handle(state: &AuthState, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = AccessReport::build(state.application_access(), &ctx.priority()?);
    match flags.format {
        crate::cli::OutputFormat::Table => output(&report.grants, flags.format),
        _ => output(&report, flags.format),
    }
}
