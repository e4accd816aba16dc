use edge_access::has_application_access;
use edge_auth::AuthState;
use edge_core::Application;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AppRow {
    application: Application,
    label: &'static str,
    route: &'static str,
    has_access: bool,
    current: bool,
}

pub fn handle(state: &AuthState, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let current = ctx.switcher(state)?.current();
    let access = state.application_access();

    let rows = Application::ALL
        .iter()
        .map(|&application| AppRow {
            application,
            label: application.label(),
            route: application.route(),
            has_access: has_application_access(access, application),
            current: current == Some(application),
        })
        .collect::<Vec<_>>();
    output(&rows, flags.format)
}
