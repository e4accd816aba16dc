use anyhow::Context;
use edge_config::EdgeConfig;

/// Load configuration, reading a `.env` file from the working directory first.
pub fn load_config() -> anyhow::Result<EdgeConfig> {
    EdgeConfig::load_with_dotenv().context("failed to load marketedge configuration")
}
