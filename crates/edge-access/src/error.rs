use std::path::PathBuf;

use edge_core::Application;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("no access to {0}")]
    NotAccessible(Application),

    #[error("selection store {}: {source}", path.display())]
    SelectionStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
