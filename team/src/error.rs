use pokebat_battle::BattleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog entry {index} is invalid: {source}")]
    InvalidCreature {
        index: usize,
        #[source]
        source: BattleError,
    },

    #[error("Catalog has {available} creatures, a battle needs {needed}")]
    CatalogTooSmall { needed: usize, available: usize },
}
