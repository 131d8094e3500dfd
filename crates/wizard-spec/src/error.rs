use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("failed to parse wizard config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse wizard snapshot: {0}")]
    SnapshotParse(#[source] serde_json::Error),
    #[error("json encode error: {0}")]
    Json(#[source] serde_json::Error),
    #[error("cbor codec error: {0}")]
    Cbor(#[source] serde_cbor::Error),
    #[error("template render failed: {0}")]
    Template(#[from] Box<handlebars::RenderError>),
}
