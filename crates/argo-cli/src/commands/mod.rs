pub mod decode;
pub mod encode;
pub mod encode_desc;
pub mod loader;
pub mod wire;


use std::path::{Path, PathBuf};

use argo_codec::{CodecOptions, DecodeError, EncodeError, ExecutionResultCodec};
use argo_typer::TypeError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to render JSON: {0}")]
    Render(#[source] serde_json::Error),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Print the error and exit with status 1.
pub fn exit_on_error(result: Result<(), CommandError>) {
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Read the schema and query and resolve the codec for `operation`.
pub fn load_codec(
    schema: &Path,
    query: &Path,
    operation: Option<&str>,
    options: CodecOptions,
) -> Result<ExecutionResultCodec, CommandError> {
    let schema_text = loader::read_text(schema)?;
    let query_text = loader::read_text(query)?;
    let codec = ExecutionResultCodec::from_text(&schema_text, &query_text, operation)?;
    tracing::debug!(schema = %schema.display(), query = %query.display(), "resolved wire type");
    Ok(codec.with_options(options))
}
