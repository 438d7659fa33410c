use std::path::PathBuf;

use argo_codec::{CodecOptions, encode_desc};
use argo_core::Value;

use super::{CommandError, exit_on_error, loader};

pub struct EncodeDescArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub options: CodecOptions,
}

pub fn run(args: EncodeDescArgs) {
    exit_on_error(execute(&args));
}

pub fn execute(args: &EncodeDescArgs) -> Result<(), CommandError> {
    let json = loader::read_text(&args.input)?;
    let value: Value = serde_json::from_str(&json).map_err(|source| CommandError::Json {
        path: args.input.clone(),
        source,
    })?;

    let bytes = encode_desc(&value, args.options)?;
    tracing::info!(json = json.len(), argo = bytes.len(), "encoded self-describing value");
    loader::write_output(args.output.as_deref(), &bytes)
}
