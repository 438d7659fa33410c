use std::path::PathBuf;

use argo_codec::CodecOptions;
use argo_core::ExecutionResult;

use super::{CommandError, exit_on_error, load_codec, loader};

pub struct EncodeArgs {
    pub schema: PathBuf,
    pub query: PathBuf,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub operation: Option<String>,
    pub options: CodecOptions,
}

pub fn run(args: EncodeArgs) {
    exit_on_error(execute(&args));
}

pub fn execute(args: &EncodeArgs) -> Result<(), CommandError> {
    let codec = load_codec(&args.schema, &args.query, args.operation.as_deref(), args.options)?;

    let json = loader::read_text(&args.input)?;
    let result = ExecutionResult::from_json(&json).map_err(|source| CommandError::Json {
        path: args.input.clone(),
        source,
    })?;

    let bytes = codec.encode_to_vec(&result)?;
    tracing::info!(json = json.len(), argo = bytes.len(), "encoded result");
    loader::write_output(args.output.as_deref(), &bytes)
}
