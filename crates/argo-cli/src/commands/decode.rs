use std::path::PathBuf;

use argo_codec::CodecOptions;

use super::{CommandError, exit_on_error, load_codec, loader};

pub struct DecodeArgs {
    pub schema: PathBuf,
    pub query: PathBuf,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub operation: Option<String>,
    pub pretty: bool,
    pub options: CodecOptions,
}

pub fn run(args: DecodeArgs) {
    exit_on_error(execute(&args));
}

pub fn execute(args: &DecodeArgs) -> Result<(), CommandError> {
    let codec = load_codec(&args.schema, &args.query, args.operation.as_deref(), args.options)?;

    let bytes = loader::read_bytes(&args.input)?;
    let result = codec.decode(&bytes)?;
    tracing::info!(argo = bytes.len(), errors = result.errors.len(), "decoded result");

    let mut json = result.to_json(args.pretty).map_err(CommandError::Render)?;
    json.push('\n');
    loader::write_output(args.output.as_deref(), json.as_bytes())
}
