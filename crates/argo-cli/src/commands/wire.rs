use std::path::PathBuf;

use argo_codec::CodecOptions;

use super::{CommandError, exit_on_error, load_codec, loader};

pub struct WireArgs {
    pub schema: PathBuf,
    pub query: PathBuf,
    pub operation: Option<String>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub fn run(args: WireArgs) {
    exit_on_error(execute(&args));
}

pub fn execute(args: &WireArgs) -> Result<(), CommandError> {
    let codec = load_codec(
        &args.schema,
        &args.query,
        args.operation.as_deref(),
        CodecOptions::default(),
    )?;
    let ty = codec.data_type();

    let mut text = if args.json {
        serde_json::to_string_pretty(ty).map_err(CommandError::Render)?
    } else {
        ty.to_string()
    };
    text.push('\n');
    loader::write_output(args.output.as_deref(), text.as_bytes())
}
