//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Flags shared by commands that run the codec.
fn with_codec_args(cmd: Command) -> Command {
    cmd.arg(output_arg()).arg(no_dedup_arg()).arg(max_depth_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("argo")
        .about("Compact binary encoding for GraphQL results")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(encode_command())
        .subcommand(decode_command())
        .subcommand(encode_desc_command())
        .subcommand(wire_command())
}

/// Encode a JSON result against a schema and query.
pub fn encode_command() -> Command {
    let cmd = Command::new("encode")
        .about("Encode a JSON execution result")
        .after_help(
            r#"EXAMPLES:
  argo encode schema.graphql query.graphql result.json -o result.argo
  argo encode schema.graphql ops.graphql result.json --operation GetUser"#,
        )
        .arg(schema_arg())
        .arg(query_arg())
        .arg(input_arg("RESULT_JSON", "JSON execution result ({ data, errors, extensions })"))
        .arg(operation_arg());
    with_codec_args(cmd)
}

/// Decode a binary result back to JSON.
pub fn decode_command() -> Command {
    Command::new("decode")
        .about("Decode a binary result to JSON")
        .arg(schema_arg())
        .arg(query_arg())
        .arg(input_arg("ARGO", "Encoded result"))
        .arg(operation_arg())
        .arg(pretty_arg())
        .arg(output_arg())
        .arg(max_depth_arg())
}

/// Encode arbitrary JSON without a schema.
pub fn encode_desc_command() -> Command {
    let cmd = Command::new("encode-desc")
        .about("Encode any JSON value self-describingly, without a schema")
        .arg(input_arg("JSON", "JSON document"));
    with_codec_args(cmd)
}

/// Show the resolved wire type.
pub fn wire_command() -> Command {
    Command::new("wire")
        .about("Print the wire type a query's results are encoded with")
        .arg(schema_arg())
        .arg(query_arg())
        .arg(operation_arg())
        .arg(json_arg())
        .arg(output_arg())
}
