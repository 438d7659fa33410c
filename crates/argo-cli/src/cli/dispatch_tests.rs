//! Tests for CLI dispatch logic.

use std::path::PathBuf;

use argo_codec::CodecOptions;

use super::*;
use crate::cli::commands::{decode_command, encode_command, encode_desc_command, wire_command};
use crate::commands::decode::DecodeArgs;
use crate::commands::encode::EncodeArgs;
use crate::commands::encode_desc::EncodeDescArgs;
use crate::commands::wire::WireArgs;

#[test]
fn encode_positionals_and_defaults() {
    let m = encode_command()
        .try_get_matches_from(["encode", "schema.graphql", "query.graphql", "result.json"])
        .unwrap();
    let params = EncodeParams::from_matches(&m);

    assert_eq!(params.schema, PathBuf::from("schema.graphql"));
    assert_eq!(params.query, PathBuf::from("query.graphql"));
    assert_eq!(params.input, PathBuf::from("result.json"));
    assert_eq!(params.output, None);
    assert_eq!(params.operation, None);
    assert!(!params.no_dedup);
    assert_eq!(params.max_depth, 512);

    let args: EncodeArgs = params.into();
    assert_eq!(args.options, CodecOptions::default());
}

#[test]
fn encode_flags() {
    let m = encode_command()
        .try_get_matches_from([
            "encode",
            "s.graphql",
            "q.graphql",
            "r.json",
            "-o",
            "out.argo",
            "--operation",
            "GetUser",
            "--no-dedup",
            "--max-depth",
            "32",
        ])
        .unwrap();
    let args: EncodeArgs = EncodeParams::from_matches(&m).into();

    assert_eq!(args.output, Some(PathBuf::from("out.argo")));
    assert_eq!(args.operation.as_deref(), Some("GetUser"));
    assert!(!args.options.deduplicates());
    assert_eq!(args.options.depth_limit(), 32);
}

#[test]
fn encode_requires_all_positionals() {
    let result = encode_command().try_get_matches_from(["encode", "s.graphql", "q.graphql"]);
    assert!(result.is_err());
}

#[test]
fn encode_rejects_non_numeric_depth() {
    let result = encode_command().try_get_matches_from([
        "encode",
        "s.graphql",
        "q.graphql",
        "r.json",
        "--max-depth",
        "deep",
    ]);
    assert!(result.is_err());
}

#[test]
fn decode_flags() {
    let m = decode_command()
        .try_get_matches_from([
            "decode",
            "s.graphql",
            "q.graphql",
            "r.argo",
            "--pretty",
            "--max-depth",
            "8",
        ])
        .unwrap();
    let args: DecodeArgs = DecodeParams::from_matches(&m).into();

    assert_eq!(args.input, PathBuf::from("r.argo"));
    assert!(args.pretty);
    assert_eq!(args.options.depth_limit(), 8);
    assert!(args.options.deduplicates());
}

#[test]
fn decode_has_no_dedup_switch() {
    let result = decode_command().try_get_matches_from([
        "decode",
        "s.graphql",
        "q.graphql",
        "r.argo",
        "--no-dedup",
    ]);
    assert!(result.is_err());
}

#[test]
fn encode_desc_takes_one_input() {
    let m = encode_desc_command()
        .try_get_matches_from(["encode-desc", "-", "--no-dedup"])
        .unwrap();
    let args: EncodeDescArgs = EncodeDescParams::from_matches(&m).into();

    assert_eq!(args.input, PathBuf::from("-"));
    assert_eq!(args.output, None);
    assert!(!args.options.deduplicates());
}

#[test]
fn wire_json_flag() {
    let m = wire_command()
        .try_get_matches_from(["wire", "s.graphql", "q.graphql", "--json"])
        .unwrap();
    let args: WireArgs = WireParams::from_matches(&m).into();

    assert!(args.json);
    assert_eq!(args.output, None);
}

#[test]
fn verbose_is_global() {
    let m = build_cli()
        .try_get_matches_from(["argo", "wire", "s.graphql", "q.graphql", "-vv"])
        .unwrap();
    assert_eq!(m.get_count("verbose"), 2);
    assert!(matches!(m.subcommand(), Some(("wire", _))));
}

#[test]
fn subcommand_is_required() {
    assert!(build_cli().try_get_matches_from(["argo"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    build_cli().debug_assert();
}
