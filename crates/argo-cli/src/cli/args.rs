//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that commands compose.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// GraphQL schema file (positional).
pub fn schema_arg() -> Arg {
    Arg::new("schema")
        .value_name("SCHEMA")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("GraphQL schema (SDL) file")
}

/// GraphQL query file (positional).
pub fn query_arg() -> Arg {
    Arg::new("query")
        .value_name("QUERY")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("GraphQL query file")
}

/// Positional input file; `-` reads stdin.
pub fn input_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new("input")
        .value_name(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Output file (-o/--output); stdout when absent.
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to FILE instead of stdout")
}

/// Operation name (--operation).
pub fn operation_arg() -> Arg {
    Arg::new("operation")
        .long("operation")
        .value_name("NAME")
        .help("Operation to use when the query document has several")
}

/// Disable deduplication (--no-dedup).
pub fn no_dedup_arg() -> Arg {
    Arg::new("no_dedup")
        .long("no-dedup")
        .action(ArgAction::SetTrue)
        .help("Write every string and byte value literally")
}

/// Nesting limit (--max-depth).
pub fn max_depth_arg() -> Arg {
    Arg::new("max_depth")
        .long("max-depth")
        .value_name("N")
        .default_value("512")
        .value_parser(value_parser!(usize))
        .help("Maximum nesting depth of records, lists and objects")
}

/// Pretty-print JSON output (--pretty).
pub fn pretty_arg() -> Arg {
    Arg::new("pretty")
        .long("pretty")
        .action(ArgAction::SetTrue)
        .help("Pretty-print JSON output")
}

/// JSON rendering of the wire type (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the wire type as JSON")
}

/// Verbosity (-v, -vv, -vvv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .global(true)
        .action(ArgAction::Count)
        .help("Verbosity level (-v info, -vv debug, -vvv trace)")
}
