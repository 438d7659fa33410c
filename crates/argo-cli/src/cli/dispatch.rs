//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use argo_codec::CodecOptions;
use clap::ArgMatches;

use crate::commands::decode::DecodeArgs;
use crate::commands::encode::EncodeArgs;
use crate::commands::encode_desc::EncodeDescArgs;
use crate::commands::wire::WireArgs;

pub struct EncodeParams {
    pub schema: PathBuf,
    pub query: PathBuf,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub operation: Option<String>,
    pub no_dedup: bool,
    pub max_depth: usize,
}

impl EncodeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            schema: required_path(m, "schema"),
            query: required_path(m, "query"),
            input: required_path(m, "input"),
            output: m.get_one::<PathBuf>("output").cloned(),
            operation: m.get_one::<String>("operation").cloned(),
            no_dedup: m.get_flag("no_dedup"),
            max_depth: parse_max_depth(m),
        }
    }
}

impl From<EncodeParams> for EncodeArgs {
    fn from(p: EncodeParams) -> Self {
        Self {
            schema: p.schema,
            query: p.query,
            input: p.input,
            output: p.output,
            operation: p.operation,
            options: codec_options(p.no_dedup, p.max_depth),
        }
    }
}

pub struct DecodeParams {
    pub schema: PathBuf,
    pub query: PathBuf,
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub operation: Option<String>,
    pub pretty: bool,
    pub max_depth: usize,
}

impl DecodeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            schema: required_path(m, "schema"),
            query: required_path(m, "query"),
            input: required_path(m, "input"),
            output: m.get_one::<PathBuf>("output").cloned(),
            operation: m.get_one::<String>("operation").cloned(),
            pretty: m.get_flag("pretty"),
            max_depth: parse_max_depth(m),
        }
    }
}

impl From<DecodeParams> for DecodeArgs {
    fn from(p: DecodeParams) -> Self {
        Self {
            schema: p.schema,
            query: p.query,
            input: p.input,
            output: p.output,
            operation: p.operation,
            pretty: p.pretty,
            // deduplication is read from the message header
            options: CodecOptions::new().max_depth(p.max_depth),
        }
    }
}

pub struct EncodeDescParams {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub no_dedup: bool,
    pub max_depth: usize,
}

impl EncodeDescParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: required_path(m, "input"),
            output: m.get_one::<PathBuf>("output").cloned(),
            no_dedup: m.get_flag("no_dedup"),
            max_depth: parse_max_depth(m),
        }
    }
}

impl From<EncodeDescParams> for EncodeDescArgs {
    fn from(p: EncodeDescParams) -> Self {
        Self {
            input: p.input,
            output: p.output,
            options: codec_options(p.no_dedup, p.max_depth),
        }
    }
}

pub struct WireParams {
    pub schema: PathBuf,
    pub query: PathBuf,
    pub operation: Option<String>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

impl WireParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            schema: required_path(m, "schema"),
            query: required_path(m, "query"),
            operation: m.get_one::<String>("operation").cloned(),
            json: m.get_flag("json"),
            output: m.get_one::<PathBuf>("output").cloned(),
        }
    }
}

impl From<WireParams> for WireArgs {
    fn from(p: WireParams) -> Self {
        Self {
            schema: p.schema,
            query: p.query,
            operation: p.operation,
            json: p.json,
            output: p.output,
        }
    }
}

/// Positionals marked `required` are always present after parsing.
fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn parse_max_depth(m: &ArgMatches) -> usize {
    m.get_one::<usize>("max_depth")
        .copied()
        .unwrap_or(CodecOptions::default().depth_limit())
}

fn codec_options(no_dedup: bool, max_depth: usize) -> CodecOptions {
    CodecOptions::new()
        .deduplicate(!no_dedup)
        .max_depth(max_depth)
}
