#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
mod commands;

use cli::{DecodeParams, EncodeDescParams, EncodeParams, WireParams, build_cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("encode", m)) => {
            let params = EncodeParams::from_matches(m);
            commands::encode::run(params.into());
        }
        Some(("decode", m)) => {
            let params = DecodeParams::from_matches(m);
            commands::decode::run(params.into());
        }
        Some(("encode-desc", m)) => {
            let params = EncodeDescParams::from_matches(m);
            commands::encode_desc::run(params.into());
        }
        Some(("wire", m)) => {
            let params = WireParams::from_matches(m);
            commands::wire::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
