// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Synthesis Preview
//!
//! Builds the reference edge topology, runs validation, and prints the
//! resulting resource graph. Convenience tooling for operators; the
//! deployable artifact is the JSON output.
//!
//! Run with: cargo run --bin topology-synth [-- --mermaid | --report]

use anyhow::{bail, Result};
use kafka_proxy_topology::TopologyDescriptor;
use tracing::info;

enum Output {
    Json,
    Mermaid,
    Report,
}

fn parse_args() -> Result<Output> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["--json"] => Ok(Output::Json),
        ["--mermaid"] => Ok(Output::Mermaid),
        ["--report"] => Ok(Output::Report),
        other => bail!("Unknown arguments: {:?} (expected --json, --mermaid or --report)", other),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = parse_args()?;

    let descriptor = TopologyDescriptor::reference_deployment()?;
    let graph = descriptor.synthesize()?;
    info!("Synthesis complete: {} resources", graph.len());

    match output {
        Output::Json => println!("{}", graph.to_json_pretty()?),
        Output::Mermaid => println!("{}", graph.to_mermaid()),
        Output::Report => println!("{}", graph.topology_report()),
    }

    Ok(())
}
