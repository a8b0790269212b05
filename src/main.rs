//! Polysophia CLI - Node-based Message Passing
//!
//! This is a demonstration CLI for the Polysophia library.

use anyhow::{bail, Context, Result};
use polysophia::prelude::*;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("LOG_LEVEL", "debug"))
        .init();

    println!("Polysophia - Node-based Message Passing v{}", polysophia::VERSION);
    println!();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("polysophia", String::as_str);
    let Some(command) = args.get(1) else {
        print_usage(program);
        return;
    };

    let result = match command.as_str() {
        "demo" => run_demo(&args[2..]),
        "dot" => render_dot(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage(program);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  demo [--config <file>]           Build the sample graph and pass a message through it");
    println!("  dot [<out>] [--config <file>]    Print (or write) the sample graph as Graphviz DOT");
    println!("  help                             Show this help message");
    println!();
    println!("Environment:");
    println!("  LOG_LEVEL    Log filter (default: debug)");
}

/// Split `--config <file>` out of the argument list.
fn parse_args(args: &[String]) -> Result<(GraphOptions, Vec<String>)> {
    let mut options = GraphOptions::new().with_name("sample");
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--config needs a file path");
                };
                options = GraphOptions::load(path)
                    .with_context(|| format!("loading configuration from {}", path))?;
                i += 2;
            }
            other => {
                rest.push(other.to_string());
                i += 1;
            }
        }
    }
    Ok((options, rest))
}

/// Publisher feeding a subscriber over a loopback pipe.
fn build_sample(options: GraphOptions) -> Result<(ConnectionGraph, NodeId, NodeId)> {
    let (tx, rx) = LoopbackTransport::pair("loopback://text");
    let mut graph = ConnectionGraph::with_options(options);

    let publisher = graph.add(
        Node::publisher("publisher", IdentityProcessor)
            .with_memory(Memory::new())
            .with_transport(tx),
    )?;
    let subscriber = graph.add(
        Node::subscriber("subscriber", PrintProcessor::new("subscriber")).with_transport(rx),
    )?;
    graph.connect(publisher, subscriber)?;
    Ok((graph, publisher, subscriber))
}

fn run_demo(args: &[String]) -> Result<()> {
    let (options, _) = parse_args(args)?;
    let (mut graph, publisher, subscriber) = build_sample(options)?;

    print!("{}", graph.describe_nodes());
    println!("{}", graph);
    println!();
    println!("Adjacency:");
    print!("{}", graph.adjacency_matrix());
    println!();
    println!("Edges:");
    for edge in graph.edges() {
        println!("  {} -> {}", graph.get(edge.source)?, graph.get(edge.target)?);
    }
    println!();

    graph.start();
    if let Some(memory) = graph.get_mut(publisher)?.memory_mut() {
        memory.push("publisher", DataPacket::text("hello from the publisher"));
    }
    graph.get_mut(publisher)?.publish_once(Inputs::new())?;
    let handled = graph.get_mut(subscriber)?.poll()?;
    graph.stop();

    println!();
    println!("Subscriber handled {} packet(s)", handled);
    Ok(())
}

fn render_dot(args: &[String]) -> Result<()> {
    let (options, rest) = parse_args(args)?;
    let name = options.name.clone().unwrap_or_else(|| "graph".to_string());
    let (graph, _, _) = build_sample(options)?;

    match rest.first() {
        Some(path) => {
            let written = graph.render(&mut DotFile::new(PathBuf::from(path)).with_name(name))?;
            println!("Wrote {}", written.display());
        }
        None => print!("{}", graph.render(&mut DotRenderer::new(name))?),
    }
    Ok(())
}
