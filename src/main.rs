//! faas-gateway
//!
//! Compiles the HTTP routes declared by deployed functions into the
//! reverse-proxy configuration of the platform gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   gateway.toml ──▶ config ──▶ directory ──▶ routing ──▶ render ──▶ nginx.conf
//!                  (load +     (function     (validate,   (nginx |
//!                   validate)   → upstream)   trie, synth) json)
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use faas_gateway::config::{load_config, GatewayConfig};
use faas_gateway::directory::{upstream_url, FunctionDirectory};
use faas_gateway::gateway::{compile_gateway, directory_from_config};
use faas_gateway::observability::init_logging;
use faas_gateway::render::{JsonRenderer, NginxRenderer, NginxSettings, Renderer};

#[derive(Parser)]
#[command(name = "faas-gateway")]
#[command(about = "Compile function routes into a gateway reverse-proxy configuration", long_about = None)]
struct Cli {
    /// Gateway configuration file (TOML).
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Log level, overriding the configuration file.
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the gateway configuration
    Compile {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Nginx)]
        format: Format,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resolve and compile routes without rendering
    Check,
    /// List routed functions
    Routes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Nginx,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    init_logging(level);

    tracing::info!(
        config = %cli.config.display(),
        functions = config.functions.len(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Compile { format, output } => {
            let renderer: Box<dyn Renderer> = match format {
                Format::Nginx => Box::new(NginxRenderer::new(NginxSettings::from(&config.gateway))),
                Format::Json => Box::new(JsonRenderer),
            };
            let compiled = compile_gateway(&config, &directory_from_config(&config))?;
            let text = compiled.render(renderer.as_ref())?;

            match output {
                Some(path) => {
                    fs::write(&path, text)?;
                    tracing::info!(path = %path.display(), "Gateway configuration written");
                }
                None => print!("{}", text),
            }
        }
        Commands::Check => {
            let compiled = compile_gateway(&config, &directory_from_config(&config))?;
            println!(
                "OK: {} routes, {} locations, {} method maps",
                compiled.routes.len(),
                compiled.config.location_count(),
                compiled.config.method_maps.len()
            );
        }
        Commands::Routes => print_routes(&config),
    }

    Ok(())
}

fn print_routes(config: &GatewayConfig) {
    let directory = directory_from_config(config);

    let mut rows: Vec<[String; 4]> = config
        .functions
        .iter()
        .filter_map(|function| {
            let path = function.path.clone()?;
            let methods = function
                .methods
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(|m| m.join(","))
                .unwrap_or_else(|| "*".to_string());
            let target = directory
                .lookup(&function.name)
                .ok()
                .and_then(|address| upstream_url(&address).ok())
                .unwrap_or_else(|| "<not deployed>".to_string());
            Some([function.name.clone(), methods, path, target])
        })
        .collect();
    rows.sort_by(|a, b| a[2].cmp(&b[2]));

    let header = ["NAME", "METHODS", "FROM", "TO"].map(String::from);
    let mut widths = header.each_ref().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    for row in std::iter::once(&header).chain(&rows) {
        println!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {}",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
    }
}
