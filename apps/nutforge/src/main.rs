//! nutforge - Source-build installer for the Nutshell shell
//!
//! This is the CLI application that orchestrates the install pipeline
//! through the ops crate.

mod cli;
mod display;
mod error;
mod events;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use nutforge_config::Config;
use nutforge_events::EventReceiver;
use nutforge_net::NetClient;
use nutforge_ops::{OperationResult, OpsContextBuilder};
use nutforge_resolver::Resolver;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting nutforge v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    if let Some(color) = cli.global.color {
        config.general.color = color;
    }

    // Create event channel
    let (event_sender, event_receiver) = nutforge_events::channel();

    // Build operations context
    let ops_ctx = OpsContextBuilder::new()
        .with_net(NetClient::new(config.network.timeout)?)
        .with_resolver(Resolver::new(config.search_roots().to_vec()))
        .with_event_sender(event_sender)
        .with_config(config.clone())
        .build()?;

    // Create output renderer and event handler
    let renderer = OutputRenderer::new(cli.global.json);
    let colors_enabled = match config.general.color {
        nutforge_types::ColorChoice::Always => true,
        nutforge_types::ColorChoice::Never => false,
        nutforge_types::ColorChoice::Auto => {
            console::Term::stdout().features().colors_supported()
        }
    };
    // JSON mode keeps stdout machine-readable; events go unrendered
    let mut event_handler = (!cli.global.json)
        .then(|| EventHandler::new(colors_enabled, cli.global.debug));

    // Execute command with event handling
    let result = execute_command_with_events(
        cli.command,
        ops_ctx,
        event_receiver,
        event_handler.as_mut(),
    )
    .await?;

    // Render final result
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: nutforge_ops::OpsCtx,
    mut event_receiver: EventReceiver,
    mut event_handler: Option<&mut EventHandler>,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    if let Some(handler) = event_handler.as_deref_mut() {
                        handler.handle_event(event);
                    }
                }
                return result;
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => {
                        if let Some(handler) = event_handler.as_deref_mut() {
                            handler.handle_event(event);
                        }
                    }
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    ctx: nutforge_ops::OpsCtx,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Install { recipe } => {
            let recipe = nutforge_ops::load_recipe(recipe.as_deref()).await?;
            let report = nutforge_ops::install(&ctx, &recipe).await?;
            Ok(OperationResult::InstallReport(report))
        }

        Commands::Test { recipe } => {
            let recipe = nutforge_ops::load_recipe(recipe.as_deref()).await?;
            let report = nutforge_ops::verify(&ctx, &recipe).await?;
            Ok(OperationResult::VerifyReport(report))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled: bool) {
    if json_mode && !debug_enabled {
        // JSON mode: suppress console logging to keep stdout machine-readable
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
        return;
    }

    let default_filter = if debug_enabled {
        "info,nutforge=debug,nutforge_ops=debug"
    } else {
        "warn,nutforge=warn,nutforge_ops=warn"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
