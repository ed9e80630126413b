//! parley: terminal chat client for remote agent personas

mod config;
mod ui;

use clap::Parser;
use parley_core::{Dispatcher, Session, registry};
use parley_tui::Theme;

#[derive(Parser, Debug)]
#[command(
    name = "parley",
    about = "Chat with remote agent personas from the terminal",
    version
)]
struct Args {
    /// Agent endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Persona id to start with (see --list-personas)
    #[arg(long)]
    persona: Option<String>,

    /// List available personas and exit
    #[arg(long)]
    list_personas: bool,

    /// Use the light theme
    #[arg(long)]
    light: bool,

    /// Create a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("parley=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // List personas and exit
    if args.list_personas {
        for persona in registry::list_personas() {
            println!(
                "{}  {:<14} {}",
                persona.id, persona.name, persona.description
            );
        }
        return Ok(());
    }

    // Load config file, CLI args take precedence
    let cfg = config::Config::load();

    let endpoint = args
        .endpoint
        .or(cfg.endpoint.clone())
        .unwrap_or_else(|| config::DEFAULT_ENDPOINT.to_string());

    let persona = args
        .persona
        .or(cfg.persona.clone())
        .and_then(|id| {
            let found = registry::get_persona(&id);
            if found.is_none() {
                eprintln!("Warning: unknown persona id {:?}, using the default", id);
            }
            found
        })
        .unwrap_or_else(registry::default_persona);

    let theme = if args.light || cfg.theme.as_deref() == Some("light") {
        Theme::light()
    } else {
        Theme::dark()
    };

    tracing::debug!(%endpoint, persona = %persona.name, "starting session");

    let session = Session::new(persona);
    let dispatcher = Dispatcher::over_http(endpoint);

    ui::run_tui(session, dispatcher, theme).await
}
