mod app;
mod app_log;
mod event;
mod theme;
mod widgets;

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use purr_complete::{Completer, Registry, RootSpec};
use purr_config::AppConfig;
use purr_core::{KubeClient, LiveCache, MockCache};
use purr_exec::Executor;
use purr_history::History;

use crate::app::{App, CacheHandle};

#[derive(Parser)]
#[command(name = "purr", about = "Interactive kubectl companion with live completions")]
struct Cli {
    /// Run with mock cluster data, no cluster required
    #[arg(long)]
    demo: bool,

    /// Start in this namespace instead of the kubeconfig default
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// Write the default config file to ~/.purr/config.toml
    #[arg(long)]
    init_config: bool,

    /// Print effective config (defaults + user overrides) and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let path = AppConfig::init_default()?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load();

    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(app_log::AppLogMakeWriter)
        .init();

    let root = match RootSpec::load(Path::new(&config.general.commands_path)) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error loading kubectl command spec: {e}");
            eprintln!("Make sure {} exists in the working directory.", config.general.commands_path);
            std::process::exit(1);
        }
    };
    let registry = Arc::new(Registry::build(root));

    let (cache, context_name, cluster_namespace) = if cli.demo {
        println!("Starting purr in demo mode with mock data...");
        (CacheHandle::Mock(Arc::new(MockCache::demo())), "demo-cluster".to_string(), "default".to_string())
    } else {
        let client = match KubeClient::from_kubeconfig().await {
            Ok(client) => client,
            Err(e) => {
                eprintln!("Error connecting to Kubernetes: {e}");
                eprintln!("Make sure kubectl is configured and you have access to a cluster.");
                eprintln!("Or run with --demo to try demo mode without a cluster.");
                std::process::exit(1);
            }
        };
        let context_name = client.context().to_string();
        let cluster_namespace = client.namespace().to_string();

        let live = Arc::new(LiveCache::new(client.inner_client()));
        if let Err(e) = live.start().await {
            eprintln!("Error starting cluster cache: {e}");
            std::process::exit(1);
        }
        (CacheHandle::Live(live), context_name, cluster_namespace)
    };

    let namespace = cli
        .namespace
        .or_else(|| (!cluster_namespace.is_empty()).then(|| cluster_namespace.clone()))
        .unwrap_or_else(|| config.general.default_namespace.clone());

    let executor = match Executor::new() {
        Ok(executor) => Arc::new(executor),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let history = Arc::new(History::open(AppConfig::history_path(), config.general.history_size));
    let completer = Completer::new(registry, cache.cluster_cache());

    install_panic_hook();
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, completer, cache, executor, history, context_name, namespace);
    let result = app.run(&mut terminal).await;

    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
