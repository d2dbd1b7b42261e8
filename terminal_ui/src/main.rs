use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tasko_client::{ClientConfig, StoreSnapshot, TaskStore};
use tokio::sync::{mpsc, watch};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

mod app;
mod ui;
mod worker;

use app::{App, Command, Outcome};

const TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(author, version, about = "Terminal client for the tasko task API")]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long, env = "TASKO_CONFIG")]
    config: Option<PathBuf>,

    /// API base URL, e.g. http://localhost:5000
    #[arg(long, env = "TASKO_BASE_URL")]
    base_url: Option<String>,

    /// Directory for the session token, task cache and log file
    #[arg(long, env = "TASKO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Do not mirror tasks to disk
    #[arg(long)]
    no_cache: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.data_dir)?;
    log::info!("starting against {}", config.base_url);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load(&path).with_context(|| format!("loading {}", path.display()))?;

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if cli.no_cache {
        config.cache_tasks = false;
    }
    Ok(config)
}

/// The screen belongs to the UI, so the log goes to a file.
fn init_logging(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("tasko.log"))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let store = TaskStore::new(&config)?;
    let mut updates = store.subscribe();
    let (commands, mut outcomes) = worker::spawn(store);
    let mut app = App::new(config.alert_timeout());
    commands.send(Command::Restore).context("store worker stopped")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app, &commands, &mut outcomes, &mut updates);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Draws on every tick. Store work happens on the worker, so a slow request
/// never holds up input or the loading indicator.
fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    commands: &mpsc::UnboundedSender<Command>,
    outcomes: &mut mpsc::UnboundedReceiver<Outcome>,
    updates: &mut watch::Receiver<StoreSnapshot>,
) -> anyhow::Result<()> {
    loop {
        let mut stale = updates.has_changed()?;
        while let Ok(outcome) = outcomes.try_recv() {
            app.apply(outcome);
            stale = true;
        }
        // The worker publishes before it reports, so this also picks up the
        // state an outcome refers to.
        if stale {
            let snapshot = updates.borrow_and_update().clone();
            app.sync(snapshot);
        }

        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit {
            log::info!("quitting");
            return Ok(());
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = app.handle_key(key) {
                    commands.send(command).context("store worker stopped")?;
                }
            }
        }
    }
}
