mod app;
mod board;
mod cli;
mod config;
mod fetch;
mod format;
mod github;
mod issue;
mod markdown;
mod render;
mod theme;
mod ui;

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::App;
use crate::cli::{Args, Command};
use crate::config::Config;
use crate::fetch::{FetchReport, IssueSource, fetch_all_issues};
use crate::github::GitHubClient;
use crate::render::{FAILURE_MESSAGE, LOADING_MESSAGE, PARTIAL_MESSAGE, SiteStats};
use crate::theme::resolve_theme;

type TuiBackend = CrosstermBackend<Stdout>;
type Tui = Terminal<TuiBackend>;

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command();
    init_logging(&command)?;

    let config = args.apply(Config::load(args.config.as_deref())?);
    match command {
        Command::Render { .. } => handle_render(&config).await,
        Command::Browse => handle_browse(&config).await,
    }
}

fn init_logging(command: &Command) -> Result<()> {
    // The terminal board owns the screen, so only warnings get through.
    let directive = match command {
        Command::Browse => "issueboard=warn",
        Command::Render { .. } => "issueboard=info",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();
    Ok(())
}

async fn load_issues(source: &dyn IssueSource, config: &Config) -> Result<FetchReport> {
    let result = fetch_all_issues(source, config.owner(), config.repo()).await;
    if let Err(error) = &result {
        tracing::error!(error = %error, "Failed to fetch issues");
    }
    result
}

async fn handle_render(config: &Config) -> Result<()> {
    let client = GitHubClient::new(config.request_timeout())?;
    let out_dir = config.output_dir();
    let (stats, report) = render_site(&client, config, &out_dir).await?;
    println!(
        "Wrote {} pages for {} issues to {}",
        stats.documents,
        report.issues.len(),
        out_dir.display()
    );
    Ok(())
}

/// Fetches the board and writes it to `out_dir`, or writes the failure page
/// and returns the fetch error.
async fn render_site(
    source: &dyn IssueSource,
    config: &Config,
    out_dir: &Path,
) -> Result<(SiteStats, FetchReport)> {
    let report = match load_issues(source, config).await {
        Ok(report) => report,
        Err(error) => {
            if let Err(write_error) = render::write_failure_page(out_dir) {
                tracing::error!(error = ?write_error, "Failed to write failure page");
            }
            return Err(error);
        }
    };

    let stats = render::write_site(
        out_dir,
        &report.issues,
        config.page_size(),
        report.is_partial(),
    )?;
    Ok((stats, report))
}

async fn handle_browse(config: &Config) -> Result<()> {
    let client = GitHubClient::new(config.request_timeout())?;
    eprintln!("{}", LOADING_MESSAGE);
    let mut app = match load_app(&client, config).await {
        Ok(app) => app,
        Err(error) => {
            eprintln!("{}", FAILURE_MESSAGE);
            return Err(error);
        }
    };

    let mut terminal_guard = TerminalGuard::init()?;
    run_app(
        terminal_guard.terminal_mut(),
        &mut app,
        resolve_theme(config.theme.as_deref()),
    )
}

async fn load_app(source: &dyn IssueSource, config: &Config) -> Result<App> {
    let report = load_issues(source, config).await?;
    let partial = report.is_partial();
    let repo_label = format!("{}/{}", config.owner(), config.repo());
    let mut app = App::new(repo_label, report.issues, config.page_size());
    if partial {
        app.set_status(PARTIAL_MESSAGE);
    }
    Ok(app)
}

fn run_app(terminal: &mut Tui, app: &mut App, theme: &theme::ThemePalette) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app, theme))?;
        if app.should_quit() {
            return Ok(());
        }

        if !event::poll(TICK_RATE)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }
    }
}

struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn init() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Tui {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
