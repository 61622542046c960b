//! SJTop - Terminal dashboard for live market quotes
//!
//! Usage: `sjtop [CONFIG_PATH]`
//!
//! Without a config file the built-in simulation account is used.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use sjtop::bin_common::{parse_args, resolve_config_path};
use sjtop::quotedash::{
    init_tracing, ui, Dashboard, DashboardConfig, MarketDataClient, SimulatedClient,
    SimulationConfig,
};

/// Input poll timeout; also bounds the delay before queued quotes are drawn
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let config_path = resolve_config_path(parse_args().into_iter().next());

    // Malformed config is fatal before the terminal is touched
    let config = DashboardConfig::load(&config_path)
        .with_context(|| format!("invalid configuration in {}", config_path.display()))?;

    init_tracing(&config.log_file, &config.log_level)
        .with_context(|| format!("cannot open log file {}", config.log_file))?;
    config.log();

    if !config.simulation {
        bail!("live trading backend is not available in this build; set \"simulation\": true");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let client: Arc<dyn MarketDataClient> = Arc::new(SimulatedClient::new(
        runtime.handle().clone(),
        SimulationConfig::default(),
    ));

    let mut dashboard = Dashboard::new(client, runtime.handle().clone(), config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut dashboard);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Feeds are released before the session
    dashboard.shutdown();
    info!("SJTop stopped");

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    dashboard: &mut Dashboard,
) -> Result<()> {
    // Show the login state before the blocking login
    terminal.draw(|frame| ui::draw(frame, dashboard))?;
    // Queues the default contract; the loop draws its loading notice first
    dashboard.start()?;

    loop {
        // Apply callback events queued since the last frame
        dashboard.drain_events();

        terminal.draw(|frame| ui::draw(frame, dashboard))?;

        // A requested switch runs after a frame showing the loading notice
        if dashboard.is_loading() {
            dashboard.process_pending()?;
            continue;
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => {
                            dashboard.should_quit = true;
                        }
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            dashboard.should_quit = true;
                        }
                        KeyCode::Char('b') => {
                            dashboard.selector.toggle();
                        }
                        KeyCode::Char('j') | KeyCode::Down => {
                            dashboard.selector.next();
                        }
                        KeyCode::Char('k') | KeyCode::Up => {
                            dashboard.selector.prev();
                        }
                        KeyCode::Enter => {
                            if let Some(contract) = dashboard.selector.confirm() {
                                dashboard.request_switch(contract);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if dashboard.should_quit {
            break;
        }
    }

    Ok(())
}
