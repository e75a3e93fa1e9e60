use jobswp::app::{App, AppEvent};
use jobswp::cli::{AppConfig, Args};
use jobswp::config::UserConfig;
use jobswp::domain::SwipeController;
use jobswp::logging;
use jobswp::refresh::{ExternalFeedClient, ListingClient, SyncRefreshManager, VacancyFeed};
use jobswp::source::{seed_vacancies, LocalCache, MemorySource, VacancySource};
use jobswp::tui::{
    handle_key_event, handle_mouse_event, handle_search_input, render, render_help_overlay,
    render_welcome_overlay, ViewState,
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use std::{io, time::Duration};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Convert to config
    let config: AppConfig = args.into();

    if let Some(log_path) = config.log_file.clone().or_else(logging::default_log_path) {
        if let Err(e) = logging::init(&log_path) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }

    // Run the app
    run_app_with_config(&config)
}

fn open_source(config: &AppConfig) -> Box<dyn VacancySource> {
    match &config.cache_path {
        Some(path) => Box::new(LocalCache::open(path)),
        None => {
            tracing::info!("no cache location, keeping vacancies in memory");
            Box::new(MemorySource::new(seed_vacancies()))
        }
    }
}

fn build_feeds(config: &AppConfig) -> Vec<Arc<dyn VacancyFeed>> {
    let mut feeds: Vec<Arc<dyn VacancyFeed>> = Vec::new();

    if let Some(url) = &config.listing_url {
        match ListingClient::new(url) {
            Ok(client) => feeds.push(Arc::new(client)),
            Err(e) => tracing::warn!(error = %e, "listing client unavailable"),
        }
    }
    if let Some(url) = &config.feed_url {
        match ExternalFeedClient::new(url) {
            Ok(client) => feeds.push(Arc::new(client)),
            Err(e) => tracing::warn!(error = %e, "external feed client unavailable"),
        }
    }
    feeds
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> io::Result<()> {
    // Load user configuration
    let mut user_config = UserConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load user config");
        UserConfig::default()
    });

    let mut filter = config.filter.clone();
    if !config.city_from_args {
        filter.city = user_config.selected_city.clone();
    }

    let controller = SwipeController::with_threshold(config.wrap_policy, config.threshold);
    let mut app = App::new(open_source(config), filter, controller);

    if !config.is_offline() {
        match SyncRefreshManager::new(build_feeds(config)) {
            Ok(manager) => {
                app = app.with_refresh(manager);
                app.request_refresh();
            }
            Err(e) => tracing::warn!(error = %e, "remote refresh unavailable"),
        }
    }

    // Show welcome on first launch or if --welcome flag is set
    if config.force_welcome || !user_config.welcome_shown {
        app.view_state = ViewState::Welcome;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &mut user_config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.shutdown();
    tracing::info!("jobswp exiting");

    result
}

fn save_user_config(user_config: &UserConfig) {
    if let Err(e) = user_config.save() {
        tracing::warn!(error = %e, "failed to save user config");
    }
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    user_config: &mut UserConfig,
) -> io::Result<()> {
    loop {
        app.poll_refresh();

        terminal.draw(|frame| {
            render(frame, &app.frame());

            // Render overlays
            match app.view_state {
                ViewState::Help => render_help_overlay(frame),
                ViewState::Welcome => render_welcome_overlay(frame),
                ViewState::Browsing | ViewState::Search => {}
            }
        })?;

        // Handle input
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match app.view_state {
                ViewState::Help => {
                    // Any key closes help
                    app.view_state = ViewState::Browsing;
                }
                ViewState::Welcome => {
                    // Any key dismisses welcome and starts browsing
                    app.view_state = ViewState::Browsing;

                    // Mark welcome as shown and persist
                    user_config.welcome_shown = true;
                    save_user_config(user_config);
                }
                ViewState::Search => app.handle_search(handle_search_input(key)),
                ViewState::Browsing => match app.handle_action(handle_key_event(key)) {
                    AppEvent::Quit => break,
                    AppEvent::CityChanged(city) => {
                        user_config.selected_city = city;
                        save_user_config(user_config);
                    }
                    AppEvent::Continue => {}
                },
            },
            Event::Mouse(mouse) if app.view_state == ViewState::Browsing => {
                app.handle_gesture(handle_mouse_event(mouse));
            }
            _ => {}
        }
    }

    Ok(())
}
