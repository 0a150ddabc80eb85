use flicksort::async_preview::SyncPreviewManager;
use flicksort::cli::{AppConfig, Args};
use flicksort::config::UserConfig;
use flicksort::domain::{BucketLabel, ExtensionSet, SortOutcome};
use flicksort::session::Session;
use flicksort::tui::{
    display_name, handle_key_event, handle_prompt_input, parse_dropped_paths, parse_prompt_input,
    render_add_path_prompt, render_help_overlay, render_summary, render_welcome_overlay,
    render_with_preview, KeyAction, PromptAction, StatusMessage, ViewState,
};
use flicksort::{logging, open_file};

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
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

    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!(
            "Warning: Logging disabled, cannot write {}: {}",
            log_path.display(),
            e
        );
    }

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        tracing::warn!("Failed to load user config: {}", e);
        UserConfig::default()
    });

    let extensions = match config.extension_set(&user_config) {
        Ok(extensions) => extensions,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    run_app_with_config(&config, user_config, extensions)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(
    config: &AppConfig,
    mut user_config: UserConfig,
    extensions: ExtensionSet,
) -> io::Result<()> {
    tracing::info!(
        "Starting with extensions [{}]",
        extensions.iter().collect::<Vec<_>>().join(", ")
    );

    let mut session = Session::new(extensions);
    let mut status = None;
    if !config.paths.is_empty() {
        let outcome = session.drop_paths(&config.paths);
        if outcome.added == 0 {
            status = Some(StatusMessage::info("No images found in the given paths"));
        }
    }

    let mut preview_manager = SyncPreviewManager::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(
        &mut terminal,
        &mut session,
        &mut preview_manager,
        config,
        &mut user_config,
        status,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    let stats = session.statistics();
    tracing::info!(
        "Session ended: {} sorted, {} failed, {} left of {}",
        stats.total_sorted(),
        stats.failed,
        stats.remaining,
        stats.discovered
    );
    if stats.total_sorted() > 0 {
        println!(
            "Sorted {} of {} images",
            stats.total_sorted(),
            stats.discovered
        );
    }

    result
}

/// Suspends the TUI terminal to allow external programs to run
fn suspend_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Resumes the TUI terminal after external program exits
fn resume_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        EnterAlternateScreen,
        EnableBracketedPaste
    )?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

/// Queues dropped paths and describes the result
fn queue_paths(session: &mut Session, paths: Vec<PathBuf>) -> StatusMessage {
    if paths.is_empty() {
        return StatusMessage::info("Nothing to add");
    }

    let outcome = session.drop_paths(&paths);
    match outcome.added {
        0 => StatusMessage::info("No images found in the dropped paths"),
        1 => StatusMessage::success("Queued 1 image"),
        n => StatusMessage::success(format!("Queued {} images", n)),
    }
}

/// Sorts the current image into bucket `digit` and describes the result
fn sort_current(session: &mut Session, digit: u8) -> StatusMessage {
    let Some(label) = BucketLabel::digit(digit) else {
        return StatusMessage::error(format!("Invalid bucket {}", digit));
    };

    match session.sort(&label) {
        Ok(SortOutcome::NothingToSort) => StatusMessage::info("Nothing to sort"),
        Ok(SortOutcome::Moved { from, .. }) => {
            StatusMessage::success(format!("{} → {}/", display_name(&from), label))
        }
        Err(e) => StatusMessage::error(e.to_string()),
    }
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    preview_manager: &mut SyncPreviewManager,
    config: &AppConfig,
    user_config: &mut UserConfig,
    mut status: Option<StatusMessage>,
) -> io::Result<()> {
    // Show welcome on first launch or if --welcome flag is set
    let should_show_welcome = config.show_welcome || !user_config.welcome_shown;
    let mut view_state = if should_show_welcome {
        ViewState::Welcome
    } else {
        ViewState::Browsing
    };
    let mut prompt = String::new();

    loop {
        terminal.draw(|frame| {
            render_with_preview(frame, session, status.as_ref(), preview_manager);

            // Render overlays
            match view_state {
                ViewState::Help => render_help_overlay(frame),
                ViewState::Summary => render_summary(frame, &session.statistics()),
                ViewState::Welcome => render_welcome_overlay(frame),
                ViewState::AddPath => render_add_path_prompt(frame, &prompt),
                ViewState::Browsing => {}
            }
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let key = match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => key,
            Event::Paste(text) => {
                match view_state {
                    ViewState::AddPath => prompt.push_str(text.trim_end_matches(['\r', '\n'])),
                    ViewState::Summary => {}
                    _ => {
                        view_state = ViewState::Browsing;
                        status = Some(queue_paths(session, parse_dropped_paths(&text)));
                    }
                }
                continue;
            }
            _ => continue,
        };

        // Handle overlay-specific input
        match view_state {
            ViewState::Help => {
                view_state = ViewState::Browsing;
                continue;
            }
            ViewState::Summary => {
                // Any key exits from summary
                break;
            }
            ViewState::Welcome => {
                view_state = ViewState::Browsing;

                // Mark welcome as shown and persist
                if !user_config.welcome_shown {
                    user_config.welcome_shown = true;
                    if let Err(e) = user_config.save() {
                        tracing::warn!("Failed to save user config: {}", e);
                        status = Some(StatusMessage::error(format!(
                            "Could not save settings: {}",
                            e
                        )));
                    }
                }
                continue;
            }
            ViewState::AddPath => {
                match handle_prompt_input(key) {
                    PromptAction::Insert(c) => prompt.push(c),
                    PromptAction::Backspace => {
                        prompt.pop();
                    }
                    PromptAction::Submit => {
                        let paths = parse_prompt_input(&prompt);
                        status = Some(queue_paths(session, paths));
                        prompt.clear();
                        view_state = ViewState::Browsing;
                    }
                    PromptAction::Cancel => {
                        prompt.clear();
                        view_state = ViewState::Browsing;
                    }
                    PromptAction::None => {}
                }
                continue;
            }
            ViewState::Browsing => {}
        }

        match handle_key_event(key) {
            KeyAction::Quit => {
                // Show summary before quitting if any images were sorted
                let stats = session.statistics();
                if stats.total_sorted() > 0 || stats.failed > 0 {
                    view_state = ViewState::Summary;
                } else {
                    break;
                }
            }
            KeyAction::Next => {
                if session.next() {
                    status = None;
                }
            }
            KeyAction::Previous => {
                if session.previous() {
                    status = None;
                }
            }
            KeyAction::Sort(digit) => {
                status = Some(sort_current(session, digit));
                if session.current().is_none() {
                    preview_manager.reset();
                }
            }
            KeyAction::AddPath => {
                view_state = ViewState::AddPath;
            }
            KeyAction::Help => {
                view_state = ViewState::Help;
            }
            KeyAction::Open => {
                let Some(path) = session.current().map(|p| p.to_path_buf()) else {
                    continue;
                };

                // Suspend terminal before opening external program
                suspend_terminal(terminal)?;

                let open_result = open_file(&path);

                // Resume terminal after the launcher returns
                resume_terminal(terminal)?;

                if let Err(e) = open_result {
                    tracing::warn!("{}", e);
                    status = Some(StatusMessage::error(e.to_string()));
                }
            }
            KeyAction::None => {}
        }
    }

    Ok(())
}
