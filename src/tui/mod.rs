// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;
pub mod paste;

// Re-exports
pub use colors::*;
pub use helpers::{display_name, format_file_size, truncate_path};
pub use input::{handle_key_event, handle_prompt_input, KeyAction, PromptAction};
pub use paste::{parse_dropped_paths, parse_prompt_input};

use crate::async_preview::{PreviewState, SyncPreviewManager};
use crate::preview::PreviewRequest;
use crate::session::{Session, SessionStatistics};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main image view
    Browsing,
    /// Help overlay visible
    Help,
    /// Summary screen before exit
    Summary,
    /// Welcome screen shown on first launch
    Welcome,
    /// Typing a path to queue
    AddPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line message shown under the image until the next action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    fn color(&self) -> ratatui::style::Color {
        match self.kind {
            StatusKind::Info => TEXT_SECONDARY,
            StatusKind::Success => ACCENT_SECONDARY,
            StatusKind::Error => ACCENT_PRIMARY,
        }
    }
}

fn main_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header with progress
            Constraint::Min(0),    // Image
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Footer
        ])
        .split(area)
}

fn content_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Renders the main view, decoding the current image in the background
pub fn render_with_preview(
    frame: &mut Frame,
    session: &Session,
    status: Option<&StatusMessage>,
    preview_manager: &mut SyncPreviewManager,
) {
    let chunks = main_layout(frame.area());

    render_header(frame, chunks[0], session);
    match session.current() {
        Some(path) => {
            let inner = content_block(String::new()).inner(chunks[1]);
            let request = PreviewRequest::for_area(path, inner.width, inner.height);
            let state = preview_manager.request_preview(&request);
            render_image(frame, chunks[1], path, state);
        }
        None => frame.render_widget(render_empty_state_widget(), chunks[1]),
    }
    render_status_line(frame, chunks[2], session, status);
    render_footer(frame, chunks[3]);
}

/// Renders the header: title, page label, file details and a sorted-so-far gauge
fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let title = match session.page_label().as_str() {
        "" => " flicksort ".to_string(),
        label => format!(" flicksort  {} ", label),
    };

    let info = match session.current() {
        Some(path) => {
            let mut spans = vec![Span::styled(
                display_name(path),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )];
            if let Ok(metadata) = std::fs::metadata(path) {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!("({})", format_file_size(metadata.len())),
                    Style::default().fg(TEXT_SECONDARY),
                ));
            }
            spans
        }
        None => vec![Span::styled(
            "No images queued",
            Style::default().fg(TEXT_SECONDARY),
        )],
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(info),
    ])
    .block(
        Block::default()
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    )
    .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let stats = session.statistics();
    let sorted = stats.total_sorted();
    let progress = if stats.discovered > 0 {
        (sorted as f64 / stats.discovered as f64).min(1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(progress)
        .label(format!("sorted {} of {}", sorted, stats.discovered));

    frame.render_widget(gauge, chunks[1]);
}

/// Draws the decoded image centred in its block
fn render_image(frame: &mut Frame, area: Rect, path: &Path, state: &PreviewState) {
    let name = display_name(path);

    match state {
        PreviewState::Loading => {
            let spinners = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis();
            let spinner = spinners[(now / 100) as usize % spinners.len()];

            let lines = vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("{} ", spinner), Style::default().fg(ACCENT_HIGHLIGHT)),
                    Span::styled("Loading preview", Style::default().fg(TEXT_SECONDARY)),
                ]),
            ];
            let paragraph = Paragraph::new(lines)
                .block(content_block(format!(" {} ", name)))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }
        PreviewState::Ready(preview) => {
            let block = content_block(format!(" {}  {} ", name, preview.dimensions_label()));
            let inner = block.inner(area);

            let padding = (inner.height as usize).saturating_sub(preview.lines.len()) / 2;
            let mut lines = vec![Line::from(""); padding];
            lines.extend(preview.lines.iter().cloned());

            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }
        PreviewState::Error(e) => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  [!] Cannot display this image",
                    Style::default()
                        .fg(ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("  {}", e)),
                Line::from(""),
                Line::from(Span::styled(
                    "  It can still be sorted with the digit keys.",
                    Style::default().fg(TEXT_SECONDARY),
                )),
            ];

            let paragraph = Paragraph::new(lines)
                .block(
                    content_block(format!(" {} [!] ", name))
                        .border_style(Style::default().fg(ACCENT_PRIMARY)),
                )
                .style(Style::default().fg(TEXT_PRIMARY))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
    }
}

/// Shown while the queue is empty
fn render_empty_state_widget() -> Paragraph<'static> {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Drop Images Here",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Drag image files or folders onto this terminal,",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "or press 'a' to type a path.",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    Paragraph::new(lines)
        .block(content_block(" Images ".to_string()))
        .alignment(Alignment::Center)
}

/// Current path on the left, last message on the right
fn render_status_line(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    status: Option<&StatusMessage>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    if let Some(path) = session.current() {
        let text = truncate_path(path, chunks[0].width.saturating_sub(1) as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", text),
                Style::default().fg(TEXT_SECONDARY),
            )),
            chunks[0],
        );
    }

    if let Some(status) = status {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{} ", status.text),
                Style::default().fg(status.color()),
            ))
            .alignment(Alignment::Right),
            chunks[1],
        );
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let separator = || Span::raw("  │  ");
    let controls = Line::from(vec![
        Span::styled(
            "0-9 ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Sort", Style::default().fg(TEXT_SECONDARY)),
        separator(),
        Span::styled("←→ ", Style::default().fg(ACCENT_SECONDARY)),
        Span::styled("Browse", Style::default().fg(TEXT_SECONDARY)),
        separator(),
        Span::styled("a ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Add", Style::default().fg(TEXT_SECONDARY)),
        separator(),
        Span::styled("o ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Open", Style::default().fg(TEXT_SECONDARY)),
        separator(),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
        separator(),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
    ]);

    let footer = Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

/// Renders the summary screen shown before exit
pub fn render_summary(frame: &mut Frame, stats: &SessionStatistics) {
    let summary_area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, summary_area);

    let block = Block::default()
        .title(" Session Complete ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(summary_area);
    frame.render_widget(block, summary_area);

    let count = |n: usize, color| {
        Span::styled(
            n.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Summary",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Images found:  "),
            count(stats.discovered, ACCENT_HIGHLIGHT),
        ]),
        Line::from(vec![
            Span::styled("✓ ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Sorted:  "),
            count(stats.total_sorted(), ACCENT_SECONDARY),
        ]),
    ];

    for (label, n) in &stats.sorted {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  bucket {}: ", label),
                Style::default().fg(TEXT_SECONDARY),
            ),
            Span::styled(n.to_string(), Style::default().fg(TEXT_PRIMARY)),
        ]));
    }

    if stats.failed > 0 {
        lines.push(Line::from(vec![
            Span::styled("✗ ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("Failed moves:  "),
            count(stats.failed, ACCENT_PRIMARY),
        ]));
    }

    lines.extend([
        Line::from(vec![
            Span::styled("○ ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Left unsorted:  "),
            Span::styled(
                stats.remaining.to_string(),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to exit",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ]);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let row = |keys: &'static str, color, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<12}", keys), Style::default().fg(color)),
            Span::raw(what),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        row("0-9", ACCENT_HIGHLIGHT, "Move image into folder 0-9"),
        Line::from(""),
        row("→ l j Space", ACCENT_SECONDARY, "Next image"),
        row("← h k", ACCENT_SECONDARY, "Previous image"),
        Line::from(""),
        row("a", TEXT_SECONDARY, "Add a file or folder"),
        row("o", TEXT_SECONDARY, "Open in image viewer"),
        row("q Esc", TEXT_SECONDARY, "Quit"),
        row("?", TEXT_SECONDARY, "Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            "Drop files or folders onto the terminal to queue them.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Left)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(85, 85, frame.area());
    frame.render_widget(Clear, area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let step = |n: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(n, Style::default().fg(TEXT_SECONDARY)),
            Span::raw(text),
        ])
    };

    let welcome_lines = vec![
        Line::from(""),
        heading("Welcome to flicksort!"),
        Line::from(""),
        Line::from("flicksort pages through a pile of images and files each one into a numbered"),
        Line::from("folder next to it with a single key press."),
        Line::from(""),
        heading("Quick Start:"),
        Line::from(""),
        step("  1. ", "Drop image files or folders onto this terminal (or press 'a')"),
        step("  2. ", "Browse with ← and →"),
        step("  3. ", "Press a digit 0-9 to move the image into that folder"),
        Line::from(""),
        heading("Good to know:"),
        Line::from(""),
        step("  •  ", "photos/cat.png sorted with 3 ends up in photos/3/cat.png"),
        step("  •  ", "Existing files are never overwritten"),
        step("  •  ", "Hidden and read-only files are skipped"),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(
            Block::default()
                .title(Span::styled(
                    " Welcome ",
                    Style::default()
                        .fg(ACCENT_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}

/// Renders the add-path prompt with what has been typed so far
pub fn render_add_path_prompt(frame: &mut Frame, input: &str) {
    let outer = centered_rect(70, 30, frame.area());
    let area = Rect {
        height: outer.height.min(5),
        ..outer
    };
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Add Path ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let width = block.inner(area).width.saturating_sub(3) as usize;
    let shown: String = {
        let len = input.chars().count();
        input.chars().skip(len.saturating_sub(width)).collect()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(shown, Style::default().fg(TEXT_PRIMARY)),
            Span::styled("█", Style::default().fg(TEXT_SECONDARY)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to add  •  Esc to cancel",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
