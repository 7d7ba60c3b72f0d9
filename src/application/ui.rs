use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::ServerStatus;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;

fn render_header<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let status_color = match app_state.server_status {
        ServerStatus::Checking => Color::Yellow,
        ServerStatus::Online => Color::Green,
        ServerStatus::Offline => Color::Red,
    };

    let line = Line::from(vec![
        Span::styled(
            "Doc Assistant",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::from("  "),
        Span::styled(
            app_state.server_status.text(),
            Style::default().fg(status_color),
        ),
        Span::styled(
            format!("  Current Session: {}", app_state.session_id),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        ),
        rect,
    );
}

fn render_upload_bar<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let mut text = "No PDF selected (/file PATH to choose one)".to_string();
    if app_state.uploading {
        text = "Uploading...".to_string();
    } else if let Some(file) = &app_state.selected_file {
        let name = file
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .unwrap_or_default();
        text = format!("PDF: {name} (/upload to send)");
    }

    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
        rect,
    );
}

fn paste_to_inputs(text: &str) -> Vec<Input> {
    return text
        .chars()
        .filter(|char| return *char != '\r')
        .map(|char| {
            if char == '\n' {
                return Input {
                    key: Key::Enter,
                    ctrl: false,
                    alt: false,
                };
            }

            return Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
            };
        })
        .collect();
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let mut events = EventsService::new(rx);

    app_state.initialize(&tx)?;

    loop {
        terminal.draw(|frame| {
            let mut typing_height = 0;
            if app_state.waiting_for_backend {
                typing_height = 3;
            }

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(typing_height),
                    Constraint::Length(1),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            if layout[1].width != app_state.last_known_width
                || layout[1].height != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            render_header(frame, layout[0], app_state);
            app_state
                .bubble_list
                .render(frame, layout[1], app_state.scroll.position);

            if app_state.waiting_for_backend {
                let typing_rect = Rect {
                    width: layout[2].width.min(11),
                    ..layout[2]
                };
                app_state.typing_indicator.render(frame, typing_rect);
            }

            render_upload_bar(frame, layout[3], app_state);
            frame.render_widget(textarea.widget(), layout[4]);
        })?;

        match events.next().await? {
            Event::BackendChatReply(reply) => {
                app_state.handle_chat_reply(reply, Instant::now());
            }
            Event::BackendHealthCheck(res) => {
                app_state.handle_health_check(res);
            }
            Event::BackendUploadResult(upload) => {
                app_state.handle_upload_result(upload);
            }
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLN() => {
                app_state.new_session();
            }
            Event::KeyboardEnter() => {
                let input_str = &textarea.lines().join("\n");

                let (should_break, was_command) =
                    app_state.handle_slash_commands(input_str, &tx)?;
                if should_break {
                    break;
                }
                if was_command {
                    textarea = TextArea::default();
                    continue;
                }

                let outcome = app_state.send_message(input_str, Instant::now(), &tx)?;
                if outcome.clears_input() {
                    textarea = TextArea::default();
                }
            }
            Event::KeyboardPaste(text) => {
                for input in paste_to_inputs(&text) {
                    textarea.input(input);
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                app_state.tick();
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    if let Err(err) = disable_raw_mode() {
        tracing::error!(error = ?err, "Failed to disable raw mode");
    }
    if let Err(err) = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    ) {
        tracing::error!(error = ?err, "Failed to restore terminal");
    }
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    let mut app_state = AppState::new(&Config::get(ConfigKey::SessionID));

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
