use std::time::Duration;
use std::time::Instant;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use ratatui::prelude::Rect;
use test_utils::pdf_fixture_path;
use tokio::sync::mpsc;

use super::AppState;
use super::SendOutcome;
use super::CHAT_ERROR_TEXT;
use super::OFFLINE_TEXT;
use super::UPLOAD_SUCCESS_TEXT;
use super::UPLOAD_TRANSPORT_ERROR_TEXT;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ChatReply;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::ServerStatus;
use crate::domain::models::UploadResponse;
use crate::domain::models::UploadResult;

fn create_state() -> (
    AppState,
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Action>,
) {
    let (tx, rx) = mpsc::unbounded_channel::<Action>();
    return (AppState::new("session-1-abc"), tx, rx);
}

fn reply(app_state: &AppState, result: Result<String>) -> ChatReply {
    return ChatReply {
        seq: 1,
        session_id: app_state.session_id.to_string(),
        result,
    };
}

fn upload_result(app_state: &AppState, result: Result<UploadResponse>) -> UploadResult {
    return UploadResult {
        session_id: Some(app_state.session_id.to_string()),
        result,
    };
}

#[test]
fn it_creates_a_session_id_when_none_is_given() {
    let app_state = AppState::new("");
    assert!(app_state.session_id.starts_with("session-"));

    let app_state = AppState::new("session-1-abc");
    assert_eq!(app_state.session_id, "session-1-abc");
    assert_eq!(app_state.server_status, ServerStatus::Checking);
}

#[test]
fn it_health_checks_on_initialize() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();
    app_state.initialize(&tx)?;

    assert!(matches!(rx.try_recv(), Ok(Action::BackendHealthCheck())));

    app_state.handle_health_check(Ok(()));
    assert_eq!(app_state.server_status, ServerStatus::Online);

    app_state.handle_health_check(Err(anyhow!("Backend is not reachable")));
    assert_eq!(app_state.server_status, ServerStatus::Offline);
    assert!(app_state.messages.is_empty());

    return Ok(());
}

#[test]
fn it_ignores_empty_sends() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();

    for text in ["", "   ", "\n\t"] {
        let outcome = app_state.send_message(text, Instant::now(), &tx)?;
        assert_eq!(outcome, SendOutcome::Empty);
        assert!(!outcome.clears_input());
    }

    assert!(app_state.messages.is_empty());
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[test]
fn it_refuses_to_send_while_offline() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();
    app_state.server_status = ServerStatus::Offline;

    let outcome = app_state.send_message("Hello", Instant::now(), &tx)?;

    assert_eq!(outcome, SendOutcome::Offline);
    assert!(outcome.clears_input());
    assert_eq!(app_state.messages.len(), 1);
    assert_eq!(app_state.messages[0].author, Author::Bot);
    assert_eq!(app_state.messages[0].text, OFFLINE_TEXT);
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[test]
fn it_sends_messages() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();

    let outcome = app_state.send_message("What is in the report?", Instant::now(), &tx)?;

    assert_eq!(outcome, SendOutcome::Sent);
    assert!(outcome.clears_input());
    assert!(app_state.waiting_for_backend);
    assert_eq!(app_state.messages.len(), 1);
    assert_eq!(app_state.messages[0].author, Author::User);

    let Ok(Action::BackendChat(prompt)) = rx.try_recv() else {
        bail!("Expected a chat action");
    };
    assert_eq!(prompt.seq, 1);
    assert_eq!(prompt.session_id, "session-1-abc");
    assert_eq!(prompt.text, "What is in the report?");

    return Ok(());
}

#[test]
fn it_rejects_sends_within_the_cooldown() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();
    let now = Instant::now();

    app_state.send_message("first", now, &tx)?;
    let outcome = app_state.send_message("second", now + Duration::from_millis(1000), &tx)?;
    assert_eq!(outcome, SendOutcome::CoolingDown(2));
    assert!(!outcome.clears_input());
    assert_eq!(
        app_state.messages[1].text,
        "Please wait 2 more second(s) before sending another message."
    );

    let outcome = app_state.send_message("third", now + Duration::from_millis(2500), &tx)?;
    assert_eq!(outcome, SendOutcome::CoolingDown(1));

    assert_eq!(app_state.messages.len(), 3);
    assert!(matches!(rx.try_recv(), Ok(Action::BackendChat(_))));
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[test]
fn it_completes_a_chat_turn() -> Result<()> {
    let (mut app_state, tx, _rx) = create_state();
    let now = Instant::now();

    app_state.send_message("Hello", now, &tx)?;
    let replied = now + Duration::from_secs(1);
    let res = reply(&app_state, Ok("Hi there!".to_string()));
    app_state.handle_chat_reply(res, replied);

    assert_eq!(app_state.messages.len(), 2);
    assert_eq!(app_state.messages[1].author, Author::Bot);
    assert_eq!(app_state.messages[1].text, "Hi there!");
    assert_eq!(app_state.server_status, ServerStatus::Online);
    assert!(!app_state.waiting_for_backend);

    assert!(!app_state.rate_limit.is_ready(replied + Duration::from_secs(2)));
    assert!(app_state.rate_limit.is_ready(replied + Duration::from_secs(3)));

    let outcome = app_state.send_message("Again", replied + Duration::from_secs(3), &tx)?;
    assert_eq!(outcome, SendOutcome::Sent);

    return Ok(());
}

#[test]
fn it_reports_chat_failures() -> Result<()> {
    let (mut app_state, tx, _rx) = create_state();
    let now = Instant::now();

    app_state.send_message("Hello", now, &tx)?;
    let res = reply(&app_state, Err(anyhow!("Failed to make chat request")));
    app_state.handle_chat_reply(res, now);

    assert_eq!(app_state.messages.len(), 2);
    assert_eq!(app_state.messages[1].text, CHAT_ERROR_TEXT);
    assert_eq!(app_state.messages[1].message_type(), MessageType::Error);
    assert_eq!(app_state.server_status, ServerStatus::Offline);
    assert!(!app_state.waiting_for_backend);
    assert!(!app_state.rate_limit.is_ready(now));

    return Ok(());
}

#[test]
fn it_drops_replies_for_previous_sessions() -> Result<()> {
    let (mut app_state, tx, _rx) = create_state();
    let now = Instant::now();

    app_state.send_message("Hello", now, &tx)?;
    let stale = reply(&app_state, Ok("Late reply".to_string()));
    app_state.new_session();
    app_state.handle_chat_reply(stale, now);

    assert!(app_state.messages.is_empty());
    assert!(!app_state.waiting_for_backend);
    assert!(app_state.rate_limit.is_ready(now + Duration::from_secs(3)));

    return Ok(());
}

#[test]
fn it_starts_new_sessions() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();
    app_state.send_message("Hello", Instant::now(), &tx)?;
    rx.try_recv()?;

    app_state.new_session();

    assert!(app_state.messages.is_empty());
    assert_ne!(app_state.session_id, "session-1-abc");
    assert!(app_state.session_id.starts_with("session-"));
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[test]
fn it_follows_new_messages() {
    let mut app_state = AppState::new("session-1-abc");
    app_state.set_rect(Rect::new(0, 0, 80, 5));
    for idx in 0..5 {
        app_state.add_message(Message::new(Author::Bot, &format!("Message {idx}")));
    }

    app_state.scroll.up();
    app_state.scroll.up();
    let scrolled = app_state.scroll.position;
    app_state.add_message(Message::new(Author::Bot, "Newest"));

    let bottom = u16::try_from(app_state.bubble_list.len()).unwrap() - 5;
    assert!(bottom > scrolled);
    assert_eq!(app_state.scroll.position, bottom);
}

#[test]
fn it_resets_the_scroll_on_new_sessions() {
    let mut app_state = AppState::new("session-1-abc");
    app_state.set_rect(Rect::new(0, 0, 80, 5));
    for idx in 0..5 {
        app_state.add_message(Message::new(Author::Bot, &format!("Message {idx}")));
    }
    assert!(app_state.scroll.position > 0);

    app_state.new_session();

    assert_eq!(app_state.bubble_list.len(), 0);
    assert_eq!(app_state.scroll.position, 0);
}

#[test]
fn it_ignores_uploads_without_a_file() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();

    assert!(!app_state.upload(&tx)?);
    assert!(!app_state.uploading);
    assert!(app_state.messages.is_empty());
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[test]
fn it_rejects_files_that_are_not_pdfs() {
    let (mut app_state, _tx, _rx) = create_state();

    app_state.select_file("./Cargo.toml");
    assert!(app_state.selected_file.is_none());
    assert_eq!(app_state.messages.len(), 1);
    assert_eq!(app_state.messages[0].message_type(), MessageType::Error);

    app_state.select_file("./test/fixtures/missing.pdf");
    assert!(app_state.selected_file.is_none());
    assert_eq!(app_state.messages.len(), 2);
}

#[test]
fn it_uploads_the_selected_file() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();
    let path = pdf_fixture_path();

    app_state.select_file(&path.to_string_lossy());
    assert_eq!(app_state.selected_file, Some(path.clone()));
    assert!(app_state.messages.is_empty());

    assert!(app_state.upload(&tx)?);
    assert!(app_state.uploading);
    assert!(!app_state.upload(&tx)?);

    let Ok(Action::BackendUpload(request)) = rx.try_recv() else {
        bail!("Expected an upload action");
    };
    assert_eq!(request.file, path);
    assert_eq!(request.session_id, Some("session-1-abc".to_string()));
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[test]
fn it_reports_upload_results() -> Result<()> {
    let (mut app_state, tx, _rx) = create_state();
    let cases = vec![
        (
            Ok(UploadResponse {
                status: 200,
                body: r#"{"message": "ok"}"#.to_string(),
            }),
            UPLOAD_SUCCESS_TEXT,
        ),
        (
            Ok(UploadResponse {
                status: 400,
                body: r#"{"error": "No file provided"}"#.to_string(),
            }),
            "❌ Upload failed: No file provided",
        ),
        (
            Ok(UploadResponse {
                status: 500,
                body: "Internal Server Error".to_string(),
            }),
            "❌ Upload failed: Unknown error",
        ),
        (
            Err(anyhow!("connection refused")),
            UPLOAD_TRANSPORT_ERROR_TEXT,
        ),
    ];

    for (result, expected) in cases {
        app_state.select_file(&pdf_fixture_path().to_string_lossy());
        app_state.upload(&tx)?;

        let res = upload_result(&app_state, result);
        app_state.handle_upload_result(res);

        assert!(!app_state.uploading);
        assert!(app_state.selected_file.is_none());
        assert_eq!(
            app_state.messages.last().map(|message| return message.text.as_str()),
            Some(expected)
        );
    }

    assert_eq!(app_state.messages.len(), 4);

    return Ok(());
}

#[test]
fn it_drops_upload_results_for_previous_sessions() -> Result<()> {
    let (mut app_state, tx, _rx) = create_state();
    app_state.select_file(&pdf_fixture_path().to_string_lossy());
    app_state.upload(&tx)?;

    let stale = upload_result(
        &app_state,
        Ok(UploadResponse {
            status: 200,
            body: "".to_string(),
        }),
    );
    app_state.new_session();
    app_state.handle_upload_result(stale);

    assert!(app_state.messages.is_empty());
    assert!(!app_state.uploading);
    assert!(app_state.selected_file.is_none());

    return Ok(());
}

#[test]
fn it_handles_slash_commands() -> Result<()> {
    let (mut app_state, tx, mut rx) = create_state();

    assert_eq!(app_state.handle_slash_commands("hello", &tx)?, (false, false));
    assert_eq!(app_state.handle_slash_commands("/quit", &tx)?, (true, true));
    assert_eq!(app_state.handle_slash_commands("/q", &tx)?, (true, true));

    assert_eq!(app_state.handle_slash_commands("/help", &tx)?, (false, true));
    assert_eq!(app_state.messages.len(), 1);
    assert!(app_state.messages[0].text.contains("/upload"));

    assert_eq!(app_state.handle_slash_commands("/file", &tx)?, (false, true));
    assert_eq!(app_state.messages.len(), 2);
    assert_eq!(app_state.messages[1].message_type(), MessageType::Error);

    let path = pdf_fixture_path();
    let cmd = format!("/f {}", path.to_string_lossy());
    assert_eq!(app_state.handle_slash_commands(&cmd, &tx)?, (false, true));
    assert_eq!(app_state.selected_file, Some(path));

    assert_eq!(app_state.handle_slash_commands("/upload", &tx)?, (false, true));
    assert!(matches!(rx.try_recv(), Ok(Action::BackendUpload(_))));

    assert_eq!(app_state.handle_slash_commands("/new", &tx)?, (false, true));
    assert!(app_state.messages.is_empty());

    return Ok(());
}

#[test]
fn it_only_animates_while_waiting() -> Result<()> {
    let (mut app_state, tx, _rx) = create_state();
    let idle = app_state.typing_indicator.spans();
    app_state.tick();
    assert_eq!(app_state.typing_indicator.spans(), idle);

    app_state.send_message("Hello", Instant::now(), &tx)?;
    app_state.tick();
    assert_ne!(app_state.typing_indicator.spans(), idle);

    return Ok(());
}
