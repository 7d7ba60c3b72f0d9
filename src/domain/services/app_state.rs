#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::BubbleList;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ChatPrompt;
use crate::domain::models::ChatReply;
use crate::domain::models::Message;
use crate::domain::models::RateLimit;
use crate::domain::models::ServerStatus;
use crate::domain::models::SessionId;
use crate::domain::models::SlashCommand;
use crate::domain::models::TypingIndicator;
use crate::domain::models::UploadRequest;
use crate::domain::models::UploadResult;

pub const OFFLINE_TEXT: &str = "Sorry, the server is currently offline. Please try again later.";
pub const CHAT_ERROR_TEXT: &str =
    "Sorry, I encountered an error. The server might be offline. Please try again later.";
pub const UPLOAD_SUCCESS_TEXT: &str = "✅ PDF uploaded and vector DB created successfully.";
pub const UPLOAD_TRANSPORT_ERROR_TEXT: &str = "❌ Upload error. Server might be offline.";

#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Empty,
    Offline,
    CoolingDown(u64),
    Sent,
}

impl SendOutcome {
    /// Whether the input box should be emptied after this attempt.
    pub fn clears_input(&self) -> bool {
        return matches!(self, SendOutcome::Offline | SendOutcome::Sent);
    }
}

pub struct AppState {
    pub bubble_list: BubbleList,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub messages: Vec<Message>,
    pub rate_limit: RateLimit,
    pub scroll: Scroll,
    pub selected_file: Option<PathBuf>,
    pub server_status: ServerStatus,
    pub session_id: String,
    pub typing_indicator: TypingIndicator,
    pub uploading: bool,
    pub waiting_for_backend: bool,
    next_seq: u64,
}

impl AppState {
    pub fn new(session_id: &str) -> AppState {
        let mut session_id = session_id.to_string();
        if session_id.is_empty() {
            session_id = SessionId::create();
        }

        return AppState {
            bubble_list: BubbleList::default(),
            last_known_height: 0,
            last_known_width: 0,
            messages: vec![],
            rate_limit: RateLimit::default(),
            scroll: Scroll::default(),
            selected_file: None,
            server_status: ServerStatus::Checking,
            session_id,
            typing_indicator: TypingIndicator::default(),
            uploading: false,
            waiting_for_backend: false,
            next_seq: 1,
        };
    }

    pub fn initialize(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        self.server_status = ServerStatus::Checking;
        tx.send(Action::BackendHealthCheck())?;

        return Ok(());
    }

    pub fn handle_health_check(&mut self, res: Result<()>) {
        match res {
            Ok(_) => {
                self.server_status = ServerStatus::Online;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Health check failed");
                self.server_status = ServerStatus::Offline;
            }
        }
    }

    pub fn send_message(
        &mut self,
        text: &str,
        now: Instant,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<SendOutcome> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Empty);
        }

        if self.server_status == ServerStatus::Offline {
            self.add_message(Message::bot_error(OFFLINE_TEXT));
            return Ok(SendOutcome::Offline);
        }

        if let Some(remaining) = self.rate_limit.remaining(now) {
            let seconds = RateLimit::wait_seconds(remaining);
            self.add_message(Message::new(
                Author::Bot,
                &format!("Please wait {seconds} more second(s) before sending another message."),
            ));
            return Ok(SendOutcome::CoolingDown(seconds));
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        self.add_message(Message::new(Author::User, text));
        self.waiting_for_backend = true;
        self.rate_limit.record_send(now);

        tracing::debug!(seq = seq, session_id = %self.session_id, "Sending chat request");
        tx.send(Action::BackendChat(ChatPrompt {
            seq,
            session_id: self.session_id.to_string(),
            text: text.to_string(),
        }))?;

        return Ok(SendOutcome::Sent);
    }

    pub fn handle_chat_reply(&mut self, reply: ChatReply, now: Instant) {
        self.waiting_for_backend = false;
        self.rate_limit.settle(now);

        if reply.session_id != self.session_id {
            tracing::info!(
                seq = reply.seq,
                session_id = %reply.session_id,
                "Dropping chat reply for a previous session"
            );
            self.sync_dependants();
            return;
        }

        match reply.result {
            Ok(text) => {
                self.server_status = ServerStatus::Online;
                self.add_message(Message::new(Author::Bot, &text));
            }
            Err(err) => {
                tracing::error!(seq = reply.seq, error = ?err, "Chat request failed");
                self.server_status = ServerStatus::Offline;
                self.add_message(Message::bot_error(CHAT_ERROR_TEXT));
            }
        }
    }

    pub fn new_session(&mut self) {
        self.session_id = SessionId::regenerate(&self.session_id);
        self.messages.clear();
        self.sync_dependants();
        self.scroll.last();

        tracing::info!(session_id = %self.session_id, "Started new session");
    }

    pub fn select_file(&mut self, path: &str) {
        let file = PathBuf::from(path);
        if !UploadRequest::accepts(&file) {
            self.add_message(Message::bot_error(&format!(
                "Only PDF files can be uploaded, {path} is not a PDF."
            )));
            return;
        }

        if !file.is_file() {
            self.add_message(Message::bot_error(&format!("No file found at {path}.")));
            return;
        }

        self.selected_file = Some(file);
    }

    /// Returns whether an upload was started.
    pub fn upload(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if self.uploading {
            tracing::debug!("Upload already in progress");
            return Ok(false);
        }

        let Some(file) = self.selected_file.clone() else {
            tracing::debug!("No file selected for upload");
            return Ok(false);
        };

        self.uploading = true;
        tx.send(Action::BackendUpload(UploadRequest {
            file,
            session_id: Some(self.session_id.to_string()),
        }))?;

        return Ok(true);
    }

    pub fn handle_upload_result(&mut self, upload: UploadResult) {
        self.uploading = false;
        self.selected_file = None;

        if upload.session_id.as_deref() != Some(self.session_id.as_str()) {
            tracing::info!(
                session_id = ?upload.session_id,
                "Dropping upload result for a previous session"
            );
            return;
        }

        match upload.result {
            Ok(res) if res.is_success() => {
                self.add_message(Message::new(Author::Bot, UPLOAD_SUCCESS_TEXT));
            }
            Ok(res) => {
                let error = res
                    .error_text()
                    .unwrap_or_else(|| return "Unknown error".to_string());
                self.add_message(Message::bot_error(&format!(
                    "❌ Upload failed: {error}"
                )));
            }
            Err(err) => {
                tracing::error!(error = ?err, "Upload request failed");
                self.add_message(Message::bot_error(UPLOAD_TRANSPORT_ERROR_TEXT));
            }
        }
    }

    /// Returns `(should_break, was_command)`.
    pub fn handle_slash_commands(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let Some(command) = SlashCommand::parse(input) else {
            return Ok((false, false));
        };

        if command.is_quit() {
            return Ok((true, true));
        }

        if command.is_file_select() {
            if command.arg_text().is_empty() {
                self.add_message(Message::bot_error(
                    "You must pass a path to a PDF with `/file PATH`. Run `/help` for more details.",
                ));
            } else {
                let path = command.arg_text().to_string();
                self.select_file(&path);
            }
        } else if command.is_upload() {
            self.upload(tx)?;
        } else if command.is_new_session() {
            self.new_session();
        } else if command.is_help() {
            self.add_message(Message::new(Author::Bot, &help_text()));
        }

        return Ok((false, true));
    }

    pub fn tick(&mut self) {
        if self.waiting_for_backend {
            self.typing_indicator.tick();
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.sync_dependants();
        self.scroll.last();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.messages, self.last_known_width.into());

        self.scroll.set_state(
            u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX),
            self.last_known_height,
        );

        if self.waiting_for_backend {
            self.scroll.last();
        }
    }
}
