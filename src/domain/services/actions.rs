#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatReply;
use crate::domain::models::Event;
use crate::domain::models::UploadResult;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /file (/f) [PATH] - Selects a PDF to upload. Only files ending in .pdf are accepted.
- /upload (/u) - Uploads the selected PDF to the assistant for the current session.
- /new (/n) - Starts a new session. The chat history is cleared.
- /quit /exit (/q) - Exit Doc Assistant.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+N - Start a new session.
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

fn send_event(tx: &mpsc::UnboundedSender<Event>, event: Event) {
    if let Err(err) = tx.send(event) {
        tracing::error!(error = ?err, "Failed to deliver backend event");
    }
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);

        loop {
            let Some(action) = rx.recv().await else {
                return Ok(());
            };

            let worker_tx = tx.clone();
            let worker_backend = backend.clone();
            match action {
                Action::BackendHealthCheck() => {
                    tokio::spawn(async move {
                        let res = worker_backend.health_check().await;
                        send_event(&worker_tx, Event::BackendHealthCheck(res));
                    });
                }
                Action::BackendChat(prompt) => {
                    tokio::spawn(async move {
                        let result = worker_backend.chat(&prompt).await;
                        send_event(
                            &worker_tx,
                            Event::BackendChatReply(ChatReply {
                                seq: prompt.seq,
                                session_id: prompt.session_id,
                                result,
                            }),
                        );
                    });
                }
                Action::BackendUpload(request) => {
                    tokio::spawn(async move {
                        let result = worker_backend.upload(&request).await;
                        send_event(
                            &worker_tx,
                            Event::BackendUploadResult(UploadResult {
                                session_id: request.session_id,
                                result,
                            }),
                        );
                    });
                }
            }
        }
    }
}
