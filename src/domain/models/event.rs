use anyhow::Result;
use tui_textarea::Input;

use super::ChatReply;
use super::UploadResult;

pub enum Event {
    BackendChatReply(ChatReply),
    BackendHealthCheck(Result<()>),
    BackendUploadResult(UploadResult),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
