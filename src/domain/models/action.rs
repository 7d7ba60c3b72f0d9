use super::ChatPrompt;
use super::UploadRequest;

pub enum Action {
    BackendChat(ChatPrompt),
    BackendHealthCheck(),
    BackendUpload(UploadRequest),
}
