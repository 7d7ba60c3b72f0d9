#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ServerStatus {
    Checking,
    Online,
    Offline,
}

impl ServerStatus {
    pub fn text(&self) -> &'static str {
        match self {
            ServerStatus::Checking => return "Connecting...",
            ServerStatus::Online => return "Online now",
            ServerStatus::Offline => return "Currently offline",
        }
    }
}
