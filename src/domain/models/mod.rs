mod action;
mod author;
mod backend;
mod event;
mod message;
mod rate_limit;
mod server_status;
mod session;
mod slash_commands;
mod textarea;
mod typing;

pub use action::*;
pub use author::*;
pub use backend::*;
pub use event::*;
pub use message::*;
pub use rate_limit::*;
pub use server_status::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
pub use typing::*;
