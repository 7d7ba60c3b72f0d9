pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
pub mod events;
mod markdown;
mod scroll;
mod uploader;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use markdown::*;
pub use scroll::*;
pub use uploader::*;
