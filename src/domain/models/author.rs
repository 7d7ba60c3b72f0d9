use std::fmt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const BOT_NAME: &str = "Doc Assistant";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::User => return write!(f, "{}", Config::get(ConfigKey::Username)),
            Author::Bot => return write!(f, "{BOT_NAME}"),
        }
    }
}
