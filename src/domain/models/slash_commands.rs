#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    raw_args: String,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (prefix, raw_args) = text.split_once(' ').unwrap_or((text, ""));
        let cmd = SlashCommand {
            command: prefix.to_string(),
            raw_args: raw_args.trim().to_string(),
        };
        if cmd.is_quit()
            || cmd.is_file_select()
            || cmd.is_upload()
            || cmd.is_new_session()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    /// Everything after the command, untouched apart from trimming.
    pub fn arg_text(&self) -> &str {
        return &self.raw_args;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_file_select(&self) -> bool {
        return ["/f", "/file"].contains(&self.command.as_str());
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_new_session(&self) -> bool {
        return ["/n", "/new"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
