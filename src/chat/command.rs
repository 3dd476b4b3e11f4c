//! Input line parsing for the terminal front-end.
//!
//! Plain lines are messages; lines starting with `/` are commands such as
//! /join, /to, /whoami, /log, /help and /quit.

/// Result of parsing an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// Message text to send.
    Message(String),
    /// Parsed command.
    Command(ChatCommand),
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Join a room. An empty id is passed through and ignored downstream.
    Join(String),
    /// Set the sticky private-message target; empty clears it.
    To(String),
    /// Show the identity the relay assigned to us.
    WhoAmI,
    /// Reprint the room log.
    Log,
    /// Show help.
    Help,
    /// Close the connection and exit.
    Quit,
    /// Unknown command.
    Unknown(String),
}

impl ChatCommand {
    /// Get the command name.
    pub fn name(&self) -> &str {
        match self {
            ChatCommand::Join(_) => "join",
            ChatCommand::To(_) => "to",
            ChatCommand::WhoAmI => "whoami",
            ChatCommand::Log => "log",
            ChatCommand::Help => "help",
            ChatCommand::Quit => "quit",
            ChatCommand::Unknown(cmd) => cmd,
        }
    }
}

impl std::fmt::Display for ChatCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatCommand::Join(room) => write!(f, "/join {room}"),
            ChatCommand::To(user) if user.is_empty() => write!(f, "/to"),
            ChatCommand::To(user) => write!(f, "/to {user}"),
            ChatCommand::WhoAmI => write!(f, "/whoami"),
            ChatCommand::Log => write!(f, "/log"),
            ChatCommand::Help => write!(f, "/help"),
            ChatCommand::Quit => write!(f, "/quit"),
            ChatCommand::Unknown(cmd) => write!(f, "/{cmd}"),
        }
    }
}

/// Parse an input line into a message or command.
pub fn parse_input(input: &str) -> ChatInput {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return ChatInput::Message(trimmed.to_string());
    }

    let without_slash = &trimmed[1..];
    let (cmd, args) = match without_slash.find(char::is_whitespace) {
        Some(pos) => (&without_slash[..pos], without_slash[pos..].trim()),
        None => (without_slash, ""),
    };

    let command = match cmd.to_lowercase().as_str() {
        "join" | "j" => ChatCommand::Join(args.to_string()),
        "to" | "msg" => ChatCommand::To(args.to_string()),
        "whoami" | "id" => ChatCommand::WhoAmI,
        "log" | "history" => ChatCommand::Log,
        "help" | "h" | "?" => ChatCommand::Help,
        "quit" | "q" | "exit" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(cmd.to_string()),
    };

    ChatInput::Command(command)
}

/// Command information for help display.
pub struct CommandInfo {
    /// Command name.
    pub name: &'static str,
    /// Command aliases.
    pub aliases: &'static [&'static str],
    /// Command syntax.
    pub syntax: &'static str,
    /// Command description.
    pub description: &'static str,
}

/// Get all available command information.
pub fn get_command_help() -> Vec<CommandInfo> {
    vec![
        CommandInfo {
            name: "join",
            aliases: &["j"],
            syntax: "/join <room>",
            description: "Join a room; plain messages then go to it",
        },
        CommandInfo {
            name: "to",
            aliases: &["msg"],
            syntax: "/to [user]",
            description: "Send plain messages privately to a user; no argument clears it",
        },
        CommandInfo {
            name: "whoami",
            aliases: &["id"],
            syntax: "/whoami",
            description: "Show the identity the relay assigned to you",
        },
        CommandInfo {
            name: "log",
            aliases: &["history"],
            syntax: "/log",
            description: "Show the room messages received so far",
        },
        CommandInfo {
            name: "help",
            aliases: &["h", "?"],
            syntax: "/help",
            description: "Show this help",
        },
        CommandInfo {
            name: "quit",
            aliases: &["q", "exit"],
            syntax: "/quit",
            description: "Disconnect and exit",
        },
    ]
}

/// Format the help message for display.
pub fn format_help() -> String {
    let mut lines = Vec::new();
    lines.push("=== Commands ===".to_string());
    lines.push(String::new());

    for info in get_command_help() {
        lines.push(info.syntax.to_string());
        if !info.aliases.is_empty() {
            lines.push(format!("  aliases: /{}", info.aliases.join(", /")));
        }
        lines.push(format!("  {}", info.description));
        lines.push(String::new());
    }

    lines.push("Private messages win over the room while a /to target is set.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regular_message() {
        let input = parse_input("Hello, world!");
        assert_eq!(input, ChatInput::Message("Hello, world!".to_string()));
    }

    #[test]
    fn test_parse_message_is_trimmed() {
        let input = parse_input("  Hello!  ");
        assert_eq!(input, ChatInput::Message("Hello!".to_string()));
    }

    #[test]
    fn test_parse_empty_message() {
        assert_eq!(parse_input(""), ChatInput::Message(String::new()));
        assert_eq!(parse_input("   "), ChatInput::Message(String::new()));
    }

    #[test]
    fn test_parse_join_command() {
        assert_eq!(
            parse_input("/join lobby"),
            ChatInput::Command(ChatCommand::Join("lobby".to_string()))
        );
        assert_eq!(
            parse_input("/J   games  "),
            ChatInput::Command(ChatCommand::Join("games".to_string()))
        );
    }

    #[test]
    fn test_parse_join_without_room() {
        assert_eq!(
            parse_input("/join"),
            ChatInput::Command(ChatCommand::Join(String::new()))
        );
    }

    #[test]
    fn test_parse_to_command() {
        assert_eq!(
            parse_input("/to abc123"),
            ChatInput::Command(ChatCommand::To("abc123".to_string()))
        );
        assert_eq!(
            parse_input("/msg abc123"),
            ChatInput::Command(ChatCommand::To("abc123".to_string()))
        );
        assert_eq!(
            parse_input("/to"),
            ChatInput::Command(ChatCommand::To(String::new()))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_input("/whoami"), ChatInput::Command(ChatCommand::WhoAmI));
        assert_eq!(parse_input("/id"), ChatInput::Command(ChatCommand::WhoAmI));
        assert_eq!(parse_input("/log"), ChatInput::Command(ChatCommand::Log));
        assert_eq!(parse_input("/history"), ChatInput::Command(ChatCommand::Log));
        assert_eq!(parse_input("/?"), ChatInput::Command(ChatCommand::Help));
        assert_eq!(parse_input("/QUIT"), ChatInput::Command(ChatCommand::Quit));
        assert_eq!(parse_input("/exit"), ChatInput::Command(ChatCommand::Quit));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse_input("/dance now"),
            ChatInput::Command(ChatCommand::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_command_name() {
        assert_eq!(ChatCommand::Join("x".to_string()).name(), "join");
        assert_eq!(ChatCommand::To(String::new()).name(), "to");
        assert_eq!(ChatCommand::Unknown("dance".to_string()).name(), "dance");
    }

    #[test]
    fn test_command_display() {
        assert_eq!(ChatCommand::Join("lobby".to_string()).to_string(), "/join lobby");
        assert_eq!(ChatCommand::To(String::new()).to_string(), "/to");
        assert_eq!(ChatCommand::To("B".to_string()).to_string(), "/to B");
        assert_eq!(ChatCommand::Quit.to_string(), "/quit");
        assert_eq!(ChatCommand::Unknown("dance".to_string()).to_string(), "/dance");
    }

    #[test]
    fn test_format_help_lists_all_commands() {
        let help = format_help();
        for info in get_command_help() {
            assert!(help.contains(info.syntax), "missing {}", info.name);
        }
    }
}
