//! Line protocol definitions
//!
//! Inbound lines are parsed into `ClientCommand` by case-sensitive prefix
//! match. Outbound `ServerMessage`s render to one or more text lines; the
//! writer appends the configured line terminator to each.

use crate::error::AppError;

/// Set or change the nickname: `/NICK <nickname>`
pub const NICK_COMMAND: &str = "/NICK ";
/// Private message: `/MSG <nickname> <message>`
pub const MSG_COMMAND: &str = "/MSG ";
/// List registered nicknames: `/LIST`
pub const LIST_COMMAND: &str = "/LIST";
/// Broadcast to everyone: `/BC <message>`
pub const BROADCAST_COMMAND: &str = "/BC ";

const NICK_HINT: &str = "Use /NICK <nickname> to set your nickname.";

/// Client → Server command
///
/// Parsed from a single trimmed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Claim or change nickname
    Nick { nickname: String },
    /// Request the list of registered nicknames
    List,
    /// Send a message to every registered session
    Broadcast { body: String },
    /// Send a message to one named session
    PrivateMessage { recipient: String, body: String },
    /// `/MSG` with fewer than two tokens
    MalformedPrivateMessage,
    /// Anything else
    Unknown,
}

impl ClientCommand {
    /// Parse one input line (without its newline).
    ///
    /// The line is trimmed first; arguments after the command prefix are
    /// kept verbatim.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if let Some(nickname) = line.strip_prefix(NICK_COMMAND) {
            ClientCommand::Nick {
                nickname: nickname.to_string(),
            }
        } else if line == LIST_COMMAND {
            ClientCommand::List
        } else if let Some(body) = line.strip_prefix(BROADCAST_COMMAND) {
            ClientCommand::Broadcast {
                body: body.to_string(),
            }
        } else if let Some(rest) = line.strip_prefix(MSG_COMMAND) {
            match rest.split_once(char::is_whitespace) {
                Some((recipient, body)) if !body.is_empty() => {
                    ClientCommand::PrivateMessage {
                        recipient: recipient.to_string(),
                        body: body.to_string(),
                    }
                }
                _ => ClientCommand::MalformedPrivateMessage,
            }
        } else {
            ClientCommand::Unknown
        }
    }

    /// Whether this command is allowed before a nickname is set
    pub fn allowed_unregistered(&self) -> bool {
        matches!(self, ClientCommand::Nick { .. })
    }
}

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Banner sent once when the connection is accepted
    Welcome,
    /// Nickname claimed successfully
    NicknameSet { nickname: String },
    /// Snapshot of registered nicknames
    ClientList { nicknames: Vec<String> },
    /// Broadcast from another session
    Broadcast { from: String, body: String },
    /// Echo of the session's own broadcast
    BroadcastEcho { body: String },
    /// Private message from another session
    Private { from: String, body: String },
    /// Error notice, possibly spanning several lines
    Error { message: String },
}

impl ServerMessage {
    /// Text lines making up this message, without terminators
    pub fn lines(&self) -> Vec<String> {
        match self {
            ServerMessage::Welcome => vec![
                "Welcome to the chat server!".to_string(),
                NICK_HINT.to_string(),
            ],
            ServerMessage::NicknameSet { nickname } => {
                vec![format!("Your nickname is now set to: {}", nickname)]
            }
            ServerMessage::ClientList { nicknames } => {
                vec![format!("Client List: {}", nicknames.join(" "))]
            }
            ServerMessage::Broadcast { from, body } => vec![format!("{}: {}", from, body)],
            ServerMessage::BroadcastEcho { body } => vec![format!("You: {}", body)],
            ServerMessage::Private { from, body } => {
                vec![format!("{} (private): {}", from, body)]
            }
            ServerMessage::Error { message } => message.lines().map(String::from).collect(),
        }
    }

    /// Render to wire text, appending `terminator` after every line
    pub fn render(&self, terminator: &str) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push_str(terminator);
        }
        out
    }
}

/// Convert AppError to ServerMessage for client notification
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        let message = match &err {
            AppError::NicknameInUse(_) => {
                "Nickname already in use. Choose a different nickname.".to_string()
            }
            AppError::NicknameRequired => {
                format!("You need to set your nickname at first.\n{}", NICK_HINT)
            }
            AppError::MessageUsage => format!("Usage: {}<nickname> <message>", MSG_COMMAND),
            AppError::UserNotFound(nickname) => {
                format!("User {} not found or offline.", nickname)
            }
            AppError::UnknownCommand => format!(
                "Please enter the correct command.\n{}<nickname>\n{}<nickname> <message>\n{}\n{}<message>",
                NICK_COMMAND, MSG_COMMAND, LIST_COMMAND, BROADCAST_COMMAND
            ),
            // Fatal errors end the session instead of producing a reply
            AppError::Io(_) | AppError::Codec(_) | AppError::ChannelSend => {
                "Internal error".to_string()
            }
        };
        ServerMessage::Error { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nick() {
        assert_eq!(
            ClientCommand::parse("  /NICK alice \r"),
            ClientCommand::Nick {
                nickname: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(ClientCommand::parse("/nick alice"), ClientCommand::Unknown);
        assert_eq!(ClientCommand::parse("/list"), ClientCommand::Unknown);
    }

    #[test]
    fn test_parse_bare_prefix_is_unknown() {
        // Trimming removes the space the prefix requires
        assert_eq!(ClientCommand::parse("/NICK "), ClientCommand::Unknown);
        assert_eq!(ClientCommand::parse("/BC"), ClientCommand::Unknown);
    }

    #[test]
    fn test_parse_list_requires_whole_line() {
        assert_eq!(ClientCommand::parse("/LIST"), ClientCommand::List);
        assert_eq!(ClientCommand::parse("/LISTING"), ClientCommand::Unknown);
    }

    #[test]
    fn test_parse_broadcast_keeps_body() {
        assert_eq!(
            ClientCommand::parse("/BC hello   world"),
            ClientCommand::Broadcast {
                body: "hello   world".to_string()
            }
        );
    }

    #[test]
    fn test_parse_private_message_splits_once() {
        assert_eq!(
            ClientCommand::parse("/MSG bob hey there"),
            ClientCommand::PrivateMessage {
                recipient: "bob".to_string(),
                body: "hey there".to_string()
            }
        );
    }

    #[test]
    fn test_parse_private_message_without_body() {
        assert_eq!(
            ClientCommand::parse("/MSG bob"),
            ClientCommand::MalformedPrivateMessage
        );
        assert_eq!(
            ClientCommand::parse("/MSG bob   "),
            ClientCommand::MalformedPrivateMessage
        );
    }

    #[test]
    fn test_parse_private_message_empty_recipient() {
        // Two spaces: the first whitespace split leaves an empty recipient,
        // which is routed and reported as not found
        assert_eq!(
            ClientCommand::parse("/MSG  bob hi"),
            ClientCommand::PrivateMessage {
                recipient: String::new(),
                body: "bob hi".to_string()
            }
        );
    }

    #[test]
    fn test_only_nick_allowed_unregistered() {
        assert!(ClientCommand::parse("/NICK a").allowed_unregistered());
        assert!(!ClientCommand::parse("/LIST").allowed_unregistered());
        assert!(!ClientCommand::parse("/BC hi").allowed_unregistered());
        assert!(!ClientCommand::parse("hello").allowed_unregistered());
    }

    #[test]
    fn test_render_appends_terminator_per_line() {
        let text = ServerMessage::Welcome.render("\n\r");
        assert_eq!(
            text,
            "Welcome to the chat server!\n\rUse /NICK <nickname> to set your nickname.\n\r"
        );
    }

    #[test]
    fn test_error_conversion() {
        let msg: ServerMessage = AppError::UserNotFound("bob".to_string()).into();
        assert_eq!(msg.lines(), vec!["User bob not found or offline."]);

        let msg: ServerMessage = AppError::UserNotFound(String::new()).into();
        assert_eq!(msg.render("\n\r"), "User  not found or offline.\n\r");

        let msg: ServerMessage = AppError::UnknownCommand.into();
        let lines = msg.lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4], "/BC <message>");
    }
}
