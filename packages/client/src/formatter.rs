//! Message formatting utilities for client display.

use inkpot_server::infrastructure::dto::websocket::MemberDto;
use inkpot_shared::time::{timestamp_to_clock_time, timestamp_to_rfc3339};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    fn member_name(username: Option<&str>, connection_id: &str) -> String {
        match username {
            Some(username) => username.to_string(),
            None => format!("anonymous ({})", connection_id),
        }
    }

    /// Room header with the members present at join time; `me` is marked
    pub fn format_room_joined(room_id: &str, members: &[MemberDto], me: Option<i64>) -> String {
        let mut output = format!("\n\n{}\nRoom #{}\n", RULE, room_id);
        for member in members {
            let name = Self::member_name(member.username.as_deref(), &member.connection_id);
            let me_suffix = if me.is_some() && member.user_id == me {
                " (me)"
            } else {
                ""
            };
            output.push_str(&format!("{}{}\n", name, me_suffix));
        }
        output.push_str(RULE);
        output.push('\n');
        output
    }

    pub fn format_room_left(room_id: &str) -> String {
        format!("\nYou left #{}\n", room_id)
    }

    pub fn format_member_joined(
        username: Option<&str>,
        connection_id: &str,
        timestamp: i64,
    ) -> String {
        format!(
            "\n+ {} joined at {}\n",
            Self::member_name(username, connection_id),
            timestamp_to_clock_time(timestamp)
        )
    }

    pub fn format_member_left(
        username: Option<&str>,
        connection_id: &str,
        timestamp: i64,
    ) -> String {
        format!(
            "\n- {} left at {}\n",
            Self::member_name(username, connection_id),
            timestamp_to_clock_time(timestamp)
        )
    }

    pub fn format_chat_message(from: &str, content: &str, sent_at: i64) -> String {
        format!(
            "\n\n{}\n@{}: {}\nsent at {}\n{}\n",
            THIN_RULE,
            from,
            content,
            timestamp_to_rfc3339(sent_at),
            THIN_RULE
        )
    }

    /// Confirmation after the server stored one of our messages
    pub fn format_sent_confirmation(id: i64, sent_at: i64) -> String {
        format!("\n#{} sent at {}\n", id, timestamp_to_rfc3339(sent_at))
    }

    pub fn format_typing_line(line: &str) -> String {
        format!("\n… {}\n", line)
    }

    pub fn format_error(code: &str, message: &str) -> String {
        format!("\n! [{}] {}\n", code, message)
    }

    pub fn format_notice(text: &str) -> String {
        format!("\n{}\n", text)
    }

    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
