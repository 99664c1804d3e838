//! UI utilities for the client.

use std::io::Write;

pub const PROMPT: &str = "> ";

/// Print a block of output and redraw the prompt below it
pub fn print_block(text: &str) {
    print!("{}", text);
    redisplay_prompt();
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
