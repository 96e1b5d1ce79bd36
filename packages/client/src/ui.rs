//! UI utilities for the client.

use std::io::Write;

use crate::formatter::prompt;

/// Redisplay the prompt after printing a received line
pub fn redisplay_prompt(room: Option<&str>) {
    print!("{}", prompt(room));
    std::io::stdout().flush().ok();
}
