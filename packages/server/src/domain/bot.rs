//! Chat auto-responder.
//!
//! A synthetic participant that inspects every chat message and sometimes
//! answers into the room. Pure lookup logic plus a randomized fallback;
//! routing decides where the reply goes.

use rand::seq::IndexedRandom;

/// Produces canned replies to chat messages.
///
/// Behind a trait so message-routing tests can substitute a deterministic
/// responder; the stock implementation's fallback is intentionally random.
#[cfg_attr(test, mockall::automock)]
pub trait AutoResponder: Send + Sync {
    /// Reply to a chat message, if the bot has anything to say.
    fn reply_to(&self, content: &str) -> Option<String>;
}

const LOREM_SENTENCES: [&str; 10] = [
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
    "Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.",
    "Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris.",
    "Duis aute irure dolor in reprehenderit in voluptate velit esse.",
    "Excepteur sint occaecat cupidatat non proident sunt in culpa.",
    "Curabitur pretium tincidunt lacus nunc nonummy metus.",
    "Vestibulum ante ipsum primis in faucibus orci luctus.",
    "Pellentesque habitant morbi tristique senectus et netus.",
    "Mauris blandit aliquet elit eget tincidunt nibh pulvinar.",
    "Vivamus suscipit tortor eget felis porttitor volutpat.",
];

/// The stock responder, Abdu.
///
/// Matching runs on the lowercased, trimmed message: a couple of exact or
/// substring phrases get fixed answers, and anything containing a vowel
/// gets a random lorem line. Everything else is ignored.
pub struct AbduBot;

impl AutoResponder for AbduBot {
    fn reply_to(&self, content: &str) -> Option<String> {
        let message = content.to_lowercase().trim().to_string();

        if message == "halo" {
            return Some("apa kabar".to_string());
        }

        if message.contains("nama") {
            return Some("nama saya abdu".to_string());
        }

        if message.chars().any(|c| "aiueo".contains(c)) {
            return LOREM_SENTENCES
                .choose(&mut rand::rng())
                .map(|line| (*line).to_string());
        }

        None
    }
}
