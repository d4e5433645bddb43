use once_cell::sync::Lazy;
use regex::Regex;

use crate::messages::ChatMessage;
use crate::roster::Roster;

static TRAILING_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\w+$").expect("mention regex pattern is valid"));

/// One space-separated piece of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Plain(String),
    /// A word listed in the message's mentions; clickable.
    Mention(String),
}

impl Token {
    pub fn as_str(&self) -> &str {
        match self {
            Token::Plain(s) | Token::Mention(s) => s,
        }
    }
}

/// The word currently being typed, i.e. everything after the last whitespace.
pub fn filter_token(text: &str) -> &str {
    text.rsplit(char::is_whitespace).next().unwrap_or("")
}

/// Roster names offered for the word being typed. Only `@`-words get suggestions.
pub fn suggestions_for(roster: &Roster, text: &str) -> Vec<String> {
    match filter_token(text).strip_prefix('@') {
        Some(prefix) => roster.starting_with(prefix),
        None => Vec::new(),
    }
}

/// Swaps a trailing `@word` for `@username`. Input without one is returned as is.
pub fn complete_mention(text: &str, username: &str) -> String {
    TRAILING_MENTION
        .replace(text, regex::NoExpand(&format!("@{username}")))
        .into_owned()
}

pub fn render(message: &ChatMessage) -> Vec<Token> {
    message
        .text
        .split(' ')
        .map(|word| {
            if message.mentions.iter().any(|m| m == word) {
                Token::Mention(word.to_string())
            } else {
                Token::Plain(word.to_string())
            }
        })
        .collect()
}
