//! Command parameters
//!
//! A small tokenizer over the raw parameter text of a chat command:
//!
//! ```text
//! amount  := [0-9]+
//! mention := '@' identifier
//! word    := anything else
//! ```
//!
//! Handlers validate the token shape they expect instead of indexing into
//! a split string.

use super::Amount;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Amount(Amount),
    /// Mention without the leading `@`, case preserved
    Mention(String),
    Word(String),
}

impl Token {
    fn classify(raw: &str) -> Token {
        if let Some(name) = raw.strip_prefix('@') {
            if !name.is_empty() && !name.contains('@') {
                return Token::Mention(name.to_string());
            }
            return Token::Word(raw.to_string());
        }
        match raw.parse::<Amount>() {
            Ok(amount) => Token::Amount(amount),
            Err(_) => Token::Word(raw.to_string()),
        }
    }
}

/// Parsed parameter text of one command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    raw: String,
    tokens: Vec<Token>,
}

impl Params {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        Self {
            raw: raw.to_string(),
            tokens: raw.split_whitespace().map(Token::classify).collect(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the raw text contains an `@` anywhere
    pub fn has_mention(&self) -> bool {
        self.raw.contains('@')
    }

    pub fn amount_at(&self, index: usize) -> Option<Amount> {
        match self.tokens.get(index) {
            Some(Token::Amount(amount)) => Some(*amount),
            _ => None,
        }
    }

    pub fn mention_at(&self, index: usize) -> Option<&str> {
        match self.tokens.get(index) {
            Some(Token::Mention(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    /// The single token as an amount, when exactly one token was given
    pub fn sole_amount(&self) -> Option<Amount> {
        if self.tokens.len() == 1 {
            self.amount_at(0)
        } else {
            None
        }
    }
}
