//! Display-name normalization shared by every dataset.
//!
//! Source names arrive upper-cased, abbreviated and padded with filler such as
//! `FDR` or `UNNAMED`. A [`NameRules`] record describes one dataset's tables; the
//! normalizer itself is the same for all of them.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

static ALPHANUMERIC_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+|[\w'.]+|[^\w'.\s]+").expect("valid token pattern"));

static LETTER_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+|[A-Za-z'.]+|[^A-Za-z'.\s]+").expect("valid token pattern"));

static NUMBERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\d+$").expect("valid marker pattern"));

/// Which characters make up a word token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordChars {
    /// Letters, digits and underscore, so `12A` is a single word.
    Alphanumeric,
    /// ASCII letters only, so `#12` stays one punctuation token.
    Letters,
}

impl WordChars {
    fn pattern(self) -> &'static Regex {
        match self {
            WordChars::Alphanumeric => &ALPHANUMERIC_TOKENS,
            WordChars::Letters => &LETTER_TOKENS,
        }
    }

    fn is_word_char(self, c: char) -> bool {
        match self {
            WordChars::Alphanumeric => c.is_alphanumeric() || c == '_',
            WordChars::Letters => c.is_ascii_alphabetic(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Space,
    Punct,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: Cow<'a, str>,
}

impl<'a> Token<'a> {
    fn space() -> Self {
        Self {
            kind: TokenKind::Space,
            text: Cow::Borrowed(" "),
        }
    }

    fn word(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind: TokenKind::Word,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixRule {
    /// The last token must be a terminal word.
    EndsWith,
    /// Any word token may be the terminal word.
    Contains,
}

/// Category words a finished name is expected to carry, e.g. `Road`.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    pub words: &'static [&'static str],
    pub default: &'static str,
    pub rule: SuffixRule,
}

impl Terminal {
    fn satisfied_by(&self, tokens: &[Token<'_>]) -> bool {
        match self.rule {
            SuffixRule::EndsWith => tokens
                .last()
                .map(|token| self.words.contains(&&*token.text))
                .unwrap_or(false),
            SuffixRule::Contains => tokens
                .iter()
                .filter(|token| token.kind == TokenKind::Word)
                .any(|token| self.words.contains(&&*token.text)),
        }
    }
}

/// Per-dataset normalization tables. Keys are upper-case.
#[derive(Debug)]
pub struct NameRules {
    pub abbreviations: HashMap<&'static str, &'static str>,
    pub special_cases: HashMap<&'static str, &'static str>,
    pub bad_words: HashSet<&'static str>,
    pub bad_names: HashSet<&'static str>,
    pub bad_name_patterns: Vec<Regex>,
    pub word_chars: WordChars,
    /// Reject names that embed the record's own identifier.
    pub reject_embedded_id: bool,
    /// Reject `FR 1234` style forest-route numbers.
    pub reject_route_numbers: bool,
    /// Delete `#12` style marker tokens.
    pub drop_numbered_markers: bool,
    pub terminal: Terminal,
}

impl NameRules {
    /// Normalize `raw` into a display name, or `None` when the record should be
    /// treated as unnamed.
    pub fn normalize(&self, raw: Option<&str>, id: Option<&str>) -> Option<String> {
        let raw = raw?;
        if self.reject_embedded_id {
            if let Some(id) = id.filter(|id| !id.is_empty()) {
                if raw.contains(id) {
                    return None;
                }
            }
        }

        let name = self.drop_bad_chunks(&squeeze(&raw.replace('/', " / ")));
        if name.is_empty()
            || self.is_bad_name(&name)
            || is_numeric(&name)
            || (self.reject_route_numbers && is_route_number(&name))
        {
            return None;
        }

        let mut tokens = Vec::new();
        for token in tokenize(&name, self.word_chars) {
            self.transform(token, &mut tokens);
        }
        let mut tokens = collapse_spaces(tokens);
        if tokens.is_empty() {
            return None;
        }

        if !self.terminal.satisfied_by(&tokens) {
            tokens.push(Token::space());
            tokens.push(Token::word(self.terminal.default));
        }
        capitalize_edges(&mut tokens);

        Some(tokens.iter().map(|token| &*token.text).collect())
    }

    /// Wider than an exact match against the table: case is ignored and the name has
    /// already been squeezed and stripped of bad-word chunks, so `unnamed` and
    /// `NO  NAME` are rejected too.
    fn is_bad_name(&self, name: &str) -> bool {
        self.bad_names.contains(name.to_uppercase().as_str())
            || self
                .bad_name_patterns
                .iter()
                .any(|pattern| pattern.is_match(name))
    }

    /// Whole space-separated chunks such as `(FDR)` that would otherwise leave
    /// their brackets behind after tokenization.
    fn drop_bad_chunks(&self, name: &str) -> String {
        name.split(' ')
            .filter(|chunk| !self.bad_words.contains(chunk.to_uppercase().as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn transform<'a>(&self, token: Token<'a>, out: &mut Vec<Token<'a>>) {
        if token.kind == TokenKind::Space {
            out.push(token);
            return;
        }
        if self.drop_numbered_markers && NUMBERED_MARKER.is_match(&token.text) {
            return;
        }
        if token.kind == TokenKind::Punct {
            out.push(token);
            return;
        }

        let upper = token.text.to_uppercase();
        if self.bad_words.contains(upper.as_str()) {
            return;
        }

        let expansion = self
            .abbreviations
            .get(upper.as_str())
            .or_else(|| self.abbreviations.get(upper.replace('.', "").as_str()));
        if let Some(expansion) = expansion {
            out.extend(tokenize(*expansion, self.word_chars));
        } else if let Some(forced) = self.special_cases.get(upper.as_str()) {
            out.push(Token::word(*forced));
        } else if token.text.chars().any(|c| self.word_chars.is_word_char(c)) {
            out.push(Token::word(capitalize(&token.text)));
        } else {
            out.push(token);
        }
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn squeeze(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into whitespace, punctuation and word tokens. Joining the token
/// texts in order gives back `text`.
pub fn tokenize(text: &str, word_chars: WordChars) -> Vec<Token<'_>> {
    word_chars
        .pattern()
        .find_iter(text)
        .map(|found| {
            let piece = found.as_str();
            let kind = match piece.chars().next() {
                Some(c) if c.is_whitespace() => TokenKind::Space,
                Some(c) if c == '\'' || c == '.' || word_chars.is_word_char(c) => TokenKind::Word,
                _ => TokenKind::Punct,
            };
            Token {
                kind,
                text: Cow::Borrowed(piece),
            }
        })
        .collect()
}

fn is_numeric(name: &str) -> bool {
    !name.is_empty() && name.chars().all(char::is_numeric)
}

fn is_route_number(name: &str) -> bool {
    let compact: String = name
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();
    match (compact.get(..2), compact.get(2..)) {
        (Some(prefix), Some(number)) => {
            prefix.eq_ignore_ascii_case("FR")
                && !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Drop leading, trailing and repeated space tokens left behind by deleted words.
fn collapse_spaces(tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    let mut out: Vec<Token<'_>> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind == TokenKind::Space
            && out
                .last()
                .map(|last| last.kind == TokenKind::Space)
                .unwrap_or(true)
        {
            continue;
        }
        out.push(token);
    }
    if out
        .last()
        .map(|last| last.kind == TokenKind::Space)
        .unwrap_or(false)
    {
        out.pop();
    }
    out
}

fn capitalize_edges(tokens: &mut [Token<'_>]) {
    let last = tokens.len().saturating_sub(1);
    for index in [0, last] {
        if let Some(token) = tokens.get_mut(index) {
            if is_lowercase(&token.text) {
                token.text = Cow::Owned(capitalize(&token.text));
            }
        }
    }
}

fn is_lowercase(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && !text.chars().any(char::is_uppercase)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}
