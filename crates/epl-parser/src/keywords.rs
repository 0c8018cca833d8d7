//! Keyword-ambiguity resolver and token paraphrases
//!
//! Built once on first use and shared read-only by every parser instance.

use epl_core::keywords::{IDENT_ALLOWED_WORDS, RESERVED_WORDS};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::lexer::Token;

static KEYWORDS: Lazy<KeywordTable> = Lazy::new(KeywordTable::build);

/// The process-wide keyword table.
pub fn keyword_table() -> &'static KeywordTable {
    &KEYWORDS
}

pub struct KeywordTable {
    paraphrases: FxHashMap<&'static str, String>,
    ident_allowed: FxHashSet<&'static str>,
}

impl KeywordTable {
    fn build() -> Self {
        let paraphrases = RESERVED_WORDS
            .iter()
            .map(|word| (*word, format!("'{word}' keyword")))
            .collect();
        let ident_allowed = IDENT_ALLOWED_WORDS.iter().copied().collect();
        Self {
            paraphrases,
            ident_allowed,
        }
    }

    /// Whether `token` is a keyword that may stand in for an identifier.
    pub fn is_ident_allowed(&self, token: &Token) -> bool {
        token
            .keyword_text()
            .is_some_and(|word| self.ident_allowed.contains(word))
    }

    /// Human-readable description of a token for "expected X, found Y" messages.
    pub fn paraphrase(&self, token: &Token) -> String {
        if let Some(text) = token.keyword_text().and_then(|w| self.paraphrases.get(w)) {
            return text.clone();
        }
        if let Some(symbol) = token.symbol() {
            return format!("'{symbol}'");
        }
        match token {
            Token::Integer(_) | Token::Long(_) => "integer literal".to_string(),
            Token::Double(_) | Token::Float(_) => "floating-point literal".to_string(),
            Token::SingleQuoted(_) | Token::DoubleQuoted(_) => "string literal".to_string(),
            Token::TripleQuoted(_) => "text block".to_string(),
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::EscapedIdent(name) => format!("escaped identifier `{name}`"),
            Token::Eof => "end of input".to_string(),
            other => format!("'{other}'"),
        }
    }

    pub fn len(&self) -> usize {
        self.paraphrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paraphrases.is_empty()
    }
}
