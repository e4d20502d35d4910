//! Longest-match lexer over the token catalog
//!
//! At every offset each category's rule is tried against the remaining
//! suffix. The longest lexeme wins; ties go to the category declared first in
//! `TokenCategory::ALL`. Lexemes are compared in characters, and offsets are
//! reported in characters, so multi-byte input never skews positions.

use crate::config::compile_time::lexical::{MAX_INPUT_LENGTH, MAX_TOKEN_COUNT};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{MatchRule, Token, TokenCategory};
use crate::{log_debug, log_error, log_success};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid token at position {offset}: no category matches '{character}'")]
    NoMatchingCategory { character: char, offset: usize },

    #[error("Input too long: {length} characters (max {MAX_INPUT_LENGTH})")]
    InputTooLong { length: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Invalid pattern for {category}: {message}")]
    InvalidPattern {
        category: TokenCategory,
        message: String,
    },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::NoMatchingCategory { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::InputTooLong { .. } => codes::lexical::INPUT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::InvalidPattern { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Character offset the error refers to, when it has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            LexerError::NoMatchingCategory { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub input_chars: usize,
    /// Tokens produced, excluding the EOF marker
    pub total_tokens: usize,
    pub whitespace_tokens: usize,
    /// Filled only when detailed metrics are enabled
    pub category_counts: BTreeMap<TokenCategory, usize>,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        if token.is(TokenCategory::Whitespace) {
            self.whitespace_tokens += 1;
        }
        if preferences.collect_detailed_metrics {
            *self.category_counts.entry(token.category).or_insert(0) += 1;
        }
    }

    pub fn significant_tokens(&self) -> usize {
        self.total_tokens - self.whitespace_tokens
    }
}

enum Matcher {
    Literal(&'static [&'static str]),
    Pattern(Regex),
}

struct CompiledRule {
    category: TokenCategory,
    matcher: Matcher,
}

impl CompiledRule {
    /// Byte length of the longest prefix of `rest` this rule accepts
    fn match_len(&self, rest: &str) -> Option<usize> {
        match &self.matcher {
            Matcher::Literal(spellings) => spellings
                .iter()
                .filter(|s| rest.starts_with(**s))
                .map(|s| s.len())
                .max(),
            Matcher::Pattern(regex) => regex
                .find(rest)
                .filter(|m| m.start() == 0 && !m.is_empty())
                .map(|m| m.end()),
        }
    }
}

static CATALOG: OnceLock<Result<Vec<CompiledRule>, LexerError>> = OnceLock::new();

fn compiled_catalog() -> Result<&'static [CompiledRule], LexerError> {
    CATALOG
        .get_or_init(|| {
            TokenCategory::ALL
                .iter()
                .filter_map(|category| category.rule().map(|rule| (*category, rule)))
                .map(|(category, rule)| {
                    let matcher = match rule {
                        MatchRule::Literal(spellings) => Matcher::Literal(spellings),
                        MatchRule::Pattern(pattern) => {
                            let anchored = format!("^(?:{})", pattern);
                            let regex = Regex::new(&anchored).map_err(|e| {
                                LexerError::InvalidPattern {
                                    category,
                                    message: e.to_string(),
                                }
                            })?;
                            Matcher::Pattern(regex)
                        }
                    };
                    Ok(CompiledRule { category, matcher })
                })
                .collect()
        })
        .as_ref()
        .map(|rules| rules.as_slice())
        .map_err(Clone::clone)
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Convert `text` into tokens terminated by an EOF token
    pub fn tokenize(&mut self, text: &str) -> Result<Vec<Token>, LexerError> {
        self.metrics = LexicalMetrics::default();

        let input_chars = text.chars().count();
        self.metrics.input_chars = input_chars;

        log_debug!("Starting lexical analysis",
            "chars" => input_chars,
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        if input_chars > MAX_INPUT_LENGTH {
            let error = LexerError::InputTooLong {
                length: input_chars,
            };
            log_error!(error.error_code(), "Input exceeds maximum length",
                "length" => input_chars,
                "max" => MAX_INPUT_LENGTH
            );
            return Err(error);
        }

        let catalog = compiled_catalog()?;
        let mut tokens = Vec::new();
        let mut byte_pos = 0;
        let mut char_offset = 0;

        while byte_pos < text.len() {
            let rest = &text[byte_pos..];

            let (category, byte_len) = match longest_match(catalog, rest) {
                Some(found) => found,
                None => {
                    let character = rest.chars().next().unwrap_or('\0');
                    let error = LexerError::NoMatchingCategory {
                        character,
                        offset: char_offset,
                    };
                    log_error!(error.error_code(), "No token category matches",
                        "offset" => char_offset,
                        "character" => character
                    );
                    return Err(error);
                }
            };

            let lexeme = &rest[..byte_len];
            let token = Token::new(category, lexeme, char_offset);

            if self.preferences.log_token_stream {
                log_debug!("Token",
                    "category" => category,
                    "lexeme" => lexeme,
                    "offset" => char_offset
                );
            }

            self.metrics.record_token(&token, &self.preferences);
            tokens.push(token);

            if tokens.len() > MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len(),
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    "max" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }

            byte_pos += byte_len;
            char_offset += lexeme.chars().count();
        }

        tokens.push(Token::eof(char_offset));

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "significant" => self.metrics.significant_tokens()
        );

        Ok(tokens)
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the longest match at the start of `rest`; earlier rules win ties
fn longest_match(catalog: &[CompiledRule], rest: &str) -> Option<(TokenCategory, usize)> {
    let mut best: Option<(TokenCategory, usize, usize)> = None;

    for rule in catalog {
        let Some(byte_len) = rule.match_len(rest) else {
            continue;
        };
        let char_len = rest[..byte_len].chars().count();
        if best.map_or(true, |(_, _, best_chars)| char_len > best_chars) {
            best = Some((rule.category, byte_len, char_len));
        }
    }

    best.map(|(category, byte_len, _)| (category, byte_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use TokenCategory::*;

    fn categories(text: &str) -> Vec<TokenCategory> {
        LexicalAnalyzer::new()
            .tokenize(text)
            .unwrap()
            .into_iter()
            .map(|t| t.category)
            .collect()
    }

    #[test]
    fn test_longest_match_over_prefixes() {
        assert_eq!(categories("m"), vec![Meter, Eof]);
        assert_eq!(categories("mn"), vec![Minute, Eof]);
        assert_eq!(categories("M"), vec![M, Eof]);
        assert_eq!(categories("Meter"), vec![MeterQualified, Eof]);
        assert_eq!(categories("km"), vec![Kilometer, Eof]);
        assert_eq!(categories(">>"), vec![ProgressionSet, Eof]);
        assert_eq!(categories("strides"), vec![Strides, Eof]);
        assert_eq!(categories("spm"), vec![Spm, Eof]);
        assert_eq!(categories("CD"), vec![Cooldown, Eof]);
    }

    #[test]
    fn test_float_beats_number() {
        let tokens = LexicalAnalyzer::new().tokenize("13.1M").unwrap();
        assert_eq!(tokens[0].category, Float);
        assert_eq!(tokens[0].lexeme, "13.1");
        assert_eq!(tokens[1].category, M);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        assert_eq!(categories("W"), vec![RecoveryWalk, Eof]);
    }

    #[test]
    fn test_workout_token_sequence() {
        assert_eq!(
            categories("10 x 30s, R=30s"),
            vec![
                Number, Whitespace, Multiplier, Whitespace, Number, Second, Comma, Whitespace,
                RecoveryJog, Equal, Number, Second, Eof
            ]
        );
    }

    #[test]
    fn test_eof_has_empty_lexeme_at_text_length() {
        let tokens = LexicalAnalyzer::new().tokenize("6mn06\"").unwrap();
        let eof = tokens.last().unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.lexeme, "");
        assert_eq!(eof.offset, 6);
    }

    #[test]
    fn test_empty_input() {
        let tokens = LexicalAnalyzer::new().tokenize("").unwrap();
        assert_eq!(tokens, vec![Token::eof(0)]);
    }

    #[test]
    fn test_offsets_count_characters() {
        // U+3000 is multi-byte whitespace
        let tokens = LexicalAnalyzer::new().tokenize("3km\u{3000}easy").unwrap();
        assert_eq!(tokens[2].category, Whitespace);
        assert_eq!(tokens[3].offset, 4);
        assert_eq!(tokens.last().unwrap().offset, 8);
    }

    #[test]
    fn test_unknown_character() {
        let result = LexicalAnalyzer::new().tokenize("3km ?");
        assert_matches!(
            result,
            Err(LexerError::NoMatchingCategory {
                character: '?',
                offset: 4
            })
        );
    }

    #[test]
    fn test_unknown_character_after_multibyte() {
        let result = LexicalAnalyzer::new().tokenize("é");
        assert_matches!(result, Err(LexerError::NoMatchingCategory { offset: 0, .. }));
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), codes::lexical::INVALID_CHARACTER);
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_input_too_long() {
        let text = "1".repeat(MAX_INPUT_LENGTH + 1);
        let result = LexicalAnalyzer::new().tokenize(&text);
        assert_matches!(result, Err(LexerError::InputTooLong { .. }));
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = LexicalAnalyzer::with_preferences(LexicalPreferences {
            collect_detailed_metrics: true,
            log_token_stream: false,
        });
        analyzer.tokenize("3 x 1km").unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 6);
        assert_eq!(metrics.whitespace_tokens, 2);
        assert_eq!(metrics.significant_tokens(), 4);
        assert_eq!(metrics.category_counts.get(&Number), Some(&2));
    }

    #[test]
    fn test_every_emitted_token_is_longest() {
        let catalog = compiled_catalog().unwrap();
        let text = "5 x 2km , uphill @4:40/km-4:50/km, R=(1mn, easy) ; WU 13.1M >> HMP";
        let tokens = LexicalAnalyzer::new().tokenize(text).unwrap();

        let mut byte_pos = 0;
        for token in tokens.iter().filter(|t| !t.is_eof()) {
            let rest = &text[byte_pos..];
            for rule in catalog {
                if let Some(len) = rule.match_len(rest) {
                    assert!(rest[..len].chars().count() <= token.lexeme.chars().count());
                }
            }
            byte_pos += token.lexeme.len();
        }
    }
}
