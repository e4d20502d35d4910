//! Lexical analysis: workout text to tokens

pub mod analyzer;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::Token;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

/// Tokenize with default preferences
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexerError> {
    LexicalAnalyzer::new().tokenize(text)
}

pub fn tokenize_with_preferences(
    text: &str,
    preferences: LexicalPreferences,
) -> Result<Vec<Token>, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(text)
}

pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenCategory;

    #[test]
    fn test_module_tokenize() {
        let tokens = tokenize("@Z5>VO2max").unwrap();
        let categories: Vec<_> = tokens.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![
                TokenCategory::At,
                TokenCategory::Zone,
                TokenCategory::Number,
                TokenCategory::ProgressionRep,
                TokenCategory::Vo2Max,
                TokenCategory::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_with_preferences_skips_detail() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            log_token_stream: false,
        };
        let mut analyzer = LexicalAnalyzer::with_preferences(preferences.clone());
        analyzer.tokenize("3km").unwrap();
        assert!(analyzer.metrics().category_counts.is_empty());

        assert_eq!(tokenize_with_preferences("3km", preferences).unwrap().len(), 3);
    }
}
