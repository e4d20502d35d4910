//! Metadata clauses: `easy uphill`, `3 x strides`

use super::helpers::{match_multiplier_prefix, parse_multiplier};
use crate::grammar::ast::nodes::Metadata;
use crate::syntax::error::SyntaxResult;
use crate::tokens::{Cursor, Token, TokenCategory, TokenGroup};

/// Parse metadata ::= metadata_multiple | keywords
pub fn parse_metadata(cursor: &mut Cursor) -> SyntaxResult<Option<Metadata>> {
    if let Some(metadata) = parse_metadata_multiple(cursor)? {
        return Ok(Some(metadata));
    }
    Ok(parse_keywords(cursor).map(Metadata::new))
}

/// metadata_multiple ::= NUMBER WS? "x" WS? keywords
///
/// Committed only when keywords follow the prefix; otherwise the number is
/// left for the action parser.
fn parse_metadata_multiple(cursor: &mut Cursor) -> SyntaxResult<Option<Metadata>> {
    let mark = cursor.mark();

    let Some(number) = match_multiplier_prefix(cursor) else {
        return Ok(None);
    };
    let Some(keywords) = parse_keywords(cursor) else {
        cursor.reset(mark);
        return Ok(None);
    };

    let multiplier = parse_multiplier(cursor, &number)?;
    Ok(Some(Metadata::multiple(multiplier, keywords)))
}

/// keywords ::= keyword (WS keyword)*
///
/// Whitespace is consumed only when another keyword follows it.
fn parse_keywords(cursor: &mut Cursor) -> Option<Vec<Token>> {
    let mut keywords = vec![cursor.match_group(TokenGroup::Keyword)?];

    loop {
        let mark = cursor.mark();
        cursor.skip(TokenCategory::Whitespace);
        match cursor.match_group(TokenGroup::Keyword) {
            Some(keyword) => keywords.push(keyword),
            None => {
                cursor.reset(mark);
                break;
            }
        }
    }

    Some(keywords)
}
