//! Shared helpers for grammar builders

use crate::grammar::ast::nodes::{DistanceUnit, TimeUnit};
use crate::syntax::error::{ParseError, SemanticError};
use crate::tokens::{Cursor, Token, TokenCategory};

/// Integer value of a NUMBER token
pub fn parse_integer(token: &Token) -> Result<u32, ParseError> {
    token
        .lexeme
        .parse::<u32>()
        .map_err(|_| ParseError::invalid_number(token))
}

/// Value of a NUMBER or FLOAT token
pub fn parse_decimal(token: &Token) -> Result<f64, ParseError> {
    token
        .lexeme
        .parse::<f64>()
        .map_err(|_| ParseError::invalid_number(token))
}

/// Multiplier value; zero repetitions are recorded as a violation on the cursor
pub fn parse_multiplier(cursor: &mut Cursor, token: &Token) -> Result<u32, ParseError> {
    let value = parse_integer(token)?;
    if value == 0 {
        cursor.defer(SemanticError::ZeroMultiplier {
            offset: token.offset,
        });
    }
    Ok(value)
}

/// Short and long distance unit tokens map onto the same units
pub fn distance_unit(category: TokenCategory) -> Option<DistanceUnit> {
    use TokenCategory::*;

    match category {
        Meter | MeterQualified => Some(DistanceUnit::Meter),
        Kilometer | KilometerQualified => Some(DistanceUnit::Kilometer),
        M | MileQualified => Some(DistanceUnit::Mile),
        Yard | YardQualified => Some(DistanceUnit::Yard),
        _ => None,
    }
}

pub fn time_unit(category: TokenCategory) -> Option<TimeUnit> {
    match category {
        TokenCategory::Hour => Some(TimeUnit::Hour),
        TokenCategory::Minute => Some(TimeUnit::Minute),
        TokenCategory::Second => Some(TimeUnit::Second),
        _ => None,
    }
}

/// Consume `NUMBER WS? "x" WS?` and return the number token, or rewind
pub fn match_multiplier_prefix(cursor: &mut Cursor) -> Option<Token> {
    let mark = cursor.mark();

    let number = cursor.match_one(TokenCategory::Number)?;
    cursor.skip(TokenCategory::Whitespace);
    if cursor.match_one(TokenCategory::Multiplier).is_none() {
        cursor.reset(mark);
        return None;
    }
    cursor.skip(TokenCategory::Whitespace);

    Some(number)
}
