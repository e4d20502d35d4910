//! Time expressions: `1h02mn03s`, `6mn06`, `4:40`, `1:02:03`

use super::helpers::parse_integer;
use crate::grammar::ast::nodes::Time;
use crate::syntax::error::{ParseError, SyntaxResult, TimeFormatError};
use crate::tokens::{Cursor, Token, TokenCategory};

/// Parse time ::= unit_time | colon_time
///
/// Returns `Ok(None)` with the cursor untouched when no time starts here.
pub fn parse_time(cursor: &mut Cursor) -> SyntaxResult<Option<Time>> {
    if let Some(time) = parse_unit_time(cursor)? {
        return Ok(Some(time));
    }
    parse_colon_time(cursor)
}

/// unit_time ::= (NUMBER "h")? (NUMBER "mn")? (NUMBER "s")? NUMBER?
///
/// The trailing bare number fills the minute when neither minute nor second
/// was written, otherwise the second.
fn parse_unit_time(cursor: &mut Cursor) -> SyntaxResult<Option<Time>> {
    let hour = unit_component(cursor, TokenCategory::Hour);
    let minute = unit_component(cursor, TokenCategory::Minute);
    let second = unit_component(cursor, TokenCategory::Second);

    if hour.is_none() && minute.is_none() && second.is_none() {
        return Ok(None);
    }

    let trailing = cursor.match_one(TokenCategory::Number);
    let (minute, second) = match (minute, second, trailing) {
        (_, Some(_), Some(extra)) => {
            return Err(ParseError::unexpected(&extra, "a time unit or separator").into())
        }
        (None, None, trailing) => (trailing, None),
        (minute, None, trailing) => (minute, trailing),
        (minute, second, None) => (minute, second),
    };

    if let Err(violation) = validate_unit_digits(hour.as_ref(), minute.as_ref(), second.as_ref()) {
        cursor.defer(violation);
    }

    Ok(Some(Time::new(
        value_or_zero(hour.as_ref())?,
        value_or_zero(minute.as_ref())?,
        value_or_zero(second.as_ref())?,
    )))
}

/// NUMBER followed by `unit`; rewinds when the unit is missing
fn unit_component(cursor: &mut Cursor, unit: TokenCategory) -> Option<Token> {
    let mark = cursor.mark();
    let number = cursor.match_one(TokenCategory::Number)?;
    if cursor.match_one(unit).is_some() {
        Some(number)
    } else {
        cursor.reset(mark);
        None
    }
}

/// Components below the most significant one written need two digits
fn validate_unit_digits(
    hour: Option<&Token>,
    minute: Option<&Token>,
    second: Option<&Token>,
) -> Result<(), TimeFormatError> {
    if let Some(second) = second {
        if (minute.is_some() || hour.is_some()) && second.lexeme.len() != 2 {
            return Err(component_digits(second));
        }
    }
    if let Some(minute) = minute {
        if hour.is_some() && minute.lexeme.len() != 2 {
            return Err(component_digits(minute));
        }
    }
    Ok(())
}

/// colon_time ::= NUMBER (":" NUMBER)+ with two or three parts in total
fn parse_colon_time(cursor: &mut Cursor) -> SyntaxResult<Option<Time>> {
    if !(cursor.check(TokenCategory::Number) && cursor.peek_next().is(TokenCategory::Colon)) {
        return Ok(None);
    }

    let first = cursor.advance();
    let mut parts = vec![first];
    while cursor.skip(TokenCategory::Colon) {
        match cursor.match_one(TokenCategory::Number) {
            Some(part) => parts.push(part),
            None => break,
        }
    }

    let values = parts
        .iter()
        .map(parse_integer)
        .collect::<Result<Vec<_>, _>>()?;

    let time = match values.as_slice() {
        [minutes, seconds] => Time::new(0, *minutes, *seconds),
        [hours, minutes, seconds] => Time::new(*hours, *minutes, *seconds),
        _ => {
            cursor.defer(TimeFormatError::PartCount {
                parts: parts.len(),
                offset: first_offset(&parts),
            });
            return Ok(Some(Time::default()));
        }
    };
    if let Some(short) = parts.iter().skip(1).find(|p| p.lexeme.len() != 2) {
        cursor.defer(component_digits(short));
    }
    Ok(Some(time))
}

fn component_digits(token: &Token) -> TimeFormatError {
    TimeFormatError::ComponentDigits {
        lexeme: token.lexeme.clone(),
        offset: token.offset,
    }
}

fn first_offset(parts: &[Token]) -> usize {
    parts.first().map_or(0, |part| part.offset)
}

fn value_or_zero(token: Option<&Token>) -> Result<u32, ParseError> {
    token.map(parse_integer).unwrap_or(Ok(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::syntax::error::{SemanticError, SyntaxError};
    use assert_matches::assert_matches;

    fn time(text: &str) -> SyntaxResult<Option<Time>> {
        let mut cursor = Cursor::new(tokenize(text).unwrap());
        let time = parse_time(&mut cursor);
        assert_eq!(cursor.violation(), None, "{}", text);
        time
    }

    /// Parse a time whose format is wrong and return the recorded violation
    fn time_violation(text: &str) -> Option<SemanticError> {
        let mut cursor = Cursor::new(tokenize(text).unwrap());
        assert_matches!(parse_time(&mut cursor), Ok(Some(_)), "{}", text);
        cursor.take_violation()
    }

    fn assert_time_format_error(text: &str) {
        assert_matches!(
            time_violation(text),
            Some(SemanticError::TimeFormat(_)),
            "{}",
            text
        );
    }

    #[test]
    fn test_unit_form() {
        assert_eq!(time("1h02mn03s").unwrap(), Some(Time::new(1, 2, 3)));
        assert_eq!(time("1h").unwrap(), Some(Time::new(1, 0, 0)));
        assert_eq!(time("30s").unwrap(), Some(Time::new(0, 0, 30)));
        assert_eq!(time("90mn").unwrap(), Some(Time::new(0, 90, 0)));
        assert_eq!(time("4'30\"").unwrap(), Some(Time::new(0, 4, 30)));
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(time("6mn06").unwrap(), Some(Time::new(0, 6, 6)));
        assert_eq!(time("1h30").unwrap(), Some(Time::new(1, 30, 0)));
        assert_eq!(time("1h05mn30").unwrap(), Some(Time::new(1, 5, 30)));
    }

    #[test]
    fn test_trailing_number_after_seconds() {
        assert_matches!(
            time("1mn30s15"),
            Err(SyntaxError::Parse(ParseError::UnexpectedToken { offset: 6, .. }))
        );
    }

    #[test]
    fn test_colon_form() {
        assert_eq!(time("2:00").unwrap(), Some(Time::new(0, 2, 0)));
        assert_eq!(time("02:00").unwrap(), Some(Time::new(0, 2, 0)));
        assert_eq!(time("1:02:03").unwrap(), Some(Time::new(1, 2, 3)));
    }

    #[test]
    fn test_digit_rules() {
        assert_time_format_error("02h3mn");
        assert_time_format_error("1mn5s");
        assert_time_format_error("1h2");
        assert_time_format_error("4:5");
        assert_time_format_error("1:2:03");
        assert_matches!(
            time_violation("1h2"),
            Some(SemanticError::TimeFormat(TimeFormatError::ComponentDigits { offset: 2, .. }))
        );

        // the most significant unit may have any width
        assert_eq!(time("5s").unwrap(), Some(Time::new(0, 0, 5)));
        assert_eq!(time("100mn05s").unwrap(), Some(Time::new(0, 100, 5)));
    }

    #[test]
    fn test_part_count() {
        assert_matches!(
            time_violation("01:01:01:01"),
            Some(SemanticError::TimeFormat(TimeFormatError::PartCount {
                parts: 4,
                offset: 0
            }))
        );
        assert_time_format_error("4:");
    }

    #[test]
    fn test_no_match_leaves_cursor() {
        for text in ["3km", "400m", "10 x", "easy", "12"] {
            let mut cursor = Cursor::new(tokenize(text).unwrap());
            assert_eq!(parse_time(&mut cursor).unwrap(), None, "{}", text);
            assert_eq!(cursor.position(), 0, "{}", text);
        }
    }

    #[test]
    fn test_stops_before_following_tokens() {
        let mut cursor = Cursor::new(tokenize("4:40/km").unwrap());
        assert_eq!(parse_time(&mut cursor).unwrap(), Some(Time::new(0, 4, 40)));
        assert!(cursor.check(TokenCategory::Slash));
    }
}
