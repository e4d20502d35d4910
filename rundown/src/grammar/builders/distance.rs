//! Distance expressions: `3km`, `13.1M`, `400 Meter`

use super::helpers::{distance_unit, parse_decimal};
use crate::grammar::ast::nodes::Distance;
use crate::syntax::error::SyntaxResult;
use crate::tokens::{Cursor, TokenCategory, TokenGroup};

/// Parse distance ::= unqualified_distance | qualified_distance
///
/// Returns `Ok(None)` with the cursor untouched when no distance starts here,
/// so the same tokens can still be tried as a time.
pub fn parse_distance(cursor: &mut Cursor) -> SyntaxResult<Option<Distance>> {
    if let Some(distance) = parse_unqualified_distance(cursor)? {
        return Ok(Some(distance));
    }
    parse_qualified_distance(cursor)
}

/// unqualified_distance ::= (NUMBER | FLOAT) distance_unit
pub fn parse_unqualified_distance(cursor: &mut Cursor) -> SyntaxResult<Option<Distance>> {
    let mark = cursor.mark();

    let Some(value) = cursor.match_group(TokenGroup::Numeric) else {
        return Ok(None);
    };
    let Some(unit) = cursor.match_group(TokenGroup::DistanceUnit) else {
        cursor.reset(mark);
        return Ok(None);
    };

    Ok(distance_unit(unit.category)
        .map(|unit| parse_decimal(&value).map(|value| Distance::new(value, unit)))
        .transpose()?)
}

/// qualified_distance ::= (NUMBER | FLOAT) WS qualified_unit
fn parse_qualified_distance(cursor: &mut Cursor) -> SyntaxResult<Option<Distance>> {
    let mark = cursor.mark();

    let matched = cursor.match_group(TokenGroup::Numeric).and_then(|value| {
        cursor.match_one(TokenCategory::Whitespace)?;
        let unit = cursor.match_group(TokenGroup::QualifiedDistanceUnit)?;
        Some((value, unit))
    });

    let Some((value, unit)) = matched else {
        cursor.reset(mark);
        return Ok(None);
    };

    Ok(distance_unit(unit.category)
        .map(|unit| parse_decimal(&value).map(|value| Distance::new(value, unit)))
        .transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::DistanceUnit;
    use crate::lexical::tokenize;

    fn distance(text: &str) -> Option<Distance> {
        let mut cursor = Cursor::new(tokenize(text).unwrap());
        parse_distance(&mut cursor).unwrap()
    }

    #[test]
    fn test_unqualified() {
        assert_eq!(distance("3km"), Some(Distance::new(3.0, DistanceUnit::Kilometer)));
        assert_eq!(distance("3k"), Some(Distance::new(3.0, DistanceUnit::Kilometer)));
        assert_eq!(distance("13.1M"), Some(Distance::new(13.1, DistanceUnit::Mile)));
        assert_eq!(distance("400m"), Some(Distance::new(400.0, DistanceUnit::Meter)));
        assert_eq!(distance("200yd"), Some(Distance::new(200.0, DistanceUnit::Yard)));
    }

    #[test]
    fn test_qualified() {
        assert_eq!(distance("400 Meter"), Some(Distance::new(400.0, DistanceUnit::Meter)));
        assert_eq!(distance("2 Mile"), Some(Distance::new(2.0, DistanceUnit::Mile)));
        assert_eq!(distance("1.5 Kilometer"), Some(Distance::new(1.5, DistanceUnit::Kilometer)));
        assert_eq!(distance("100 Yard"), Some(Distance::new(100.0, DistanceUnit::Yard)));
    }

    #[test]
    fn test_clean_rewind() {
        for text in ["400mn", "400", "400 easy", "400 x", "3 km", "easy"] {
            let mut cursor = Cursor::new(tokenize(text).unwrap());
            assert_eq!(parse_distance(&mut cursor).unwrap(), None, "{}", text);
            assert_eq!(cursor.position(), 0, "{}", text);
        }
    }

    #[test]
    fn test_leaves_following_tokens() {
        let mut cursor = Cursor::new(tokenize("12km/h").unwrap());
        parse_distance(&mut cursor).unwrap();
        assert!(cursor.check(TokenCategory::Slash));
    }
}
