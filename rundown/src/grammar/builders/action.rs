//! Actions: a bare rep or `N x rep`

use super::distance::parse_distance;
use super::helpers::{match_multiplier_prefix, parse_multiplier};
use super::time::parse_time;
use crate::grammar::ast::nodes::{Action, Rep, Section, Set};
use crate::syntax::error::SyntaxResult;
use crate::tokens::Cursor;

/// Parse action ::= rep | NUMBER WS? "x" WS? rep
///
/// Returns `Ok(None)` with the cursor untouched when neither form applies,
/// leaving the position to metadata, target or recovery.
pub fn parse_action(cursor: &mut Cursor) -> SyntaxResult<Option<Action>> {
    if let Some(rep) = parse_rep(cursor)? {
        return Ok(Some(Action::Rep(rep)));
    }

    let mark = cursor.mark();
    let Some(number) = match_multiplier_prefix(cursor) else {
        return Ok(None);
    };
    let Some(rep) = parse_rep(cursor)? else {
        cursor.reset(mark);
        return Ok(None);
    };

    let multiplier = parse_multiplier(cursor, &number)?;
    Ok(Some(Action::Set(Set {
        multiplier,
        section: Box::new(Section {
            action: Some(Action::Rep(rep)),
            ..Default::default()
        }),
    })))
}

/// rep ::= time | distance
pub fn parse_rep(cursor: &mut Cursor) -> SyntaxResult<Option<Rep>> {
    if let Some(time) = parse_time(cursor)? {
        return Ok(Some(Rep::Time(time)));
    }
    Ok(parse_distance(cursor)?.map(Rep::Distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::{Distance, DistanceUnit, Time};
    use crate::lexical::tokenize;
    use crate::syntax::error::SemanticError;
    use assert_matches::assert_matches;

    fn action(text: &str) -> (SyntaxResult<Option<Action>>, Cursor) {
        let mut cursor = Cursor::new(tokenize(text).unwrap());
        let action = parse_action(&mut cursor);
        (action, cursor)
    }

    #[test]
    fn test_bare_reps() {
        let (result, _) = action("3km");
        assert_eq!(
            result.unwrap(),
            Some(Action::Rep(Rep::Distance(Distance::new(3.0, DistanceUnit::Kilometer))))
        );

        let (result, _) = action("400mn");
        assert_eq!(result.unwrap(), Some(Action::Rep(Rep::Time(Time::new(0, 400, 0)))));
    }

    #[test]
    fn test_set() {
        for text in ["10 x 30s", "10x30s", "10 x30s"] {
            let (result, cursor) = action(text);
            let Some(Action::Set(set)) = result.unwrap() else {
                panic!("{} is not a set", text);
            };
            assert_eq!(set.multiplier, 10);
            assert_eq!(
                set.section.action,
                Some(Action::Rep(Rep::Time(Time::new(0, 0, 30))))
            );
            assert!(cursor.is_at_end());
        }
    }

    #[test]
    fn test_no_match_rewinds() {
        for text in ["3 x easy", "10 x", "easy", "@Z2"] {
            let (result, cursor) = action(text);
            assert_eq!(result.unwrap(), None, "{}", text);
            assert_eq!(cursor.position(), 0, "{}", text);
        }
    }

    #[test]
    fn test_zero_multiplier() {
        let (result, cursor) = action("0 x 400m");
        assert_matches!(
            result,
            Ok(Some(Action::Set(Set { multiplier: 0, .. })))
        );
        assert_matches!(
            cursor.violation(),
            Some(SemanticError::ZeroMultiplier { offset: 0 })
        );
    }
}
