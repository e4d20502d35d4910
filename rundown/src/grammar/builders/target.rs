//! Target clauses
//!
//! A target starts at `@`. Past that marker nothing is optional any more:
//! every mismatch is a hard `ParseError` carrying the token found.
//!
//! Single values are tried in a fixed order, each alternative rewinding
//! before the next one runs:
//!
//! 1. named targets (`LT1`, `LT2`, `tempo`, `VO2max`)
//! 2. race markers with race pace (`HMP`, `MP`)
//! 3. distance with race pace (`10kmP`) or per time unit (`12km/h`)
//! 4. prefixed values (`gap4:40/km`, `rpe7`, `Z3`)
//! 5. integer with a suffix (`150bpm`, `180spm`, `250W`)
//! 6. time per distance unit (`4:40/km`)
//! 7. bare time (`1h30`)
//!
//! Two values joined by `-`, `>` or `>>` form a simple range. Factored
//! ranges write the unit once: `@(4:40-4:20)/km`, `@Z(3-4)`, `@(150-155)bpm`.

use super::distance::parse_unqualified_distance;
use super::helpers::{distance_unit, parse_decimal, parse_integer, time_unit};
use super::time::parse_time;
use crate::grammar::ast::nodes::{
    Distance, DistanceUnit, Pace, RaceReference, RangeRelation, Speed, Target, TargetFixed, TargetRange,
    TargetValue, Time,
};
use crate::syntax::error::{ParseError, SyntaxResult};
use crate::tokens::{Cursor, Token, TokenCategory, TokenGroup};

/// Parse target ::= "@" (factored_range | value (relation value)?)
pub fn parse_target(cursor: &mut Cursor) -> SyntaxResult<Option<Target>> {
    if !cursor.skip(TokenCategory::At) {
        return Ok(None);
    }

    if let Some(range) = parse_factored_range(cursor)? {
        return Ok(Some(Target::Range(range)));
    }

    let lower = expect_target_value(cursor)?;
    let Some(relation) = match_relation(cursor) else {
        return Ok(Some(Target::Value(lower)));
    };
    let upper = expect_target_value(cursor)?;

    Ok(Some(Target::Range(TargetRange {
        lower,
        upper,
        relation,
    })))
}

fn expect_target_value(cursor: &mut Cursor) -> SyntaxResult<TargetValue> {
    match parse_target_value(cursor)? {
        Some(value) => Ok(value),
        None => fail(cursor, "a target value"),
    }
}

fn parse_target_value(cursor: &mut Cursor) -> SyntaxResult<Option<TargetValue>> {
    if let Some(token) = cursor.match_group(TokenGroup::SingleTokenTarget) {
        return Ok(fixed_target(token.category).map(TargetValue::Fixed));
    }

    if let Some(token) = cursor.match_group(TokenGroup::RaceDistance) {
        cursor.match_or_fail(&[TokenCategory::RacePace], "'P'")?;
        return Ok(fixed_target(token.category)
            .map(|fixed| TargetValue::RacePace(RaceReference::Fixed(fixed))));
    }

    if let Some(distance) = parse_unqualified_distance(cursor)? {
        if cursor.skip(TokenCategory::RacePace) {
            return Ok(Some(TargetValue::RacePace(RaceReference::Distance(distance))));
        }
        return parse_speed_tail(cursor, distance).map(|speed| Some(TargetValue::Speed(speed)));
    }

    if let Some(prefix) = cursor.match_group(TokenGroup::TargetPrefix) {
        return parse_prefixed_value(cursor, prefix.category).map(Some);
    }

    if let Some(value) = parse_suffixed_value(cursor)? {
        return Ok(Some(value));
    }

    match parse_time(cursor)? {
        Some(time) if cursor.skip(TokenCategory::Slash) => {
            let unit = expect_distance_unit(cursor)?;
            Ok(Some(TargetValue::Pace(Pace { time, unit })))
        }
        Some(time) => Ok(Some(TargetValue::Time(time))),
        None => Ok(None),
    }
}

/// prefixed_value ::= "gap" pace | ("rpe" | "Z") NUMBER
fn parse_prefixed_value(cursor: &mut Cursor, prefix: TokenCategory) -> SyntaxResult<TargetValue> {
    if prefix == TokenCategory::Gap {
        let time = expect_time(cursor)?;
        cursor.match_or_fail(&[TokenCategory::Slash], "'/'")?;
        let unit = expect_distance_unit(cursor)?;
        return Ok(TargetValue::Gap(Pace { time, unit }));
    }

    let number = cursor.match_or_fail(&[TokenCategory::Number], "a number")?;
    let value = parse_integer(&number)?;
    Ok(integer_target(prefix, value))
}

/// suffixed_value ::= NUMBER ("bpm" | "spm" | "W")
fn parse_suffixed_value(cursor: &mut Cursor) -> SyntaxResult<Option<TargetValue>> {
    if !(cursor.check(TokenCategory::Number)
        && cursor.peek_next().category.is_in(TokenGroup::TargetSuffix))
    {
        return Ok(None);
    }

    let number = cursor.advance();
    let suffix = cursor.advance();
    let value = parse_integer(&number)?;
    Ok(suffixed_target(suffix.category, value))
}

/// "/" time_unit after a distance
fn parse_speed_tail(cursor: &mut Cursor, distance: Distance) -> SyntaxResult<Speed> {
    cursor.match_or_fail(&[TokenCategory::Slash], "'P' or '/'")?;
    let unit = cursor.match_group_or_fail(TokenGroup::TimeUnit, "a time unit")?;
    Ok(Speed {
        distance,
        time_unit: unit_of(time_unit(unit.category), &unit, "a time unit")?,
    })
}

// === FACTORED RANGES ===

/// factored_range ::= prefixed_factored_range | "(" endpoints ")" shared_unit
fn parse_factored_range(cursor: &mut Cursor) -> SyntaxResult<Option<TargetRange>> {
    if let Some(range) = parse_prefixed_factored_range(cursor)? {
        return Ok(Some(range));
    }

    if !cursor.skip(TokenCategory::ParenLeft) {
        return Ok(None);
    }

    if let Some(lower) = parse_time(cursor)? {
        return factored_time_range(cursor, lower).map(Some);
    }
    if let Some(lower) = parse_unqualified_distance(cursor)? {
        return factored_race_pace_range(cursor, RaceReference::Distance(lower)).map(Some);
    }
    if let Some(reference) = match_race_marker(cursor) {
        return factored_race_pace_range(cursor, reference).map(Some);
    }
    if let Some(lower) = cursor.match_group(TokenGroup::Numeric) {
        return factored_number_range(cursor, lower).map(Some);
    }

    fail(cursor, "a range endpoint")
}

/// ("gap" "(" time relation time ")" "/" unit) | (("rpe" | "Z") "(" NUMBER relation NUMBER ")")
fn parse_prefixed_factored_range(cursor: &mut Cursor) -> SyntaxResult<Option<TargetRange>> {
    if !(cursor.check_group(TokenGroup::TargetPrefix)
        && cursor.peek_next().is(TokenCategory::ParenLeft))
    {
        return Ok(None);
    }

    let prefix = cursor.advance().category;
    cursor.advance();

    if prefix == TokenCategory::Gap {
        let lower = expect_time(cursor)?;
        let relation = expect_relation(cursor)?;
        let upper = expect_time(cursor)?;
        cursor.match_or_fail(&[TokenCategory::ParenRight], "')'")?;
        cursor.match_or_fail(&[TokenCategory::Slash], "'/'")?;
        let unit = expect_distance_unit(cursor)?;

        return Ok(Some(TargetRange {
            lower: TargetValue::Gap(Pace { time: lower, unit }),
            upper: TargetValue::Gap(Pace { time: upper, unit }),
            relation,
        }));
    }

    let lower = cursor.match_or_fail(&[TokenCategory::Number], "a number")?;
    let relation = expect_relation(cursor)?;
    let upper = cursor.match_or_fail(&[TokenCategory::Number], "a number")?;
    cursor.match_or_fail(&[TokenCategory::ParenRight], "')'")?;

    Ok(Some(TargetRange {
        lower: integer_target(prefix, parse_integer(&lower)?),
        upper: integer_target(prefix, parse_integer(&upper)?),
        relation,
    }))
}

/// time relation time ")" ("/" distance_unit)?
fn factored_time_range(cursor: &mut Cursor, lower: Time) -> SyntaxResult<TargetRange> {
    let relation = expect_relation(cursor)?;
    let upper = expect_time(cursor)?;
    cursor.match_or_fail(&[TokenCategory::ParenRight], "')'")?;

    if !cursor.skip(TokenCategory::Slash) {
        return Ok(TargetRange {
            lower: TargetValue::Time(lower),
            upper: TargetValue::Time(upper),
            relation,
        });
    }

    let unit = expect_distance_unit(cursor)?;
    Ok(TargetRange {
        lower: TargetValue::Pace(Pace { time: lower, unit }),
        upper: TargetValue::Pace(Pace { time: upper, unit }),
        relation,
    })
}

/// race_reference relation race_reference ")" "P"
fn factored_race_pace_range(
    cursor: &mut Cursor,
    lower: RaceReference,
) -> SyntaxResult<TargetRange> {
    let relation = expect_relation(cursor)?;

    let upper = match parse_unqualified_distance(cursor)? {
        Some(distance) => RaceReference::Distance(distance),
        None => match match_race_marker(cursor) {
            Some(reference) => reference,
            None => return fail(cursor, "a distance or race marker"),
        },
    };

    cursor.match_or_fail(&[TokenCategory::ParenRight], "')'")?;
    cursor.match_or_fail(&[TokenCategory::RacePace], "'P'")?;

    Ok(TargetRange {
        lower: TargetValue::RacePace(lower),
        upper: TargetValue::RacePace(upper),
        relation,
    })
}

/// number relation number ")" unit
///
/// The endpoints mean nothing until the token after `)` is seen: a time
/// unit, a suffix marker, or a distance unit opening a speed.
fn factored_number_range(cursor: &mut Cursor, lower: Token) -> SyntaxResult<TargetRange> {
    let relation = expect_relation(cursor)?;
    let upper = cursor.match_group_or_fail(TokenGroup::Numeric, "a number")?;
    cursor.match_or_fail(&[TokenCategory::ParenRight], "')'")?;

    let has_float = lower.is(TokenCategory::Float) || upper.is(TokenCategory::Float);
    if has_float || cursor.check_group(TokenGroup::DistanceUnit) {
        return factored_speed_range(cursor, &lower, &upper, relation);
    }

    let (lower_value, upper_value) = (parse_integer(&lower)?, parse_integer(&upper)?);

    if let Some(unit) = cursor.match_group(TokenGroup::TimeUnit) {
        let unit = unit_of(time_unit(unit.category), &unit, "a time unit")?;
        return Ok(TargetRange {
            lower: TargetValue::Time(unit.time(lower_value)),
            upper: TargetValue::Time(unit.time(upper_value)),
            relation,
        });
    }

    if let Some(suffix) = cursor.match_group(TokenGroup::TargetSuffix) {
        let kind = |value| suffixed_target(suffix.category, value);
        if let (Some(lower), Some(upper)) = (kind(lower_value), kind(upper_value)) {
            return Ok(TargetRange {
                lower,
                upper,
                relation,
            });
        }
    }

    fail(cursor, "a unit after the range")
}

/// distance_unit "/" time_unit shared by both endpoints
fn factored_speed_range(
    cursor: &mut Cursor,
    lower: &Token,
    upper: &Token,
    relation: RangeRelation,
) -> SyntaxResult<TargetRange> {
    let unit = expect_distance_unit(cursor)?;
    let speed = |token: &Token| -> SyntaxResult<Distance> {
        Ok(Distance::new(parse_decimal(token)?, unit))
    };
    let (lower, upper) = (speed(lower)?, speed(upper)?);

    let tail = parse_speed_tail(cursor, lower)?;
    Ok(TargetRange {
        lower: TargetValue::Speed(tail),
        upper: TargetValue::Speed(Speed {
            distance: upper,
            time_unit: tail.time_unit,
        }),
        relation,
    })
}

// === TOKEN MAPPING ===

fn match_relation(cursor: &mut Cursor) -> Option<RangeRelation> {
    if !cursor.check_group(TokenGroup::RangeRelation) {
        return None;
    }
    range_relation(cursor.advance().category)
}

fn expect_relation(cursor: &mut Cursor) -> SyntaxResult<RangeRelation> {
    match match_relation(cursor) {
        Some(relation) => Ok(relation),
        None => fail(cursor, "'-', '>' or '>>'"),
    }
}

fn match_race_marker(cursor: &mut Cursor) -> Option<RaceReference> {
    if !cursor.check_group(TokenGroup::RaceDistance) {
        return None;
    }
    fixed_target(cursor.advance().category).map(RaceReference::Fixed)
}

fn expect_time(cursor: &mut Cursor) -> SyntaxResult<Time> {
    match parse_time(cursor)? {
        Some(time) => Ok(time),
        None => fail(cursor, "a time"),
    }
}

fn expect_distance_unit(cursor: &mut Cursor) -> SyntaxResult<DistanceUnit> {
    let token = cursor.match_group_or_fail(TokenGroup::DistanceUnit, "a distance unit")?;
    unit_of(distance_unit(token.category), &token, "a distance unit")
}

fn unit_of<T>(unit: Option<T>, token: &Token, expected: &str) -> SyntaxResult<T> {
    unit.ok_or_else(|| ParseError::unexpected(token, expected).into())
}

fn fail<T>(cursor: &Cursor, expected: &str) -> SyntaxResult<T> {
    Err(ParseError::unexpected(cursor.peek(), expected).into())
}

fn range_relation(category: TokenCategory) -> Option<RangeRelation> {
    match category {
        TokenCategory::Minus => Some(RangeRelation::Span),
        TokenCategory::ProgressionRep => Some(RangeRelation::ProgressionPerRep),
        TokenCategory::ProgressionSet => Some(RangeRelation::ProgressionPerSet),
        _ => None,
    }
}

fn fixed_target(category: TokenCategory) -> Option<TargetFixed> {
    match category {
        TokenCategory::Lt1 => Some(TargetFixed::LactateThreshold1),
        TokenCategory::Lt2 => Some(TargetFixed::LactateThreshold2),
        TokenCategory::Tempo => Some(TargetFixed::Tempo),
        TokenCategory::Vo2Max => Some(TargetFixed::Vo2Max),
        TokenCategory::HalfMarathon => Some(TargetFixed::HalfMarathon),
        TokenCategory::M => Some(TargetFixed::Marathon),
        _ => None,
    }
}

/// `rpe` and `Z` take a bare integer
fn integer_target(prefix: TokenCategory, value: u32) -> TargetValue {
    if prefix == TokenCategory::Rpe {
        TargetValue::Rpe(value)
    } else {
        TargetValue::Zone(value)
    }
}

/// A bare `W` lexes as walk recovery; after a number it means watts
fn suffixed_target(suffix: TokenCategory, value: u32) -> Option<TargetValue> {
    match suffix {
        TokenCategory::Bpm => Some(TargetValue::HeartRate(value)),
        TokenCategory::Spm => Some(TargetValue::Cadence(value)),
        TokenCategory::Watts | TokenCategory::RecoveryWalk => Some(TargetValue::Power(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::TimeUnit;
    use crate::lexical::tokenize;
    use crate::syntax::error::SyntaxError;
    use assert_matches::assert_matches;

    fn target(text: &str) -> SyntaxResult<Option<Target>> {
        let mut cursor = Cursor::new(tokenize(text).unwrap());
        let target = parse_target(&mut cursor)?;
        assert!(cursor.is_at_end(), "{} left {}", text, cursor.peek());
        Ok(target)
    }

    fn value(text: &str) -> TargetValue {
        match target(text).unwrap() {
            Some(Target::Value(value)) => value,
            other => panic!("{} gave {:?}", text, other),
        }
    }

    fn range(text: &str) -> TargetRange {
        match target(text).unwrap() {
            Some(Target::Range(range)) => range,
            other => panic!("{} gave {:?}", text, other),
        }
    }

    fn pace(minutes: u32, seconds: u32, unit: DistanceUnit) -> Pace {
        Pace {
            time: Time::new(0, minutes, seconds),
            unit,
        }
    }

    fn km(value: f64) -> Distance {
        Distance::new(value, DistanceUnit::Kilometer)
    }

    #[test]
    fn test_no_marker_is_no_match() {
        let mut cursor = Cursor::new(tokenize("4:40/km").unwrap());
        assert_eq!(parse_target(&mut cursor).unwrap(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_named_targets() {
        assert_eq!(value("@LT1"), TargetValue::Fixed(TargetFixed::LactateThreshold1));
        assert_eq!(value("@LT2"), TargetValue::Fixed(TargetFixed::LactateThreshold2));
        assert_eq!(value("@tempo"), TargetValue::Fixed(TargetFixed::Tempo));
        assert_eq!(value("@VO2max"), TargetValue::Fixed(TargetFixed::Vo2Max));
    }

    #[test]
    fn test_race_pace() {
        assert_eq!(
            value("@HMP"),
            TargetValue::RacePace(RaceReference::Fixed(TargetFixed::HalfMarathon))
        );
        assert_eq!(
            value("@MP"),
            TargetValue::RacePace(RaceReference::Fixed(TargetFixed::Marathon))
        );
        assert_eq!(value("@10kmP"), TargetValue::RacePace(RaceReference::Distance(km(10.0))));
        assert_matches!(target("@HM"), Err(SyntaxError::Parse(_)));
    }

    #[test]
    fn test_speed() {
        assert_eq!(
            value("@12km/h"),
            TargetValue::Speed(Speed {
                distance: km(12.0),
                time_unit: TimeUnit::Hour,
            })
        );
        assert_eq!(
            value("@10.5km/h"),
            TargetValue::Speed(Speed {
                distance: km(10.5),
                time_unit: TimeUnit::Hour,
            })
        );
    }

    #[test]
    fn test_bare_distance_is_rejected() {
        assert_matches!(
            target("@5km"),
            Err(SyntaxError::Parse(ParseError::UnexpectedEndOfInput { offset: 4, .. }))
        );
    }

    #[test]
    fn test_prefixed() {
        assert_eq!(value("@Z3"), TargetValue::Zone(3));
        assert_eq!(value("@rpe7"), TargetValue::Rpe(7));
        assert_eq!(
            value("@gap4:40/km"),
            TargetValue::Gap(pace(4, 40, DistanceUnit::Kilometer))
        );
        assert_matches!(
            target("@Zeasy"),
            Err(SyntaxError::Parse(ParseError::UnexpectedToken {
                category: TokenCategory::Easy,
                ..
            }))
        );
    }

    #[test]
    fn test_suffixed() {
        assert_eq!(value("@150bpm"), TargetValue::HeartRate(150));
        assert_eq!(value("@180spm"), TargetValue::Cadence(180));
        assert_eq!(value("@250W"), TargetValue::Power(250));
    }

    #[test]
    fn test_pace_and_time() {
        assert_eq!(value("@4:40/km"), TargetValue::Pace(pace(4, 40, DistanceUnit::Kilometer)));
        assert_eq!(value("@6mn30/M"), TargetValue::Pace(pace(6, 30, DistanceUnit::Mile)));
        assert_eq!(value("@1h30"), TargetValue::Time(Time::new(1, 30, 0)));
        assert_matches!(target("@4:40/"), Err(SyntaxError::Parse(_)));
    }

    #[test]
    fn test_simple_ranges() {
        let span = range("@4:40/km-4:50/km");
        assert_eq!(span.lower, TargetValue::Pace(pace(4, 40, DistanceUnit::Kilometer)));
        assert_eq!(span.upper, TargetValue::Pace(pace(4, 50, DistanceUnit::Kilometer)));
        assert_eq!(span.relation, RangeRelation::Span);

        let progression = range("@Z5>VO2max");
        assert_eq!(progression.lower, TargetValue::Zone(5));
        assert_eq!(progression.upper, TargetValue::Fixed(TargetFixed::Vo2Max));
        assert_eq!(progression.relation, RangeRelation::ProgressionPerRep);

        let per_set = range("@MP>>HMP");
        assert_eq!(per_set.relation, RangeRelation::ProgressionPerSet);
    }

    #[test]
    fn test_range_missing_upper() {
        assert_matches!(
            target("@Z3-"),
            Err(SyntaxError::Parse(ParseError::UnexpectedEndOfInput { .. }))
        );
    }

    #[test]
    fn test_factored_prefixed() {
        let zones = range("@Z(3-4)");
        assert_eq!(zones.lower, TargetValue::Zone(3));
        assert_eq!(zones.upper, TargetValue::Zone(4));

        let rpe = range("@rpe(6>8)");
        assert_eq!(rpe.lower, TargetValue::Rpe(6));
        assert_eq!(rpe.relation, RangeRelation::ProgressionPerRep);

        let gap = range("@gap(4:40-4:20)/km");
        assert_eq!(gap.lower, TargetValue::Gap(pace(4, 40, DistanceUnit::Kilometer)));
        assert_eq!(gap.upper, TargetValue::Gap(pace(4, 20, DistanceUnit::Kilometer)));
    }

    #[test]
    fn test_factored_pace_and_time() {
        let paces = range("@(4:40-4:20)/km");
        assert_eq!(paces.lower, TargetValue::Pace(pace(4, 40, DistanceUnit::Kilometer)));
        assert_eq!(paces.upper, TargetValue::Pace(pace(4, 20, DistanceUnit::Kilometer)));

        let times = range("@(1h-1h30)");
        assert_eq!(times.lower, TargetValue::Time(Time::new(1, 0, 0)));
        assert_eq!(times.upper, TargetValue::Time(Time::new(1, 30, 0)));
    }

    #[test]
    fn test_factored_numbers() {
        let heart_rate = range("@(150-155)bpm");
        assert_eq!(heart_rate.lower, TargetValue::HeartRate(150));
        assert_eq!(heart_rate.upper, TargetValue::HeartRate(155));
        assert_eq!(heart_rate.relation, RangeRelation::Span);

        assert_eq!(range("@(170>180)spm").upper, TargetValue::Cadence(180));
        assert_eq!(range("@(200-250)W").lower, TargetValue::Power(200));

        let minutes = range("@(4-5)mn");
        assert_eq!(minutes.lower, TargetValue::Time(Time::new(0, 4, 0)));
        assert_eq!(minutes.upper, TargetValue::Time(Time::new(0, 5, 0)));
    }

    #[test]
    fn test_factored_speed() {
        let speeds = range("@(12.5-14)km/h");
        assert_eq!(
            speeds.lower,
            TargetValue::Speed(Speed {
                distance: km(12.5),
                time_unit: TimeUnit::Hour,
            })
        );
        assert_eq!(
            speeds.upper,
            TargetValue::Speed(Speed {
                distance: km(14.0),
                time_unit: TimeUnit::Hour,
            })
        );

        let integers = range("@(12-14)km/h");
        assert_eq!(integers.lower.kind(), integers.upper.kind());

        assert_matches!(target("@(12.5-14)bpm"), Err(SyntaxError::Parse(_)));
    }

    #[test]
    fn test_factored_race_pace() {
        let races = range("@(HM-M)P");
        assert_eq!(
            races.lower,
            TargetValue::RacePace(RaceReference::Fixed(TargetFixed::HalfMarathon))
        );
        assert_eq!(
            races.upper,
            TargetValue::RacePace(RaceReference::Fixed(TargetFixed::Marathon))
        );

        let distances = range("@(10km>21.1km)P");
        assert_eq!(
            distances.upper,
            TargetValue::RacePace(RaceReference::Distance(km(21.1)))
        );
    }

    #[test]
    fn test_factored_number_without_unit() {
        assert_matches!(
            target("@(150-155)"),
            Err(SyntaxError::Parse(ParseError::UnexpectedEndOfInput { offset: 10, .. }))
        );
        assert_matches!(
            target("@(3-4)easy"),
            Err(SyntaxError::Parse(ParseError::UnexpectedToken {
                category: TokenCategory::Easy,
                offset: 6,
                ..
            }))
        );
    }

    #[test]
    fn test_nothing_after_marker() {
        assert_matches!(target("@"), Err(SyntaxError::Parse(_)));
        assert_matches!(target("@easy"), Err(SyntaxError::Parse(_)));
        assert_matches!(target("@(easy"), Err(SyntaxError::Parse(_)));
    }
}
