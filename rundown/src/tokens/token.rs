//! Token catalog for the workout shorthand
//!
//! `TokenCategory::ALL` is the closed, ordered catalog the lexer walks. Order
//! matters: when two categories match a lexeme of the same length the one
//! declared first wins. That is how a bare `W` becomes `RecoveryWalk` rather
//! than `Watts`, leaving the parser to reinterpret it after a number.
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a category recognizes its lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Any of the listed literal spellings
    Literal(&'static [&'static str]),
    /// A regular expression, anchored at the current offset by the lexer
    Pattern(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenCategory {
    At,
    Bpm,
    Colon,
    Comma,
    Cycle,
    Cooldown,
    Downhill,
    Easy,
    Equal,
    Eof,
    Float,
    Gap,
    HalfMarathon,
    Hard,
    Hilly,
    Hour,
    Kilometer,
    KilometerQualified,
    Lt1,
    Lt2,
    /// Mile as a distance unit, marathon as a race marker
    M,
    Meter,
    MeterQualified,
    MileQualified,
    Minus,
    Minute,
    Multiplier,
    Number,
    ParenLeft,
    ParenRight,
    ProgressionRep,
    ProgressionSet,
    RacePace,
    RecoveryJog,
    RecoveryStatic,
    RecoveryWalk,
    Rpe,
    Second,
    Semicolon,
    Slash,
    Spm,
    Steady,
    Strides,
    Tempo,
    Threshold,
    Track,
    Treadmill,
    Uphill,
    Vo2Max,
    Watts,
    Whitespace,
    WarmUp,
    Yard,
    YardQualified,
    Zone,
}

impl TokenCategory {
    /// Every category in declaration order
    pub const ALL: &'static [TokenCategory] = &[
        Self::At,
        Self::Bpm,
        Self::Colon,
        Self::Comma,
        Self::Cycle,
        Self::Cooldown,
        Self::Downhill,
        Self::Easy,
        Self::Equal,
        Self::Eof,
        Self::Float,
        Self::Gap,
        Self::HalfMarathon,
        Self::Hard,
        Self::Hilly,
        Self::Hour,
        Self::Kilometer,
        Self::KilometerQualified,
        Self::Lt1,
        Self::Lt2,
        Self::M,
        Self::Meter,
        Self::MeterQualified,
        Self::MileQualified,
        Self::Minus,
        Self::Minute,
        Self::Multiplier,
        Self::Number,
        Self::ParenLeft,
        Self::ParenRight,
        Self::ProgressionRep,
        Self::ProgressionSet,
        Self::RacePace,
        Self::RecoveryJog,
        Self::RecoveryStatic,
        Self::RecoveryWalk,
        Self::Rpe,
        Self::Second,
        Self::Semicolon,
        Self::Slash,
        Self::Spm,
        Self::Steady,
        Self::Strides,
        Self::Tempo,
        Self::Threshold,
        Self::Track,
        Self::Treadmill,
        Self::Uphill,
        Self::Vo2Max,
        Self::Watts,
        Self::Whitespace,
        Self::WarmUp,
        Self::Yard,
        Self::YardQualified,
        Self::Zone,
    ];

    /// Match rule for this category. `Eof` has none.
    ///
    /// No rule may match the empty string, otherwise the lexer would stall.
    pub fn rule(self) -> Option<MatchRule> {
        use MatchRule::{Literal, Pattern};

        let rule = match self {
            Self::At => Literal(&["@"]),
            Self::Bpm => Literal(&["bpm"]),
            Self::Colon => Literal(&[":"]),
            Self::Comma => Literal(&[","]),
            Self::Cycle => Literal(&["C"]),
            Self::Cooldown => Literal(&["cooldown", "CD"]),
            Self::Downhill => Literal(&["downhill"]),
            Self::Easy => Literal(&["easy"]),
            Self::Equal => Literal(&["="]),
            Self::Eof => return None,
            Self::Float => Pattern(r"[0-9]+\.[0-9]+"),
            Self::Gap => Literal(&["gap"]),
            Self::HalfMarathon => Literal(&["HM"]),
            Self::Hard => Literal(&["hard"]),
            Self::Hilly => Literal(&["hilly"]),
            Self::Hour => Literal(&["h"]),
            Self::Kilometer => Literal(&["km", "k"]),
            Self::KilometerQualified => Literal(&["Kilometer"]),
            Self::Lt1 => Literal(&["LT1"]),
            Self::Lt2 => Literal(&["LT2"]),
            Self::M => Literal(&["M"]),
            Self::Meter => Literal(&["m"]),
            Self::MeterQualified => Literal(&["Meter"]),
            Self::MileQualified => Literal(&["Mile"]),
            Self::Minus => Literal(&["-"]),
            Self::Minute => Literal(&["mn", "'"]),
            Self::Multiplier => Literal(&["x"]),
            Self::Number => Pattern(r"[0-9]+"),
            Self::ParenLeft => Literal(&["("]),
            Self::ParenRight => Literal(&[")"]),
            Self::ProgressionRep => Literal(&[">"]),
            Self::ProgressionSet => Literal(&[">>"]),
            Self::RacePace => Literal(&["P"]),
            Self::RecoveryJog => Literal(&["R"]),
            Self::RecoveryStatic => Literal(&["S"]),
            Self::RecoveryWalk => Literal(&["W"]),
            Self::Rpe => Literal(&["rpe"]),
            Self::Second => Literal(&["s", "\""]),
            Self::Semicolon => Literal(&[";"]),
            Self::Slash => Literal(&["/"]),
            Self::Spm => Literal(&["spm"]),
            Self::Steady => Literal(&["steady"]),
            Self::Strides => Literal(&["strides"]),
            Self::Tempo => Literal(&["tempo"]),
            Self::Threshold => Literal(&["threshold"]),
            Self::Track => Literal(&["track"]),
            Self::Treadmill => Literal(&["treadmill"]),
            Self::Uphill => Literal(&["uphill"]),
            Self::Vo2Max => Literal(&["VO2max"]),
            Self::Watts => Literal(&["W"]),
            Self::Whitespace => Pattern(r"\s+"),
            Self::WarmUp => Literal(&["warmup", "WU"]),
            Self::Yard => Literal(&["yd"]),
            Self::YardQualified => Literal(&["Yard"]),
            Self::Zone => Literal(&["Z"]),
        };

        Some(rule)
    }

    /// Upper-case name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Self::At => "AT",
            Self::Bpm => "BPM",
            Self::Colon => "COLON",
            Self::Comma => "COMMA",
            Self::Cycle => "CYCLE",
            Self::Cooldown => "COOLDOWN",
            Self::Downhill => "DOWNHILL",
            Self::Easy => "EASY",
            Self::Equal => "EQUAL",
            Self::Eof => "EOF",
            Self::Float => "FLOAT",
            Self::Gap => "GAP",
            Self::HalfMarathon => "HALF_MARATHON",
            Self::Hard => "HARD",
            Self::Hilly => "HILLY",
            Self::Hour => "HOUR",
            Self::Kilometer => "KILOMETER",
            Self::KilometerQualified => "KILOMETER_QUALIFIED",
            Self::Lt1 => "LT1",
            Self::Lt2 => "LT2",
            Self::M => "M",
            Self::Meter => "METER",
            Self::MeterQualified => "METER_QUALIFIED",
            Self::MileQualified => "MILE_QUALIFIED",
            Self::Minus => "MINUS",
            Self::Minute => "MINUTE",
            Self::Multiplier => "MULTIPLIER",
            Self::Number => "NUMBER",
            Self::ParenLeft => "PAREN_LEFT",
            Self::ParenRight => "PAREN_RIGHT",
            Self::ProgressionRep => "PROGRESSION_REP",
            Self::ProgressionSet => "PROGRESSION_SET",
            Self::RacePace => "RACE_PACE",
            Self::RecoveryJog => "RECOVERY_JOG",
            Self::RecoveryStatic => "RECOVERY_STATIC",
            Self::RecoveryWalk => "RECOVERY_WALK",
            Self::Rpe => "RPE",
            Self::Second => "SECOND",
            Self::Semicolon => "SEMICOLON",
            Self::Slash => "SLASH",
            Self::Spm => "SPM",
            Self::Steady => "STEADY",
            Self::Strides => "STRIDES",
            Self::Tempo => "TEMPO",
            Self::Threshold => "THRESHOLD",
            Self::Track => "TRACK",
            Self::Treadmill => "TREADMILL",
            Self::Uphill => "UPHILL",
            Self::Vo2Max => "VO2_MAX",
            Self::Watts => "WATTS",
            Self::Whitespace => "WHITESPACE",
            Self::WarmUp => "WARM_UP",
            Self::Yard => "YARD",
            Self::YardQualified => "YARD_QUALIFIED",
            Self::Zone => "ZONE",
        }
    }

    pub fn is_in(self, group: TokenGroup) -> bool {
        group.members().contains(&self)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic groupings the parser matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenGroup {
    /// Short units fused to a number: `m`, `M`, `km`, `yd`
    DistanceUnit,
    /// Long unit words after whitespace: `Meter`, `Mile`, ...
    QualifiedDistanceUnit,
    TimeUnit,
    Keyword,
    /// Markers followed by a value: `gap`, `rpe`, `Z`
    TargetPrefix,
    /// Markers following an integer: `bpm`, `spm`, `W`
    TargetSuffix,
    SingleTokenTarget,
    RaceDistance,
    Recovery,
    RangeRelation,
    /// Either numeric literal
    Numeric,
}

impl TokenGroup {
    pub fn members(self) -> &'static [TokenCategory] {
        use TokenCategory::*;

        match self {
            Self::DistanceUnit => &[Meter, M, Kilometer, Yard],
            Self::QualifiedDistanceUnit => {
                &[MeterQualified, MileQualified, KilometerQualified, YardQualified]
            }
            Self::TimeUnit => &[Hour, Minute, Second],
            Self::Keyword => &[
                Cooldown, Downhill, Easy, Hard, Hilly, Steady, Strides, Tempo, Threshold, Track,
                Treadmill, Uphill, WarmUp,
            ],
            Self::TargetPrefix => &[Gap, Rpe, Zone],
            // RecoveryWalk shadows Watts in the lexer
            Self::TargetSuffix => &[Bpm, Spm, Watts, RecoveryWalk],
            Self::SingleTokenTarget => &[Lt1, Lt2, Tempo, Vo2Max],
            Self::RaceDistance => &[HalfMarathon, M],
            Self::Recovery => &[RecoveryJog, RecoveryStatic, RecoveryWalk],
            Self::RangeRelation => &[Minus, ProgressionRep, ProgressionSet],
            Self::Numeric => &[Number, Float],
        }
    }
}

/// A lexed token. `offset` counts Unicode scalar values from the start of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub lexeme: String,
    pub offset: usize,
}

impl Token {
    pub fn new(category: TokenCategory, lexeme: impl Into<String>, offset: usize) -> Self {
        Self {
            category,
            lexeme: lexeme.into(),
            offset,
        }
    }

    /// End-of-input marker: empty lexeme at the text length
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenCategory::Eof, "", offset)
    }

    pub fn is(&self, category: TokenCategory) -> bool {
        self.category == category
    }

    pub fn is_eof(&self) -> bool {
        self.category == TokenCategory::Eof
    }

    pub fn span(&self) -> crate::utils::Span {
        crate::utils::Span::new(self.offset, self.offset + self.lexeme.chars().count())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            write!(f, "end of input")
        } else {
            write!(f, "{} '{}'", self.category, self.lexeme)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_every_category_once() {
        let mut seen = std::collections::HashSet::new();
        for category in TokenCategory::ALL {
            assert!(seen.insert(*category), "{} listed twice", category);
        }
        assert_eq!(TokenCategory::ALL.len(), 55);
    }

    #[test]
    fn test_only_eof_lacks_a_rule() {
        for category in TokenCategory::ALL {
            assert_eq!(category.rule().is_none(), *category == TokenCategory::Eof);
        }
    }

    #[test]
    fn test_no_empty_literal() {
        for category in TokenCategory::ALL {
            if let Some(MatchRule::Literal(spellings)) = category.rule() {
                assert!(spellings.iter().all(|s| !s.is_empty()), "{}", category);
            }
        }
    }

    #[test]
    fn test_walk_is_declared_before_watts() {
        let position = |c| TokenCategory::ALL.iter().position(|x| *x == c).unwrap();
        assert!(position(TokenCategory::RecoveryWalk) < position(TokenCategory::Watts));
    }

    #[test]
    fn test_group_membership() {
        assert!(TokenCategory::M.is_in(TokenGroup::DistanceUnit));
        assert!(TokenCategory::M.is_in(TokenGroup::RaceDistance));
        assert!(TokenCategory::Tempo.is_in(TokenGroup::Keyword));
        assert!(TokenCategory::Tempo.is_in(TokenGroup::SingleTokenTarget));
        assert!(TokenCategory::RecoveryWalk.is_in(TokenGroup::TargetSuffix));
        assert!(!TokenCategory::Hour.is_in(TokenGroup::DistanceUnit));
    }

    #[test]
    fn test_eof_token() {
        let eof = Token::eof(9);
        assert!(eof.is_eof());
        assert_eq!(eof.lexeme, "");
        assert!(eof.span().is_empty());
        assert_eq!(eof.to_string(), "end of input");
        assert_eq!(Token::new(TokenCategory::Kilometer, "km", 1).to_string(), "KILOMETER 'km'");
    }
}
