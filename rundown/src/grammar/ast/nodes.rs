//! AST node definitions for workout shorthand
//!
//! Every node is owned by its parent and the tree is built in a single parse
//! pass. Consumers walk it with ordinary pattern matching; `render::outline`
//! is the reference traversal.

use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

// === ROOT ===

/// Workout ::= section (";" section)*
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workout {
    pub sections: Vec<Section>,
}

impl Workout {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Section ::= action? metadata? target? recovery?
///
/// A section built by the parser always has at least one component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub action: Option<Action>,
    pub metadata: Option<Metadata>,
    pub target: Option<Target>,
    pub recovery: Option<Recovery>,
}

impl Section {
    pub fn is_empty(&self) -> bool {
        self.components().is_empty()
    }

    /// Components present, in section order
    pub fn components(&self) -> Vec<Component> {
        let mut components = Vec::with_capacity(4);
        if self.action.is_some() {
            components.push(Component::Action);
        }
        if self.metadata.is_some() {
            components.push(Component::Metadata);
        }
        if self.target.is_some() {
            components.push(Component::Target);
        }
        if self.recovery.is_some() {
            components.push(Component::Recovery);
        }
        components
    }

    /// A section holding nothing but a target
    pub fn is_target_only(&self) -> bool {
        self.components() == [Component::Target]
    }
}

/// Section components; the derived ordering is the order they must appear in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Component {
    Action,
    Metadata,
    Target,
    Recovery,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Metadata => "metadata",
            Self::Target => "target",
            Self::Recovery => "recovery",
        }
    }
}

// === ACTIONS ===

/// Action ::= rep | NUMBER "x" section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Set(Set),
    Rep(Rep),
}

/// A multiplied section; `multiplier` is at least 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub multiplier: u32,
    pub section: Box<Section>,
}

/// Rep ::= time | distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rep {
    Time(Time),
    Distance(Distance),
}

impl Rep {
    pub fn is_distance(&self) -> bool {
        matches!(self, Self::Distance(_))
    }
}

// === METADATA ===

/// Metadata ::= (NUMBER "x")? keyword (WS keyword)*
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Keyword tokens in source order
    pub keywords: Vec<Token>,
    /// Present for the `N x keywords` form
    pub multiplier: Option<u32>,
}

impl Metadata {
    pub fn new(keywords: Vec<Token>) -> Self {
        Self {
            keywords,
            multiplier: None,
        }
    }

    pub fn multiple(multiplier: u32, keywords: Vec<Token>) -> Self {
        Self {
            keywords,
            multiplier: Some(multiplier),
        }
    }

    pub fn lexemes(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.lexeme.as_str()).collect()
    }
}

// === TARGETS ===

/// Target ::= "@" (range | value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Value(TargetValue),
    Range(TargetRange),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetValue {
    Pace(Pace),
    Speed(Speed),
    /// Grade-adjusted pace
    Gap(Pace),
    HeartRate(u32),
    Cadence(u32),
    Power(u32),
    Rpe(u32),
    Zone(u32),
    RacePace(RaceReference),
    Time(Time),
    Fixed(TargetFixed),
}

impl TargetValue {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Pace(_) => TargetKind::Pace,
            Self::Speed(_) => TargetKind::Speed,
            Self::Gap(_) => TargetKind::Gap,
            Self::HeartRate(_) => TargetKind::HeartRate,
            Self::Cadence(_) => TargetKind::Cadence,
            Self::Power(_) => TargetKind::Power,
            Self::Rpe(_) => TargetKind::Rpe,
            Self::Zone(_) => TargetKind::Zone,
            Self::RacePace(_) => TargetKind::RacePace,
            Self::Time(_) => TargetKind::Time,
            Self::Fixed(_) => TargetKind::Fixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Pace,
    Speed,
    Gap,
    HeartRate,
    Cadence,
    Power,
    Rpe,
    Zone,
    RacePace,
    Time,
    Fixed,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pace => "pace",
            Self::Speed => "speed",
            Self::Gap => "gap",
            Self::HeartRate => "heart rate",
            Self::Cadence => "cadence",
            Self::Power => "power",
            Self::Rpe => "rpe",
            Self::Zone => "zone",
            Self::RacePace => "race pace",
            Self::Time => "time",
            Self::Fixed => "fixed",
        }
    }
}

/// Physiological or race reference named by a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFixed {
    LactateThreshold1,
    LactateThreshold2,
    Vo2Max,
    Tempo,
    HalfMarathon,
    Marathon,
}

impl TargetFixed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LactateThreshold1 => "Lactate Threshold 1",
            Self::LactateThreshold2 => "Lactate Threshold 2",
            Self::Vo2Max => "VO2 Max",
            Self::Tempo => "Tempo",
            Self::HalfMarathon => "Half Marathon",
            Self::Marathon => "Marathon",
        }
    }
}

/// What a race pace is measured against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceReference {
    Distance(Distance),
    Fixed(TargetFixed),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub lower: TargetValue,
    pub upper: TargetValue,
    pub relation: RangeRelation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeRelation {
    /// `-`
    Span,
    /// `>`
    ProgressionPerRep,
    /// `>>`
    ProgressionPerSet,
}

impl RangeRelation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Span => "-",
            Self::ProgressionPerRep => ">",
            Self::ProgressionPerSet => ">>",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Span => "Range: ",
            Self::ProgressionPerRep => "Each rep from ",
            Self::ProgressionPerSet => "Set from ",
        }
    }
}

// === RECOVERY ===

/// Recovery ::= "C"? ("R" | "W" | "S") "=" (rep | "(" recovery_section ")")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recovery {
    pub kind: RecoveryKind,
    pub section: RecoverySection,
    pub is_cycle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecoveryKind {
    Jog,
    Walk,
    Static,
}

impl RecoveryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jog => "Jog",
            Self::Walk => "Walk",
            Self::Static => "Stay still",
        }
    }
}

/// Restricted section: a rep with optional metadata and target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySection {
    pub rep: Rep,
    pub metadata: Option<Metadata>,
    pub target: Option<Target>,
}

// === LEAVES ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Time {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Time {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "h",
            Self::Minute => "mn",
            Self::Second => "s",
        }
    }

    /// A time of `value` in this unit
    pub fn time(&self, value: u32) -> Time {
        match self {
            Self::Hour => Time::new(value, 0, 0),
            Self::Minute => Time::new(0, value, 0),
            Self::Second => Time::new(0, 0, value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    Meter,
    Kilometer,
    Mile,
    Yard,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Mile => "M",
            Self::Yard => "yd",
        }
    }
}

/// Time per distance unit, e.g. `4:40/km`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pace {
    pub time: Time,
    pub unit: DistanceUnit,
}

/// Distance per time unit, e.g. `12km/h`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub distance: Distance,
    pub time_unit: TimeUnit,
}

// === DISPLAY IMPLEMENTATIONS ===

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Rep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time(time) => write!(f, "{}", time),
            Self::Distance(distance) => write!(f, "{}", distance),
        }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(multiplier) = self.multiplier {
            write!(f, "{} x ", multiplier)?;
        }
        write!(f, "{}", self.lexemes().join(" "))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{}", value),
            Self::Range(range) => write!(f, "{}", range),
        }
    }
}

impl fmt::Display for TargetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pace(pace) | Self::Gap(pace) => write!(f, "{} {}", pace, self.kind()),
            Self::Speed(speed) => write!(f, "{} {}", speed, self.kind()),
            Self::HeartRate(n)
            | Self::Cadence(n)
            | Self::Power(n)
            | Self::Rpe(n)
            | Self::Zone(n) => write!(f, "{} {}", n, self.kind()),
            Self::RacePace(reference) => write!(f, "{} {}", reference, self.kind()),
            Self::Time(time) => write!(f, "{} {}", time, self.kind()),
            Self::Fixed(fixed) => write!(f, "{}", fixed),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TargetFixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RaceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance(distance) => write!(f, "{}", distance),
            Self::Fixed(fixed) => write!(f, "{}", fixed),
        }
    }
}

impl fmt::Display for TargetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progression: {}{} to {}",
            self.relation.as_str(),
            self.lower,
            self.upper
        )
    }
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.time, self.unit)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.distance, self.time_unit)
    }
}
