//! Sections and whole workouts

use super::action::parse_action;
use super::metadata::parse_metadata;
use super::recovery::parse_recovery;
use super::target::parse_target;
use crate::config::compile_time::syntax::MAX_SECTIONS;
use crate::grammar::ast::nodes::{
    Action, Component, Metadata, Recovery, Section, Target, Workout,
};
use crate::syntax::error::{ParseError, SemanticError, SyntaxResult};
use crate::tokens::{Cursor, TokenCategory};

/// One parsed section component
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPart {
    Action(Action),
    Metadata(Metadata),
    Target(Target),
    Recovery(Recovery),
}

impl SectionPart {
    pub fn component(&self) -> Component {
        match self {
            Self::Action(_) => Component::Action,
            Self::Metadata(_) => Component::Metadata,
            Self::Target(_) => Component::Target,
            Self::Recovery(_) => Component::Recovery,
        }
    }

    fn add_to(self, section: &mut Section) {
        match self {
            Self::Action(action) => section.action = Some(action),
            Self::Metadata(metadata) => section.metadata = Some(metadata),
            Self::Target(target) => section.target = Some(target),
            Self::Recovery(recovery) => section.recovery = Some(recovery),
        }
    }
}

/// Parse workout ::= section (";" section)* ";"? WS?
///
/// Rule violations recorded while parsing are reported only after the whole
/// input has parsed, so any `ParseError` takes precedence.
pub fn parse_workout(cursor: &mut Cursor) -> SyntaxResult<Workout> {
    let mut sections = vec![parse_section(cursor)?];

    loop {
        cursor.skip(TokenCategory::Whitespace);
        if cursor.is_at_end() {
            break;
        }
        if sections.len() >= MAX_SECTIONS {
            return Err(ParseError::TooManySections {
                count: sections.len() + 1,
                offset: cursor.peek().offset,
            }
            .into());
        }
        sections.push(parse_section(cursor)?);
    }

    if let Some(violation) = cursor.take_violation() {
        return Err(violation.into());
    }
    Ok(Workout::new(sections))
}

/// Parse section ::= WS? component (separator component)* section_end
///
/// Components must appear in the order action, metadata, target, recovery,
/// each at most once.
pub fn parse_section(cursor: &mut Cursor) -> SyntaxResult<Section> {
    cursor.skip(TokenCategory::Whitespace);
    let start = cursor.peek().offset;

    let Some(first) = parse_component(cursor)? else {
        if !at_section_end(cursor) {
            return Err(expected_component(cursor).into());
        }
        cursor.defer(SemanticError::EmptySection { offset: start });
        match_section_end(cursor);
        return Ok(Section::default());
    };

    let mut previous = first.component();
    let mut section = Section::default();
    first.add_to(&mut section);

    while !match_section_end(cursor) {
        if !match_separator(cursor) {
            return Err(ParseError::unexpected(cursor.peek(), "',' or whitespace").into());
        }

        let offset = cursor.peek().offset;
        let Some(part) = parse_component(cursor)? else {
            return Err(expected_component(cursor).into());
        };

        let found = part.component();
        if found <= previous {
            cursor.defer(SemanticError::ComponentOrder {
                found,
                previous,
                offset,
            });
        }
        previous = found;
        part.add_to(&mut section);
    }

    if section.is_target_only() {
        cursor.defer(SemanticError::TargetOnlySection { offset: start });
    }

    Ok(section)
}

/// Try each component at the current position
fn parse_component(cursor: &mut Cursor) -> SyntaxResult<Option<SectionPart>> {
    if let Some(action) = parse_action(cursor)? {
        return Ok(Some(SectionPart::Action(action)));
    }
    if let Some(metadata) = parse_metadata(cursor)? {
        return Ok(Some(SectionPart::Metadata(metadata)));
    }
    if let Some(target) = parse_target(cursor)? {
        return Ok(Some(SectionPart::Target(target)));
    }
    Ok(parse_recovery(cursor)?.map(SectionPart::Recovery))
}

/// separator ::= WS? ","? WS? with at least one of them present
fn match_separator(cursor: &mut Cursor) -> bool {
    let whitespace = cursor.skip(TokenCategory::Whitespace);
    let comma = cursor.skip(TokenCategory::Comma);
    cursor.skip(TokenCategory::Whitespace);
    whitespace || comma
}

/// section_end ::= WS? (EOF | ";"), consumed only when present
fn match_section_end(cursor: &mut Cursor) -> bool {
    let mark = cursor.mark();
    cursor.skip(TokenCategory::Whitespace);
    if cursor.is_at_end() || cursor.skip(TokenCategory::Semicolon) {
        return true;
    }
    cursor.reset(mark);
    false
}

fn at_section_end(cursor: &Cursor) -> bool {
    cursor.is_at_end() || cursor.check(TokenCategory::Semicolon)
}

fn expected_component(cursor: &Cursor) -> ParseError {
    ParseError::unexpected(cursor.peek(), "an action, metadata, target or recovery")
}
