//! Recoveries: `R=1mn`, `CW=(2mn, easy)`, `S=30s`

use super::action::parse_rep;
use super::metadata::parse_metadata;
use super::target::parse_target;
use crate::grammar::ast::nodes::{Recovery, RecoveryKind, RecoverySection};
use crate::syntax::error::{ParseError, SemanticError, SyntaxResult};
use crate::tokens::{Cursor, TokenCategory, TokenGroup};

/// Parse recovery ::= "C"? ("R" | "W" | "S") "=" (rep | "(" recovery_section ")")
///
/// The kind marker and `=` commit the parse; anything malformed after them
/// is a `ParseError`.
pub fn parse_recovery(cursor: &mut Cursor) -> SyntaxResult<Option<Recovery>> {
    let mark = cursor.mark();
    let is_cycle = cursor.skip(TokenCategory::Cycle);

    let Some(marker) = cursor.match_group(TokenGroup::Recovery) else {
        cursor.reset(mark);
        return Ok(None);
    };
    let kind = recovery_kind(marker.category);
    cursor.match_or_fail(&[TokenCategory::Equal], "'='")?;

    let section = match parse_rep(cursor)? {
        Some(rep) => RecoverySection {
            rep,
            metadata: None,
            target: None,
        },
        None => {
            cursor.match_or_fail(&[TokenCategory::ParenLeft], "a time, distance or '('")?;
            let section = parse_recovery_section(cursor)?;
            cursor.match_or_fail(&[TokenCategory::ParenRight], "')'")?;
            section
        }
    };

    let recovery = Recovery {
        kind,
        section,
        is_cycle,
    };
    if let Err(violation) = validate_recovery(&recovery, marker.offset) {
        cursor.defer(violation);
    }

    Ok(Some(recovery))
}

/// recovery_section ::= rep (sep metadata)? (sep target)?  with sep ::= WS? ","? WS?
fn parse_recovery_section(cursor: &mut Cursor) -> SyntaxResult<RecoverySection> {
    let Some(rep) = parse_rep(cursor)? else {
        return Err(ParseError::unexpected(cursor.peek(), "a time or distance").into());
    };

    skip_separator(cursor);
    let metadata = parse_metadata(cursor)?;
    skip_separator(cursor);
    let target = parse_target(cursor)?;
    cursor.skip(TokenCategory::Whitespace);

    Ok(RecoverySection {
        rep,
        metadata,
        target,
    })
}

fn skip_separator(cursor: &mut Cursor) {
    cursor.skip(TokenCategory::Whitespace);
    cursor.skip(TokenCategory::Comma);
    cursor.skip(TokenCategory::Whitespace);
}

/// Walking and standing still take no target; standing still is timed
fn validate_recovery(recovery: &Recovery, offset: usize) -> Result<(), SemanticError> {
    let kind = recovery.kind;

    if kind != RecoveryKind::Jog && recovery.section.target.is_some() {
        return Err(SemanticError::TargetNotAllowed { kind, offset });
    }
    if kind == RecoveryKind::Static && recovery.section.rep.is_distance() {
        return Err(SemanticError::StaticDistance { offset });
    }
    Ok(())
}

fn recovery_kind(category: TokenCategory) -> RecoveryKind {
    match category {
        TokenCategory::RecoveryWalk => RecoveryKind::Walk,
        TokenCategory::RecoveryStatic => RecoveryKind::Static,
        _ => RecoveryKind::Jog,
    }
}
