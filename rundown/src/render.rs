//! Indented outline of a parsed workout
//!
//! Each section lists its components under a heading, one tab deeper per
//! nesting level. Sets and recoveries nest their own sections.

use crate::grammar::ast::nodes::{Action, Recovery, RecoverySection, Section, Workout};

/// Render every section, each followed by a newline
pub fn outline(workout: &Workout) -> String {
    workout
        .sections
        .iter()
        .map(|section| format!("{}\n", render_section(section, 0)))
        .collect()
}

fn render_section(section: &Section, depth: usize) -> String {
    let mut entries = Vec::new();

    if let Some(action) = &section.action {
        entries.push(("Action", render_action(action, depth + 1)));
    }
    if let Some(metadata) = &section.metadata {
        entries.push(("Metadata", metadata.to_string()));
    }
    if let Some(target) = &section.target {
        entries.push(("Target", target.to_string()));
    }
    if let Some(recovery) = &section.recovery {
        entries.push(("Recovery", render_recovery(recovery, depth + 1)));
    }

    render_entries(&entries, depth)
}

fn render_action(action: &Action, depth: usize) -> String {
    match action {
        Action::Set(set) => format!("{} x {}", set.multiplier, render_section(&set.section, depth)),
        Action::Rep(rep) => rep.to_string(),
    }
}

fn render_recovery(recovery: &Recovery, depth: usize) -> String {
    let cycle = if recovery.is_cycle { "Cycle " } else { "" };
    format!(
        "{}{} {}",
        cycle,
        recovery.kind,
        render_recovery_section(&recovery.section, depth)
    )
}

fn render_recovery_section(section: &RecoverySection, depth: usize) -> String {
    let mut entries = vec![("Action", section.rep.to_string())];

    if let Some(metadata) = &section.metadata {
        entries.push(("Metadata", metadata.to_string()));
    }
    if let Some(target) = &section.target {
        entries.push(("Target", target.to_string()));
    }

    render_entries(&entries, depth)
}

fn render_entries(entries: &[(&str, String)], depth: usize) -> String {
    let tabs = "\t".repeat(depth);
    entries
        .iter()
        .map(|(heading, body)| format!("\n{tabs}{heading}:\n{tabs}\t{body}"))
        .collect()
}
