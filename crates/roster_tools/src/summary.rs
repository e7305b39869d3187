//! Plain-text roster summaries.

use std::fmt::Write as _;
use std::path::Path;

use roster_core::config::RosterConfig;
use roster_core::cost::{calculate_unit_total, points_label, unit_size};
use roster_core::data::Catalogue;
use roster_core::loadout::{effective_loadout, loadout_summary};
use roster_core::roster::Roster;
use roster_core::rules::{aggregate_rules, rules_label};
use roster_core::save::{SaveData, SaveStatus};
use roster_core::unit::SelectedUnit;

use crate::error::{ToolError, ToolResult};

/// Render a roster as a plain-text list.
///
/// Groups are listed per army book, heroes ahead of their host. Upgrade
/// problems found by [`Roster::audit`] are appended at the end.
pub fn render_summary(roster: &Roster, catalogue: &impl Catalogue, config: &RosterConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} - {}",
        roster.name(),
        points_label(roster.points(), roster.points_limit())
    );

    for section in roster.sections(config) {
        let heading = catalogue
            .army_book(section.army_id)
            .map_or(section.army_id, |book| book.name.as_str());
        let _ = writeln!(out, "\n== {heading} ==");

        for group in &section.groups {
            if group.has_joined() {
                let _ = writeln!(out, "{} | {}pts", group.title(), group.cost());
            }
            for unit in group.members() {
                write_unit(&mut out, unit, group.has_joined());
            }
        }
    }

    let issues = roster.audit(catalogue);
    if !issues.is_empty() {
        let _ = writeln!(out, "\nIssues:");
        for (unit, issue) in issues {
            let option = issue.option_id.as_deref().unwrap_or("-");
            let _ = writeln!(
                out,
                "  {unit}: {:?} ({} / {option})",
                issue.kind, issue.upgrade_id
            );
        }
    }

    out
}

fn write_unit(out: &mut String, unit: &SelectedUnit, indent: bool) {
    let pad = if indent { "  " } else { "" };
    let _ = writeln!(
        out,
        "{pad}{} [{}] Q{}+ D{}+ | {}pts",
        unit.display_name(),
        unit_size(unit),
        unit.quality,
        unit.defense,
        calculate_unit_total(unit)
    );

    let loadout = loadout_summary(&effective_loadout(unit));
    if !loadout.is_empty() {
        let _ = writeln!(out, "{pad}  {loadout}");
    }
    let rules = rules_label(&aggregate_rules(unit));
    if !rules.is_empty() {
        let _ = writeln!(out, "{pad}  {rules}");
    }
}

/// Load a save file and render it against the given army books.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed.
pub fn summarize_file(
    catalogue: &impl Catalogue,
    config: &RosterConfig,
    save_path: &Path,
) -> ToolResult<String> {
    let json = std::fs::read_to_string(save_path).map_err(|e| ToolError::Io {
        path: save_path.display().to_string(),
        source: e,
    })?;
    let loaded = SaveData::from_json(&json)?.into_roster()?;
    if let SaveStatus::Outdated { version } = loaded.status {
        tracing::warn!("Save '{}' uses outdated format version {version}", save_path.display());
    }
    Ok(render_summary(&loaded.roster, catalogue, config))
}
