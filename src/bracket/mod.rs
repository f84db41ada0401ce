//! Knockout bracket construction.
//!
//! [`BracketBuilder`] places a division's ranked teams into the playoff
//! template registered for that (season, division). The ranked list is
//! taken as given; the builder never re-sorts it.

mod builtin;
mod template;

pub use template::*;

use std::path::Path;
use std::sync::OnceLock;

use tracing::debug;

use crate::models::{Bracket, BracketEdge, BracketNode, BracketTeam, Team};

/// Renders brackets from a [`TemplateRegistry`].
#[derive(Debug, Clone)]
pub struct BracketBuilder {
    registry: TemplateRegistry,
}

impl Default for BracketBuilder {
    fn default() -> Self {
        Self::new(TemplateRegistry::builtin())
    }
}

impl BracketBuilder {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    /// Built-in templates plus any `*.toml` templates in `dir`. Files
    /// override built-ins registered for the same (season, division).
    pub fn with_templates_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut registry = TemplateRegistry::builtin();
        registry.load_dir(dir)?;
        Ok(Self::new(registry))
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Build the bracket for `division` of `season` from teams ranked best
    /// first.
    ///
    /// An empty ranking, or a (season, division) with no template and no
    /// season default, yields an empty bracket. Seeds beyond the end of the
    /// ranking leave their slot unresolved.
    pub fn build(&self, ranked: &[Team], season: u32, division: u32) -> Bracket {
        if ranked.is_empty() {
            debug!(season, division, "No ranked teams, empty bracket");
            return Bracket::empty(season, division);
        }

        let Some(template) = self.registry.lookup(season, division) else {
            debug!(season, division, "No bracket template registered");
            return Bracket::empty(season, division);
        };

        if ranked.len() < template.team_count {
            debug!(
                "{} ranked teams for {} ({} seeds), missing seeds show as TBD",
                ranked.len(),
                template.name,
                template.team_count
            );
        }

        render(template, ranked, season, division)
    }
}

/// Fill a template with teams from `ranked`.
pub fn render(template: &BracketTemplate, ranked: &[Team], season: u32, division: u32) -> Bracket {
    let nodes = template
        .slots
        .iter()
        .map(|slot| BracketNode {
            id: slot.id.clone(),
            kind: slot.kind,
            label: slot.label.clone(),
            stage: slot.stage,
            team1: slot.team1.as_ref().and_then(|s| resolve(s, ranked)),
            team2: slot.team2.as_ref().and_then(|s| resolve(s, ranked)),
            winner: slot
                .winner
                .as_ref()
                .and_then(|s| resolve(s, ranked))
                .map(|t| t.name),
            position: slot.position,
        })
        .collect();

    let edges = template
        .edges
        .iter()
        .map(|e| BracketEdge::between(&e.source, &e.target))
        .collect();

    Bracket {
        season,
        division,
        template: Some(template.name.clone()),
        nodes,
        edges,
    }
}

/// Team for a slot source. Literal names keep their text when no ranked
/// team matches them.
fn resolve(source: &SlotSource, ranked: &[Team]) -> Option<BracketTeam> {
    match source {
        SlotSource::Seed { seed } => seed
            .checked_sub(1)
            .and_then(|i| ranked.get(i))
            .map(BracketTeam::from),
        SlotSource::Literal { name } => Some(
            ranked
                .iter()
                .find(|t| t.name_matches(name))
                .map(BracketTeam::from)
                .unwrap_or_else(|| BracketTeam::named(name)),
        ),
    }
}

/// Build with the built-in historical templates.
pub fn build_bracket(ranked: &[Team], season: u32, division: u32) -> Bracket {
    static BUILDER: OnceLock<BracketBuilder> = OnceLock::new();
    BUILDER
        .get_or_init(BracketBuilder::default)
        .build(ranked, season, division)
}
