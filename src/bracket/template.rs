//! Declarative bracket templates and the (season, division) registry.
//!
//! A template is a fixed picture of one historical playoff: which seed or
//! named team sits in each slot, who is known to have won, and how slots
//! connect. Templates are data, so a new season is added by registering (or
//! loading from TOML) another template rather than writing new code.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{NodeKind, Position, Stage};

/// Label on the champion box, as the league site shows it.
pub const CHAMPION_LABEL: &str = "👑 Champion";

/// Errors raised while registering or loading templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse template file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid template {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Where the team shown in a slot comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SlotSource {
    /// 1-based position in the ranked list
    Seed { seed: usize },
    /// A team fixed by name, independent of ranking
    Literal { name: String },
}

impl SlotSource {
    pub fn seed(seed: usize) -> Self {
        SlotSource::Seed { seed }
    }

    pub fn literal(name: &str) -> Self {
        SlotSource::Literal {
            name: name.to_string(),
        }
    }
}

/// One node of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub id: String,

    pub kind: NodeKind,

    pub label: String,

    #[serde(default)]
    pub stage: Option<Stage>,

    #[serde(default)]
    pub team1: Option<SlotSource>,

    #[serde(default)]
    pub team2: Option<SlotSource>,

    /// Known result of this slot, if the picture shows one
    #[serde(default)]
    pub winner: Option<SlotSource>,

    pub position: Position,
}

impl SlotTemplate {
    /// A seed box holding the team ranked at `seed`.
    pub fn seed(id: &str, seed: usize, position: Position) -> Self {
        Self {
            id: id.to_string(),
            kind: NodeKind::Seed,
            label: format!("{} Seed", ordinal(seed)),
            stage: None,
            team1: Some(SlotSource::seed(seed)),
            team2: None,
            winner: None,
            position,
        }
    }

    /// An empty match slot.
    pub fn match_slot(id: &str, label: &str, stage: Stage, position: Position) -> Self {
        Self {
            id: id.to_string(),
            kind: NodeKind::Match,
            label: label.to_string(),
            stage: Some(stage),
            team1: None,
            team2: None,
            winner: None,
            position,
        }
    }

    /// The champion box, holding a single team.
    pub fn champion(team: SlotSource, position: Position) -> Self {
        Self::match_slot("champion", CHAMPION_LABEL, Stage::Champion, position).with_team1(team)
    }

    /// Builder method to set the first side only.
    pub fn with_team1(mut self, team: SlotSource) -> Self {
        self.team1 = Some(team);
        self
    }

    /// Builder method to set both sides.
    pub fn between(mut self, team1: SlotSource, team2: SlotSource) -> Self {
        self.team1 = Some(team1);
        self.team2 = Some(team2);
        self
    }

    /// Builder method to set the known winner.
    pub fn with_winner(mut self, winner: SlotSource) -> Self {
        self.winner = Some(winner);
        self
    }

    fn sources(&self) -> impl Iterator<Item = &SlotSource> {
        [&self.team1, &self.team2, &self.winner]
            .into_iter()
            .flatten()
    }
}

/// A directed connection from one slot into a later one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTemplate {
    pub source: String,
    pub target: String,
}

impl EdgeTemplate {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// A complete bracket shape for one (season, division).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTemplate {
    pub season: u32,

    pub division: u32,

    pub name: String,

    /// Number of ranked teams the shape was drawn for
    pub team_count: usize,

    pub slots: Vec<SlotTemplate>,

    #[serde(default)]
    pub edges: Vec<EdgeTemplate>,
}

impl BracketTemplate {
    pub fn key(&self) -> (u32, u32) {
        (self.season, self.division)
    }

    /// Whether any slot names a team directly instead of by seed.
    pub fn is_literal(&self) -> bool {
        self.slots
            .iter()
            .flat_map(SlotTemplate::sources)
            .any(|s| matches!(s, SlotSource::Literal { .. }))
    }

    /// Check slot ids, edge endpoints and seed ranges.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let invalid = |reason: String| TemplateError::Invalid {
            name: self.name.clone(),
            reason,
        };

        if self.slots.is_empty() {
            return Err(invalid("template has no slots".to_string()));
        }

        let mut ids = HashSet::new();
        for slot in &self.slots {
            if !ids.insert(slot.id.as_str()) {
                return Err(invalid(format!("duplicate slot id {}", slot.id)));
            }
        }

        for edge in &self.edges {
            for end in [&edge.source, &edge.target] {
                if !ids.contains(end.as_str()) {
                    return Err(invalid(format!("edge references unknown slot {}", end)));
                }
            }
            if edge.source == edge.target {
                return Err(invalid(format!("slot {} feeds itself", edge.source)));
            }
        }

        for source in self.slots.iter().flat_map(SlotTemplate::sources) {
            if let SlotSource::Seed { seed } = source {
                if *seed == 0 || *seed > self.team_count {
                    return Err(invalid(format!(
                        "seed {} outside 1..={}",
                        seed, self.team_count
                    )));
                }
            }
        }

        let champions = self
            .slots
            .iter()
            .filter(|s| s.stage == Some(Stage::Champion))
            .count();
        if champions > 1 {
            return Err(invalid(format!("{} champion slots", champions)));
        }

        Ok(())
    }
}

/// Division to fall back to for divisions of a season without their own
/// template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonDefault {
    pub season: u32,
    pub division: u32,
}

/// On-disk layout of a template file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TemplateFile {
    #[serde(default)]
    pub templates: Vec<BracketTemplate>,

    #[serde(default)]
    pub season_defaults: Vec<SeasonDefault>,
}

/// Templates keyed by (season, division).
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<(u32, u32), BracketTemplate>,
    season_defaults: BTreeMap<u32, u32>,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the league's historical playoffs.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        super::builtin::register(&mut registry);
        registry
    }

    /// Validate and add a template, returning the one it replaced.
    pub fn insert(
        &mut self,
        template: BracketTemplate,
    ) -> Result<Option<BracketTemplate>, TemplateError> {
        template.validate()?;
        debug!("Registered bracket template {}", template.name);
        Ok(self.templates.insert(template.key(), template))
    }

    /// Route divisions of `season` without a template to `division`'s.
    pub fn set_season_default(&mut self, season: u32, division: u32) {
        self.season_defaults.insert(season, division);
    }

    /// Exact (season, division) match.
    pub fn get(&self, season: u32, division: u32) -> Option<&BracketTemplate> {
        self.templates.get(&(season, division))
    }

    /// Exact match, then the season's default division.
    pub fn lookup(&self, season: u32, division: u32) -> Option<&BracketTemplate> {
        self.get(season, division).or_else(|| {
            let fallback = self.season_defaults.get(&season)?;
            self.get(season, *fallback)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &BracketTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Register every template in a TOML document.
    pub fn load_str(&mut self, contents: &str, origin: &Path) -> Result<usize, TemplateError> {
        let file: TemplateFile = toml::from_str(contents).map_err(|source| TemplateError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let count = file.templates.len();
        for template in file.templates {
            if let Some(replaced) = self.insert(template)? {
                info!(
                    "Template from {:?} replaces {}",
                    origin, replaced.name
                );
            }
        }
        for default in file.season_defaults {
            self.set_season_default(default.season, default.division);
        }
        Ok(count)
    }

    /// Register templates from every `*.toml` file in `dir`, in name order.
    ///
    /// A missing directory loads nothing.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, TemplateError> {
        if !dir.exists() {
            debug!("Template directory {:?} does not exist", dir);
            return Ok(0);
        }

        let pattern = dir.join("*.toml");
        let mut paths = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            paths.push(entry.map_err(std::io::Error::from)?);
        }
        paths.sort();

        let mut total = 0;
        for path in paths {
            let contents = fs::read_to_string(&path)?;
            total += self.load_str(&contents, &path)?;
        }

        info!("Loaded {} bracket templates from {:?}", total, dir);
        Ok(total)
    }
}

/// `1st`, `2nd`, `3rd`, `4th`, ... `11th`, `12th`, `13th`, `21st`.
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tiny(season: u32, division: u32) -> BracketTemplate {
        BracketTemplate {
            season,
            division,
            name: format!("tiny-{}-{}", season, division),
            team_count: 2,
            slots: vec![
                SlotTemplate::match_slot("final", "Final", Stage::Finals, Position::new(0.0, 0.0))
                    .between(SlotSource::seed(1), SlotSource::seed(2)),
                SlotTemplate::champion(SlotSource::seed(1), Position::new(250.0, 0.0)),
            ],
            edges: vec![EdgeTemplate::new("final", "champion")],
        }
    }

    const TOML_TEMPLATE: &str = r#"
[[templates]]
season = 7
division = 1
name = "season-7-division-1"
team_count = 2

[[templates.slots]]
id = "final"
kind = "match"
label = "Final"
stage = "finals"
team1 = { source = "seed", seed = 1 }
team2 = { source = "literal", name = "Creep Enjoyers" }
position = { x = 50.0, y = 100.0 }

[[templates.slots]]
id = "champion"
kind = "match"
label = "Champion"
stage = "champion"
team1 = { source = "seed", seed = 1 }
position = { x = 300.0, y = 100.0 }

[[templates.edges]]
source = "final"
target = "champion"

[[season_defaults]]
season = 7
division = 1
"#;

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(21), "21st");
    }

    #[test]
    fn test_seed_slot_label() {
        let slot = SlotTemplate::seed("seed-3", 3, Position::default());
        assert_eq!(slot.label, "3rd Seed");
        assert_eq!(slot.kind, NodeKind::Seed);
        assert_eq!(slot.team1, Some(SlotSource::seed(3)));
    }

    #[test]
    fn test_validate_ok() {
        assert!(tiny(1, 1).validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let mut t = tiny(1, 1);
        t.slots.push(SlotTemplate::seed("final", 1, Position::default()));
        assert!(matches!(t.validate(), Err(TemplateError::Invalid { .. })));
    }

    #[test]
    fn test_validate_unknown_edge() {
        let mut t = tiny(1, 1);
        t.edges.push(EdgeTemplate::new("sf-1", "final"));
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_validate_seed_out_of_range() {
        let mut t = tiny(1, 1);
        t.slots[0].team2 = Some(SlotSource::seed(3));
        assert!(t.validate().is_err());

        t.slots[0].team2 = Some(SlotSource::seed(0));
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_lookup_uses_season_default() {
        let mut registry = TemplateRegistry::new();
        registry.insert(tiny(4, 2)).unwrap();
        registry.set_season_default(4, 2);

        assert_eq!(registry.lookup(4, 2).unwrap().name, "tiny-4-2");
        assert_eq!(registry.lookup(4, 9).unwrap().name, "tiny-4-2");
        assert!(registry.get(4, 9).is_none());
        assert!(registry.lookup(5, 2).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut registry = TemplateRegistry::new();
        assert!(registry.insert(tiny(1, 1)).unwrap().is_none());
        assert!(registry.insert(tiny(1, 1)).unwrap().is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_load_str() {
        let mut registry = TemplateRegistry::new();
        let count = registry
            .load_str(TOML_TEMPLATE, Path::new("season7.toml"))
            .unwrap();

        assert_eq!(count, 1);
        let template = registry.lookup(7, 3).unwrap();
        assert_eq!(template.team_count, 2);
        assert!(template.is_literal());
        assert_eq!(template.edges, vec![EdgeTemplate::new("final", "champion")]);
    }

    #[test]
    fn test_load_str_parse_error() {
        let mut registry = TemplateRegistry::new();
        let err = registry
            .load_str("[[templates]]\nseason = \"x\"", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }));
    }

    #[test]
    fn test_load_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("season7.toml"), TOML_TEMPLATE).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = TemplateRegistry::new();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        assert!(registry.get(7, 1).is_some());
    }

    #[test]
    fn test_load_dir_missing() {
        let mut registry = TemplateRegistry::new();
        assert_eq!(
            registry.load_dir(Path::new("/nonexistent/templates")).unwrap(),
            0
        );
    }
}
