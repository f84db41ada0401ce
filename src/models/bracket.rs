//! Knockout bracket output: nodes and directed edges for the playoff view.

use serde::{Deserialize, Serialize};

use super::{Team, TeamId};

/// What a bracket node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A team entering at its seed position
    Seed,
    /// A match slot, or the champion box
    Match,
}

/// Playoff round of a match node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Quarterfinal,
    Semifinal,
    Finals,
    Champion,
}

/// Layout coordinates for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A team as shown in a bracket slot.
///
/// `id` is absent when a slot names a team that is not in the ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTeam {
    pub id: Option<TeamId>,
    pub name: String,
}

impl BracketTeam {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }
}

impl From<&Team> for BracketTeam {
    fn from(team: &Team) -> Self {
        Self {
            id: Some(team.id.clone()),
            name: team.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketNode {
    pub id: String,

    pub kind: NodeKind,

    pub label: String,

    pub stage: Option<Stage>,

    /// Seeded team for seed nodes, first side for match nodes
    pub team1: Option<BracketTeam>,

    pub team2: Option<BracketTeam>,

    /// Name of the side that won, when the result is part of the picture
    pub winner: Option<String>,

    pub position: Position,
}

impl BracketNode {
    /// No team could be placed in this slot yet.
    pub fn is_unresolved(&self) -> bool {
        self.team1.is_none() && self.team2.is_none()
    }

    /// Names to display, with "TBD" for unresolved slots.
    pub fn display_names(&self) -> Vec<&str> {
        let names: Vec<&str> = [&self.team1, &self.team2]
            .into_iter()
            .flatten()
            .map(|t| t.name.as_str())
            .collect();
        if names.is_empty() {
            vec!["TBD"]
        } else {
            names
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl BracketEdge {
    /// Edge ids follow `e-<source>-<target>` with dashes stripped from the
    /// node ids, e.g. `seed-3` -> `qf-1` gives `e-seed3-qf1`.
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            id: format!("e-{}-{}", source.replace('-', ""), target.replace('-', "")),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// A rendered playoff bracket for one division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub season: u32,
    pub division: u32,

    /// Name of the template the shape came from
    pub template: Option<String>,

    pub nodes: Vec<BracketNode>,
    pub edges: Vec<BracketEdge>,
}

impl Bracket {
    /// Nothing to show for this division.
    pub fn empty(season: u32, division: u32) -> Self {
        Self {
            season,
            division,
            template: None,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&BracketNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The champion box, if the template has one.
    pub fn champion(&self) -> Option<&BracketNode> {
        self.nodes.iter().find(|n| n.stage == Some(Stage::Champion))
    }

    /// Nodes feeding into `target`.
    pub fn inputs_of(&self, target: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.source.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, team1: Option<BracketTeam>) -> BracketNode {
        BracketNode {
            id: id.to_string(),
            kind: NodeKind::Match,
            label: id.to_string(),
            stage: None,
            team1,
            team2: None,
            winner: None,
            position: Position::default(),
        }
    }

    #[test]
    fn test_edge_id_format() {
        let edge = BracketEdge::between("seed-3", "qf-1");
        assert_eq!(edge.id, "e-seed3-qf1");
        assert_eq!(edge.source, "seed-3");
        assert_eq!(edge.target, "qf-1");

        assert_eq!(BracketEdge::between("final", "champion").id, "e-final-champion");
    }

    #[test]
    fn test_unresolved_node_shows_tbd() {
        let n = node("sf-1", None);
        assert!(n.is_unresolved());
        assert_eq!(n.display_names(), vec!["TBD"]);

        let n = node("sf-1", Some(BracketTeam::named("BDC")));
        assert!(!n.is_unresolved());
        assert_eq!(n.display_names(), vec!["BDC"]);
    }

    #[test]
    fn test_empty_bracket() {
        let b = Bracket::empty(6, 1);
        assert!(b.is_empty());
        assert!(b.champion().is_none());
    }

    #[test]
    fn test_inputs_of() {
        let b = Bracket {
            season: 5,
            division: 3,
            template: None,
            nodes: vec![node("sf-1", None), node("sf-2", None), node("final", None)],
            edges: vec![
                BracketEdge::between("sf-1", "final"),
                BracketEdge::between("sf-2", "final"),
            ],
        };

        assert_eq!(b.inputs_of("final"), vec!["sf-1", "sf-2"]);
        assert!(b.inputs_of("sf-1").is_empty());
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&Stage::Finals).unwrap(), "\"finals\"");
        assert_eq!(serde_json::to_string(&NodeKind::Seed).unwrap(), "\"seed\"");
    }
}
