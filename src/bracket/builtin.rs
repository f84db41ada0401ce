//! The league's historical playoff brackets.
//!
//! Each function draws one bracket on a column/row grid. Seeds refer to the
//! 1-based position in the division's ranked list.

use super::template::{BracketTemplate, EdgeTemplate, SlotSource, SlotTemplate, TemplateRegistry};
use crate::models::{Position, Stage};

/// Column/row layout used to place slots.
struct Grid {
    x: f64,
    dx: f64,
    y: f64,
    dy: f64,
}

impl Grid {
    const fn new(x: f64, dx: f64, y: f64, dy: f64) -> Self {
        Self { x, dx, y, dy }
    }

    fn at(&self, col: f64, row: f64) -> Position {
        Position::new(self.x + self.dx * col, self.y + self.dy * row)
    }
}

/// Season 4 layout.
const S4: Grid = Grid::new(50.0, 250.0, 100.0, 100.0);

fn seed(n: usize) -> SlotSource {
    SlotSource::seed(n)
}

fn edges(pairs: &[(&str, &str)]) -> Vec<EdgeTemplate> {
    pairs
        .iter()
        .map(|(source, target)| EdgeTemplate::new(source, target))
        .collect()
}

pub(super) fn register(registry: &mut TemplateRegistry) {
    let templates = [
        season4_division1(),
        season4_division2(),
        season4_division3(),
        season5_division1(),
        season5_division2(),
        season5_division3(),
    ];
    for template in templates {
        // Shapes are fixed; a failure here is a programming error caught by tests.
        if let Err(e) = registry.insert(template) {
            tracing::error!("Built-in bracket template rejected: {}", e);
        }
    }

    registry.set_season_default(4, 2);
    registry.set_season_default(5, 2);
}

/// Five teams: 4th and 5th play in, 2nd and 3rd meet in the upper semi.
fn season4_division1() -> BracketTemplate {
    let g = &S4;
    BracketTemplate {
        season: 4,
        division: 1,
        name: "season-4-division-1".to_string(),
        team_count: 5,
        slots: vec![
            SlotTemplate::seed("seed-4", 4, g.at(0.0, 3.0)),
            SlotTemplate::seed("seed-5", 5, g.at(0.0, 4.0)),
            SlotTemplate::match_slot("qf-1", "4th Seed Won", Stage::Quarterfinal, g.at(1.0, 3.5))
                .with_team1(seed(4)),
            SlotTemplate::seed("seed-3", 3, g.at(0.0, 0.0)),
            SlotTemplate::seed("seed-2", 2, g.at(0.0, 1.0)),
            SlotTemplate::seed("seed-1", 1, g.at(1.0, 2.0)),
            SlotTemplate::match_slot("sf-1", "3rd Seed Won", Stage::Semifinal, g.at(1.0, 0.5))
                .between(seed(2), seed(3))
                .with_winner(seed(3)),
            SlotTemplate::match_slot(
                "sf-2",
                "1st Seed vs 4th Seed",
                Stage::Semifinal,
                g.at(2.0, 3.0),
            )
            .between(seed(1), seed(4))
            .with_winner(seed(1)),
            SlotTemplate::match_slot("final", "3rd Seed vs 1st Seed", Stage::Finals, g.at(3.0, 2.0))
                .between(seed(3), seed(1)),
            SlotTemplate::champion(seed(1), g.at(4.0, 2.0)),
        ],
        edges: edges(&[
            ("seed-4", "qf-1"),
            ("seed-5", "qf-1"),
            ("seed-3", "sf-1"),
            ("seed-2", "sf-1"),
            ("seed-1", "sf-2"),
            ("qf-1", "sf-2"),
            ("sf-1", "final"),
            ("sf-2", "final"),
            ("final", "champion"),
        ]),
    }
}

/// Six teams: 3v6 and 4v5 play in, top two seeds wait in the semis.
fn season4_division2() -> BracketTemplate {
    let g = &S4;
    BracketTemplate {
        season: 4,
        division: 2,
        name: "season-4-division-2".to_string(),
        team_count: 6,
        slots: vec![
            SlotTemplate::seed("seed-3", 3, g.at(0.0, 0.0)),
            SlotTemplate::seed("seed-6", 6, g.at(0.0, 1.0)),
            SlotTemplate::match_slot("qf-1", "3rd Seed Won", Stage::Quarterfinal, g.at(1.0, 0.5))
                .with_team1(seed(3)),
            SlotTemplate::seed("seed-4", 4, g.at(0.0, 3.0)),
            SlotTemplate::seed("seed-5", 5, g.at(0.0, 4.0)),
            SlotTemplate::match_slot("qf-2", "4th Seed Won", Stage::Quarterfinal, g.at(1.0, 3.5))
                .with_team1(seed(4)),
            SlotTemplate::seed("seed-2", 2, g.at(1.0, 1.5)),
            SlotTemplate::seed("seed-1", 1, g.at(1.0, 2.5)),
            SlotTemplate::match_slot(
                "sf-1",
                "2nd Seed vs 3rd Seed",
                Stage::Semifinal,
                g.at(2.0, 1.0),
            )
            .between(seed(2), seed(3))
            .with_winner(seed(2)),
            SlotTemplate::match_slot(
                "sf-2",
                "1st Seed vs 4th Seed",
                Stage::Semifinal,
                g.at(2.0, 3.0),
            )
            .between(seed(1), seed(4))
            .with_winner(seed(1)),
            SlotTemplate::match_slot("final", "2nd Seed vs 1st Seed", Stage::Finals, g.at(3.0, 2.0))
                .between(seed(2), seed(1)),
            SlotTemplate::champion(seed(2), g.at(4.0, 2.0)),
        ],
        edges: edges(&[
            ("seed-3", "qf-1"),
            ("seed-6", "qf-1"),
            ("seed-4", "qf-2"),
            ("seed-5", "qf-2"),
            ("seed-2", "sf-1"),
            ("qf-1", "sf-1"),
            ("seed-1", "sf-2"),
            ("qf-2", "sf-2"),
            ("sf-1", "final"),
            ("sf-2", "final"),
            ("final", "champion"),
        ]),
    }
}

/// Four teams, straight semis.
fn season4_division3() -> BracketTemplate {
    let g = &S4;
    BracketTemplate {
        season: 4,
        division: 3,
        name: "season-4-division-3".to_string(),
        team_count: 4,
        slots: vec![
            SlotTemplate::seed("seed-1", 1, g.at(0.0, 0.0)),
            SlotTemplate::seed("seed-4", 4, g.at(0.0, 1.0)),
            SlotTemplate::seed("seed-2", 2, g.at(0.0, 3.0)),
            SlotTemplate::seed("seed-3", 3, g.at(0.0, 4.0)),
            SlotTemplate::match_slot("sf-1", "1st Seed Won", Stage::Semifinal, g.at(1.0, 0.5))
                .between(seed(1), seed(4))
                .with_winner(seed(1)),
            SlotTemplate::match_slot("sf-2", "3rd Seed Won", Stage::Semifinal, g.at(1.0, 3.5))
                .between(seed(2), seed(3))
                .with_winner(seed(3)),
            SlotTemplate::match_slot("final", "1st Seed vs 3rd Seed", Stage::Finals, g.at(2.0, 2.0))
                .between(seed(1), seed(3)),
            SlotTemplate::champion(seed(1), g.at(3.0, 2.0)),
        ],
        edges: edges(&[
            ("seed-1", "sf-1"),
            ("seed-4", "sf-1"),
            ("seed-2", "sf-2"),
            ("seed-3", "sf-2"),
            ("sf-1", "final"),
            ("sf-2", "final"),
            ("final", "champion"),
        ]),
    }
}

/// Five teams, stepladder: 4v5, winner meets 1st; 2nd meets 3rd.
fn season5_division1() -> BracketTemplate {
    let g = Grid::new(50.0, 220.0, 100.0, 120.0);
    BracketTemplate {
        season: 5,
        division: 1,
        name: "season-5-division-1".to_string(),
        team_count: 5,
        slots: vec![
            SlotTemplate::match_slot(
                "qf",
                "Quarterfinal (4th vs 5th)",
                Stage::Quarterfinal,
                g.at(0.0, 1.0),
            )
            .between(seed(4), seed(5)),
            SlotTemplate::match_slot(
                "sf1",
                "Semifinal 1 (1st vs QF1)",
                Stage::Semifinal,
                g.at(1.0, 1.0),
            )
            .between(seed(1), seed(4)),
            SlotTemplate::match_slot(
                "sf2",
                "Semifinal 2 (2nd vs 3rd)",
                Stage::Semifinal,
                g.at(1.0, 0.0),
            )
            .between(seed(2), seed(3)),
            SlotTemplate::match_slot("final", "Final", Stage::Finals, g.at(2.0, 0.5))
                .between(seed(2), seed(1)),
            SlotTemplate::champion(seed(1), g.at(3.0, 0.5)),
        ],
        edges: edges(&[
            ("qf", "sf1"),
            ("sf1", "final"),
            ("sf2", "final"),
            ("final", "champion"),
        ]),
    }
}

/// Eight teams, drawn by name rather than seed.
fn season5_division2() -> BracketTemplate {
    let g = Grid::new(50.0, 200.0, 100.0, 80.0);
    let named = SlotSource::literal;
    BracketTemplate {
        season: 5,
        division: 2,
        name: "season-5-division-2".to_string(),
        team_count: 8,
        slots: vec![
            SlotTemplate::match_slot("qf-1", "Quarterfinal 1", Stage::Quarterfinal, g.at(0.0, 0.0))
                .between(named("BDC"), named("Lughs Last Hitters")),
            SlotTemplate::match_slot("qf-2", "Quarterfinal 2", Stage::Quarterfinal, g.at(0.0, 1.0))
                .between(named("Fear the Samurai"), named("Cavan Champions")),
            SlotTemplate::match_slot("qf-3", "Quarterfinal 3", Stage::Quarterfinal, g.at(0.0, 2.0))
                .between(named("Creep Enjoyers"), named("Ausgang")),
            SlotTemplate::match_slot("qf-4", "Quarterfinal 4", Stage::Quarterfinal, g.at(0.0, 3.0))
                .between(named("Mike's Army"), named("Cavan Chumpions")),
            SlotTemplate::match_slot("sf-1", "Semifinal 1", Stage::Semifinal, g.at(1.0, 0.5))
                .between(named("BDC"), named("Cavan Champions")),
            SlotTemplate::match_slot("sf-2", "Semifinal 2", Stage::Semifinal, g.at(1.0, 2.5))
                .between(named("Creep Enjoyers"), named("Cavan Chumpions")),
            SlotTemplate::match_slot("final", "Final", Stage::Finals, g.at(2.0, 1.5))
                .between(named("BDC"), named("Creep Enjoyers")),
            SlotTemplate::champion(named("Creep Enjoyers"), g.at(3.0, 1.5)),
        ],
        edges: edges(&[
            ("qf-1", "sf-1"),
            ("qf-2", "sf-1"),
            ("qf-3", "sf-2"),
            ("qf-4", "sf-2"),
            ("sf-1", "final"),
            ("sf-2", "final"),
            ("final", "champion"),
        ]),
    }
}

/// Four teams, 1v4 and 2v3.
fn season5_division3() -> BracketTemplate {
    let g = Grid::new(50.0, 250.0, 100.0, 120.0);
    BracketTemplate {
        season: 5,
        division: 3,
        name: "season-5-division-3".to_string(),
        team_count: 4,
        slots: vec![
            SlotTemplate::match_slot(
                "sf-1",
                "Semifinal 1 (1st vs 4th)",
                Stage::Semifinal,
                g.at(0.0, 0.0),
            )
            .between(seed(1), seed(4)),
            SlotTemplate::match_slot(
                "sf-2",
                "Semifinal 2 (2nd vs 3rd)",
                Stage::Semifinal,
                g.at(0.0, 1.0),
            )
            .between(seed(2), seed(3)),
            SlotTemplate::match_slot("final", "Final", Stage::Finals, g.at(1.0, 0.5))
                .between(seed(1), seed(3)),
            SlotTemplate::champion(seed(1), g.at(2.0, 0.5)),
        ],
        edges: edges(&[
            ("sf-1", "final"),
            ("sf-2", "final"),
            ("final", "champion"),
        ]),
    }
}
