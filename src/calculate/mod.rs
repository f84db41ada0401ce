//! Standings calculation engine.
//!
//! Derives group-stage tables from stored match data:
//! - Win/draw/loss tallies and points (win 3, draw 1, loss 0)
//! - A total ranking order (points, wins, draws, then fewest losses)
//! - Week-by-week schedule views
//!
//! Every function here is pure; tables are rebuilt from the full match list
//! on each call.

mod schedule;

pub use schedule::*;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use crate::models::{Match, ParticipantRules, Record, Standing, Team, TeamId, TeamNames};

/// Builds standings tables for one division at a time.
#[derive(Debug, Clone, Default)]
pub struct StandingsCalculator {
    rules: ParticipantRules,
}

impl StandingsCalculator {
    pub fn new(rules: ParticipantRules) -> Self {
        Self { rules }
    }

    /// Compute the ranked table for the given matches.
    ///
    /// The match list is processed as given; `division_id` only tags the
    /// output rows. Matches with an unknown side (placeholders, the bye id)
    /// are ignored.
    pub fn compute(&self, matches: &[Match], names: &TeamNames, division_id: u32) -> Vec<Standing> {
        // First appearance order, so identical records always come out the
        // same way round.
        let mut order: Vec<TeamId> = Vec::new();
        let mut table: HashMap<TeamId, Standing> = HashMap::new();

        for m in matches {
            if m.is_bye_week || self.rules.is_bye(&m.team1_id) || self.rules.is_bye(&m.team2_id) {
                continue;
            }
            for id in [&m.team1_id, &m.team2_id] {
                if !self.rules.is_participant(id) || table.contains_key(id) {
                    continue;
                }
                table.insert(
                    id.clone(),
                    Standing::new(id.clone(), names.display_name(id), division_id),
                );
                order.push(id.clone());
            }
        }

        let mut counted = 0usize;
        for m in matches.iter().filter(|m| m.counts_for_standings()) {
            let Some(outcome) = m.team1_outcome() else {
                continue;
            };
            if !table.contains_key(&m.team1_id) || !table.contains_key(&m.team2_id) {
                trace!("Skipping match {} with a non-participant side", m.id);
                continue;
            }
            // A team listed on both sides would otherwise be credited a win
            // and a loss from one result.
            if m.team1_id == m.team2_id {
                debug!("Skipping match {}: {} listed on both sides", m.id, m.team1_id);
                continue;
            }

            if let Some(row) = table.get_mut(&m.team1_id) {
                row.record(outcome);
            }
            if let Some(row) = table.get_mut(&m.team2_id) {
                row.record(outcome.reversed());
            }
            counted += 1;
        }

        let mut standings: Vec<Standing> =
            order.iter().filter_map(|id| table.remove(id)).collect();
        sort_standings(&mut standings);

        debug!(
            "Division {}: {} teams from {} matches ({} counted)",
            division_id,
            standings.len(),
            matches.len(),
            counted
        );
        standings
    }

    /// Compute tables for every division in a season's match map.
    pub fn compute_all(
        &self,
        division_matches: &BTreeMap<u32, Vec<Match>>,
        names: &TeamNames,
    ) -> BTreeMap<u32, Vec<Standing>> {
        division_matches
            .iter()
            .map(|(&division, matches)| (division, self.compute(matches, names, division)))
            .collect()
    }
}

/// Ranked table for one division using the default bye/placeholder rules.
pub fn compute_standings(matches: &[Match], names: &TeamNames, division_id: u32) -> Vec<Standing> {
    StandingsCalculator::default().compute(matches, names, division_id)
}

/// Ranked tables for every division using the default rules.
pub fn compute_all_division_standings(
    division_matches: &BTreeMap<u32, Vec<Match>>,
    names: &TeamNames,
) -> BTreeMap<u32, Vec<Standing>> {
    StandingsCalculator::default().compute_all(division_matches, names)
}

/// Ranking comparator shared by standings and stored team records.
pub fn compare_records(a: &Record, b: &Record) -> Ordering {
    a.rank_cmp(b)
}

pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    compare_records(&a.team.record, &b.team.record)
}

/// Stable sort into ranking order.
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(compare_standings);
}

/// Rank stored team records of one division with the standings comparator.
pub fn rank_teams(teams: &[Team], division_id: u32) -> Vec<Team> {
    let mut ranked: Vec<Team> = teams
        .iter()
        .filter(|t| t.division_id == division_id)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| compare_records(&a.record, &b.record));
    ranked
}
