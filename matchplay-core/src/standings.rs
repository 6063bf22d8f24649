//! League standings, recomputed from recorded scores on demand.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{MatchId, Matches, Participant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single row of a league table.
///
/// Standings are derived data: they are recomputed from scratch on every
/// query and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeagueStanding {
    pub participant: Participant,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
}

/// Computes the sorted league table for `participants` over every match
/// that has an entry in the `scores` sheet.
///
/// A win is worth 3 points, a draw 1. Sorting is by points, then goal
/// difference, then goals scored, all descending; remaining ties keep
/// roster order.
pub fn compute_standings(
    participants: &[Participant],
    matches: &Matches,
    scores: &HashMap<MatchId, [u32; 2]>,
) -> Vec<LeagueStanding> {
    let mut table: Vec<LeagueStanding> = participants
        .iter()
        .map(|participant| standing(participant, matches, scores))
        .collect();

    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
    });

    table
}

fn standing(
    participant: &Participant,
    matches: &Matches,
    scores: &HashMap<MatchId, [u32; 2]>,
) -> LeagueStanding {
    let mut played = 0;
    let mut won = 0;
    let mut drawn = 0;
    let mut lost = 0;
    let mut goals_for = 0;
    let mut goals_against = 0;

    for r#match in matches {
        let slot = if r#match.participant(0).map(|p| &p.id) == Some(&participant.id) {
            0
        } else if r#match.participant(1).map(|p| &p.id) == Some(&participant.id) {
            1
        } else {
            continue;
        };

        // Matches without a recorded score do not count as played.
        let (scored, conceded) = match scores.get(&r#match.id) {
            Some(&[score1, score2]) if slot == 0 => (score1, score2),
            Some(&[score1, score2]) => (score2, score1),
            None => continue,
        };

        played += 1;
        goals_for += scored;
        goals_against += conceded;

        match scored.cmp(&conceded) {
            Ordering::Greater => won += 1,
            Ordering::Equal => drawn += 1,
            Ordering::Less => lost += 1,
        }
    }

    LeagueStanding {
        participant: participant.clone(),
        played,
        won,
        drawn,
        lost,
        points: won * 3 + drawn,
        goals_for,
        goals_against,
        goal_difference: i64::from(goals_for) - i64::from(goals_against),
    }
}
