//! Round-robin league schedule construction.
//!
//! The schedule is built by greedy per-week pairing in roster order with a
//! repeat-history check, not by the circle method: for some rosters and
//! orderings the greedy pass cannot fill every week, which is accepted
//! behavior. See [`create_schedule`].

use std::collections::HashSet;

use crate::{BracketPosition, Error, Match, MatchId, Matches, Participant, ParticipantId, Result};

/// Builds a league schedule where every unordered pair of participants
/// meets at most once, grouped into `n - 1` weeks.
///
/// Pairing is greedy per week in roster order: the first unpaired
/// participant is matched with the first unpaired opponent it has not met
/// in an earlier week. There is no backtracking, so a week may stay
/// partially filled. For odd rosters one participant per week is left
/// without a match; no BYE is synthesized.
///
/// All matches carry `position = Left`, `round` set to the week number and
/// no forward reference.
///
/// # Errors
///
/// Returns [`Error::InvalidRoster`] if fewer than 2 participants are given.
pub fn create_schedule<I>(participants: I) -> Result<Matches>
where
    I: IntoIterator<Item = Participant>,
{
    let roster: Vec<Participant> = participants.into_iter().collect();

    if roster.len() < 2 {
        return Err(Error::InvalidRoster {
            found: roster.len(),
            min: 2,
        });
    }

    log::debug!(
        "Creating new league schedule with {} participants",
        roster.len()
    );

    let weeks = roster.len() as u32 - 1;
    let mut matches: Vec<Match> = Vec::new();

    for week in 1..=weeks {
        let mut used: HashSet<&ParticipantId> = HashSet::new();

        for (index, first) in roster.iter().enumerate() {
            if used.contains(&first.id) {
                continue;
            }

            for second in &roster[index + 1..] {
                if used.contains(&second.id) {
                    continue;
                }

                // The unordered pair must not be scheduled in any earlier
                // week.
                let played = matches
                    .iter()
                    .any(|m| m.round < week && is_pairing(m, &first.id, &second.id));
                if played {
                    continue;
                }

                matches.push(Match {
                    id: MatchId::from(format!("m{}", matches.len() + 1)),
                    participants: [Some(first.clone()), Some(second.clone())],
                    winner: None,
                    next_match: None,
                    round: week,
                    position: BracketPosition::Left,
                    scores: None,
                });

                used.insert(&first.id);
                used.insert(&second.id);
                break;
            }
        }
    }

    log::debug!(
        "Created league schedule with {} matches over {} weeks",
        matches.len(),
        weeks
    );

    Ok(matches.into())
}

fn is_pairing(r#match: &Match, a: &ParticipantId, b: &ParticipantId) -> bool {
    let first = r#match.participant(0).map(|p| &p.id);
    let second = r#match.participant(1).map(|p| &p.id);

    (first == Some(a) && second == Some(b)) || (first == Some(b) && second == Some(a))
}

/// Returns the number of weeks in the schedule.
pub fn total_weeks(matches: &Matches) -> u32 {
    matches.iter().map(|m| m.round).max().unwrap_or(0)
}

/// Returns the matches scheduled for `week`, in creation order.
pub fn matches_for_week(matches: &Matches, week: u32) -> impl Iterator<Item = &Match> {
    matches.iter().filter(move |m| m.round == week)
}
