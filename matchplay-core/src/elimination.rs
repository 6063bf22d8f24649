//! Single elimination bracket construction and winner advancement.
//!
//! [`create_bracket`] turns a roster into a fully linked bracket: the
//! padded roster is split into a left and a right half, each half plays
//! down to its own semifinal, and the two halves only ever meet in the
//! final. [`decide_match`] and [`record_score`] record results and advance
//! the winner into the correct slot of the downstream match.

use std::cmp::Ordering;

use crate::{BracketPosition, Error, Match, MatchId, Matches, Participant, Result};

/// Builds a fully linked elimination bracket from `participants`.
///
/// The roster is padded to a power of two with synthetic BYE entrants,
/// split into halves and paired sequentially into the first round in
/// roster order. Matches against a BYE are not auto-resolved; they are
/// decided through the same paths as any other match.
///
/// # Errors
///
/// Returns [`Error::InvalidRoster`] if `participants` is empty.
pub fn create_bracket<I>(participants: I) -> Result<Matches>
where
    I: IntoIterator<Item = Participant>,
{
    let mut roster: Vec<Participant> = participants.into_iter().collect();

    if roster.is_empty() {
        return Err(Error::InvalidRoster { found: 0, min: 1 });
    }

    log::debug!(
        "Creating new elimination bracket with {} participants",
        roster.len()
    );

    // A single participant still plays a final against a BYE, so the
    // padded size is at least 2.
    let padded = roster.len().next_power_of_two().max(2);
    let rounds = padded.trailing_zeros();

    for slot in 0..padded - roster.len() {
        roster.push(Participant::bye(slot));
    }

    let half = padded / 2;
    let (left, right) = roster.split_at(half);

    // Skeleton in round-major order: the left matches of a round, then the
    // right matches, the final last. Ids are "m1", "m2", ... in that order.
    let mut matches: Vec<Match> = Vec::with_capacity(padded - 1);

    for round in 1..=rounds {
        if round == rounds {
            matches.push(skeleton(matches.len() + 1, round, BracketPosition::Final));
        } else {
            let in_round = 1usize << (rounds - round);

            for _ in 0..in_round / 2 {
                matches.push(skeleton(matches.len() + 1, round, BracketPosition::Left));
            }
            for _ in 0..in_round / 2 {
                matches.push(skeleton(matches.len() + 1, round, BracketPosition::Right));
            }
        }
    }

    link_forward(&mut matches, rounds);
    seed_first_round(&mut matches, rounds, left, right);

    log::debug!(
        "Created new elimination bracket with {} matches over {} rounds",
        matches.len(),
        rounds
    );

    Ok(matches.into())
}

fn skeleton(id: usize, round: u32, position: BracketPosition) -> Match {
    Match {
        id: MatchId::from(format!("m{}", id)),
        participants: [None, None],
        winner: None,
        next_match: None,
        round,
        position,
        scores: Some([0, 0]),
    }
}

/// Links every non-final match forward: consecutive matches of a round
/// pair into the next round on the same side, and the semifinal of each
/// side feeds the final.
fn link_forward(matches: &mut [Match], rounds: u32) {
    let final_id = matches
        .iter()
        .find(|m| m.position == BracketPosition::Final)
        .map(|m| m.id.clone());

    for round in 1..rounds {
        for position in [BracketPosition::Left, BracketPosition::Right] {
            let targets: Vec<MatchId> = matches
                .iter()
                .filter(|m| m.round == round + 1 && m.position == position)
                .map(|m| m.id.clone())
                .collect();

            let feeders: Vec<usize> = matches
                .iter()
                .enumerate()
                .filter(|(_, m)| m.round == round && m.position == position)
                .map(|(index, _)| index)
                .collect();

            for (rank, &feeder) in feeders.iter().enumerate() {
                if let Some(target) = targets.get(rank / 2) {
                    matches[feeder].next_match = Some(target.clone());
                }
            }

            // The last match on each side of the semifinal round links to
            // the final.
            if round + 1 == rounds {
                if let (Some(final_id), Some(&last)) = (final_id.as_ref(), feeders.last()) {
                    matches[last].next_match = Some(final_id.clone());
                }
            }
        }
    }
}

/// Seeds the first round: slots `2k` and `2k + 1` of each half fill the
/// `k`-th first round match on that side, preserving roster order.
fn seed_first_round(matches: &mut [Match], rounds: u32, left: &[Participant], right: &[Participant]) {
    if rounds == 1 {
        // A two entrant draw has no preliminary rounds: both halves go
        // straight into the final.
        matches[0].participants = [left.first().cloned(), right.first().cloned()];
        return;
    }

    for (side, position) in [(left, BracketPosition::Left), (right, BracketPosition::Right)] {
        let first_round: Vec<usize> = matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.round == 1 && m.position == position)
            .map(|(index, _)| index)
            .collect();

        for (k, pair) in side.chunks(2).enumerate() {
            if let Some(&index) = first_round.get(k) {
                matches[index].participants[0] = pair.first().cloned();
                matches[index].participants[1] = pair.get(1).cloned();
            }
        }
    }
}

/// Records `winner` on the match `id` and advances it downstream.
///
/// The input collection is left untouched and an updated copy is returned.
/// The winner is taken at face value; it is not checked against the slots
/// of the match.
///
/// # Errors
///
/// Returns [`Error::MatchNotFound`] if `id` is not in `matches`.
pub fn decide_match(matches: &Matches, id: &MatchId, winner: Participant) -> Result<Matches> {
    let mut updated = matches.clone();

    match updated.get_mut(id) {
        Some(r#match) => r#match.winner = Some(winner),
        None => return Err(Error::MatchNotFound(id.clone())),
    }

    advance(&mut updated, id);

    Ok(updated)
}

/// Records a score pair on the match `id`, deriving the winner from the
/// scores: the higher scoring slot wins, level scores derive no winner and
/// advance nothing. A tie leaves a previously recorded winner in place.
///
/// Score entry requires both slots to be filled; otherwise the collection
/// is returned unchanged.
///
/// # Errors
///
/// Returns [`Error::MatchNotFound`] if `id` is not in `matches`.
pub fn record_score(matches: &Matches, id: &MatchId, score1: u32, score2: u32) -> Result<Matches> {
    let r#match = match matches.get(id) {
        Some(r#match) => r#match,
        None => return Err(Error::MatchNotFound(id.clone())),
    };

    if r#match.participant(0).is_none() || r#match.participant(1).is_none() {
        return Ok(matches.clone());
    }

    let winner = match score1.cmp(&score2) {
        Ordering::Greater => r#match.participant(0).cloned(),
        Ordering::Less => r#match.participant(1).cloned(),
        Ordering::Equal => None,
    };

    let mut updated = matches.clone();

    if let Some(r#match) = updated.get_mut(id) {
        r#match.scores = Some([score1, score2]);

        if winner.is_some() {
            r#match.winner = winner.clone();
        }
    }

    if winner.is_some() {
        advance(&mut updated, id);
    }

    Ok(updated)
}

/// Advances the winner of the decided match into the correct slot of its
/// downstream match. Exactly one slot of one match is written, or none at
/// all if the forward reference is missing or dangling.
fn advance(matches: &mut Matches, id: &MatchId) {
    let (winner, next_id, round, position) = match matches.get(id) {
        Some(r#match) => match (&r#match.winner, &r#match.next_match) {
            (Some(winner), Some(next_id)) => {
                (winner.clone(), next_id.clone(), r#match.round, r#match.position)
            }
            _ => return,
        },
        None => return,
    };

    let target_position = match matches.get(&next_id) {
        Some(target) => target.position,
        // Dangling reference: the winner stays recorded but does not
        // advance.
        None => return,
    };

    let slot = if target_position == BracketPosition::Final {
        // The final takes the left half's winner in slot 0 and the right
        // half's winner in slot 1.
        match position {
            BracketPosition::Left => 0,
            BracketPosition::Right => 1,
            BracketPosition::Final => return,
        }
    } else {
        // Feeders of the same round and side, ranked by lexical id order.
        // The rank is independent of the order in which results arrive.
        let mut feeders: Vec<&MatchId> = matches
            .iter()
            .filter(|m| {
                m.next_match.as_ref() == Some(&next_id)
                    && m.round == round
                    && m.position == position
            })
            .map(|m| &m.id)
            .collect();
        feeders.sort();

        match feeders.iter().position(|feeder| *feeder == id) {
            Some(rank) if rank < 2 => rank,
            _ => return,
        }
    };

    log::debug!("Advancing winner of {} into slot {} of {}", id, slot, next_id);

    if let Some(target) = matches.get_mut(&next_id) {
        target.participants[slot] = Some(winner);
    }
}

/// Returns the display name of `round` in a bracket of `total_rounds`
/// rounds.
pub fn round_name(round: u32, total_rounds: u32) -> String {
    if round == total_rounds {
        String::from("Final")
    } else if round + 1 == total_rounds {
        String::from("Semi Final")
    } else if round + 2 == total_rounds {
        String::from("Quarter Final")
    } else {
        format!("Round {}", round)
    }
}
