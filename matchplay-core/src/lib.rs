//! # matchplay-core
//!
//! This crate contains all the items required to build and run tournament
//! match graphs. Two constructions are built in: a single elimination
//! bracket ([`elimination`]) and a round-robin league schedule
//! ([`round_robin`]), with league tables computed by [`standings`].
//!
//! Important types:
//! - [`Participant`]: An entrant in a tournament.
//! - [`Match`]: A *match* or *heat* of two parties.
//! - [`Matches`]: An id-addressable collection of matches. Forward
//!   references between matches are [`MatchId`] lookup keys, never
//!   pointers.
//! - [`BracketPosition`]: The half of the draw a match belongs to, or the
//!   final uniting both halves.
//! - [`LeagueStanding`]: A row of a computed league table.
//!
//! Every operation takes a complete [`Matches`] snapshot and returns a new
//! one; nothing is mutated in place across the API boundary.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all types.
//!
pub mod elimination;
pub mod round_robin;
pub mod standings;

mod id;

pub use id::{MatchId, ParticipantId};
pub use standings::LeagueStanding;

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::result;
use std::slice;
use std::vec::IntoIter;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("match not found: {0}")]
    MatchNotFound(MatchId),
    #[error("invalid roster size: {found}, at least {min} participants are required")]
    InvalidRoster { found: usize, min: usize },
}

/// An entrant in a tournament.
///
/// Participants are created when the roster is assembled and never mutated
/// afterwards; matches hold their own copies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Input rank, used only for initial slot ordering.
    pub seed: Option<u32>,
}

impl Participant {
    pub fn new<I, N>(id: I, name: N, seed: Option<u32>) -> Self
    where
        I: Into<ParticipantId>,
        N: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            seed,
        }
    }

    /// Creates the synthetic BYE participant for the padding slot `slot`.
    pub(crate) fn bye(slot: usize) -> Self {
        Self {
            id: ParticipantId::from(format!("bye-{}", slot)),
            name: String::from("BYE"),
            seed: None,
        }
    }

    /// Returns `true` if this is a synthetic BYE created to pad a bracket.
    pub fn is_bye(&self) -> bool {
        self.id.as_str().starts_with("bye-")
    }
}

/// Which half of a single elimination draw a match belongs to, or `Final`
/// for the last match uniting both halves. League matches all carry `Left`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum BracketPosition {
    Left,
    Right,
    Final,
}

impl Display for BracketPosition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Left => "left",
                Self::Right => "right",
                Self::Final => "final",
            }
        )
    }
}

/// A match of two parties within a tournament.
///
/// The structural fields `id`, `round`, `position` and `next_match` are
/// fixed when the match graph is built. The slots, the winner and the
/// scores are only written by the engine, or by the builder when seeding
/// the first round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub id: MatchId,
    /// Slot 0 and slot 1 of the match. Feeder rank 0 advances into slot 0.
    pub participants: [Option<Participant>; 2],
    pub winner: Option<Participant>,
    /// Forward reference to the match the winner advances into.
    pub next_match: Option<MatchId>,
    /// 1-based round increasing toward the final, or the week number of a
    /// league schedule.
    pub round: u32,
    pub position: BracketPosition,
    /// Recorded scores for slot 0 and slot 1.
    pub scores: Option<[u32; 2]>,
}

impl Match {
    /// Returns the entrant in `slot`, if the slot is filled.
    #[inline]
    pub fn participant(&self, slot: usize) -> Option<&Participant> {
        self.participants.get(slot).and_then(Option::as_ref)
    }

    /// Returns `true` if a winner has been recorded.
    #[inline]
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}

/// An id-addressable collection of [`Match`]es in creation order.
///
/// `Matches` keeps an index from [`MatchId`] to position so that forward
/// references resolve by lookup. Ids are fixed at insertion; the mutable
/// accessors only hand out matches whose id must not be changed.
#[derive(Clone, Debug, Default)]
pub struct Matches {
    matches: Vec<Match>,
    index: HashMap<MatchId, usize>,
}

impl Matches {
    /// Creates a new empty `Matches` collection.
    #[inline]
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates a new empty `Matches` collection with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matches: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Appends a match, indexing it by id.
    pub fn push(&mut self, r#match: Match) {
        let prev = self.index.insert(r#match.id.clone(), self.matches.len());
        debug_assert!(prev.is_none(), "duplicate match id {}", r#match.id);
        self.matches.push(r#match);
    }

    /// Returns a reference to the match with the given `id`.
    #[inline]
    pub fn get(&self, id: &MatchId) -> Option<&Match> {
        self.index.get(id).map(|&index| &self.matches[index])
    }

    /// Returns a mutable reference to the match with the given `id`.
    #[inline]
    pub fn get_mut(&mut self, id: &MatchId) -> Option<&mut Match> {
        self.index.get(id).map(|&index| &mut self.matches[index])
    }

    /// Returns `true` if a match with the given `id` exists.
    #[inline]
    pub fn contains(&self, id: &MatchId) -> bool {
        self.index.contains_key(id)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }
}

impl Deref for Matches {
    type Target = [Match];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.matches
    }
}

impl From<Vec<Match>> for Matches {
    fn from(matches: Vec<Match>) -> Self {
        let index = matches
            .iter()
            .enumerate()
            .map(|(index, r#match)| (r#match.id.clone(), index))
            .collect();

        Self { matches, index }
    }
}

impl FromIterator<Match> for Matches {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Match>,
    {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for Matches {
    type Item = Match;
    type IntoIter = IntoIter<Match>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a Match;
    type IntoIter = slice::Iter<'a, Match>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

impl PartialEq for Matches {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.matches == other.matches
    }
}

impl Eq for Matches {}

impl<U> PartialEq<U> for Matches
where
    U: AsRef<[Match]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.matches == other.as_ref()
    }
}

#[cfg(feature = "serde")]
impl Serialize for Matches {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.matches.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Matches {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let matches = Vec::<Match>::deserialize(deserializer)?;
        Ok(Self::from(matches))
    }
}

#[cfg(test)]
mod tests {
    use super::{BracketPosition, Match, MatchId, Matches, Participant, ParticipantId};

    /// Creates a roster of `n` participants with ids `p1..=pn`.
    #[macro_export]
    macro_rules! roster {
        ($n:expr) => {
            (1u32..=$n).map(|i| {
                $crate::Participant::new(
                    format!("p{}", i),
                    format!("Participant {}", i),
                    Some(i),
                )
            })
        };
    }

    fn sample(id: &str, round: u32) -> Match {
        Match {
            id: MatchId::from(id),
            participants: [None, None],
            winner: None,
            next_match: None,
            round,
            position: BracketPosition::Left,
            scores: None,
        }
    }

    #[test]
    fn test_matches_push_and_lookup() {
        let mut matches = Matches::new();
        matches.push(sample("m1", 1));
        matches.push(sample("m2", 1));
        matches.push(sample("m3", 2));

        assert_eq!(matches.len(), 3);
        assert!(matches.contains(&MatchId::from("m2")));
        assert!(!matches.contains(&MatchId::from("m4")));

        assert_eq!(matches.get(&MatchId::from("m3")).unwrap().round, 2);
        assert!(matches.get(&MatchId::from("m4")).is_none());

        // Creation order is preserved.
        assert_eq!(matches[0].id, "m1");
        assert_eq!(matches[2].id, "m3");

        let winner = Participant::new("p1", "Participant 1", Some(1));
        matches.get_mut(&MatchId::from("m1")).unwrap().winner = Some(winner.clone());
        assert_eq!(matches.get(&MatchId::from("m1")).unwrap().winner, Some(winner));
    }

    #[test]
    fn test_matches_from_vec() {
        let matches = Matches::from(vec![sample("m1", 1), sample("m2", 1)]);

        assert_eq!(matches, vec![sample("m1", 1), sample("m2", 1)]);
        assert_eq!(matches.get(&MatchId::from("m2")), Some(&sample("m2", 1)));

        let collected: Matches = vec![sample("m1", 1), sample("m2", 1)].into_iter().collect();
        assert_eq!(collected, matches);
    }

    #[test]
    fn test_participant_bye() {
        let bye = Participant::bye(3);
        assert_eq!(bye.id, ParticipantId::from("bye-3"));
        assert_eq!(bye.name, "BYE");
        assert_eq!(bye.seed, None);
        assert!(bye.is_bye());

        assert!(!Participant::new("p1", "Participant 1", Some(1)).is_bye());
    }

    #[test]
    fn test_roster_macro() {
        let roster: Vec<Participant> = roster!(3).collect();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].id, "p1");
        assert_eq!(roster[2].name, "Participant 3");
        assert_eq!(roster[1].seed, Some(2));
    }
}
