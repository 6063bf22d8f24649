//! The tournament aggregate tying a roster to its match graph.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use matchplay_core::standings::LeagueStanding;
use matchplay_core::{elimination, round_robin, standings};
use matchplay_core::{MatchId, Matches, Participant};

use crate::{Error, Result, TournamentId};

/// The competition format of a [`Tournament`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentKind {
    League,
    Elimination,
}

impl Display for TournamentKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::League => "league",
                Self::Elimination => "elimination",
            }
        )
    }
}

/// The caller-owned mutation capability.
///
/// Presentation layers hold one per session and pass it into every
/// mutating call; read paths never require it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_mutate: bool,
}

/// A competition: a roster of participants and the match graph built from
/// it.
///
/// The aggregate owns its match collection exclusively. Every operation
/// takes the current state by reference and returns a new `Tournament`
/// snapshot; nothing is mutated in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub kind: TournamentKind,
    pub participants: Vec<Participant>,
    pub matches: Matches,
    /// RFC3339
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Creates a new tournament, building the match graph for `kind` from
    /// `participants`.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster is too small for `kind`.
    pub fn new<N>(
        id: TournamentId,
        name: N,
        kind: TournamentKind,
        participants: Vec<Participant>,
    ) -> Result<Self>
    where
        N: Into<String>,
    {
        let matches = match kind {
            TournamentKind::Elimination => {
                elimination::create_bracket(participants.iter().cloned())?
            }
            TournamentKind::League => round_robin::create_schedule(participants.iter().cloned())?,
        };

        log::debug!(
            "Created new {} tournament with {} matches",
            kind,
            matches.len()
        );

        Ok(Self {
            id,
            name: name.into(),
            kind,
            participants,
            matches,
            created_at: Utc::now(),
        })
    }

    /// Records an explicit winner for a match and advances it. Elimination
    /// tournaments only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] without the mutation capability,
    /// [`Error::WrongKind`] on a league tournament and a core error if the
    /// match does not exist.
    pub fn decide_match(
        &self,
        caps: Capabilities,
        id: &MatchId,
        winner: Participant,
    ) -> Result<Self> {
        self.require_mutate(caps)?;
        self.require_kind(TournamentKind::Elimination)?;

        let matches = elimination::decide_match(&self.matches, id, winner)?;
        Ok(self.with_matches(matches))
    }

    /// Records a score pair for a match, deriving and advancing the winner
    /// when the scores are not level. Elimination tournaments only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] without the mutation capability,
    /// [`Error::WrongKind`] on a league tournament and a core error if the
    /// match does not exist.
    pub fn record_score(
        &self,
        caps: Capabilities,
        id: &MatchId,
        score1: u32,
        score2: u32,
    ) -> Result<Self> {
        self.require_mutate(caps)?;
        self.require_kind(TournamentKind::Elimination)?;

        let matches = elimination::record_score(&self.matches, id, score1, score2)?;
        Ok(self.with_matches(matches))
    }

    /// Computes the current league table from the caller-owned score
    /// sheet. League tournaments only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongKind`] on an elimination tournament.
    pub fn standings(&self, scores: &HashMap<MatchId, [u32; 2]>) -> Result<Vec<LeagueStanding>> {
        self.require_kind(TournamentKind::League)?;

        Ok(standings::compute_standings(
            &self.participants,
            &self.matches,
            scores,
        ))
    }

    fn with_matches(&self, matches: Matches) -> Self {
        Self {
            matches,
            ..self.clone()
        }
    }

    fn require_mutate(&self, caps: Capabilities) -> Result<()> {
        if caps.can_mutate {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }

    fn require_kind(&self, required: TournamentKind) -> Result<()> {
        if self.kind == required {
            Ok(())
        } else {
            Err(Error::WrongKind {
                required,
                found: self.kind,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use matchplay_core::{MatchId, Participant};

    use super::{Capabilities, Tournament, TournamentKind};
    use crate::{Error, IdGenerator};

    fn roster(n: u32) -> Vec<Participant> {
        (1..=n)
            .map(|i| Participant::new(format!("p{}", i), format!("Participant {}", i), Some(i)))
            .collect()
    }

    fn mutate() -> Capabilities {
        Capabilities { can_mutate: true }
    }

    #[test]
    fn test_tournament_new() {
        let mut ids = IdGenerator::new(0);

        let cup = Tournament::new(
            ids.generate(),
            "Friday Cup",
            TournamentKind::Elimination,
            roster(8),
        )
        .unwrap();
        assert_eq!(cup.kind, TournamentKind::Elimination);
        assert_eq!(cup.participants.len(), 8);
        assert_eq!(cup.matches.len(), 7);

        let league = Tournament::new(
            ids.generate(),
            "Winter League",
            TournamentKind::League,
            roster(4),
        )
        .unwrap();
        assert_eq!(league.matches.len(), 6);
        assert_ne!(cup.id, league.id);
    }

    #[test]
    fn test_mutation_requires_capability() {
        let mut ids = IdGenerator::new(0);
        let cup = Tournament::new(ids.generate(), "Cup", TournamentKind::Elimination, roster(8))
            .unwrap();

        let winner = cup.participants[0].clone();
        let m1 = MatchId::from("m1");

        assert_eq!(
            cup.decide_match(Capabilities::default(), &m1, winner.clone())
                .unwrap_err(),
            Error::Forbidden
        );
        assert_eq!(
            cup.record_score(Capabilities::default(), &m1, 1, 0)
                .unwrap_err(),
            Error::Forbidden
        );

        let updated = cup.decide_match(mutate(), &m1, winner.clone()).unwrap();
        assert_eq!(updated.matches.get(&m1).unwrap().winner, Some(winner));
    }

    #[test]
    fn test_kind_gating() {
        let mut ids = IdGenerator::new(0);

        let league = Tournament::new(ids.generate(), "League", TournamentKind::League, roster(4))
            .unwrap();
        let winner = league.participants[0].clone();
        let m1 = MatchId::from("m1");

        assert_eq!(
            league.decide_match(mutate(), &m1, winner).unwrap_err(),
            Error::WrongKind {
                required: TournamentKind::Elimination,
                found: TournamentKind::League,
            }
        );
        assert_eq!(
            league.record_score(mutate(), &m1, 1, 0).unwrap_err(),
            Error::WrongKind {
                required: TournamentKind::Elimination,
                found: TournamentKind::League,
            }
        );

        let cup = Tournament::new(ids.generate(), "Cup", TournamentKind::Elimination, roster(8))
            .unwrap();
        assert_eq!(
            cup.standings(&HashMap::new()).unwrap_err(),
            Error::WrongKind {
                required: TournamentKind::League,
                found: TournamentKind::Elimination,
            }
        );
    }

    #[test]
    fn test_operations_return_snapshots() {
        let mut ids = IdGenerator::new(0);
        let cup = Tournament::new(ids.generate(), "Cup", TournamentKind::Elimination, roster(8))
            .unwrap();

        let winner = cup.participants[0].clone();
        let m1 = MatchId::from("m1");

        let updated = cup.decide_match(mutate(), &m1, winner.clone()).unwrap();

        // The input aggregate is untouched.
        assert_eq!(cup.matches.get(&m1).unwrap().winner, None);
        assert_eq!(updated.matches.get(&m1).unwrap().winner, Some(winner));

        assert_eq!(updated.id, cup.id);
        assert_eq!(updated.created_at, cup.created_at);

        assert_eq!(
            cup.decide_match(mutate(), &MatchId::from("m99"), cup.participants[0].clone())
                .unwrap_err(),
            Error::Core(matchplay_core::Error::MatchNotFound(MatchId::from("m99")))
        );
    }

    #[test]
    fn test_league_standings() {
        let mut ids = IdGenerator::new(0);
        let league = Tournament::new(ids.generate(), "League", TournamentKind::League, roster(4))
            .unwrap();

        let mut scores = HashMap::new();
        scores.insert(MatchId::from("m1"), [2, 0]);

        let table = league.standings(&scores).unwrap();
        assert_eq!(table[0].participant.id, league.participants[0].id);
        assert_eq!(table[0].points, 3);
        assert_eq!(table[0].played, 1);

        // Standings are derived and never stored on the aggregate.
        assert_eq!(league.standings(&scores).unwrap(), table);
    }

    #[test]
    fn test_tournament_serde_round_trip() {
        let mut ids = IdGenerator::new(0);
        let cup = Tournament::new(ids.generate(), "Cup", TournamentKind::Elimination, roster(4))
            .unwrap();

        let json = serde_json::to_string(&cup).unwrap();
        let back: Tournament = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, cup.id);
        assert_eq!(back.name, cup.name);
        assert_eq!(back.kind, cup.kind);
        assert_eq!(back.participants, cup.participants);
        assert_eq!(back.matches, cup.matches);
        assert_eq!(back.created_at, cup.created_at);
    }
}
