//! # matchplay-api
//!
//! The boundary types a presentation layer consumes to drive the
//! [`matchplay_core`] engine: the [`Tournament`] aggregate with its
//! kind-gated operations, tournament id generation and the caller-owned
//! [`Capabilities`] flag guarding mutation.
//!
//! The engine itself is stateless; everything session-like (the active
//! tournament, the mutation capability, the id generator, the league
//! score sheet) is owned by the caller and passed into each call.
pub mod tournament;

mod id;

pub use id::{IdGenerator, TournamentId};
pub use tournament::{Capabilities, Tournament, TournamentKind};

use std::result;

use thiserror::Error;

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The caller does not hold the mutation capability.
    #[error("operation requires the mutate capability")]
    Forbidden,
    #[error("operation requires a {required} tournament, found {found}")]
    WrongKind {
        required: TournamentKind,
        found: TournamentKind,
    },
    #[error(transparent)]
    Core(#[from] matchplay_core::Error),
}
