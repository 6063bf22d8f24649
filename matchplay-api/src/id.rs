use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! id {
    ($name:ident, $id:ty) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(pub $id);

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl AsRef<$id> for $name {
            #[inline]
            fn as_ref(&self) -> &$id {
                &self.0
            }
        }

        impl PartialEq<$id> for $name {
            #[inline]
            fn eq(&self, other: &$id) -> bool {
                self.0 == *other
            }
        }

        impl From<$id> for $name {
            #[inline]
            fn from(id: $id) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = <$id as FromStr>::Err;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse::<$id>()?))
            }
        }
    };
}

id!(TournamentId, u64);

/// Generates unique [`TournamentId`]s from a snowflake sequence.
///
/// The generator is caller-owned context: whoever creates tournaments
/// holds one, the engine itself keeps no id state.
pub struct IdGenerator {
    generator: snowflaked::Generator,
}

impl IdGenerator {
    /// Creates a new `IdGenerator` using the given `instance` id.
    pub fn new(instance: u16) -> Self {
        Self {
            generator: snowflaked::Generator::new(instance),
        }
    }

    /// Generates a new unique [`TournamentId`].
    pub fn generate(&mut self) -> TournamentId {
        TournamentId(self.generator.generate())
    }
}

impl Debug for IdGenerator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("IdGenerator").finish()
    }
}
