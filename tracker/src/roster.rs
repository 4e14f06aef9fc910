//! The roster is the fixed, ordered list of tracked identities. It is
//! read-only input to the crawler; removing an entry does not remove the
//! player's cached record.

use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum RosterError {
    #[error("could not load roster from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse roster: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    /// SteamID64 or account id, as listed by the roster source.
    pub steam_id: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Roster {
    pub players: Vec<RosterEntry>,
}

impl Roster {
    pub fn from_file(path: &Path) -> Result<Self, RosterError> {
        let file = File::open(path)?;
        let roster = serde_yaml::from_reader(file)?;
        Ok(roster)
    }
}
