use crate::roster::RosterEntry;

/// Offset between a SteamID64 and the provider-native account id.
pub const STEAM_ID64_OFFSET: u64 = 76561197960265728;

/// Normalizes a roster id to the provider-native account id.
///
/// Inputs shorter than 17 digits, or numerically below the SteamID64
/// offset, are already account ids and pass through unchanged. Anything
/// non-numeric also passes through unchanged and will surface as a failed
/// upstream fetch rather than a resolver error.
pub fn resolve(raw: &str) -> String {
    if raw.len() < 17 {
        return raw.to_string();
    }

    match raw.parse::<u64>() {
        Ok(value) if value >= STEAM_ID64_OFFSET => (value - STEAM_ID64_OFFSET).to_string(),
        _ => raw.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerIdentity {
    pub display_name: String,
    // Kept only when the roster id was a real SteamID64.
    pub steam_id: Option<String>,
    pub account_id: String,
}

impl PlayerIdentity {
    pub fn from_roster(entry: &RosterEntry) -> Self {
        let account_id = resolve(&entry.steam_id);
        let steam_id = if account_id == entry.steam_id {
            None
        } else {
            Some(entry.steam_id.clone())
        };

        PlayerIdentity {
            display_name: entry.name.clone(),
            steam_id,
            account_id,
        }
    }
}
