//! StarCraft II profile URLs.
//!
//! Accepted shape: `https://starcraft2.com[/<locale>]/profile/<region>/<realm>/<player>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::ProfileUrlError;

pub const PROFILE_HOST: &str = "starcraft2.com";

/// Longest value the profile URL form field accepts.
pub const MAX_PROFILE_URL_LEN: usize = 80;

pub const REGION_IDS: [u8; 4] = [1, 2, 3, 5];
pub const REALM_IDS: [u8; 2] = [1, 2];

/// Identifiers of a player profile on the ladder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileIds {
    pub region_id: u8,
    pub realm_id: u8,
    pub player_id: u64,
}

impl ProfileIds {
    pub fn new(region_id: u8, realm_id: u8, player_id: u64) -> Result<Self, ProfileUrlError> {
        if !REGION_IDS.contains(&region_id) {
            return Err(ProfileUrlError::UnknownRegion { region_id });
        }
        if !REALM_IDS.contains(&realm_id) {
            return Err(ProfileUrlError::UnknownRealm { realm_id });
        }
        Ok(Self {
            region_id,
            realm_id,
            player_id,
        })
    }

    /// Extract the ids from a profile URL. The locale segment is optional.
    pub fn parse_url(input: &str) -> Result<Self, ProfileUrlError> {
        let url = Url::parse(input.trim()).map_err(|e| ProfileUrlError::Malformed {
            message: e.to_string(),
        })?;

        let not_a_profile = || ProfileUrlError::NotAProfile {
            url: input.to_string(),
        };

        if !matches!(url.scheme(), "https" | "http") {
            return Err(not_a_profile());
        }
        match url.host_str() {
            Some(host) if host == PROFILE_HOST || host == "www.starcraft2.com" => {}
            _ => return Err(not_a_profile()),
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let ids = match segments.as_slice() {
            ["profile", region, realm, player] => [*region, *realm, *player],
            [locale, "profile", region, realm, player] if is_locale(locale) => {
                [*region, *realm, *player]
            }
            _ => return Err(not_a_profile()),
        };

        let region_id = ids[0].parse::<u8>().map_err(|_| not_a_profile())?;
        let realm_id = ids[1].parse::<u8>().map_err(|_| not_a_profile())?;
        let player_id = ids[2].parse::<u64>().map_err(|_| not_a_profile())?;

        Self::new(region_id, realm_id, player_id)
    }

    pub fn to_url(&self) -> String {
        format!(
            "https://{}/profile/{}/{}/{}",
            PROFILE_HOST, self.region_id, self.realm_id, self.player_id
        )
    }
}

impl FromStr for ProfileIds {
    type Err = ProfileUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_url(s)
    }
}

impl fmt::Display for ProfileIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

// e.g. "en-us", "ko-kr"
fn is_locale(segment: &str) -> bool {
    let mut parts = segment.split('-');
    let (Some(lang), Some(country), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    [lang, country]
        .iter()
        .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Check the profile URL form field: not empty, at most
/// [`MAX_PROFILE_URL_LEN`] characters, and a valid profile URL.
pub fn validate_profile_url_field(value: &str) -> Result<ProfileIds, ProfileUrlError> {
    if value.trim().is_empty() {
        return Err(ProfileUrlError::Empty);
    }

    let length = value.chars().count();
    if length > MAX_PROFILE_URL_LEN {
        return Err(ProfileUrlError::TooLong {
            length,
            max: MAX_PROFILE_URL_LEN,
        });
    }

    ProfileIds::parse_url(value)
}
