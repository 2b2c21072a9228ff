// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Join-by-link: shareable URLs that pre-fill room configuration.
//!
//! A link carries the room id (and optionally a requested initial view) as
//! query parameters. It never carries the relay credential or endpoint;
//! those are supplied once per device through configuration.

use antri_core::AntriError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// The view a join link asks the receiving device to open with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Registration kiosk.
    Register,
    /// Passive display board.
    Display,
    /// Operator console.
    Operator,
}

/// Room parameters decoded from a join link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinLink {
    pub room_id: String,
    pub view: Option<ViewMode>,
}

/// Build a shareable join link for a room.
pub fn share_link(
    base_url: &str,
    room_id: &str,
    view: Option<ViewMode>,
) -> Result<String, AntriError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AntriError::Config(format!("invalid link.base_url `{base_url}`: {e}")))?;
    url.set_path("join");
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.append_pair("room", room_id);
        if let Some(view) = view {
            pairs.append_pair("view", &view.to_string());
        }
    }
    Ok(url.into())
}

/// Decode a join link back into room parameters.
///
/// Unrecognized `view` values are ignored rather than rejected, so links
/// minted by newer versions still join the room.
pub fn parse_join_link(link: &str) -> Result<JoinLink, AntriError> {
    let url =
        Url::parse(link).map_err(|e| AntriError::InvalidInput(format!("invalid join link: {e}")))?;

    let mut room_id = None;
    let mut view = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "room" => room_id = Some(value.into_owned()),
            "view" => view = value.parse::<ViewMode>().ok(),
            _ => {}
        }
    }

    let room_id = room_id
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AntriError::InvalidInput("join link carries no room".into()))?;

    Ok(JoinLink { room_id, view })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_round_trips_room_and_view() {
        let link = share_link("https://antri.local", "booth-1", Some(ViewMode::Display))
            .expect("share link");
        assert_eq!(link, "https://antri.local/join?room=booth-1&view=display");

        let parsed = parse_join_link(&link).expect("parse");
        assert_eq!(parsed.room_id, "booth-1");
        assert_eq!(parsed.view, Some(ViewMode::Display));
    }

    #[test]
    fn view_is_optional() {
        let link = share_link("https://antri.local", "booth-1", None).expect("share link");
        let parsed = parse_join_link(&link).expect("parse");
        assert_eq!(parsed.view, None);
    }

    #[test]
    fn unknown_view_is_ignored() {
        let parsed =
            parse_join_link("https://antri.local/join?room=booth-1&view=kiosk3000").expect("parse");
        assert_eq!(parsed.room_id, "booth-1");
        assert_eq!(parsed.view, None);
    }

    #[test]
    fn link_without_room_is_rejected() {
        assert!(parse_join_link("https://antri.local/join?view=display").is_err());
        assert!(parse_join_link("https://antri.local/join?room=").is_err());
        assert!(parse_join_link("not a url").is_err());
    }

    #[test]
    fn link_never_carries_credentials() {
        let link = share_link("https://antri.local", "booth-1", None).expect("share link");
        assert!(!link.contains("credential"));
        assert!(!link.contains("token"));
    }
}
