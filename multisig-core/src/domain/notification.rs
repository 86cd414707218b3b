use crate::domain::exchange::Route;
use crate::foundation::{NoteId, Said};
use serde::{Deserialize, Serialize};

/// Mailbox entry pointing at an exchange message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "i")]
    pub id: NoteId,
    pub dt: String,
    #[serde(rename = "r", default)]
    pub read: bool,
    #[serde(rename = "a")]
    pub attrs: NoteAttrs,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteAttrs {
    #[serde(rename = "r")]
    pub route: Route,
    /// SAID of the referenced exchange message.
    #[serde(rename = "d")]
    pub exchange: Said,
}

/// Newest note on `route`, given notes in arrival order.
pub fn newest_for_route<'a>(notes: &'a [Note], route: &Route) -> Option<&'a Note> {
    notes.iter().rev().find(|note| &note.attrs.route == route)
}
