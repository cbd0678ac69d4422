//! Room-scoped operations and their endpoint candidates.

use std::fmt;

use rc_core::RoomKind;

/// One endpoint that may serve a room operation, tagged with the room kind it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub kind: RoomKind,
    pub endpoint: &'static str,
}

impl Candidate {
    pub const fn new(kind: RoomKind, endpoint: &'static str) -> Self {
        Self { kind, endpoint }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint)
    }
}

const fn channel(endpoint: &'static str) -> Candidate {
    Candidate::new(RoomKind::PublicChannel, endpoint)
}

const fn group(endpoint: &'static str) -> Candidate {
    Candidate::new(RoomKind::PrivateGroup, endpoint)
}

const fn direct(endpoint: &'static str) -> Candidate {
    Candidate::new(RoomKind::DirectMessage, endpoint)
}

const HISTORY: &[Candidate] = &[
    channel("channels.history"),
    group("groups.history"),
    direct("im.history"),
];
const MEMBERS: &[Candidate] = &[
    channel("channels.members"),
    group("groups.members"),
    direct("im.members"),
];
const FILES: &[Candidate] = &[
    channel("channels.files"),
    group("groups.files"),
    direct("im.files"),
];
const COUNTERS: &[Candidate] = &[
    channel("channels.counters"),
    group("groups.counters"),
    direct("im.counters"),
];
const INVITE: &[Candidate] = &[channel("channels.invite"), group("groups.invite")];
const KICK: &[Candidate] = &[channel("channels.kick"), group("groups.kick")];
const ANNOUNCEMENT: &[Candidate] = &[
    channel("channels.setAnnouncement"),
    group("groups.setAnnouncement"),
];
const DESCRIPTION: &[Candidate] = &[
    channel("channels.setDescription"),
    group("groups.setDescription"),
];

/// Logical operations whose endpoint depends on the (unknown) room kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomOperation {
    History,
    Members,
    Files,
    Counters,
    Invite,
    Kick,
    SetAnnouncement,
    SetDescription,
}

impl RoomOperation {
    /// Phrase used in the resolution error: "Unable to <describe> - ...".
    pub fn describe(self) -> &'static str {
        match self {
            Self::History => "fetch messages",
            Self::Members => "fetch members",
            Self::Files => "fetch files",
            Self::Counters => "fetch room counters",
            Self::Invite => "invite user",
            Self::Kick => "remove user",
            Self::SetAnnouncement => "set announcement",
            Self::SetDescription => "set description",
        }
    }

    /// Candidates in order: public channel, private group, then direct message where it applies.
    pub fn candidates(self) -> &'static [Candidate] {
        match self {
            Self::History => HISTORY,
            Self::Members => MEMBERS,
            Self::Files => FILES,
            Self::Counters => COUNTERS,
            Self::Invite => INVITE,
            Self::Kick => KICK,
            Self::SetAnnouncement => ANNOUNCEMENT,
            Self::SetDescription => DESCRIPTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_operations_cover_all_kinds_in_order() {
        for op in [
            RoomOperation::History,
            RoomOperation::Members,
            RoomOperation::Files,
            RoomOperation::Counters,
        ] {
            let kinds: Vec<RoomKind> = op.candidates().iter().map(|c| c.kind).collect();
            assert_eq!(
                kinds,
                vec![
                    RoomKind::PublicChannel,
                    RoomKind::PrivateGroup,
                    RoomKind::DirectMessage
                ]
            );
        }
    }

    #[test]
    fn test_membership_operations_skip_direct_messages() {
        for op in [
            RoomOperation::Invite,
            RoomOperation::Kick,
            RoomOperation::SetAnnouncement,
            RoomOperation::SetDescription,
        ] {
            assert!(op
                .candidates()
                .iter()
                .all(|c| c.kind != RoomKind::DirectMessage));
            assert_eq!(op.candidates().len(), 2);
        }
    }
}
