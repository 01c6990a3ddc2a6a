//! Participant grouping for per-participant views

use rustc_hash::FxHashMap;

use crate::config::ParticipantMergePolicy;
use crate::session::{SessionRecord, TrialRecord};

/// Sessions that make up one participant row.
#[derive(Debug, Clone)]
pub struct ParticipantGroup<'a> {
    participant_id: &'a str,
    language_group: Option<&'a str>,
    sessions: Vec<&'a SessionRecord>,
}

impl<'a> ParticipantGroup<'a> {
    fn new(session: &'a SessionRecord) -> Self {
        Self {
            participant_id: session.participant_id(),
            language_group: session.language_group(),
            sessions: vec![session],
        }
    }

    fn absorb(&mut self, session: &'a SessionRecord) {
        if self.language_group.is_none() {
            self.language_group = session.language_group();
        }
        self.sessions.push(session);
    }

    /// Participant ID shared by every session in the group.
    #[must_use]
    pub const fn participant_id(&self) -> &'a str {
        self.participant_id
    }

    /// First non-null language group among the group's sessions.
    #[must_use]
    pub const fn language_group(&self) -> Option<&'a str> {
        self.language_group
    }

    /// Number of sessions in the group.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Trials of every session, in store order then array order.
    pub fn trials(&self) -> impl Iterator<Item = &'a TrialRecord> + '_ {
        self.sessions.iter().flat_map(|&s| s.trials())
    }
}

/// Group sessions according to `policy`.
///
/// Groups appear in order of first appearance in `sessions`.
#[must_use]
pub fn group_sessions<S: AsRef<SessionRecord>>(
    sessions: &[S],
    policy: ParticipantMergePolicy,
) -> Vec<ParticipantGroup<'_>> {
    match policy {
        ParticipantMergePolicy::PerSession => sessions
            .iter()
            .map(|s| ParticipantGroup::new(s.as_ref()))
            .collect(),
        ParticipantMergePolicy::MergeById => {
            let mut groups: Vec<ParticipantGroup<'_>> = Vec::new();
            let mut positions: FxHashMap<&str, usize> = FxHashMap::default();
            for session in sessions.iter().map(|s| s.as_ref()) {
                if let Some(&position) = positions.get(session.participant_id()) {
                    groups[position].absorb(session);
                } else {
                    positions.insert(session.participant_id(), groups.len());
                    groups.push(ParticipantGroup::new(session));
                }
            }
            groups
        }
    }
}
