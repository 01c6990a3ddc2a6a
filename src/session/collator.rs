//! Trial collator - flattens stored sessions into one trial sequence

use super::{SessionRecord, TrialRecord};

/// A trial tagged with the session it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollatedTrial<'a> {
    /// Participant ID of the owning session
    pub participant_id: &'a str,
    /// Position of the owning session in the store
    pub session_index: usize,
    /// The trial itself
    pub trial: &'a TrialRecord,
}

/// Lazy, restartable view over the trials of a session list, in session
/// insertion order then trial array order.
#[derive(Debug, Clone, Copy)]
pub struct TrialCollator<'a, S> {
    sessions: &'a [S],
}

impl<'a, S: AsRef<SessionRecord>> TrialCollator<'a, S> {
    /// Create a collator over `sessions`.
    #[must_use]
    pub const fn new(sessions: &'a [S]) -> Self {
        Self { sessions }
    }

    /// Iterate all trials. Each call starts from the beginning.
    pub fn trials(&self) -> impl Iterator<Item = CollatedTrial<'a>> + 'a {
        self.sessions
            .iter()
            .enumerate()
            .flat_map(|(session_index, session)| {
                let session = session.as_ref();
                let participant_id = session.participant_id();
                session.trials().iter().map(move |trial| CollatedTrial {
                    participant_id,
                    session_index,
                    trial,
                })
            })
    }

    /// Total number of trials across all sessions.
    #[must_use]
    pub fn trial_count(&self) -> usize {
        self.sessions
            .iter()
            .map(|s| s.as_ref().trials().len())
            .sum()
    }

    /// Number of sessions being collated.
    #[must_use]
    pub const fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Underlying sessions.
    #[must_use]
    pub const fn sessions(&self) -> &'a [S] {
        self.sessions
    }
}

impl AsRef<Self> for SessionRecord {
    fn as_ref(&self) -> &Self {
        self
    }
}
