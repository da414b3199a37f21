use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Summed trust weight one side needs to resolve a ban request.
pub const QUORUM: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Executed,
    Cancelled,
}

/// In-memory record of one in-progress ban-request vote. At most one
/// session exists per target; it is dropped from the table the moment it
/// reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingSession {
    pub id: u64,
    pub guild_id: u64,
    pub channel_id: u64,
    pub requester: u64,
    pub target: u64,
    pub reason: String,
    pub ban_weight: u32,
    pub cancel_weight: u32,
    voters: HashSet<u64>,
    pub state: SessionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// No open session matches the vote's target and session id.
    Closed,
    AlreadyVoted,
    /// Voter weight was zero; the voter is not recorded and may vote again
    /// after a promotion.
    Ineligible,
    Progress {
        ban_weight: u32,
        cancel_weight: u32,
    },
    /// This vote crossed a threshold. Exactly one caller per session ever
    /// receives this; the terminal action is theirs to perform.
    Resolved(VotingSession),
}

/// The active-session table: target user id -> open session. Vote events
/// for one target serialize on the map entry; sessions for different
/// targets proceed independently. No I/O happens under the entry lock.
pub struct SessionTable {
    sessions: DashMap<u64, VotingSession>,
    next_id: AtomicU64,
}

impl SessionTable {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Opens a session with zero tallies and an empty voter set. A new
    /// request silently replaces any open session for the same target;
    /// prompts for the replaced session carry a stale id and are answered
    /// as closed.
    pub fn open(
        &self,
        guild_id: u64,
        channel_id: u64,
        requester: u64,
        target: u64,
        reason: String,
    ) -> VotingSession {
        let session = VotingSession {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            guild_id,
            channel_id,
            requester,
            target,
            reason,
            ban_weight: 0,
            cancel_weight: 0,
            voters: HashSet::new(),
            state: SessionState::Open,
        };
        self.sessions.insert(target, session.clone());
        session
    }

    /// Snapshot of the open session for a target, if any.
    pub fn get(&self, target: u64) -> Option<VotingSession> {
        self.sessions.get(&target).map(|s| s.clone())
    }

    /// Applies one vote event. The caller resolves the voter's live weight
    /// beforehand; this method never blocks on I/O.
    pub fn cast_vote(
        &self,
        target: u64,
        session_id: u64,
        voter: u64,
        weight: u32,
        choice: VoteChoice,
    ) -> VoteOutcome {
        let outcome = {
            let Some(mut entry) = self.sessions.get_mut(&target) else {
                return VoteOutcome::Closed;
            };
            let session = entry.value_mut();
            if session.id != session_id || session.state != SessionState::Open {
                return VoteOutcome::Closed;
            }
            if session.voters.contains(&voter) {
                return VoteOutcome::AlreadyVoted;
            }
            if weight == 0 {
                return VoteOutcome::Ineligible;
            }

            session.voters.insert(voter);
            match choice {
                VoteChoice::Approve => session.ban_weight += weight,
                VoteChoice::Reject => session.cancel_weight += weight,
            }

            // Ban side first: if a race ever satisfied both, the ban wins.
            if session.ban_weight >= QUORUM {
                session.state = SessionState::Executed;
                VoteOutcome::Resolved(session.clone())
            } else if session.cancel_weight >= QUORUM {
                session.state = SessionState::Cancelled;
                VoteOutcome::Resolved(session.clone())
            } else {
                VoteOutcome::Progress {
                    ban_weight: session.ban_weight,
                    cancel_weight: session.cancel_weight,
                }
            }
        };

        if let VoteOutcome::Resolved(_) = &outcome {
            // Id-guarded so a replacing request opened in the meantime is
            // never torn down by the stale resolution.
            self.sessions.remove_if(&target, |_, s| s.id == session_id);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    const GUILD: u64 = 10;
    const CHANNEL: u64 = 20;
    const REQUESTER: u64 = 30;
    const TARGET: u64 = 40;

    fn open(table: &SessionTable) -> VotingSession {
        table.open(GUILD, CHANNEL, REQUESTER, TARGET, "raiding".into())
    }

    #[test]
    fn two_moderator_votes_reach_quorum() {
        let table = SessionTable::new();
        let session = open(&table);

        let first = table.cast_vote(TARGET, session.id, 1, 1, VoteChoice::Approve);
        assert_eq!(
            first,
            VoteOutcome::Progress {
                ban_weight: 1,
                cancel_weight: 0
            }
        );

        match table.cast_vote(TARGET, session.id, 2, 1, VoteChoice::Approve) {
            VoteOutcome::Resolved(s) => {
                assert_eq!(s.state, SessionState::Executed);
                assert_eq!(s.ban_weight, 2);
            }
            other => panic!("expected resolution, got {:?}", other),
        }
        assert!(table.get(TARGET).is_none());
    }

    #[test]
    fn single_administrator_vote_resolves_immediately() {
        let table = SessionTable::new();
        let session = open(&table);

        match table.cast_vote(TARGET, session.id, 1, 2, VoteChoice::Approve) {
            VoteOutcome::Resolved(s) => assert_eq!(s.state, SessionState::Executed),
            other => panic!("expected resolution, got {:?}", other),
        }
    }

    #[test]
    fn reject_votes_cancel_the_request() {
        let table = SessionTable::new();
        let session = open(&table);

        table.cast_vote(TARGET, session.id, 1, 1, VoteChoice::Reject);
        match table.cast_vote(TARGET, session.id, 2, 1, VoteChoice::Reject) {
            VoteOutcome::Resolved(s) => {
                assert_eq!(s.state, SessionState::Cancelled);
                assert_eq!(s.cancel_weight, 2);
                assert_eq!(s.ban_weight, 0);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
        assert!(table.get(TARGET).is_none());
    }

    #[test]
    fn tallies_equal_sum_of_accepted_weights() {
        let table = SessionTable::new();
        let session = open(&table);

        table.cast_vote(TARGET, session.id, 1, 1, VoteChoice::Approve);
        table.cast_vote(TARGET, session.id, 2, 1, VoteChoice::Reject);
        table.cast_vote(TARGET, session.id, 3, 0, VoteChoice::Approve);

        let snapshot = table.get(TARGET).unwrap();
        assert_eq!(snapshot.ban_weight, 1);
        assert_eq!(snapshot.cancel_weight, 1);
        assert_eq!(snapshot.voters.len(), 2);
    }

    #[test]
    fn duplicate_vote_contributes_once() {
        let table = SessionTable::new();
        let session = open(&table);

        table.cast_vote(TARGET, session.id, 1, 1, VoteChoice::Approve);
        let second = table.cast_vote(TARGET, session.id, 1, 1, VoteChoice::Approve);
        assert_eq!(second, VoteOutcome::AlreadyVoted);

        let snapshot = table.get(TARGET).unwrap();
        assert_eq!(snapshot.ban_weight, 1);
    }

    #[test]
    fn zero_weight_voter_is_rejected_without_state_change() {
        let table = SessionTable::new();
        let session = open(&table);

        let outcome = table.cast_vote(TARGET, session.id, 1, 0, VoteChoice::Approve);
        assert_eq!(outcome, VoteOutcome::Ineligible);

        let snapshot = table.get(TARGET).unwrap();
        assert_eq!(snapshot.ban_weight, 0);
        assert!(snapshot.voters.is_empty());

        // A later promotion lets the same voter cast a counted vote.
        let retried = table.cast_vote(TARGET, session.id, 1, 1, VoteChoice::Approve);
        assert_eq!(
            retried,
            VoteOutcome::Progress {
                ban_weight: 1,
                cancel_weight: 0
            }
        );
    }

    #[test]
    fn votes_after_resolution_are_closed() {
        let table = SessionTable::new();
        let session = open(&table);

        table.cast_vote(TARGET, session.id, 1, 2, VoteChoice::Approve);
        let late = table.cast_vote(TARGET, session.id, 2, 3, VoteChoice::Approve);
        assert_eq!(late, VoteOutcome::Closed);
        assert!(table.get(TARGET).is_none());
    }

    #[test]
    fn new_request_replaces_open_session_and_stales_old_prompts() {
        let table = SessionTable::new();
        let old = open(&table);
        table.cast_vote(TARGET, old.id, 1, 1, VoteChoice::Approve);

        let new = table.open(GUILD, CHANNEL, REQUESTER, TARGET, "second strike".into());
        assert_ne!(old.id, new.id);

        // Old prompt buttons carry the old session id.
        let stale = table.cast_vote(TARGET, old.id, 2, 1, VoteChoice::Approve);
        assert_eq!(stale, VoteOutcome::Closed);

        let snapshot = table.get(TARGET).unwrap();
        assert_eq!(snapshot.id, new.id);
        assert_eq!(snapshot.ban_weight, 0);
    }

    #[test]
    fn concurrent_approvals_resolve_exactly_once() {
        let table = Arc::new(SessionTable::new());
        let session = open(&table);

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let table = Arc::clone(&table);
                let barrier = Arc::clone(&barrier);
                let session_id = session.id;
                thread::spawn(move || {
                    barrier.wait();
                    table.cast_vote(TARGET, session_id, 1000 + i as u64, 1, VoteChoice::Approve)
                })
            })
            .collect();

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let resolutions = outcomes
            .iter()
            .filter(|o| matches!(o, VoteOutcome::Resolved(_)))
            .count();
        assert_eq!(resolutions, 1);

        // No accepted vote may have observed a pre-update tally at quorum.
        for outcome in &outcomes {
            if let VoteOutcome::Progress { ban_weight, .. } = outcome {
                assert!(*ban_weight < QUORUM);
            }
        }
        assert!(table.get(TARGET).is_none());
    }

    #[test]
    fn concurrent_duplicate_votes_accept_one() {
        let table = Arc::new(SessionTable::new());
        let session = open(&table);

        let threads = 4;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let table = Arc::clone(&table);
                let barrier = Arc::clone(&barrier);
                let session_id = session.id;
                thread::spawn(move || {
                    barrier.wait();
                    table.cast_vote(TARGET, session_id, 777, 1, VoteChoice::Approve)
                })
            })
            .collect();

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let accepted = outcomes
            .iter()
            .filter(|o| !matches!(o, VoteOutcome::AlreadyVoted))
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(table.get(TARGET).unwrap().ban_weight, 1);
    }
}
