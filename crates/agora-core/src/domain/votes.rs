//! Vote state machine shared by posts and comments.
//!
//! A voter is tracked in at most one of the two voter sets. Counters are
//! mirrors of the set sizes and are recomputed on every transition, so they
//! can never drift from the membership they describe.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }

    /// Past-tense verb used in client-facing messages ("post already upvoted").
    pub fn verb(self) -> &'static str {
        match self {
            VoteDirection::Up => "upvoted",
            VoteDirection::Down => "downvoted",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteDirection::Up => f.write_str("up"),
            VoteDirection::Down => f.write_str("down"),
        }
    }
}

/// How a transition changes the voter's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// The voter was in neither set.
    Cast,
    /// The voter moves from the opposite set.
    Switch,
}

/// A computed, not yet applied, vote change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTransition {
    pub voter: Uuid,
    pub direction: VoteDirection,
    pub kind: TransitionKind,
}

impl VoteTransition {
    /// Counter deltas `(up, down)` this transition produces on a consistent record.
    pub fn deltas(&self) -> (i32, i32) {
        match (self.kind, self.direction) {
            (TransitionKind::Cast, VoteDirection::Up) => (1, 0),
            (TransitionKind::Cast, VoteDirection::Down) => (0, 1),
            (TransitionKind::Switch, VoteDirection::Up) => (1, -1),
            (TransitionKind::Switch, VoteDirection::Down) => (-1, 1),
        }
    }
}

/// Rejection for a same-direction re-vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyVoted(pub VoteDirection);

/// Vote counters and voter sets of a post or comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Votes {
    #[serde(default)]
    up_votes: u32,
    #[serde(default)]
    down_votes: u32,
    #[serde(default)]
    users_up_voted: Vec<Uuid>,
    #[serde(default)]
    users_down_voted: Vec<Uuid>,
}

impl Votes {
    pub fn up_votes(&self) -> u32 {
        self.up_votes
    }

    pub fn down_votes(&self) -> u32 {
        self.down_votes
    }

    pub fn users_up_voted(&self) -> &[Uuid] {
        &self.users_up_voted
    }

    pub fn users_down_voted(&self) -> &[Uuid] {
        &self.users_down_voted
    }

    pub fn has_up_voted(&self, user: Uuid) -> bool {
        self.users_up_voted.contains(&user)
    }

    pub fn has_down_voted(&self, user: Uuid) -> bool {
        self.users_down_voted.contains(&user)
    }

    /// Current vote of `user`, if any.
    pub fn membership(&self, user: Uuid) -> Option<VoteDirection> {
        if self.has_up_voted(user) {
            Some(VoteDirection::Up)
        } else if self.has_down_voted(user) {
            Some(VoteDirection::Down)
        } else {
            None
        }
    }

    /// Compute the transition for `voter` requesting `direction`.
    pub fn transition(
        &self,
        voter: Uuid,
        direction: VoteDirection,
    ) -> Result<VoteTransition, AlreadyVoted> {
        let kind = match self.membership(voter) {
            None => TransitionKind::Cast,
            Some(current) if current == direction => return Err(AlreadyVoted(direction)),
            Some(_) => TransitionKind::Switch,
        };

        Ok(VoteTransition {
            voter,
            direction,
            kind,
        })
    }

    /// Apply a transition. Set operations are idempotent, so replaying the
    /// same transition on a copy that already holds it leaves it unchanged.
    pub fn apply(&mut self, transition: &VoteTransition) {
        let (target, other) = match transition.direction {
            VoteDirection::Up => (&mut self.users_up_voted, &mut self.users_down_voted),
            VoteDirection::Down => (&mut self.users_down_voted, &mut self.users_up_voted),
        };

        other.retain(|u| *u != transition.voter);
        if !target.contains(&transition.voter) {
            target.push(transition.voter);
        }

        self.recount();
    }

    fn recount(&mut self) {
        self.up_votes = self.users_up_voted.len() as u32;
        self.down_votes = self.users_down_voted.len() as u32;
    }

    /// True when the counters match the voter sets and no voter is in both.
    pub fn is_consistent(&self) -> bool {
        self.up_votes as usize == self.users_up_voted.len()
            && self.down_votes as usize == self.users_down_voted.len()
            && !self
                .users_up_voted
                .iter()
                .any(|u| self.users_down_voted.contains(u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(votes: &mut Votes, voter: Uuid, direction: VoteDirection) -> Result<(), AlreadyVoted> {
        let t = votes.transition(voter, direction)?;
        votes.apply(&t);
        Ok(())
    }

    #[test]
    fn test_first_upvote_counts() {
        let mut votes = Votes::default();
        let voter = Uuid::new_v4();

        cast(&mut votes, voter, VoteDirection::Up).unwrap();

        assert_eq!(votes.up_votes(), 1);
        assert_eq!(votes.down_votes(), 0);
        assert!(votes.has_up_voted(voter));
    }

    #[test]
    fn test_repeat_vote_is_rejected() {
        let mut votes = Votes::default();
        let voter = Uuid::new_v4();

        cast(&mut votes, voter, VoteDirection::Down).unwrap();
        let err = cast(&mut votes, voter, VoteDirection::Down).unwrap_err();

        assert_eq!(err, AlreadyVoted(VoteDirection::Down));
        assert_eq!(votes.down_votes(), 1);
    }

    #[test]
    fn test_switch_moves_voter_between_sets() {
        let mut votes = Votes::default();
        let voter = Uuid::new_v4();

        cast(&mut votes, voter, VoteDirection::Up).unwrap();
        let t = votes.transition(voter, VoteDirection::Down).unwrap();
        assert_eq!(t.kind, TransitionKind::Switch);
        assert_eq!(t.deltas(), (-1, 1));
        votes.apply(&t);

        assert_eq!(votes.up_votes(), 0);
        assert_eq!(votes.down_votes(), 1);
        assert!(!votes.has_up_voted(voter));
        assert!(votes.has_down_voted(voter));
    }

    #[test]
    fn test_replaying_transition_is_idempotent() {
        let mut votes = Votes::default();
        let t = votes.transition(Uuid::new_v4(), VoteDirection::Up).unwrap();

        votes.apply(&t);
        votes.apply(&t);

        assert_eq!(votes.up_votes(), 1);
        assert!(votes.is_consistent());
    }

    #[test]
    fn test_invariants_hold_over_mixed_sequence() {
        let mut votes = Votes::default();
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let script = [
            (0, VoteDirection::Up),
            (1, VoteDirection::Down),
            (0, VoteDirection::Down),
            (2, VoteDirection::Up),
            (1, VoteDirection::Up),
            (0, VoteDirection::Down),
            (3, VoteDirection::Down),
            (2, VoteDirection::Down),
        ];

        for (idx, direction) in script {
            let _ = cast(&mut votes, users[idx], direction);
            assert!(votes.is_consistent());
        }

        assert_eq!(votes.up_votes(), 1);
        assert_eq!(votes.down_votes(), 3);
    }
}
