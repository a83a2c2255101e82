//! Like / pass handling and mutual-match detection.
//!
//! Per ordered pair (actor → target):
//! - like while neutral: record the like; if the target already liked the actor the pair is
//!   matched and both sides get a notification, otherwise only the actor is acknowledged.
//! - like when already liked (or matched): no-op.
//! - pass while neutral or liked: record the pass. An existing like is not retracted.
//! - pass when already passed: no-op. Nothing leaves the matched state.

use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use serde::{Deserialize, Serialize};

use matchbot_shared::errors::{AppError, AppResult, ErrorCode};
use matchbot_shared::types::event::payloads;

use crate::models::{Profile, UserId};
use crate::store::{interactions, profiles};

use super::locks::PairLocks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgment {
    /// Like recorded, waiting for the other side.
    Liked,
    /// Like recorded and it closed a mutual pair.
    Matched,
    AlreadyLiked,
    Passed,
    AlreadyPassed,
    AlreadyMatched,
}

impl Acknowledgment {
    /// Text the chat front-end shows the actor.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Liked => "You liked this profile. If they like you back, we'll notify you!",
            Self::Matched => "You liked them, and it's a match!",
            Self::AlreadyLiked => "You already liked this profile.",
            Self::Passed => "Passed. We'll show someone else next time.",
            Self::AlreadyPassed => "Already passed.",
            Self::AlreadyMatched => "You are already matched with this profile.",
        }
    }
}

/// Tells `recipient_id` who they matched with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchNotification {
    pub recipient_id: UserId,
    pub matched_user_id: UserId,
    pub matched_display_name: String,
    pub matched_handle: Option<String>,
}

impl MatchNotification {
    fn about(recipient_id: UserId, matched: &Profile) -> Self {
        Self {
            recipient_id,
            matched_user_id: matched.user_id,
            matched_display_name: matched.display_name.clone(),
            matched_handle: matched.handle.clone(),
        }
    }
}

impl From<&MatchNotification> for payloads::MatchCreated {
    fn from(n: &MatchNotification) -> Self {
        Self {
            recipient_id: n.recipient_id,
            matched_user_id: n.matched_user_id,
            matched_display_name: n.matched_display_name.clone(),
            matched_handle: n.matched_handle.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionOutcome {
    pub acknowledgment: Acknowledgment,
    pub actor_notification: Option<MatchNotification>,
    pub target_notification: Option<MatchNotification>,
}

impl DecisionOutcome {
    fn ack(acknowledgment: Acknowledgment) -> Self {
        Self {
            acknowledgment,
            actor_notification: None,
            target_notification: None,
        }
    }

    /// Notifications to hand to the messaging layer, actor first.
    pub fn notifications(&self) -> impl Iterator<Item = &MatchNotification> {
        self.actor_notification
            .iter()
            .chain(self.target_notification.iter())
    }
}

#[derive(Default)]
pub struct DecisionEngine {
    locks: PairLocks,
}

impl DecisionEngine {
    /// Apply `actor`'s decision about `target`.
    ///
    /// Runs under the pair's lock inside one immediate transaction, so the reciprocity check sees
    /// the like written just before it and a pair is matched at most once.
    pub fn submit(
        &self,
        conn: &mut SqliteConnection,
        actor: UserId,
        target: UserId,
        decision: Decision,
    ) -> AppResult<DecisionOutcome> {
        if actor == target {
            return Err(AppError::new(
                ErrorCode::CannotActOnSelf,
                "cannot like or pass your own profile",
            ));
        }

        let _pair_guard = self.locks.lock(actor, target);

        let outcome = conn.immediate_transaction(|conn| {
            let actor_profile =
                profiles::get_profile(conn, actor)?.ok_or_else(AppError::not_registered)?;
            let target_profile = profiles::get_profile(conn, target)?.ok_or_else(|| {
                AppError::new(ErrorCode::TargetNotFound, "target profile not found")
            })?;

            match decision {
                Decision::Like => like(conn, &actor_profile, &target_profile),
                Decision::Pass => pass(conn, actor, target),
            }
        })?;

        tracing::info!(
            actor_id = actor,
            target_id = target,
            decision = ?decision,
            acknowledgment = ?outcome.acknowledgment,
            "decision applied"
        );
        Ok(outcome)
    }
}

fn like(conn: &mut SqliteConnection, actor: &Profile, target: &Profile) -> AppResult<DecisionOutcome> {
    if !interactions::record_like(conn, actor.user_id, target.user_id)? {
        return Ok(DecisionOutcome::ack(Acknowledgment::AlreadyLiked));
    }
    if !interactions::reciprocal_like_exists(conn, actor.user_id, target.user_id)? {
        return Ok(DecisionOutcome::ack(Acknowledgment::Liked));
    }

    if !interactions::record_match(conn, actor.user_id, target.user_id)? {
        tracing::warn!(
            actor_id = actor.user_id,
            target_id = target.user_id,
            "match row already present for a first-time like"
        );
    }

    Ok(DecisionOutcome {
        acknowledgment: Acknowledgment::Matched,
        actor_notification: Some(MatchNotification::about(actor.user_id, target)),
        target_notification: Some(MatchNotification::about(target.user_id, actor)),
    })
}

fn pass(conn: &mut SqliteConnection, actor: UserId, target: UserId) -> AppResult<DecisionOutcome> {
    if interactions::match_exists(conn, actor, target)? {
        return Ok(DecisionOutcome::ack(Acknowledgment::AlreadyMatched));
    }
    if interactions::has_passed(conn, actor, target)? {
        return Ok(DecisionOutcome::ack(Acknowledgment::AlreadyPassed));
    }
    let acknowledgment = if interactions::record_pass(conn, actor, target)? {
        Acknowledgment::Passed
    } else {
        Acknowledgment::AlreadyPassed
    };
    Ok(DecisionOutcome::ack(acknowledgment))
}
