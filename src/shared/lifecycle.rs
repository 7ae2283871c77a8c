//! Lifecycle engine for item reports and ownership claims.
//!
//! Both entities share the shape `pending -> approved | rejected`, with
//! `pending` as the sole initial state and `approved`/`rejected` terminal.
//! Everything here is pure decision logic over entity snapshots: services
//! fetch the current state explicitly, consult the engine, then persist the
//! outcome. The engine never touches the database and never sends email; for
//! claim approval it hands back a composed [`ClaimApprovalNotice`] whose
//! delivery outcome must not affect the transition itself.
//!
//! Validation failures are ranked in a fixed precedence so the most
//! fundamental failure wins when several hold at once:
//! existence (checked by the stores) -> state precondition -> authorization
//! -> uniqueness -> content validation.

use thiserror::Error;
use uuid::Uuid;

use crate::features::auth::models::UserRole;
use crate::features::claims::models::ClaimStatus;
use crate::features::items::models::ItemStatus;
use crate::shared::constants::{CLAIM_MESSAGE_MAX_LEN, CLAIM_MESSAGE_MIN_LEN};

/// Admin verdict on a pending item or claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Only administrators can approve or reject submissions")]
    AdminRequired,

    #[error("Item has already been {0}")]
    ItemAlreadyDecided(ItemStatus),

    #[error("Claim has already been {0}")]
    ClaimAlreadyDecided(ClaimStatus),

    #[error("Only approved items can be marked as found")]
    MarkFoundRequiresApproval,

    #[error("Cannot claim items that are not approved")]
    ItemNotClaimable,

    #[error("You cannot claim your own item")]
    SelfClaim,

    #[error("You have already claimed this item")]
    DuplicatePendingClaim,

    #[error("Claim message must be at least {CLAIM_MESSAGE_MIN_LEN} characters")]
    MessageTooShort,

    #[error("Claim message must not exceed {CLAIM_MESSAGE_MAX_LEN} characters")]
    MessageTooLong,

    #[error("Item not found or unauthorized")]
    NotOwner,
}

impl From<LifecycleError> for crate::core::error::AppError {
    fn from(err: LifecycleError) -> Self {
        use crate::core::error::AppError;

        let msg = err.to_string();
        match err {
            LifecycleError::AdminRequired => AppError::Forbidden(msg),
            LifecycleError::ItemAlreadyDecided(_)
            | LifecycleError::ClaimAlreadyDecided(_)
            | LifecycleError::ItemNotClaimable
            | LifecycleError::SelfClaim
            | LifecycleError::DuplicatePendingClaim => AppError::Conflict(msg),
            LifecycleError::MessageTooShort | LifecycleError::MessageTooLong => {
                AppError::Validation(msg)
            }
            LifecycleError::MarkFoundRequiresApproval => AppError::BadRequest(msg),
            // Owner mismatch answers like a missing row so ids cannot be probed
            LifecycleError::NotOwner => AppError::NotFound(msg),
        }
    }
}

/// `decide_item` and `decide_claim` are admin-only operations.
pub fn ensure_admin(role: UserRole) -> Result<(), LifecycleError> {
    match role {
        UserRole::Admin => Ok(()),
        UserRole::Student => Err(LifecycleError::AdminRequired),
    }
}

/// Compute the item status resulting from an admin decision.
///
/// Decisions are accepted only from `pending`; approved and rejected are
/// terminal, so re-deciding is a conflict rather than a silent overwrite.
pub fn item_decision(current: ItemStatus, decision: Decision) -> Result<ItemStatus, LifecycleError> {
    match current {
        ItemStatus::Pending => Ok(match decision {
            Decision::Approve => ItemStatus::Approved,
            Decision::Reject => ItemStatus::Rejected,
        }),
        terminal => Err(LifecycleError::ItemAlreadyDecided(terminal)),
    }
}

/// Compute the claim status resulting from an admin decision.
/// Same pending-only rule as [`item_decision`].
pub fn claim_decision(
    current: ClaimStatus,
    decision: Decision,
) -> Result<ClaimStatus, LifecycleError> {
    match current {
        ClaimStatus::Pending => Ok(match decision {
            Decision::Approve => ClaimStatus::Approved,
            Decision::Reject => ClaimStatus::Rejected,
        }),
        terminal => Err(LifecycleError::ClaimAlreadyDecided(terminal)),
    }
}

/// Only the owner may act on an item (edit, delete). A non-owner gets the
/// same answer as a missing item, so ids cannot be probed.
pub fn authorize_owner(owner_id: Uuid, actor_id: Uuid) -> Result<(), LifecycleError> {
    if owner_id == actor_id {
        Ok(())
    } else {
        Err(LifecycleError::NotOwner)
    }
}

/// `found` may flip to true only on an approved item, and only by its owner.
/// This keeps the invariant `found == true  =>  status == approved`.
pub fn authorize_mark_found(
    owner_id: Uuid,
    status: ItemStatus,
    actor_id: Uuid,
) -> Result<(), LifecycleError> {
    authorize_owner(owner_id, actor_id)?;
    if status != ItemStatus::Approved {
        return Err(LifecycleError::MarkFoundRequiresApproval);
    }
    Ok(())
}

/// Gate a claim submission against an item snapshot.
///
/// Precedence when several violations hold simultaneously: the item must be
/// approved, then the claimant must not be the owner, then no pending claim
/// from the same claimant may exist, and only then is the message content
/// checked. Item existence is checked upstream by the store.
pub fn validate_claim_submission(
    item_status: ItemStatus,
    item_owner_id: Uuid,
    claimant_id: Uuid,
    has_pending_claim: bool,
    message: &str,
) -> Result<(), LifecycleError> {
    if item_status != ItemStatus::Approved {
        return Err(LifecycleError::ItemNotClaimable);
    }
    if claimant_id == item_owner_id {
        return Err(LifecycleError::SelfClaim);
    }
    if has_pending_claim {
        return Err(LifecycleError::DuplicatePendingClaim);
    }

    let trimmed = message.trim();
    if trimmed.chars().count() < CLAIM_MESSAGE_MIN_LEN {
        return Err(LifecycleError::MessageTooShort);
    }
    if trimmed.chars().count() > CLAIM_MESSAGE_MAX_LEN {
        return Err(LifecycleError::MessageTooLong);
    }

    Ok(())
}

/// Notification request emitted when a claim transitions to approved.
/// Addressed to the item's reporter; delivery is best-effort and its outcome
/// is reported alongside the transition, never instead of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimApprovalNotice {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ClaimApprovalNotice {
    pub fn compose(
        owner_email: &str,
        owner_first_name: &str,
        item_name: &str,
        claimant_first_name: &str,
        claimant_last_name: &str,
        claim_message: &str,
    ) -> Self {
        let subject = format!("Your found item '{}' has been claimed", item_name);
        let body = format!(
            "Hello {},<br><br>\
             Your found item <b>{}</b> has been claimed by {} {}.<br><br>\
             <b>Message from claimer:</b> {}<br><br>\
             Please contact the claimer to arrange item return.<br><br>\
             Regards,<br>Campus Lost & Found Team",
            owner_first_name, item_name, claimant_first_name, claimant_last_name, claim_message
        );

        Self {
            to: owner_email.to_string(),
            subject,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Uuid {
        Uuid::from_u128(1)
    }

    fn claimant() -> Uuid {
        Uuid::from_u128(2)
    }

    fn long_message() -> String {
        "I lost this near the library, matches serial X1234".to_string()
    }

    #[test]
    fn test_ensure_admin() {
        assert!(ensure_admin(UserRole::Admin).is_ok());
        assert_eq!(
            ensure_admin(UserRole::Student),
            Err(LifecycleError::AdminRequired)
        );
    }

    #[test]
    fn test_item_decision_from_pending() {
        assert_eq!(
            item_decision(ItemStatus::Pending, Decision::Approve),
            Ok(ItemStatus::Approved)
        );
        assert_eq!(
            item_decision(ItemStatus::Pending, Decision::Reject),
            Ok(ItemStatus::Rejected)
        );
    }

    #[test]
    fn test_item_decision_terminal_is_conflict() {
        assert_eq!(
            item_decision(ItemStatus::Approved, Decision::Reject),
            Err(LifecycleError::ItemAlreadyDecided(ItemStatus::Approved))
        );
        assert_eq!(
            item_decision(ItemStatus::Rejected, Decision::Approve),
            Err(LifecycleError::ItemAlreadyDecided(ItemStatus::Rejected))
        );
    }

    #[test]
    fn test_claim_decision_from_pending() {
        assert_eq!(
            claim_decision(ClaimStatus::Pending, Decision::Approve),
            Ok(ClaimStatus::Approved)
        );
        assert_eq!(
            claim_decision(ClaimStatus::Pending, Decision::Reject),
            Ok(ClaimStatus::Rejected)
        );
    }

    #[test]
    fn test_claim_decision_terminal_is_conflict() {
        assert_eq!(
            claim_decision(ClaimStatus::Approved, Decision::Approve),
            Err(LifecycleError::ClaimAlreadyDecided(ClaimStatus::Approved))
        );
        assert_eq!(
            claim_decision(ClaimStatus::Rejected, Decision::Reject),
            Err(LifecycleError::ClaimAlreadyDecided(ClaimStatus::Rejected))
        );
    }

    #[test]
    fn test_mark_found_requires_owner_then_approval() {
        // Non-owner is refused before the status is even considered
        assert_eq!(
            authorize_mark_found(owner(), ItemStatus::Pending, claimant()),
            Err(LifecycleError::NotOwner)
        );
        assert_eq!(
            authorize_mark_found(owner(), ItemStatus::Pending, owner()),
            Err(LifecycleError::MarkFoundRequiresApproval)
        );
        assert_eq!(
            authorize_mark_found(owner(), ItemStatus::Rejected, owner()),
            Err(LifecycleError::MarkFoundRequiresApproval)
        );
        assert!(authorize_mark_found(owner(), ItemStatus::Approved, owner()).is_ok());
    }

    #[test]
    fn test_mark_found_error_message() {
        let err = authorize_mark_found(owner(), ItemStatus::Pending, owner()).unwrap_err();
        assert_eq!(err.to_string(), "Only approved items can be marked as found");
    }

    #[test]
    fn test_mark_found_failure_is_bad_request() {
        use crate::core::error::AppError;

        // Both mark-found failure paths answer with the same status class
        let err = AppError::from(LifecycleError::MarkFoundRequiresApproval);
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_claim_submission_happy_path() {
        assert!(validate_claim_submission(
            ItemStatus::Approved,
            owner(),
            claimant(),
            false,
            &long_message(),
        )
        .is_ok());
    }

    #[test]
    fn test_claim_requires_approved_item() {
        for status in [ItemStatus::Pending, ItemStatus::Rejected] {
            assert_eq!(
                validate_claim_submission(status, owner(), claimant(), false, &long_message()),
                Err(LifecycleError::ItemNotClaimable)
            );
        }
    }

    #[test]
    fn test_self_claim_refused() {
        assert_eq!(
            validate_claim_submission(ItemStatus::Approved, owner(), owner(), false, &long_message()),
            Err(LifecycleError::SelfClaim)
        );
    }

    #[test]
    fn test_duplicate_pending_claim_refused() {
        assert_eq!(
            validate_claim_submission(
                ItemStatus::Approved,
                owner(),
                claimant(),
                true,
                &long_message()
            ),
            Err(LifecycleError::DuplicatePendingClaim)
        );
    }

    #[test]
    fn test_message_length_checked_last() {
        assert_eq!(
            validate_claim_submission(ItemStatus::Approved, owner(), claimant(), false, "short"),
            Err(LifecycleError::MessageTooShort)
        );
        // Whitespace padding does not count toward the minimum
        let padded = format!("   {}   ", "x".repeat(CLAIM_MESSAGE_MIN_LEN - 1));
        assert_eq!(
            validate_claim_submission(ItemStatus::Approved, owner(), claimant(), false, &padded),
            Err(LifecycleError::MessageTooShort)
        );
        let oversized = "x".repeat(CLAIM_MESSAGE_MAX_LEN + 1);
        assert_eq!(
            validate_claim_submission(ItemStatus::Approved, owner(), claimant(), false, &oversized),
            Err(LifecycleError::MessageTooLong)
        );
    }

    #[test]
    fn test_precedence_most_fundamental_failure_wins() {
        // Everything is wrong at once: not approved, self-claim, duplicate,
        // short message. The state precondition must be the one reported.
        assert_eq!(
            validate_claim_submission(ItemStatus::Pending, owner(), owner(), true, "x"),
            Err(LifecycleError::ItemNotClaimable)
        );
        // Approved item, but still self-claim + duplicate + short message:
        // authorization outranks uniqueness and content.
        assert_eq!(
            validate_claim_submission(ItemStatus::Approved, owner(), owner(), true, "x"),
            Err(LifecycleError::SelfClaim)
        );
        // Authorization fine: uniqueness outranks content.
        assert_eq!(
            validate_claim_submission(ItemStatus::Approved, owner(), claimant(), true, "x"),
            Err(LifecycleError::DuplicatePendingClaim)
        );
    }

    #[test]
    fn test_claim_approval_notice_names_item_and_claimant() {
        let notice = ClaimApprovalNotice::compose(
            "finder@campus.edu",
            "Alice",
            "Blue Backpack",
            "Bob",
            "Smith",
            "It has my initials stitched inside the front pocket",
        );

        assert_eq!(notice.to, "finder@campus.edu");
        assert!(notice.subject.contains("Blue Backpack"));
        assert!(notice.body.contains("Hello Alice"));
        assert!(notice.body.contains("Bob Smith"));
        assert!(notice
            .body
            .contains("It has my initials stitched inside the front pocket"));
    }
}
