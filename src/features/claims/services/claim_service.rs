use std::sync::Arc;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{is_unique_violation, AppError, Result};
use crate::features::auth::models::UserRole;
use crate::features::claims::dtos::{ClaimListItemDto, ClaimResponseDto, SubmitClaimResponseDto};
use crate::features::claims::models::{Claim, ClaimStatus, ClaimWithItem};
use crate::features::items::models::ItemStatus;
use crate::modules::mailer::Notifier;
use crate::shared::lifecycle::{self, ClaimApprovalNotice, Decision, LifecycleError};
use crate::shared::types::PaginationQuery;

const CLAIM_COLUMNS: &str = "id, claimant_id, item_id, message, status, created_at, updated_at";

/// Outcome of an admin claim decision. `email_sent` is populated only on
/// approval and reports the gateway's outcome, not the transition's.
#[derive(Debug)]
pub struct ClaimDecisionOutcome {
    pub claim: ClaimResponseDto,
    pub email_sent: Option<bool>,
}

/// Service for ownership claim operations
pub struct ClaimService {
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
}

impl ClaimService {
    pub fn new(pool: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        Self { pool, notifier }
    }

    /// Submit a claim against an approved item.
    ///
    /// The duplicate pre-check and the insert run in one transaction; a
    /// concurrent duplicate that slips past the pre-check loses on the
    /// pending-claims unique index and maps to the same conflict.
    pub async fn submit(
        &self,
        claimant_id: Uuid,
        item_id: Uuid,
        message: &str,
    ) -> Result<SubmitClaimResponseDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin claim transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let claimant: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
            .bind(claimant_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up claimant: {:?}", e);
                AppError::Database(e)
            })?;
        if claimant.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let item: Option<(Uuid, ItemStatus)> =
            sqlx::query_as("SELECT owner_id, status FROM items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to look up claimed item: {:?}", e);
                    AppError::Database(e)
                })?;
        let (owner_id, item_status) =
            item.ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        let has_pending: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM claims WHERE claimant_id = $1 AND item_id = $2 AND status = 'pending')",
        )
        .bind(claimant_id)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check for pending duplicate claim: {:?}", e);
            AppError::Database(e)
        })?;

        lifecycle::validate_claim_submission(
            item_status,
            owner_id,
            claimant_id,
            has_pending,
            message,
        )?;

        let claim = sqlx::query_as::<_, Claim>(&format!(
            r#"
            INSERT INTO claims (claimant_id, item_id, message)
            VALUES ($1, $2, $3)
            RETURNING {CLAIM_COLUMNS}
            "#,
        ))
        .bind(claimant_id)
        .bind(item_id)
        .bind(message.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::from(LifecycleError::DuplicatePendingClaim)
            } else {
                tracing::error!("Failed to create claim: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit claim transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Claim submitted: id={}, item={}, claimant={}",
            claim.id,
            claim.item_id,
            claim.claimant_id
        );

        Ok(SubmitClaimResponseDto {
            claim_id: claim.id,
            item_id: claim.item_id,
            status: claim.status,
        })
    }

    /// List claims with their item names, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<ClaimStatus>,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ClaimListItemDto>, i64)> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM claims WHERE 1=1");
        if let Some(status) = status {
            count_qb.push(" AND status = ");
            count_qb.push_bind(status);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count claims: {:?}", e);
                AppError::Database(e)
            })?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT c.id, c.claimant_id, c.item_id, i.item_name, c.message, c.status, \
             c.created_at, c.updated_at \
             FROM claims c JOIN items i ON i.id = c.item_id WHERE 1=1",
        );
        if let Some(status) = status {
            qb.push(" AND c.status = ");
            qb.push_bind(status);
        }
        qb.push(" ORDER BY c.created_at DESC OFFSET ");
        qb.push_bind(pagination.offset());
        qb.push(" LIMIT ");
        qb.push_bind(pagination.limit());

        let claims = qb
            .build_query_as::<ClaimWithItem>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list claims: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((claims.into_iter().map(|c| c.into()).collect(), total))
    }

    /// Admin decision on a pending claim. Approval additionally notifies the
    /// item's reporter; the notification outcome is reported alongside the
    /// transition and never reverses it.
    pub async fn decide(
        &self,
        admin_id: Uuid,
        claim_id: Uuid,
        decision: Decision,
    ) -> Result<ClaimDecisionOutcome> {
        let current: Option<ClaimStatus> =
            sqlx::query_scalar("SELECT status FROM claims WHERE id = $1")
                .bind(claim_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch claim before decision: {:?}", e);
                    AppError::Database(e)
                })?;

        let current = current.ok_or_else(|| AppError::NotFound("Claim not found".to_string()))?;

        let role = self.fetch_user_role(admin_id).await?;
        lifecycle::ensure_admin(role)?;

        let next = lifecycle::claim_decision(current, decision)?;

        // Assemble the owner notification before the transition is applied.
        // Once the status change is committed, only the delivery outcome may
        // still vary; a failure here aborts with nothing persisted.
        let notice = if next == ClaimStatus::Approved {
            self.fetch_approval_notice(claim_id).await?
        } else {
            None
        };

        // The status guard makes concurrent decisions lose cleanly instead
        // of double-applying (and double-notifying).
        let claim = sqlx::query_as::<_, Claim>(&format!(
            r#"
            UPDATE claims SET status = $2, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {CLAIM_COLUMNS}
            "#,
        ))
        .bind(claim_id)
        .bind(next)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to apply claim decision: {:?}", e);
            AppError::Database(e)
        })?;

        let claim = claim.ok_or_else(|| {
            AppError::Conflict("Claim has already been decided".to_string())
        })?;

        tracing::info!(
            "Claim decision applied: id={}, status={}, admin={}",
            claim.id,
            claim.status,
            admin_id
        );

        let email_sent = if claim.status == ClaimStatus::Approved {
            Some(Self::notification_outcome(self.notifier.as_ref(), notice.as_ref()).await)
        } else {
            None
        };

        Ok(ClaimDecisionOutcome {
            claim: claim.into(),
            email_sent,
        })
    }

    /// Fetch every field the owner notification needs in one explicit join;
    /// nothing is lazily reached-through after this point. A vanished claim
    /// (owner deleted the item underneath us) comes back as `None`.
    async fn fetch_approval_notice(&self, claim_id: Uuid) -> Result<Option<ClaimApprovalNotice>> {
        let row: Option<(String, String, String, String, String, String)> = sqlx::query_as(
            r#"
            SELECT i.item_name, o.email, o.first_name, u.first_name, u.last_name, c.message
            FROM claims c
            JOIN items i ON i.id = c.item_id
            JOIN users o ON o.id = i.owner_id
            JOIN users u ON u.id = c.claimant_id
            WHERE c.id = $1
            "#,
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assemble notification context: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(row.map(
            |(item_name, owner_email, owner_first_name, claimant_first_name, claimant_last_name, message)| {
                ClaimApprovalNotice::compose(
                    &owner_email,
                    &owner_first_name,
                    &item_name,
                    &claimant_first_name,
                    &claimant_last_name,
                    &message,
                )
            },
        ))
    }

    /// Report the notification outcome for a committed approval. A missing
    /// context degrades to "not sent" exactly like a delivery failure; the
    /// approval itself must never be reported as failed from here.
    pub(crate) async fn notification_outcome(
        notifier: &dyn Notifier,
        notice: Option<&ClaimApprovalNotice>,
    ) -> bool {
        match notice {
            Some(notice) => Self::deliver_notice(notifier, notice).await,
            None => {
                tracing::warn!("Claim approval notification skipped: context unavailable");
                false
            }
        }
    }

    /// Deliver a composed notice, reporting the outcome as a flag. Delivery
    /// failure is logged, never propagated.
    pub(crate) async fn deliver_notice(
        notifier: &dyn Notifier,
        notice: &ClaimApprovalNotice,
    ) -> bool {
        match notifier
            .notify(&notice.to, &notice.subject, &notice.body)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Claim approval notification failed: {}", e);
                false
            }
        }
    }

    async fn fetch_user_role(&self, user_id: Uuid) -> Result<UserRole> {
        let role: Option<UserRole> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user role: {:?}", e);
                AppError::Database(e)
            })?;

        role.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::mailer::NotifyError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, to: &str, subject: &str, _body: &str) -> std::result::Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Transport("connection refused".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    fn notice() -> ClaimApprovalNotice {
        ClaimApprovalNotice::compose(
            "finder@campus.edu",
            "Alice",
            "Blue Backpack",
            "Bob",
            "Smith",
            "It has my initials stitched inside",
        )
    }

    #[tokio::test]
    async fn test_deliver_notice_reports_gateway_success() {
        let notifier = RecordingNotifier::new(false);
        assert!(ClaimService::deliver_notice(&notifier, &notice()).await);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "finder@campus.edu");
        assert!(sent[0].1.contains("Blue Backpack"));
    }

    #[tokio::test]
    async fn test_deliver_notice_swallows_gateway_failure() {
        let notifier = RecordingNotifier::new(true);
        // A failed delivery is reported as false, never as an error
        assert!(!ClaimService::deliver_notice(&notifier, &notice()).await);
    }

    #[tokio::test]
    async fn test_missing_notification_context_reports_unsent() {
        // The claim row can vanish between the status fetch and the context
        // join (owner deletes the item, claims cascade). The approval must
        // still be reported as a success with email_sent = false.
        let notifier = RecordingNotifier::new(false);
        assert!(!ClaimService::notification_outcome(&notifier, None).await);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_outcome_with_context_delivers() {
        let notifier = RecordingNotifier::new(false);
        let notice = notice();
        assert!(ClaimService::notification_outcome(&notifier, Some(&notice)).await);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }
}
