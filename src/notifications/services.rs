use sqlx::PgPool;
use tracing::{info, warn};

use crate::notifications::dto::{DispatchSummary, Screen};
use crate::notifications::push::{PushClient, PushMessage, PushTicket, DEVICE_NOT_REGISTERED};
use crate::notifications::repo::{self, NewNotificationLog, PushToken};

/// Maximum messages per submission accepted by the push endpoint.
const BATCH_SIZE: usize = 100;

pub fn build_message(
    token: &str,
    title: &str,
    body: &str,
    screen: Screen,
    params: Option<&serde_json::Value>,
) -> PushMessage {
    let mut data = serde_json::json!({ "screen": screen.as_str() });
    if let Some(params) = params {
        data["params"] = params.clone();
    }
    PushMessage {
        to: token.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        data,
    }
}

pub struct DispatchOutcome {
    pub logs: Vec<NewNotificationLog>,
    pub stale_tokens: Vec<String>,
    pub sent: usize,
    pub failed: usize,
}

/// Pair each token with its ticket and decide what to log and what to prune.
pub fn merge_tickets(
    tokens: &[PushToken],
    tickets: &[PushTicket],
    title: &str,
    body: &str,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome {
        logs: Vec::with_capacity(tokens.len()),
        stale_tokens: Vec::new(),
        sent: 0,
        failed: 0,
    };
    for (token, ticket) in tokens.iter().zip(tickets) {
        let (status, error_code) = if ticket.ok() {
            outcome.sent += 1;
            ("sent".to_string(), None)
        } else {
            outcome.failed += 1;
            let code = ticket.error_code().unwrap_or("unknown");
            if code == DEVICE_NOT_REGISTERED {
                outcome.stale_tokens.push(token.token.clone());
            }
            ("failed".to_string(), Some(code.to_string()))
        };
        outcome.logs.push(NewNotificationLog {
            user_id: token.user_id,
            token: token.token.clone(),
            title: title.to_string(),
            body: body.to_string(),
            status,
            error_code,
        });
    }
    // Tokens past the end of a short ticket list count as failures too.
    for token in tokens.iter().skip(tickets.len()) {
        outcome.failed += 1;
        outcome.logs.push(NewNotificationLog {
            user_id: token.user_id,
            token: token.token.clone(),
            title: title.to_string(),
            body: body.to_string(),
            status: "failed".to_string(),
            error_code: Some("missing ticket".to_string()),
        });
    }
    outcome
}

/// Send one notification to every token, in batches, then log results and
/// drop tokens the endpoint reported as no longer registered.
pub async fn dispatch(
    db: &PgPool,
    push: &dyn PushClient,
    tokens: Vec<PushToken>,
    title: &str,
    body: &str,
    screen: Screen,
    params: Option<&serde_json::Value>,
) -> anyhow::Result<DispatchSummary> {
    let mut summary = DispatchSummary {
        sent: 0,
        failed: 0,
        pruned: 0,
    };

    for batch in tokens.chunks(BATCH_SIZE) {
        let messages: Vec<PushMessage> = batch
            .iter()
            .map(|t| build_message(&t.token, title, body, screen, params))
            .collect();

        let tickets = match push.send(&messages).await {
            Ok(tickets) => tickets,
            Err(err) => {
                warn!(error = %err, count = batch.len(), "push batch rejected");
                let logs: Vec<NewNotificationLog> = batch
                    .iter()
                    .map(|t| NewNotificationLog {
                        user_id: t.user_id,
                        token: t.token.clone(),
                        title: title.to_string(),
                        body: body.to_string(),
                        status: "failed".to_string(),
                        error_code: Some(err.to_string()),
                    })
                    .collect();
                repo::record_notifications(db, &logs).await?;
                summary.failed += batch.len();
                continue;
            }
        };

        let outcome = merge_tickets(batch, &tickets, title, body);
        repo::record_notifications(db, &outcome.logs).await?;
        let pruned = PushToken::prune(db, &outcome.stale_tokens).await?;

        summary.sent += outcome.sent;
        summary.failed += outcome.failed;
        summary.pruned += pruned as usize;
    }

    info!(
        sent = summary.sent,
        failed = summary.failed,
        pruned = summary.pruned,
        "notification dispatched"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::push::PushTicketDetails;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn token(value: &str) -> PushToken {
        PushToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: value.to_string(),
            platform: "ios".to_string(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn ok_ticket() -> PushTicket {
        PushTicket {
            status: "ok".to_string(),
            id: Some("ticket-1".to_string()),
            message: None,
            details: None,
        }
    }

    fn error_ticket(code: &str) -> PushTicket {
        PushTicket {
            status: "error".to_string(),
            id: None,
            message: Some("delivery failed".to_string()),
            details: Some(PushTicketDetails {
                error: Some(code.to_string()),
            }),
        }
    }

    #[test]
    fn merge_counts_sent_and_failed() {
        let tokens = vec![token("a"), token("b"), token("c")];
        let tickets = vec![ok_ticket(), error_ticket("MessageTooBig"), ok_ticket()];
        let outcome = merge_tickets(&tokens, &tickets, "t", "b");
        assert_eq!(outcome.sent, 2);
        assert_eq!(outcome.failed, 1);
        assert!(outcome.stale_tokens.is_empty());
        assert_eq!(outcome.logs.len(), 3);
        assert_eq!(outcome.logs[1].error_code.as_deref(), Some("MessageTooBig"));
    }

    #[test]
    fn merge_flags_unregistered_tokens_for_pruning() {
        let tokens = vec![token("live"), token("stale")];
        let tickets = vec![ok_ticket(), error_ticket(DEVICE_NOT_REGISTERED)];
        let outcome = merge_tickets(&tokens, &tickets, "t", "b");
        assert_eq!(outcome.stale_tokens, vec!["stale".to_string()]);
        assert_eq!(outcome.failed, 1);
    }

    #[test]
    fn merge_treats_missing_tickets_as_failures() {
        let tokens = vec![token("a"), token("b")];
        let tickets = vec![ok_ticket()];
        let outcome = merge_tickets(&tokens, &tickets, "t", "b");
        assert_eq!(outcome.sent, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.logs[1].error_code.as_deref(), Some("missing ticket"));
    }

    #[test]
    fn message_data_carries_screen_and_params() {
        let params = serde_json::json!({ "guide_id": "42" });
        let msg = build_message("tok", "Title", "Body", Screen::Guides, Some(&params));
        assert_eq!(msg.data["screen"], "guides");
        assert_eq!(msg.data["params"]["guide_id"], "42");

        let plain = build_message("tok", "Title", "Body", Screen::Home, None);
        assert_eq!(plain.data["screen"], "home");
        assert!(plain.data.get("params").is_none());
    }
}
