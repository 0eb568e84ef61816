use crate::push::dispatch::dispatch_to_user;
use crate::shared::usecase::UseCase;
use dayfuse_domain::ScheduledNotification;
use dayfuse_infra::{DayfuseContext, PushPayload};
use futures::future::join_all;
use tracing::{info, warn};

/// One pass of the durable scheduler: every due notification is pushed to all
/// active devices of its user.
///
/// A notification is marked as sent once at least one device received it.
/// Otherwise it stays pending and is tried again on the next sweep, there is
/// no retry limit. Two overlapping sweeps can deliver the same notification
/// twice, the tag of the push payload makes the second one replace the first.
#[derive(Debug)]
pub struct ProcessPendingNotificationsUseCase;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepResult {
    pub due: usize,
    pub sent: usize,
    pub retry: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

enum Delivery {
    Sent,
    Retry,
}

async fn deliver(notification: &ScheduledNotification, ctx: &DayfuseContext, now: i64) -> Delivery {
    let payload = PushPayload::from(notification);
    let outcome = match dispatch_to_user(ctx, &notification.user_id, &payload).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(
                "Unable to dispatch notification: {}. Error: {:?}",
                notification.id, e
            );
            return Delivery::Retry;
        }
    };

    if outcome.sent == 0 {
        info!(
            "Notification: {} reached no device of user: {} ({} failed), retrying on next sweep",
            notification.id, notification.user_id, outcome.failed
        );
        return Delivery::Retry;
    }

    match ctx
        .repos
        .scheduled_notifications
        .mark_sent(&notification.id, now)
        .await
    {
        Ok(_) => Delivery::Sent,
        Err(e) => {
            warn!(
                "Notification: {} was delivered but could not be marked as sent. Error: {:?}",
                notification.id, e
            );
            Delivery::Retry
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessPendingNotificationsUseCase {
    type Response = SweepResult;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessPendingNotifications";

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .scheduled_notifications
            .find_due(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let deliveries = join_all(due.iter().map(|n| deliver(n, ctx, now))).await;

        let mut res = SweepResult {
            due: due.len(),
            ..Default::default()
        };
        for delivery in deliveries {
            match delivery {
                Delivery::Sent => res.sent += 1,
                Delivery::Retry => res.retry += 1,
            }
        }
        if res.due > 0 {
            info!("Notification sweep done: {:?}", res);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use crate::test_utils::{setup_context_at, StaticSys, HOUR};
    use dayfuse_domain::{PushSubscription, TaskId};
    use dayfuse_infra::{PushError, RecordingPushProvider};
    use std::sync::Arc;

    struct TestContext {
        ctx: DayfuseContext,
        push: Arc<RecordingPushProvider>,
    }

    fn setup(now: i64) -> TestContext {
        let mut ctx = setup_context_at(now);
        let push = Arc::new(RecordingPushProvider::new());
        ctx.push = push.clone();
        TestContext { ctx, push }
    }

    async fn subscribe(ctx: &DayfuseContext, endpoint: &str) -> PushSubscription {
        let subscription = PushSubscription::new(
            "user".into(),
            endpoint.into(),
            "p256dh".into(),
            "auth".into(),
            None,
            0,
        );
        ctx.repos
            .push_subscriptions
            .insert(&subscription)
            .await
            .unwrap();
        subscription
    }

    async fn schedule(ctx: &DayfuseContext, at: i64) -> ScheduledNotification {
        let notification = ScheduledNotification::new(
            "user".into(),
            TaskId::new("task"),
            "Dentist".into(),
            "Your task is due now".into(),
            at,
        );
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();
        notification
    }

    #[actix_web::test]
    async fn sends_due_notifications_once() {
        let TestContext { ctx, push } = setup(HOUR);
        subscribe(&ctx, "https://push.example.com/1").await;
        let due = schedule(&ctx, HOUR).await;
        let later = schedule(&ctx, 2 * HOUR).await;

        let res = execute(ProcessPendingNotificationsUseCase, &ctx).await.unwrap();
        assert_eq!(
            res,
            SweepResult {
                due: 1,
                sent: 1,
                retry: 0
            }
        );
        let sent = ctx
            .repos
            .scheduled_notifications
            .find(&due.id)
            .await
            .unwrap();
        assert!(sent.sent);
        assert_eq!(sent.sent_at, Some(HOUR));
        assert!(!ctx
            .repos
            .scheduled_notifications
            .find(&later.id)
            .await
            .unwrap()
            .sent);

        let (_, payload) = &push.sent()[0];
        assert_eq!(payload.tag, "task");
        assert_eq!(payload.title, "Dentist");

        // Nothing left to do
        let res = execute(ProcessPendingNotificationsUseCase, &ctx).await.unwrap();
        assert_eq!(res, SweepResult::default());
        assert_eq!(push.sent().len(), 1);
    }

    #[actix_web::test]
    async fn one_expired_device_does_not_block_delivery() {
        let TestContext { ctx, push } = setup(HOUR);
        let gone = subscribe(&ctx, "https://push.example.com/gone").await;
        subscribe(&ctx, "https://push.example.com/ok").await;
        push.fail_endpoint(&gone.endpoint, PushError::Gone);
        let notification = schedule(&ctx, HOUR).await;

        execute(ProcessPendingNotificationsUseCase, &ctx).await.unwrap();

        assert!(
            ctx.repos
                .scheduled_notifications
                .find(&notification.id)
                .await
                .unwrap()
                .sent
        );
        assert!(
            !ctx.repos
                .push_subscriptions
                .find(&gone.id)
                .await
                .unwrap()
                .is_active
        );
    }

    #[actix_web::test]
    async fn undelivered_notifications_stay_pending() {
        let TestContext { mut ctx, push } = setup(HOUR);
        let flaky = subscribe(&ctx, "https://push.example.com/flaky").await;
        push.fail_endpoint(&flaky.endpoint, PushError::Rejected("503".into()));
        let notification = schedule(&ctx, HOUR).await;

        let res = execute(ProcessPendingNotificationsUseCase, &ctx).await.unwrap();
        assert_eq!(res.retry, 1);

        // Retried on the next sweep
        ctx.sys = Arc::new(StaticSys::new(HOUR + 30_000));
        let res = execute(ProcessPendingNotificationsUseCase, &ctx).await.unwrap();
        assert_eq!(res.due, 1);
        assert!(
            !ctx.repos
                .scheduled_notifications
                .find(&notification.id)
                .await
                .unwrap()
                .sent
        );
    }

    #[actix_web::test]
    async fn users_without_devices_keep_notifications_pending() {
        let TestContext { ctx, .. } = setup(HOUR);
        schedule(&ctx, HOUR).await;
        let res = execute(ProcessPendingNotificationsUseCase, &ctx).await.unwrap();
        assert_eq!(res.retry, 1);
        assert_eq!(res.sent, 0);
    }
}
