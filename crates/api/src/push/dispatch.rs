use dayfuse_domain::PushSubscription;
use dayfuse_infra::{DayfuseContext, PushError, PushPayload};
use futures::future::join_all;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub sent: usize,
    pub failed: usize,
    /// Subscriptions deactivated because the push service no longer knows them
    pub deactivated: usize,
}

/// Sends the payload to every active subscription of the user.
///
/// Every subscription is tried independently: one failing device never keeps
/// the others from receiving the message. Expired subscriptions are
/// deactivated, any other failure only counts as failed.
pub async fn dispatch_to_user(
    ctx: &DayfuseContext,
    user_id: &str,
    payload: &PushPayload,
) -> anyhow::Result<DispatchOutcome> {
    let subscriptions = ctx
        .repos
        .push_subscriptions
        .find_active_by_user(user_id)
        .await?;

    let sends = subscriptions
        .iter()
        .map(|subscription| ctx.push.send(subscription, payload));
    let results = join_all(sends).await;

    let mut outcome = DispatchOutcome::default();
    for (subscription, res) in subscriptions.iter().zip(results) {
        match res {
            Ok(()) => outcome.sent += 1,
            Err(PushError::Gone) => {
                outcome.failed += 1;
                deactivate(ctx, subscription).await;
                outcome.deactivated += 1;
            }
            Err(e) => {
                outcome.failed += 1;
                warn!(
                    "Unable to push to subscription: {} of user: {}. Error: {:?}",
                    subscription.id, user_id, e
                );
            }
        }
    }

    Ok(outcome)
}

async fn deactivate(ctx: &DayfuseContext, subscription: &PushSubscription) {
    info!(
        "Deactivating expired push subscription: {} of user: {}",
        subscription.id, subscription.user_id
    );
    if let Err(e) = ctx
        .repos
        .push_subscriptions
        .deactivate(&subscription.id)
        .await
    {
        warn!(
            "Unable to deactivate push subscription: {}. Error: {:?}",
            subscription.id, e
        );
    }
}
