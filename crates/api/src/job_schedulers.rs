use crate::{
    notification::process_pending_notifications::ProcessPendingNotificationsUseCase,
    shared::usecase::execute,
};
use actix_web::rt::time::interval;
use dayfuse_infra::DayfuseContext;
use std::time::Duration;
use tracing::info;

/// Sweeps for due notifications on a fixed interval. A notification is
/// therefore delivered up to one interval after its scheduled time.
pub fn start_send_notifications_job(ctx: DayfuseContext) {
    actix_web::rt::spawn(async move {
        let period = Duration::from_secs(ctx.config.notification_sweep_interval_secs);
        info!("Sweeping for due notifications every {:?}", period);
        let mut sweep_interval = interval(period);
        loop {
            sweep_interval.tick().await;
            // Errors are logged by the executor and retried on the next tick
            let _ = execute(ProcessPendingNotificationsUseCase, &ctx).await;
        }
    });
}
