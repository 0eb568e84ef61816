mod error;
mod job_schedulers;
mod notification;
mod push;
mod shared;
mod status;
mod task;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use dayfuse_infra::DayfuseContext;
pub use error::DayfuseError;
use job_schedulers::start_send_notifications_job;
use notification::process_pending_notifications::ProcessPendingNotificationsUseCase;
pub use notification::process_pending_notifications::SweepResult;
use shared::usecase::execute;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    notification::configure_routes(cfg);
    push::configure_routes(cfg);
    status::configure_routes(cfg);
    task::configure_routes(cfg);
}

/// Runs a single sweep for due notifications outside of the job scheduler
pub async fn process_pending_notifications(ctx: &DayfuseContext) -> Option<SweepResult> {
    execute(ProcessPendingNotificationsUseCase, ctx).await.ok()
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: DayfuseContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: DayfuseContext) {
        start_send_notifications_job(context);
    }

    async fn configure_server(context: DayfuseContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

#[cfg(test)]
mod test_utils {
    use dayfuse_domain::{ScheduledNotification, TaskId, ID};
    use dayfuse_infra::{DayfuseContext, DeleteResult, IScheduledNotificationRepo, ISys};
    use std::sync::Arc;

    pub const HOUR: i64 = 1000 * 60 * 60;

    pub struct StaticSys {
        now: i64,
    }

    impl StaticSys {
        pub fn new(now: i64) -> Self {
            Self { now }
        }
    }

    impl ISys for StaticSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.now
        }
    }

    /// Inmemory context with the clock stopped at `now`
    pub fn setup_context_at(now: i64) -> DayfuseContext {
        let mut ctx = DayfuseContext::create_inmemory();
        ctx.sys = Arc::new(StaticSys::new(now));
        ctx
    }

    /// Notification store whose database is gone. Every call fails.
    pub struct UnavailableNotificationRepo;

    fn unavailable<T>() -> anyhow::Result<T> {
        Err(anyhow::anyhow!("connection refused"))
    }

    #[async_trait::async_trait]
    impl IScheduledNotificationRepo for UnavailableNotificationRepo {
        async fn insert(&self, _: &ScheduledNotification) -> anyhow::Result<()> {
            unavailable()
        }
        async fn find(&self, _: &ID) -> Option<ScheduledNotification> {
            None
        }
        async fn find_due(&self, _: i64) -> anyhow::Result<Vec<ScheduledNotification>> {
            unavailable()
        }
        async fn find_pending_by_user(&self, _: &str) -> anyhow::Result<Vec<ScheduledNotification>> {
            unavailable()
        }
        async fn find_pending_by_task(&self, _: &TaskId) -> anyhow::Result<Vec<ScheduledNotification>> {
            unavailable()
        }
        async fn mark_sent(&self, _: &ID, _: i64) -> anyhow::Result<bool> {
            unavailable()
        }
        async fn delete_pending(&self, _: &ID) -> anyhow::Result<Option<ScheduledNotification>> {
            unavailable()
        }
        async fn delete_pending_by_task(&self, _: &TaskId) -> anyhow::Result<DeleteResult> {
            unavailable()
        }
    }

    /// Same as `setup_context_at` but the notification store is down
    pub fn setup_context_without_notification_store(now: i64) -> DayfuseContext {
        let mut ctx = setup_context_at(now);
        ctx.repos.scheduled_notifications = Arc::new(UnavailableNotificationRepo);
        ctx
    }
}
