use dayfuse_api::{process_pending_notifications, Application, SweepResult};
use dayfuse_infra::{DayfuseContext, ISys, RecordingPushProvider};
use dayfuse_sdk::DayfuseSDK;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

pub const MINUTE: i64 = 1000 * 60;

/// Clock the tests move by hand
pub struct TestSys {
    now: AtomicI64,
}

impl TestSys {
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl ISys for TestSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

pub struct TestApp {
    pub ctx: DayfuseContext,
    pub push: Arc<RecordingPushProvider>,
    pub sys: Arc<TestSys>,
}

impl TestApp {
    pub fn now(&self) -> i64 {
        self.sys.get_timestamp_millis()
    }

    pub fn advance(&self, millis: i64) {
        self.sys.set(self.now() + millis);
    }

    /// Runs one sweep of the durable scheduler right away
    pub async fn sweep(&self) -> SweepResult {
        process_pending_notifications(&self.ctx)
            .await
            .expect("Sweep to succeed")
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, DayfuseSDK, String) {
    let mut ctx = DayfuseContext::create_inmemory();
    ctx.config.port = 0; // Random port
    // The tests run sweeps themselves
    ctx.config.notification_sweep_interval_secs = 60 * 60;

    let push = Arc::new(RecordingPushProvider::new());
    ctx.push = push.clone();
    let sys = Arc::new(TestSys {
        now: AtomicI64::new(1_748_678_400_000), // 2025-05-31T08:00:00Z
    });
    ctx.sys = sys.clone();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { ctx, push, sys };
    let sdk = DayfuseSDK::new(address.clone());
    (app, sdk, address)
}
