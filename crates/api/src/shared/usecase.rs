use dayfuse_infra::DayfuseContext;
use futures::future::join_all;
use std::fmt::Debug;
use tracing::{debug, error};

/// A follow-up action that runs after a `UseCase` succeeded, e.g. keeping
/// the scheduled notifications of a task in line with the task itself.
///
/// Subscribers see only the successful response. They cannot fail the
/// request that triggered them, so they log their own errors.
#[async_trait::async_trait(?Send)]
pub trait Subscriber<U: UseCase> {
    async fn notify(&self, response: &U::Response, ctx: &DayfuseContext);
}

/// One operation of the relay: a handler request or a sweep pass.
#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response: Debug;
    type Error: Debug;

    /// Span label for the operation
    const NAME: &'static str;

    async fn execute(&mut self, ctx: &DayfuseContext) -> Result<Self::Response, Self::Error>;

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        Vec::new()
    }
}

/// Runs `usecase` inside its own span and, on success, fans the response
/// out to every subscriber of that use case.
#[tracing::instrument(name = "dayfuse.usecase", skip(usecase, ctx), fields(usecase = %U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &DayfuseContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
{
    let outcome = usecase.execute(ctx).await;
    match &outcome {
        Ok(response) => notify_subscribers::<U>(response, ctx).await,
        Err(e) => error!(usecase = %U::NAME, error = ?e, "Use case failed"),
    }
    outcome
}

async fn notify_subscribers<U: UseCase>(response: &U::Response, ctx: &DayfuseContext) {
    let subscribers = U::subscribers();
    if subscribers.is_empty() {
        return;
    }
    debug!(count = subscribers.len(), "Notifying subscribers");
    join_all(subscribers.iter().map(|s| s.notify(response, ctx))).await;
}
