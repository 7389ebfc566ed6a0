use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::warn;

/// Run `work` over every item on its own task, at most `limit` at a time,
/// and return the results in input order regardless of completion order.
///
/// A task that panics or is cancelled yields `None` in its slot.
pub async fn ordered<T, R, F, Fut>(items: Vec<T>, limit: usize, work: F) -> Vec<Option<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let handles: Vec<_> = items
        .into_iter()
        .map(|item| {
            let sem = Arc::clone(&semaphore);
            let task = work(item);
            tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                task.await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(result) => results.push(Some(result)),
            Err(e) => {
                warn!("worker task failed: {}", e);
                results.push(None);
            }
        }
    }
    results
}
