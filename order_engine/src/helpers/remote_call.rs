use std::{future::Future, time::Duration};

use log::*;

use crate::traits::RemoteCallError;

/// Runs an outbound call, giving up after `timeout`. A stalled collaborator surfaces as [`RemoteCallError::Timeout`].
pub async fn call_with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, RemoteCallError>
where F: Future<Output = Result<T, RemoteCallError>> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!("🔄️ Remote call did not complete within {}ms", timeout.as_millis());
            Err(RemoteCallError::Timeout)
        },
    }
}

/// Returns the distinct product ids in the order they first appear.
pub fn dedupe_product_ids<I: IntoIterator<Item = i64>>(ids: I) -> Vec<i64> {
    let mut result = Vec::new();
    for id in ids {
        if !result.contains(&id) {
            result.push(id);
        }
    }
    result
}
