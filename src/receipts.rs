//! One-shot read-receipt timer. A sent message stays `Delivered` for a fixed
//! delay and then flips to `Read`, standing in for a real transport's
//! acknowledgement. The timer is keyed by message id, never by list position;
//! whether the firing still applies is decided by the session at fire time.

use std::time::Duration;

use crate::model::MessageId;
use crate::utils;

/// How long a sent message stays `Delivered` before the simulated receipt.
pub const READ_RECEIPT_DELAY: Duration = Duration::from_millis(3000);

/// Runs `complete(id)` exactly once after `delay`, on the shared runtime.
/// Nothing cancels the sleep; completions that no longer apply (deleted
/// message, torn-down screen) are dropped by the receiving side.
pub fn schedule<F>(delay: Duration, id: MessageId, complete: F)
where
    F: FnOnce(MessageId) + Send + 'static,
{
    utils::spawn_async(async move {
        tokio::time::sleep(delay).await;
        complete(id);
    });
}
