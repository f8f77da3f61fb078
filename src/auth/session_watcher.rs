use std::time::Duration;
use log::debug;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use crate::api::AuthApi;
use crate::auth::SessionManager;
use crate::repository::StorageBackend;

/// Re-checks session validity every `period` and calls `on_change` with the
/// first result and every transition after it. Returns once `cancel` fires;
/// the owner cancels when the observing view goes away.
pub async fn watch_session<B, A, F>(session: &SessionManager<B, A>, period: Duration, cancel: CancellationToken, mut on_change: F)
where
    B: StorageBackend,
    A: AuthApi,
    F: FnMut(bool),
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_state = None;
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Session watcher stopped");
                break;
            }
            _ = ticker.tick() => {
                let valid = session.is_session_valid();
                if last_state != Some(valid) {
                    last_state = Some(valid);
                    on_change(valid);
                }
            }
        }
    }
}
