use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::controller::ViewController;
use crate::transport::Transport;

/// Polls the backend every `every` for as long as the task lives. The first
/// poll happens one full interval after spawning. Abort the handle to stop.
pub fn spawn_connectivity_monitor<T: Transport>(
    controller: ViewController<T>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            controller.check_connection().await;
        }
    })
}
