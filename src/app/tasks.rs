use std::time::{Duration, Instant};

use log::debug;
use tokio::sync::mpsc;

use crate::api::client::CockpitClient;
use crate::api::fetcher::load_today;

use super::state::{AppMessage, AppState, LoadRequest};

pub(super) fn spawn_fetch_schedule(client: &CockpitClient, tx: &mpsc::UnboundedSender<AppMessage>) {
    let client_clone = client.clone();
    let tx_clone = tx.clone();
    tokio::spawn(async move {
        let blocks = load_today(&client_clone).await;
        let _ = tx_clone.send(AppMessage::ScheduleLoaded(blocks));
    });
}

/// Sends `FlushBlocks(generation)` after `delay`. Only the newest
/// generation actually writes.
pub(super) fn spawn_debounced_flush(
    generation: u64,
    delay: Duration,
    tx: &mpsc::UnboundedSender<AppMessage>,
) {
    let tx_clone = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx_clone.send(AppMessage::FlushBlocks(generation));
    });
}

pub(super) fn dispatch_load_request(
    state: &mut AppState,
    request: LoadRequest,
    client: &CockpitClient,
    tx: &mpsc::UnboundedSender<AppMessage>,
) {
    match request {
        LoadRequest::Schedule { force } => {
            if !state.schedule.should_fetch(Instant::now(), force) {
                return;
            }
            debug!("event=schedule_request module=host force={}", force);
            state.schedule.begin_fetch();
            spawn_fetch_schedule(client, tx);
        }
    }
}

/// Bumps the save generation and schedules a flush for it.
pub(super) fn schedule_flush(state: &mut AppState, tx: &mpsc::UnboundedSender<AppMessage>) {
    state.save_generation += 1;
    spawn_debounced_flush(state.save_generation, state.save_debounce, tx);
}

/// Writes the store if `generation` is still the latest one.
pub(super) fn handle_flush(state: &mut AppState, generation: u64) -> bool {
    if generation != state.save_generation {
        return false;
    }
    state.store.borrow_mut().flush();
    true
}
