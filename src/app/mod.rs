mod actions;
mod input;
mod state;
mod tasks;
pub use state::*;

use input::{handle_key, handle_mouse};
use tasks::{dispatch_load_request, handle_flush, schedule_flush};

#[cfg(test)]
pub(crate) mod test_helpers;

use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::{debug, info};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::api::client::CockpitClient;
use crate::api::types::ScheduleBlock;
use crate::calendar::block_store::BlockStore;
use crate::calendar::events::CalendarEvent;
use crate::calendar::navigator::Mode;
use crate::calendar::view_state::ViewState;
use crate::config::AppConfig;
use crate::error::Result;
use crate::keys::KeybindingMap;

/// Ticks between background schedule refreshes (30s at 250ms per tick).
const REFRESH_TICKS: u32 = 120;

fn settings_from_config(config: &AppConfig) -> Settings {
    let calendar = &config.calendar;
    Settings {
        view_state: ViewState::new(calendar.zoom, calendar.level(), calendar.tool_mode()),
        store: BlockStore::load(&config.blocks_path()),
        drag_create: calendar.drag_create,
        schedule_ttl: calendar.schedule_ttl(),
        save_debounce: calendar.save_debounce(),
    }
}

fn handle_schedule_loaded(state: &mut AppState, blocks: Vec<ScheduleBlock>) {
    info!(
        "event=schedule_loaded module=host status=ok blocks={}",
        blocks.len()
    );
    state.schedule.complete(Instant::now());
    state.view.set_schedule(blocks);
    state.status_message = None;
}

/// Advances the clock marker and reports whether a background refresh is due.
fn handle_tick(state: &mut AppState) -> bool {
    let now = Local::now();
    state
        .view
        .set_today(now.date_naive(), Some(minute_of_day(now.time())));
    state.refresh_counter += 1;
    if state.refresh_counter >= REFRESH_TICKS {
        state.refresh_counter = 0;
        return !state.schedule.is_in_flight();
    }
    false
}

pub async fn run(config: &AppConfig, terminal: &mut DefaultTerminal) -> Result<()> {
    let keybindings =
        KeybindingMap::from_preset(&config.keybindings.preset, &config.keybindings.bindings)?;

    let mut state = AppState::new(keybindings.hints(), settings_from_config(config));

    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();

    let client =
        CockpitClient::with_timeout(&config.server.base_url, config.server.timeout());

    // Forward store edits and selection changes into the loop
    let store_tx = tx.clone();
    let store_sub = state.store.borrow_mut().subscribe(move |_| {
        let _ = store_tx.send(AppMessage::BlocksChanged);
    });
    let bus_tx = tx.clone();
    let bus_sub = state.bus.borrow_mut().subscribe(move |event| match event {
        CalendarEvent::Selected(selection) => {
            let _ = bus_tx.send(AppMessage::Selected(selection.clone()));
        }
    });

    dispatch_load_request(&mut state, LoadRequest::Schedule { force: true }, &client, &tx);

    // Spawn event reader task
    let event_tx = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            let msg = match reader.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    AppMessage::Key(key)
                }
                Some(Ok(Event::Mouse(mouse))) => AppMessage::Mouse(mouse),
                Some(Ok(Event::Resize(_, _))) => AppMessage::Resize,
                Some(Err(_)) | None => break,
                _ => continue,
            };
            if event_tx.send(msg).is_err() {
                break;
            }
        }
    });

    // Spawn tick timer
    let tick_tx = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if tick_tx.send(AppMessage::Tick).is_err() {
                break;
            }
        }
    });

    // Main loop
    loop {
        terminal.draw(|frame| crate::ui::render(frame, &mut state))?;

        if let Some(msg) = rx.recv().await {
            let from_user = matches!(msg, AppMessage::Key(_) | AppMessage::Mouse(_));
            match msg {
                AppMessage::Key(key) => {
                    if let Some(req) = handle_key(&mut state, &key, &keybindings) {
                        dispatch_load_request(&mut state, req, &client, &tx);
                    }
                }
                AppMessage::Mouse(mouse) => handle_mouse(&mut state, &mouse),
                AppMessage::Resize => state.view.redraw(),
                AppMessage::ScheduleLoaded(blocks) => handle_schedule_loaded(&mut state, blocks),
                AppMessage::Selected(selection) => {
                    if let Some(event) = &selection {
                        debug!("event=selection module=host text={}", event.text);
                    }
                    state.selection = selection;
                }
                AppMessage::BlocksChanged => schedule_flush(&mut state, &tx),
                AppMessage::FlushBlocks(generation) => {
                    handle_flush(&mut state, generation);
                }
                AppMessage::Tick => {
                    if handle_tick(&mut state) {
                        dispatch_load_request(
                            &mut state,
                            LoadRequest::Schedule { force: true },
                            &client,
                            &tx,
                        );
                    }
                }
            }
            // Navigating into Day mode refetches a stale schedule
            if from_user && state.view.mode() == Mode::Day {
                dispatch_load_request(
                    &mut state,
                    LoadRequest::Schedule { force: false },
                    &client,
                    &tx,
                );
            }
        }

        if state.should_quit {
            break;
        }
    }

    state.store.borrow_mut().unsubscribe(store_sub);
    state.bus.borrow_mut().unsubscribe(bus_sub);
    state.view.dispose();
    if state.store.borrow().is_dirty() {
        state.store.borrow_mut().flush();
    }
    info!("event=app_exit module=host status=ok");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    #[test]
    fn schedule_loaded_reaches_view_and_cache() {
        let mut state = test_state();
        state.status_message = Some("Loading schedule...".into());
        state.schedule.begin_fetch();

        handle_schedule_loaded(&mut state, vec![leaf(540, "Standup")]);

        assert_eq!(state.view.schedule().len(), 1);
        assert!(!state.schedule.is_in_flight());
        assert!(state.schedule.is_fresh(Instant::now()));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn tick_requests_refresh_periodically() {
        let mut state = test_state();
        for _ in 0..REFRESH_TICKS - 1 {
            assert!(!handle_tick(&mut state));
        }
        assert!(handle_tick(&mut state));
        assert_eq!(state.refresh_counter, 0);
    }

    #[test]
    fn tick_skips_refresh_while_fetching() {
        let mut state = test_state();
        state.schedule.begin_fetch();
        state.refresh_counter = REFRESH_TICKS - 1;
        assert!(!handle_tick(&mut state));
    }

    #[test]
    fn settings_follow_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::defaults();
        config.calendar.zoom = 2.0;
        config.calendar.tool = "picker".into();
        config.storage.blocks_path = Some(dir.path().join("blocks.json"));

        let settings = settings_from_config(&config);
        assert_eq!(settings.view_state.zoom(), 2.0);
        assert_eq!(
            settings.view_state.active_tool(),
            crate::calendar::tools::ToolMode::Picker
        );
        assert_eq!(
            settings.store.path(),
            Some(dir.path().join("blocks.json").as_path())
        );
    }
}
