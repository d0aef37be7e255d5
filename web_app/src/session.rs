//! Shared UI session state for the admin panel.
//!
//! One `AdminSession` is provided as context by `App`. It owns the channel
//! table model and the handful of cross-component values (open modal,
//! logo picker target, overlay, toasts) so components never reach into
//! each other's DOM.

use std::collections::HashMap;

use futures::future::join_all;
use leptos::prelude::*;
use web_common::{
    epg_refresh_settled, files_needing_color, lookup_batches, status_from_program, ApiError,
    ChannelRow, ChannelTableModel, CurrentProgram, EpgEntry, SortState,
};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::scheduler::ScheduledTask;
use crate::storage;

/// Where a picked logo goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoTarget {
    Closed,
    /// Persist immediately for this channel.
    Channel(i64),
    /// Only fill the edit modal's logo field.
    Modal,
}

/// Blocking progress overlay content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayState {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Clone, Copy)]
pub struct AdminSession {
    pub channels: RwSignal<ChannelTableModel>,
    pub loading: RwSignal<bool>,
    pub filter: RwSignal<String>,
    pub sort: RwSignal<SortState>,
    /// Channel whose edit modal is open.
    pub current_channel: RwSignal<Option<i64>>,
    pub logo_target: RwSignal<LogoTarget>,
    /// Logo chosen in the picker; also the modal's pending logo.
    pub selected_logo: RwSignal<String>,
    /// Logo URLs from the last `/api/logos` fetch.
    pub logos: RwSignal<Vec<String>>,
    /// Row to bring into view after the next table render.
    pub scroll_anchor: RwSignal<Option<i64>>,
    pub overlay: RwSignal<Option<OverlayState>>,
    /// EPG source files and their colour tags.
    pub epg_files: RwSignal<Vec<String>>,
    pub epg_colors: RwSignal<HashMap<String, String>>,
    /// Toast messages
    pub api_message: RwSignal<Option<String>>,
    pub api_error: RwSignal<Option<String>>,
    /// One guide poll per channel, reused across activations.
    epg_polls: StoredValue<HashMap<i64, ScheduledTask>>,
    /// Owner the session was created under. Tasks started from async
    /// continuations are created here so they are disposed with the app.
    owner: StoredValue<Owner>,
}

impl AdminSession {
    pub fn new() -> Self {
        Self {
            channels: RwSignal::new(ChannelTableModel::default()),
            loading: RwSignal::new(false),
            filter: RwSignal::new(String::new()),
            sort: RwSignal::new(SortState::default()),
            current_channel: RwSignal::new(None),
            logo_target: RwSignal::new(LogoTarget::Closed),
            selected_logo: RwSignal::new(String::new()),
            logos: RwSignal::new(Vec::new()),
            scroll_anchor: RwSignal::new(None),
            overlay: RwSignal::new(None),
            epg_files: RwSignal::new(Vec::new()),
            epg_colors: RwSignal::new(HashMap::new()),
            api_message: RwSignal::new(None),
            api_error: RwSignal::new(None),
            epg_polls: StoredValue::new(HashMap::new()),
            owner: StoredValue::new(Owner::current().unwrap_or_else(Owner::new)),
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.api_message.set(Some(msg.into()));
    }

    pub fn set_error(&self, msg: impl Into<String>) {
        self.api_error.set(Some(msg.into()));
    }

    pub fn clear_api_message(&self) {
        self.api_message.set(None);
    }

    pub fn clear_api_error(&self) {
        self.api_error.set(None);
    }

    pub fn show_overlay(&self, title: impl Into<String>) {
        self.overlay.set(Some(OverlayState { title: title.into(), lines: Vec::new() }));
    }

    pub fn overlay_line(&self, line: impl Into<String>) {
        let line = line.into();
        self.overlay.update(|o| {
            if let Some(state) = o {
                state.lines.push(line);
            }
        });
    }

    pub fn hide_overlay(&self) {
        self.overlay.set(None);
    }

    /// Current channel row, if the edit modal is open.
    pub fn current_row(&self) -> Option<ChannelRow> {
        let id = self.current_channel.get()?;
        self.channels.with(|m| m.row(id).map(|r| r.channel.clone()))
    }

    pub fn close_modal(&self) {
        self.current_channel.set(None);
        self.logo_target.set(LogoTarget::Closed);
    }

    /// Re-fetch the channel list and swap the table body in place.
    /// Filter and sort survive; `anchor` is scrolled into view.
    pub async fn refresh_channels(&self, api: ApiClient, anchor: Option<i64>) -> Result<(), ApiError> {
        self.loading.set(true);
        let result = api.get_json::<Vec<ChannelRow>>("/api/channels", &[]).await;
        self.loading.set(false);
        let channels = result?;
        log::info!("Loaded {} channels", channels.len());
        self.channels.update(|m| m.replace(channels));
        if anchor.is_some() {
            self.scroll_anchor.set(anchor);
        }
        Ok(())
    }

    /// Load EPG file names and colours. Files without a stored colour get
    /// one sampled from their first entry, a few lookups at a time.
    pub async fn load_epg_sources(&self, api: ApiClient, config: &ClientConfig) -> Result<(), ApiError> {
        let files: Vec<String> = api.get_json("/api/epg_filenames", &[]).await?;
        let known: HashMap<String, String> = match api.get_json("/api/epg_file_colors", &[]).await {
            Ok(colors) => colors,
            Err(e) => {
                log::warn!("No stored EPG colours: {}", e);
                HashMap::new()
            }
        };
        let missing = files_needing_color(&files, &known);
        self.epg_files.set(files);
        self.epg_colors.set(known);

        for batch in lookup_batches(&missing, config.color_lookup_batch) {
            let lookups = batch.into_iter().map(|file| async move {
                let query = [
                    ("search", String::new()),
                    ("raw_file", file.clone()),
                    ("limit", "1".to_string()),
                ];
                let color = match api.get_json::<Vec<EpgEntry>>("/api/epg_entries", &query).await {
                    Ok(entries) => entries.into_iter().next().and_then(|e| e.color),
                    Err(e) => {
                        log::debug!("Colour lookup for {} failed: {}", file, e);
                        None
                    }
                };
                (file, color)
            });
            let found = join_all(lookups).await;
            self.epg_colors.update(|colors| {
                for (file, color) in found {
                    if let Some(color) = color.filter(|c| !c.trim().is_empty()) {
                        colors.insert(file, color);
                    }
                }
            });
        }
        Ok(())
    }

    /// Poll the programme guide for a newly activated channel until a
    /// real title shows up or the attempt limit is reached. Starting again
    /// for the same channel replaces the running poll.
    pub fn start_epg_refresh(&self, api: ApiClient, config: &ClientConfig, channel_id: i64) {
        let session = *self;
        let task = self.epg_poll(channel_id);
        task.start(config.epg_refresh_period, Some(config.epg_refresh_attempts), move |attempt| {
            leptos::task::spawn_local(async move {
                let query = [("channel_id", channel_id.to_string())];
                match api.get_json::<CurrentProgram>("/api/current_program", &query).await {
                    Ok(program) => {
                        let status = status_from_program(&program);
                        let settled = epg_refresh_settled(&status);
                        session.channels.update(|m| m.set_status(channel_id, status));
                        if settled {
                            task.stop();
                        }
                    }
                    Err(e) => {
                        log::error!("EPG refresh for channel {} failed (attempt {}): {}", channel_id, attempt, e);
                        task.stop();
                    }
                }
            });
        });
    }

    fn epg_poll(&self, channel_id: i64) -> ScheduledTask {
        if let Some(task) = self.epg_polls.with_value(|polls| polls.get(&channel_id).copied()) {
            return task;
        }
        let task = self.owner.with_value(|owner| owner.with(ScheduledTask::new));
        self.epg_polls.update_value(|polls| {
            polls.insert(channel_id, task);
        });
        task
    }
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Ask the user to confirm a destructive action.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Full page reload. The filter text and scroll position survive it.
pub fn reload_preserving_view(filter: &str, anchor: Option<i64>) {
    storage::save_filter_text(filter);
    let Some(window) = web_sys::window() else { return };
    if let Some(id) = anchor {
        let offset = window.scroll_y().unwrap_or(0.0);
        storage::save_scroll_anchor(id, offset);
    }
    let location = window.location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    // Cache-busting parameter so the browser does not reuse the old page.
    let href = format!("{}?_={}", path, js_sys::Date::now() as u64);
    if let Err(e) = location.set_href(&href) {
        log::error!("Reload failed: {:?}", e);
    }
}

/// Plain reload of the current page.
pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().reload() {
            log::error!("Reload failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epg_poll_is_reused_per_channel_and_owned_by_the_session() {
        let owner = Owner::new();
        let session = owner.with(AdminSession::new);

        // Created outside any owner, as after an await
        let first = session.epg_poll(7);
        let _ = session.epg_poll(7);
        let _ = session.epg_poll(9);
        assert_eq!(session.epg_polls.with_value(|p| p.len()), 2);
        assert!(!first.is_running());

        owner.cleanup();
        assert!(session.epg_polls.try_with_value(|p| p.len()).is_none());
    }
}
