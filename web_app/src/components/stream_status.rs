//! Live stream status table with per-stream stop buttons.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_common::{summarize_streams, PendingStops, StopStreamRequest, StreamStatusMap, StreamSummary};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::scheduler::ScheduledTask;
use crate::session::{confirm, AdminSession};

#[derive(Debug, Clone, PartialEq)]
enum StatusView {
    Loading,
    Streams(Vec<StreamSummary>),
    Failed(String),
}

/// Polls `/api/stream_status`. Ticks are skipped while `busy` is set so
/// the poll never overlaps an upload, parse or delete.
#[component]
pub fn StreamStatus(#[prop(into)] busy: Signal<bool>) -> impl IntoView {
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let status = RwSignal::new(StatusView::Loading);
    let stopping = RwSignal::new(PendingStops::default());

    let fetch = move || {
        spawn_local(async move {
            match api.get_json::<StreamStatusMap>("/api/stream_status", &[]).await {
                Ok(map) => status.set(StatusView::Streams(summarize_streams(&map))),
                Err(e) => status.set(StatusView::Failed(e.message().to_string())),
            }
        });
    };

    fetch();
    let poll = ScheduledTask::new();
    poll.start(config.stream_poll, None, move |_| {
        if busy.get_untracked() {
            log::trace!("Stream status poll skipped, settings action in flight");
            return;
        }
        fetch();
    });
    on_cleanup(move || poll.stop());

    view! {
        <div class="bg-[#111111] border border-[#ffffff10] rounded-lg p-3">
            <h3 class="text-[10px] font-semibold text-[#00d9ff] mb-2 uppercase tracking-wide">"Active Streams"</h3>
            {move || match status.get() {
                StatusView::Loading => view! {
                    <p class="text-[10px] text-[#666666]">"Loading stream status..."</p>
                }.into_any(),
                StatusView::Failed(msg) => view! {
                    <p class="text-[10px] text-[#ff4444]">{format!("Error fetching stream status: {}", msg)}</p>
                }.into_any(),
                StatusView::Streams(rows) if rows.is_empty() => view! {
                    <p class="text-[10px] text-[#666666]">"No active streams."</p>
                }.into_any(),
                StatusView::Streams(rows) => view! {
                    <table class="w-full text-[10px]">
                        <thead>
                            <tr class="text-left text-[#888888] border-b border-[#ffffff08]">
                                <th class="px-1 py-1">"Channel"</th>
                                <th class="px-1 py-1">"Name"</th>
                                <th class="px-1 py-1">"Program"</th>
                                <th class="px-1 py-1">"Clients"</th>
                                <th class="px-1 py-1">"Video"</th>
                                <th class="px-1 py-1">"Resolution"</th>
                                <th class="px-1 py-1">"Audio"</th>
                                <th class="px-1 py-1">"Stream URL"</th>
                                <th class="px-1 py-1"></th>
                            </tr>
                        </thead>
                        <tbody>
                            {rows.into_iter().map(|row| view! { <StreamRow row=row stopping=stopping/> }).collect_view()}
                        </tbody>
                    </table>
                }.into_any(),
            }}
        </div>
    }
}

/// `stopping` is owned by the table so a poll that rebuilds the rows
/// keeps pending stop buttons disabled.
#[component]
fn StreamRow(row: StreamSummary, stopping: RwSignal<PendingStops>) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let channel = row.channel.clone();
    let pending_channel = row.channel.clone();
    let is_stopping = move || stopping.with(|p| p.contains(&pending_channel));
    let is_stopping_label = is_stopping.clone();
    let reenable_delay = config.stop_reenable_delay;

    let stop = move |_| {
        let channel = channel.clone();
        if !confirm(&format!("Stop the stream for channel {}?", channel)) {
            return;
        }
        if !stopping.try_update(|p| p.begin(&channel)).unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            let request = StopStreamRequest { channel: channel.clone() };
            match api.post_json("/api/streams/stop", &request).await {
                Ok(_) => {
                    log::info!("Stopped stream for channel {}", channel);
                    session.set_message(format!("Stopped stream for channel {}.", channel));
                }
                Err(e) => session.set_error(format!("Error stopping stream: {}", e.message())),
            }
            set_timeout(
                move || {
                    let _ = stopping.try_update(|p| p.finish(&channel));
                },
                reenable_delay,
            );
        });
    };

    view! {
        <tr class="border-b border-[#ffffff05] text-[#cccccc]">
            <td class="px-1 py-1 font-mono">{row.channel}</td>
            <td class="px-1 py-1">{row.channel_name}</td>
            <td class="px-1 py-1">{row.current_program}</td>
            <td class="px-1 py-1 font-mono">{row.subscribers}</td>
            <td class="px-1 py-1">{row.video_codec}</td>
            <td class="px-1 py-1 font-mono">{row.resolution}</td>
            <td class="px-1 py-1">{row.audio}</td>
            <td class="px-1 py-1 max-w-[200px] truncate">
                {if row.stream_url.starts_with("http") {
                    view! { <a href=row.stream_url.clone() target="_blank" class="text-[#00d9ff] hover:underline">{row.stream_url.clone()}</a> }.into_any()
                } else {
                    view! { <span>{row.stream_url}</span> }.into_any()
                }}
            </td>
            <td class="px-1 py-1 text-right">
                <button
                    class="bg-[#ff444420] border border-[#ff444440] text-[#ff4444] hover:bg-[#ff444430] text-[9px] px-2 py-0.5 rounded disabled:opacity-50"
                    disabled=is_stopping.clone()
                    on:click=stop
                >
                    {move || if is_stopping_label() { "Stopping..." } else { "Stop" }}
                </button>
            </td>
        </tr>
    }
}
