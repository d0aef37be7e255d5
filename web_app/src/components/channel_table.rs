//! Channel table page: toolbar, sortable header and rows.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_common::{parse_insert_point, AutoNumberRequest, BulkActiveUpdate, ChannelColumn};

use super::channel_modal::ChannelModal;
use super::channel_row::{row_element_id, ChannelRowView};
use super::event_target_checked;
use super::logo_picker::LogoPicker;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::insert::{default_chain, run_chain};
use crate::session::{reload_preserving_view, AdminSession, LogoTarget};
use crate::storage;

#[component]
pub fn ChannelTablePage() -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");

    // One-shot state left behind by the previous page
    if let Some(text) = storage::take_filter_text() {
        session.filter.set(text);
    }
    let anchor = storage::take_scroll_anchor();
    let offset = storage::take_scroll_offset();

    spawn_local(async move {
        match session.refresh_channels(api, anchor).await {
            Ok(()) => {
                if anchor.is_none() {
                    if let (Some(y), Some(window)) = (offset, web_sys::window()) {
                        request_animation_frame(move || window.scroll_to_with_x_and_y(0.0, y));
                    }
                }
            }
            Err(e) => session.set_error(format!("Error loading channels: {}", e.message())),
        }
    });

    // Bring the anchored row into view once it has been rendered
    Effect::new(move |_| {
        if let Some(id) = session.scroll_anchor.get() {
            request_animation_frame(move || {
                scroll_row_into_view(id);
                session.scroll_anchor.set(None);
            });
        }
    });

    let filter = session.filter;
    let sort = session.sort;
    let (show_insert, set_show_insert) = signal(false);

    view! {
        <div class="min-h-screen bg-[#0a0a0a] text-white p-4 space-y-3">
            <div class="flex items-center justify-between">
                <h1 class="text-sm font-semibold text-[#00d9ff]">"Channels"</h1>
                <a href="/settings" class="text-[10px] text-[#888888] hover:text-white">"Settings"</a>
            </div>

            <TableToolbar on_insert=move || set_show_insert.set(true) />

            <div class="bg-[#111111] border border-[#ffffff10] rounded-lg overflow-x-auto">
                <table class="w-full">
                    <thead>
                        <tr class="border-b border-[#ffffff10]">
                            {ChannelColumn::ALL.into_iter().map(|column| view! { <HeaderCell column=column/> }).collect_view()}
                            <th class="px-2 py-1.5"></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || session.channels.with(|m| m.visible_ids(&filter.get(), sort.get()))
                            key=|id| *id
                            children=move |id| view! { <ChannelRowView channel_id=id/> }
                        />
                    </tbody>
                </table>
                <Show when=move || session.loading.get() && session.channels.with(|m| m.is_empty())>
                    <p class="p-3 text-[10px] text-[#666666]">"Loading channels..."</p>
                </Show>
            </div>

            <Show when=move || show_insert.get()>
                <InsertChannelModal on_close=move || set_show_insert.set(false) />
            </Show>
            <Show when=move || session.current_channel.get().is_some()>
                <ChannelModal/>
            </Show>
            <Show when=move || session.logo_target.get() != LogoTarget::Closed>
                <LogoPicker/>
            </Show>
        </div>
    }
}

fn scroll_row_into_view(channel_id: i64) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else { return };
    if let Some(row) = document.get_element_by_id(&row_element_id(channel_id)) {
        let options = web_sys::ScrollIntoViewOptions::new();
        options.set_block(web_sys::ScrollLogicalPosition::Center);
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        row.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// Sortable column header. The active column also hosts select-all.
#[component]
fn HeaderCell(column: ChannelColumn) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let sort = session.sort;

    let indicator = move || match sort.get().indicator(column) {
        Some(true) => " ▲",
        Some(false) => " ▼",
        None => "",
    };

    view! {
        <th
            class="px-2 py-1.5 text-left text-[9px] font-semibold uppercase tracking-wide text-[#888888] cursor-pointer select-none hover:text-white"
            on:click=move |_| sort.update(|s| s.toggle(column))
        >
            {(column == ChannelColumn::Active).then(|| view! {
                <input
                    type="checkbox"
                    class="accent-[#00d9ff] mr-1 align-middle"
                    title="Select all visible"
                    on:click=move |ev| ev.stop_propagation()
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        let filter = session.filter.get_untracked();
                        session.channels.update(|m| m.set_checked_visible(&filter, checked));
                    }
                />
            })}
            {column.label()}
            <span class="text-[#00d9ff]">{indicator}</span>
        </th>
    }
}

/// Filter box, bulk actions, auto-numbering and insert.
#[component]
fn TableToolbar(on_insert: impl Fn() + 'static + Clone + Send) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = StoredValue::new(use_context::<ClientConfig>().expect("ClientConfig not found"));
    let filter = session.filter;
    let (start_number, set_start_number) = signal(String::new());

    let bulk_update = move |active: bool| {
        let ids = session.channels.with_untracked(|m| m.checked_visible_ids(&filter.get_untracked()));
        if ids.is_empty() {
            session.set_error("No channels selected for bulk update.");
            return;
        }
        spawn_local(async move {
            let request = BulkActiveUpdate { channel_ids: ids.clone(), active };
            match api.submit(&request).await {
                Ok(_) => {
                    let awaiting_guide = session
                        .channels
                        .try_update(|m| m.apply_bulk_active(&ids, active))
                        .unwrap_or_default();
                    for channel_id in awaiting_guide {
                        config.with_value(|config| session.start_epg_refresh(api, config, channel_id));
                    }
                    session.set_message(format!("Bulk update successful ({} channels).", ids.len()));
                }
                Err(e) => session.set_error(format!("Bulk update failed: {}", e.message())),
            }
        });
    };

    let auto_number = move |_| {
        let start = start_number.get_untracked().trim().to_string();
        if start.is_empty() {
            session.set_error("Please enter a valid starting number.");
            return;
        }
        let filter_text = filter.get_untracked();
        let ids = session.channels.with_untracked(|m| m.visible_ids(&filter_text, session.sort.get_untracked()));
        spawn_local(async move {
            let request = AutoNumberRequest { start_number: start, channel_ids: ids };
            match api.submit(&request).await {
                Ok(_) => {
                    session.set_message("Channels renumbered successfully!");
                    reload_preserving_view(&filter_text, None);
                }
                Err(e) => session.set_error(format!("Error: {}", e.message())),
            }
        });
    };

    view! {
        <div class="flex flex-wrap items-center gap-2">
            <input
                type="text"
                placeholder="Filter channels..."
                class="w-64 bg-[#111111] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white focus:border-[#00d9ff] focus:outline-none"
                prop:value=move || filter.get()
                on:input=move |ev| filter.set(event_target_value(&ev))
            />
            <button
                class="text-[10px] px-3 py-1.5 rounded bg-[#22c55e20] border border-[#22c55e40] text-[#22c55e] hover:bg-[#22c55e30]"
                on:click=move |_| bulk_update(true)
            >
                "Activate Selected"
            </button>
            <button
                class="text-[10px] px-3 py-1.5 rounded bg-[#ff444420] border border-[#ff444440] text-[#ff4444] hover:bg-[#ff444430]"
                on:click=move |_| bulk_update(false)
            >
                "Deactivate Selected"
            </button>
            <div class="flex items-center gap-1 ml-auto">
                <input
                    type="number"
                    min="0"
                    placeholder="Start #"
                    class="w-20 bg-[#111111] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white focus:border-[#00d9ff] focus:outline-none"
                    prop:value=move || start_number.get()
                    on:input=move |ev| set_start_number.set(event_target_value(&ev))
                />
                <button
                    class="text-[10px] px-3 py-1.5 rounded bg-[#1a1a1a] border border-[#ffffff08] text-[#cccccc] hover:text-white"
                    on:click=auto_number
                >
                    "Auto Number"
                </button>
                <button
                    class="text-[10px] px-3 py-1.5 rounded bg-[#00d9ff20] border border-[#00d9ff40] text-[#00d9ff] hover:bg-[#00d9ff30]"
                    on:click=move |_| on_insert()
                >
                    "Insert Channel At..."
                </button>
            </div>
        </div>
    }
}

/// Asks for the insertion point, then runs the insert transports behind
/// the status overlay.
#[component]
fn InsertChannelModal(on_close: impl Fn() + 'static + Clone + Send) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");

    let (value, set_value) = signal(String::new());
    let (error_message, set_error_message) = signal::<Option<String>>(None);
    let input_ref = NodeRef::<leptos::html::Input>::new();
    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    });

    let on_close_submit = on_close.clone();
    let submit = move || {
        let at = match parse_insert_point(&value.get_untracked()) {
            Ok(at) => at,
            Err(msg) => {
                set_error_message.set(Some(msg));
                return;
            }
        };
        on_close_submit();

        let anchor = session.channels.with_untracked(|m| m.anchor_for_insert(at));
        session.show_overlay(format!("Inserting a slot at channel {}", at));
        spawn_local(async move {
            let chain = default_chain(api);
            let progress = move |line: String| session.overlay_line(line);
            match run_chain(&chain, at, &progress).await {
                Ok(via) => session.set_message(format!("Inserted a free slot at {} (via {}).", at, via)),
                Err(e) => session.set_error(format!("Insert failed: {}", e.message())),
            }
            session.overlay_line("Refreshing table...");
            if let Err(e) = session.refresh_channels(api, anchor).await {
                session.set_error(format!("Error refreshing channels: {}", e.message()));
            }
            session.hide_overlay();
        });
    };

    let submit_on_enter = submit.clone();

    view! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-50">
            <div class="bg-[#111111] border border-[#ffffff10] rounded-lg w-[340px] flex flex-col">
                <div class="flex items-center justify-between p-3 border-b border-[#ffffff08]">
                    <h2 class="text-sm font-semibold text-white">"Insert Channel At"</h2>
                    <button
                        class="text-[#666666] hover:text-white"
                        on:click={
                            let on_close = on_close.clone();
                            move |_| on_close()
                        }
                    >
                        <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                        </svg>
                    </button>
                </div>
                <div class="p-3 space-y-2">
                    <Show when=move || error_message.get().is_some()>
                        <div class="bg-[#ff444420] border border-[#ff444440] rounded p-2 text-[10px] text-[#ff4444]">
                            {move || error_message.get().unwrap_or_default()}
                        </div>
                    </Show>
                    <label class="block text-[9px] text-[#888888]">
                        "Channels at or above this number move up by one."
                    </label>
                    <input
                        node_ref=input_ref
                        type="text"
                        inputmode="numeric"
                        placeholder="e.g., 100"
                        class="w-full bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white focus:border-[#00d9ff] focus:outline-none"
                        prop:value=move || value.get()
                        on:input=move |ev| {
                            set_value.set(event_target_value(&ev));
                            set_error_message.set(None);
                        }
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                submit_on_enter();
                            }
                        }
                    />
                </div>
                <div class="flex justify-end gap-2 p-3 border-t border-[#ffffff08]">
                    <button
                        class="bg-[#1a1a1a] border border-[#ffffff08] text-[#888888] hover:text-white text-[10px] px-3 py-1.5 rounded"
                        on:click={
                            let on_close = on_close.clone();
                            move |_| on_close()
                        }
                    >
                        "Cancel"
                    </button>
                    <button
                        class="bg-[#00d9ff20] border border-[#00d9ff40] text-[#00d9ff] hover:bg-[#00d9ff30] text-[10px] px-3 py-1.5 rounded"
                        on:click=move |_| submit()
                    >
                        "Insert"
                    </button>
                </div>
            </div>
        </div>
    }
}
