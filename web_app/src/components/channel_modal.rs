//! Channel edit modal.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_common::{ChannelPropertiesUpdate, DeleteChannel};

use super::epg_search::EpgSearch;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::session::{confirm, reload_preserving_view, AdminSession, LogoTarget};

const CATEGORY_LIST_ID: &str = "category-suggestions";

/// Edits every property of the current channel and saves them in one
/// request. Only mounted while `AdminSession::current_channel` is set.
#[component]
pub fn ChannelModal() -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let Some(channel) = session.current_row() else {
        return ().into_any();
    };
    let channel_id = channel.id;

    let number = RwSignal::new(channel.number.clone());
    let name = RwSignal::new(channel.name.clone());
    let category = RwSignal::new(channel.category.clone());
    let epg_entry = RwSignal::new(channel.epg_entry.clone());
    let active = RwSignal::new(channel.active);
    let (error_message, set_error_message) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let (probe_text, set_probe_text) = signal::<Option<String>>(None);
    let (categories, set_categories) = signal::<Vec<String>>(Vec::new());

    let load_categories = move || {
        if !categories.with_untracked(|c| c.is_empty()) {
            return;
        }
        spawn_local(async move {
            match api.get_json::<Vec<String>>("/api/categories", &[]).await {
                Ok(list) => set_categories.set(list),
                Err(e) => log::error!("Error fetching categories: {}", e),
            }
        });
    };

    let save_all = move |_| {
        set_saving.set(true);
        set_error_message.set(None);
        let update = ChannelPropertiesUpdate {
            channel_id,
            number: number.get_untracked().trim().to_string(),
            name: name.get_untracked(),
            category: category.get_untracked(),
            logo: session.selected_logo.get_untracked(),
            epg_entry: epg_entry.get_untracked(),
            active: active.get_untracked(),
        };
        let now_active = update.active;
        let config = config.clone();
        spawn_local(async move {
            match api.submit(&update).await {
                Ok(response) => {
                    log::info!("Saved channel {}", channel_id);
                    session.close_modal();
                    // The refresh replaces row status, so the poll starts after it
                    if let Err(e) = session.refresh_channels(api, Some(channel_id)).await {
                        session.set_error(format!("Error refreshing channels: {}", e.message()));
                    }
                    if now_active {
                        session.start_epg_refresh(api, &config, channel_id);
                    }
                    session.set_message(
                        response.message.unwrap_or_else(|| "Channel updated successfully.".to_string()),
                    );
                }
                Err(e) => {
                    set_saving.set(false);
                    set_error_message.set(Some(e.message().to_string()));
                }
            }
        });
    };

    let delete_channel = move |_| {
        if !confirm("Are you sure you want to delete this channel?") {
            return;
        }
        spawn_local(async move {
            match api.submit(&DeleteChannel { channel_id }).await {
                Ok(_) => {
                    log::info!("Deleted channel {}", channel_id);
                    reload_preserving_view(&session.filter.get_untracked(), None);
                }
                Err(e) => set_error_message.set(Some(format!("Error deleting channel: {}", e.message()))),
            }
        });
    };

    let check_stream = move |_| {
        set_probe_text.set(Some("Probing stream, please wait...".to_string()));
        spawn_local(async move {
            let query = [("channel_id", channel_id.to_string())];
            let text = match api.get_json::<serde_json::Value>("/probe_stream", &query).await {
                Ok(info) => serde_json::to_string_pretty(&info).unwrap_or_else(|_| info.to_string()),
                Err(e) => format!("Error probing stream: {}", e.message()),
            };
            set_probe_text.set(Some(text));
        });
    };

    let close = move |_| session.close_modal();
    let stream_url = channel.stream_url.clone();
    let epg_title = channel.epg_title.clone();

    view! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-50">
            <div class="bg-[#111111] border border-[#ffffff10] rounded-lg w-[560px] max-h-[90vh] flex flex-col">
                <div class="flex items-center justify-between p-3 border-b border-[#ffffff08]">
                    <h2 class="text-sm font-semibold text-white">{format!("Edit Channel #{}", channel_id)}</h2>
                    <button class="text-[#666666] hover:text-white" on:click=close>
                        <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                        </svg>
                    </button>
                </div>

                <div class="p-3 space-y-3 overflow-y-auto">
                    <Show when=move || error_message.get().is_some()>
                        <div class="bg-[#ff444420] border border-[#ff444440] rounded p-2 text-[10px] text-[#ff4444] whitespace-pre-line">
                            {move || error_message.get().unwrap_or_default()}
                        </div>
                    </Show>

                    <div class="flex gap-3">
                        <img
                            class="h-16 w-24 object-contain bg-[#0a0a0a] border border-[#ffffff08] rounded cursor-pointer hover:border-[#00d9ff]"
                            title="Choose logo"
                            src=move || session.selected_logo.get()
                            on:click=move |_| session.logo_target.set(LogoTarget::Modal)
                        />
                        <div class="flex-1 space-y-2">
                            <InlineEditField label="Name" value=name />
                            <InlineEditField
                                label="Category"
                                value=category
                                list=CATEGORY_LIST_ID
                                on_edit=Callback::new(move |_: ()| load_categories())
                            />
                            <datalist id=CATEGORY_LIST_ID>
                                {move || categories.get().into_iter().map(|c| view! { <option value=c/> }).collect_view()}
                            </datalist>
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-3">
                        <div>
                            <label class="block text-[9px] text-[#888888] mb-0.5">"Channel Number"</label>
                            <input
                                type="text"
                                class="w-full bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white font-mono focus:border-[#00d9ff] focus:outline-none"
                                prop:value=move || number.get()
                                on:input=move |ev| number.set(event_target_value(&ev))
                            />
                        </div>
                        <div>
                            <label class="block text-[9px] text-[#888888] mb-0.5">"Status"</label>
                            <button
                                type="button"
                                class=move || format!(
                                    "w-full text-[10px] px-2 py-1.5 rounded border {}",
                                    if active.get() {
                                        "bg-[#22c55e20] border-[#22c55e40] text-[#22c55e]"
                                    } else {
                                        "bg-[#ff444420] border-[#ff444440] text-[#ff4444]"
                                    }
                                )
                                on:click=move |_| active.update(|a| *a = !*a)
                            >
                                {move || if active.get() { "Active" } else { "Inactive" }}
                            </button>
                        </div>
                    </div>

                    <div>
                        <label class="block text-[9px] text-[#888888] mb-0.5">"EPG Entry"</label>
                        <EpgSearch value=epg_entry />
                    </div>

                    <div class="text-[10px] text-[#888888] space-y-1">
                        <div>
                            "Now playing: "
                            <span class="text-[#cccccc]">
                                {if epg_title.is_empty() { "N/A".to_string() } else { epg_title }}
                            </span>
                        </div>
                        <div class="truncate">
                            "Stream: "
                            <a href=stream_url.clone() target="_blank" class="text-[#00d9ff] hover:underline">{stream_url.clone()}</a>
                        </div>
                    </div>

                    <Show when=move || probe_text.get().is_some()>
                        <pre class="bg-[#0a0a0a] border border-[#ffffff08] rounded p-2 text-[9px] text-[#cccccc] max-h-48 overflow-auto">
                            {move || probe_text.get().unwrap_or_default()}
                        </pre>
                    </Show>
                </div>

                <div class="flex items-center gap-2 p-3 border-t border-[#ffffff08]">
                    <button
                        class="bg-[#ff444420] border border-[#ff444440] text-[#ff4444] hover:bg-[#ff444430] text-[10px] px-3 py-1.5 rounded"
                        on:click=delete_channel
                    >
                        "Delete"
                    </button>
                    <button
                        class="bg-[#1a1a1a] border border-[#ffffff08] text-[#cccccc] hover:text-white text-[10px] px-3 py-1.5 rounded"
                        on:click=check_stream
                    >
                        "Probe Stream"
                    </button>
                    <div class="flex-1"></div>
                    <button
                        class="bg-[#1a1a1a] border border-[#ffffff08] text-[#888888] hover:text-white text-[10px] px-3 py-1.5 rounded"
                        on:click=close
                    >
                        "Cancel"
                    </button>
                    <button
                        class="bg-[#00d9ff20] border border-[#00d9ff40] text-[#00d9ff] hover:bg-[#00d9ff30] text-[10px] px-3 py-1.5 rounded disabled:opacity-50"
                        disabled=move || saving.get()
                        on:click=save_all
                    >
                        {move || if saving.get() { "Saving..." } else { "Save All" }}
                    </button>
                </div>
            </div>
        </div>
    }
    .into_any()
}

/// Click-to-edit text. Shows a label until clicked, then an input that
/// commits on blur or Enter.
#[component]
fn InlineEditField(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(optional)] list: Option<&'static str>,
    #[prop(optional)] on_edit: Option<Callback<()>>,
) -> impl IntoView {
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(String::new());
    let input_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        if editing.get() {
            if let Some(input) = input_ref.get() {
                let _ = input.focus();
            }
        }
    });

    let begin = move |_| {
        set_draft.set(value.get_untracked());
        set_editing.set(true);
        if let Some(on_edit) = on_edit {
            on_edit.run(());
        }
    };

    let commit = move || {
        if editing.get_untracked() {
            value.set(draft.get_untracked().trim().to_string());
            set_editing.set(false);
        }
    };

    view! {
        <div>
            <label class="block text-[9px] text-[#888888] mb-0.5">{label}</label>
            <Show
                when=move || editing.get()
                fallback=move || view! {
                    <div
                        class="text-[11px] text-white px-2 py-1.5 rounded border border-transparent hover:border-[#ffffff10] cursor-text min-h-[28px]"
                        on:click=begin
                    >
                        {move || {
                            let v = value.get();
                            if v.is_empty() { "(click to edit)".to_string() } else { v }
                        }}
                    </div>
                }
            >
                <input
                    node_ref=input_ref
                    type="text"
                    list=list
                    class="w-full bg-[#0a0a0a] border border-[#00d9ff] rounded px-2 py-1.5 text-[11px] text-white focus:outline-none"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:blur=move |_| commit()
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            commit();
                        }
                    }
                />
            </Show>
        </div>
    }
}
