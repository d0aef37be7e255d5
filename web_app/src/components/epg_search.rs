//! EPG entry typeahead with a colour-coded source file filter.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_use::on_click_outside;
use web_common::{contrast_text_color, file_color, search_term, EpgEntry, DEFAULT_SWATCH};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::session::AdminSession;

/// Typeahead bound to `value`. Suggestions come from
/// `/api/epg_entries`, scoped to the selected source file.
#[component]
pub fn EpgSearch(value: RwSignal<String>) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let (raw_file, set_raw_file) = signal(String::new());
    let (suggestions, set_suggestions) = signal::<Vec<EpgEntry>>(Vec::new());
    let (open, set_open) = signal(false);
    let (files_open, set_files_open) = signal(false);
    // Responses can arrive out of order; only the newest one is shown
    let request_seq = StoredValue::new(0u64);

    if session.epg_files.with_untracked(|f| f.is_empty()) {
        let config = config.clone();
        spawn_local(async move {
            if let Err(e) = session.load_epg_sources(api, &config).await {
                log::error!("Error fetching EPG file list: {}", e);
            }
        });
    }

    let limit = config.epg_search_limit;
    let run_search = move || {
        let Some(term) = search_term(&value.get_untracked()) else {
            set_open.set(false);
            return;
        };
        request_seq.update_value(|s| *s += 1);
        let seq = request_seq.get_value();
        let query = [
            ("search", term),
            ("raw_file", raw_file.get_untracked()),
            ("limit", limit.to_string()),
        ];
        spawn_local(async move {
            let result = api.get_json::<Vec<EpgEntry>>("/api/epg_entries", &query).await;
            if request_seq.get_value() != seq {
                return;
            }
            match result {
                Ok(entries) => {
                    set_open.set(!entries.is_empty());
                    set_suggestions.set(entries);
                }
                Err(e) => log::error!("Error fetching EPG entries: {}", e),
            }
        });
    };

    let select_file = move |file: String| {
        set_raw_file.set(file);
        set_files_open.set(false);
        run_search();
    };

    let container = NodeRef::<leptos::html::Div>::new();
    let _ = on_click_outside(container, move |_| {
        set_open.set(false);
        set_files_open.set(false);
    });

    let selected_color = move || {
        let file = raw_file.get();
        if file.is_empty() {
            DEFAULT_SWATCH.to_string()
        } else {
            session.epg_colors.with(|c| file_color(c, &file).to_string())
        }
    };

    view! {
        <div node_ref=container class="relative space-y-1">
            <div class="flex gap-1">
                // Native select stays in sync for keyboard users and forms
                <select
                    class="sr-only"
                    prop:value=move || raw_file.get()
                    on:change=move |ev| select_file(event_target_value(&ev))
                >
                    <option value="">"All Files"</option>
                    {move || session.epg_files.get().into_iter().map(|f| {
                        view! { <option value=f.clone()>{f.clone()}</option> }
                    }).collect_view()}
                </select>
                <button
                    type="button"
                    class="flex items-center gap-1.5 bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[10px] text-[#cccccc] hover:border-[#ffffff20] max-w-[45%]"
                    on:click=move |_| set_files_open.update(|v| *v = !*v)
                >
                    <span class="w-2.5 h-2.5 rounded-full flex-shrink-0" style=move || format!("background: {};", selected_color())></span>
                    <span class="truncate">
                        {move || {
                            let f = raw_file.get();
                            if f.is_empty() { "All Files".to_string() } else { f }
                        }}
                    </span>
                </button>
                <input
                    type="text"
                    placeholder="Search EPG entries..."
                    class="flex-1 bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[10px] text-white focus:border-[#00d9ff] focus:outline-none"
                    prop:value=move || value.get()
                    on:input=move |ev| {
                        value.set(event_target_value(&ev));
                        run_search();
                    }
                />
            </div>

            <Show when=move || files_open.get()>
                <div class="absolute z-10 left-0 top-9 w-64 max-h-56 overflow-y-auto bg-[#111111] border border-[#ffffff10] rounded shadow-lg">
                    <div
                        class="flex items-center gap-2 px-2 py-1 text-[10px] text-[#cccccc] cursor-pointer hover:bg-[#ffffff08]"
                        on:click=move |_| select_file(String::new())
                    >
                        <span class="w-2.5 h-2.5 rounded-full bg-white"></span>
                        "All Files"
                    </div>
                    {move || session.epg_files.get().into_iter().map(|file| {
                        let color = session.epg_colors.with(|c| file_color(c, &file).to_string());
                        let text = contrast_text_color(&color);
                        let pick = file.clone();
                        view! {
                            <div
                                class="flex items-center gap-2 px-2 py-1 text-[10px] cursor-pointer hover:bg-[#ffffff08]"
                                on:click=move |_| select_file(pick.clone())
                            >
                                <span class="w-2.5 h-2.5 rounded-full flex-shrink-0" style=format!("background: {};", color)></span>
                                <span
                                    class="px-1 rounded truncate"
                                    style=format!("background: {}; color: {};", color, text)
                                >
                                    {file}
                                </span>
                            </div>
                        }
                    }).collect_view()}
                </div>
            </Show>

            <Show when=move || open.get()>
                <div class="absolute z-10 left-0 right-0 top-9 max-h-56 overflow-y-auto bg-[#111111] border border-[#ffffff10] rounded shadow-lg">
                    <For
                        each=move || suggestions.get()
                        key=|entry| entry.display_name.clone()
                        children=move |entry| {
                            let color = entry.color.clone().unwrap_or_else(|| DEFAULT_SWATCH.to_string());
                            let name = entry.display_name.clone();
                            view! {
                                <div
                                    class="flex items-center gap-2 px-2 py-1 text-[10px] text-white cursor-pointer hover:bg-[#ffffff08]"
                                    on:click=move |_| {
                                        value.set(name.clone());
                                        set_open.set(false);
                                    }
                                >
                                    <span class="w-2.5 h-2.5 rounded-full flex-shrink-0" style=format!("background: {};", color)></span>
                                    <span>{entry.display_name}</span>
                                </div>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}
