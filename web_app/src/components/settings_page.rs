//! Settings page: EPG and M3U files, tuner count and live streams.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_common::{
    contrast_text_color, file_color, has_one_shot_params, parse_tuner_count, ActionResponse, ApiError,
    BusyFlags, DeleteEpgRequest, EpgColorUpdate, ServerConfig, SettingsActivity, TunerConfigUpdate,
};

use super::stream_status::StreamStatus;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::session::{confirm, reload_page, AdminSession};

/// Inline result text under a settings form.
#[derive(Debug, Clone, PartialEq)]
struct InlineStatus {
    text: String,
    failed: bool,
}

impl InlineStatus {
    fn pending(text: &str) -> Option<Self> {
        Some(Self { text: text.to_string(), failed: false })
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    strip_one_shot_params();

    let busy = RwSignal::new(BusyFlags::default());
    let (m3u_files, set_m3u_files) = signal::<Vec<String>>(Vec::new());

    {
        let config = config.clone();
        spawn_local(async move {
            if let Err(e) = session.load_epg_sources(api, &config).await {
                session.set_error(format!("Error fetching EPG files: {}", e.message()));
            }
        });
    }
    spawn_local(async move {
        match api.get_json::<Vec<String>>("/api/m3u_filenames", &[]).await {
            Ok(files) => set_m3u_files.set(files),
            Err(e) => log::error!("Error fetching M3U files: {}", e),
        }
    });

    view! {
        <div class="min-h-screen bg-[#0a0a0a] text-white p-4 space-y-3">
            <div class="flex items-center justify-between">
                <h1 class="text-sm font-semibold text-[#00d9ff]">"Settings"</h1>
                <a href="/" class="text-[10px] text-[#888888] hover:text-white">"Channels"</a>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-3">
                <EpgSection busy=busy />
                <div class="space-y-3">
                    <FileUploadForm
                        title="Upload M3U"
                        path="/upload_m3u"
                        accept=".m3u,.m3u8"
                        activity=SettingsActivity::UploadingM3u
                        busy=busy
                    />
                    <div class="bg-[#111111] border border-[#ffffff10] rounded-lg p-3">
                        <h3 class="text-[10px] font-semibold text-[#00d9ff] mb-2 uppercase tracking-wide">"M3U Files"</h3>
                        <Show
                            when=move || !m3u_files.with(|f| f.is_empty())
                            fallback=|| view! { <p class="text-[10px] text-[#666666]">"No M3U files uploaded."</p> }
                        >
                            <ul class="space-y-0.5">
                                {move || m3u_files.get().into_iter().map(|f| view! {
                                    <li class="text-[10px] text-[#cccccc] font-mono">{f}</li>
                                }).collect_view()}
                            </ul>
                        </Show>
                    </div>
                    <TunerCountForm />
                </div>
            </div>

            <StreamStatus busy=Signal::derive(move || busy.with(|b| b.any())) />
        </div>
    }
}

/// Drop the server's post-redirect confirmation parameters from the URL.
fn strip_one_shot_params() {
    let Some(window) = web_sys::window() else { return };
    let query = window.location().search().unwrap_or_default();
    if !has_one_shot_params(&query) {
        return;
    }
    if let Ok(history) = window.history() {
        if let Err(e) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some("/settings")) {
            log::warn!("Could not clean settings URL: {:?}", e);
        }
    }
}

/// Show the outcome of a settings action. Success reloads the page after
/// a delay; failure hides the message after a delay and frees the form.
fn finish_action(
    result: Result<ActionResponse, ApiError>,
    status: WriteSignal<Option<InlineStatus>>,
    busy: RwSignal<BusyFlags>,
    activity: SettingsActivity,
    config: &ClientConfig,
) {
    match result {
        Ok(response) => {
            log::info!("{:?} finished: {}", activity, response.text());
            status.set(Some(InlineStatus { text: response.text(), failed: false }));
            set_timeout(reload_page, config.reload_delay);
        }
        Err(e) => {
            log::error!("{:?} failed: {}", activity, e);
            status.set(Some(InlineStatus { text: format!("Error: {}", e.message()), failed: true }));
            busy.update(|b| b.finish(activity));
            set_timeout(move || status.set(None), config.hide_delay);
        }
    }
}

#[component]
fn StatusLine(status: ReadSignal<Option<InlineStatus>>) -> impl IntoView {
    move || {
        status.get().map(|s| {
            let class = if s.failed { "text-[10px] text-[#ff4444] mt-1" } else { "text-[10px] text-[#22c55e] mt-1" };
            view! { <p class=class>{s.text}</p> }
        })
    }
}

/// Single-file upload posted as multipart field `file`.
#[component]
fn FileUploadForm(
    title: &'static str,
    path: &'static str,
    accept: &'static str,
    activity: SettingsActivity,
    busy: RwSignal<BusyFlags>,
) -> impl IntoView {
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let file_ref = NodeRef::<leptos::html::Input>::new();
    let (status, set_status) = signal::<Option<InlineStatus>>(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(file) = file_ref.get_untracked().and_then(|input| input.files()).and_then(|list| list.get(0)) else {
            set_status.set(Some(InlineStatus { text: "Please choose a file first.".to_string(), failed: true }));
            return;
        };
        busy.update(|b| b.start(activity));
        set_status.set(InlineStatus::pending("Uploading..."));
        let config = config.clone();
        spawn_local(async move {
            let result = api.upload(path, &file).await;
            finish_action(result, set_status, busy, activity, &config);
        });
    };

    view! {
        <form class="bg-[#111111] border border-[#ffffff10] rounded-lg p-3" on:submit=on_submit>
            <h3 class="text-[10px] font-semibold text-[#00d9ff] mb-2 uppercase tracking-wide">{title}</h3>
            <div class="flex items-center gap-2">
                <input node_ref=file_ref type="file" accept=accept class="flex-1 text-[10px] text-[#cccccc]" />
                <button
                    type="submit"
                    class="bg-[#00d9ff20] border border-[#00d9ff40] text-[#00d9ff] hover:bg-[#00d9ff30] text-[10px] px-3 py-1.5 rounded disabled:opacity-50"
                    disabled=move || busy.with(|b| b.is_busy(activity))
                >
                    "Upload"
                </button>
            </div>
            <StatusLine status=status />
        </form>
    }
}

/// EPG upload, parse, delete and colour tags.
#[component]
fn EpgSection(busy: RwSignal<BusyFlags>) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let (status, set_status) = signal::<Option<InlineStatus>>(None);

    let parse_config = config.clone();
    let parse_epg = move |_| {
        busy.update(|b| b.start(SettingsActivity::ParsingEpg));
        set_status.set(InlineStatus::pending("Parsing EPG files, this may take a while..."));
        let config = parse_config.clone();
        spawn_local(async move {
            let result = api.post_empty("/parse_epg").await;
            finish_action(result, set_status, busy, SettingsActivity::ParsingEpg, &config);
        });
    };

    let delete_epg = move |filename: String| {
        if !confirm(&format!("Delete EPG file {}?", filename)) {
            return;
        }
        busy.update(|b| b.start(SettingsActivity::DeletingEpg));
        set_status.set(InlineStatus::pending("Deleting..."));
        let config = config.clone();
        spawn_local(async move {
            let result = api.submit(&DeleteEpgRequest { filename }).await;
            finish_action(result, set_status, busy, SettingsActivity::DeletingEpg, &config);
        });
    };

    let set_color = move |filename: String, color: String| {
        spawn_local(async move {
            let update = EpgColorUpdate { filename: filename.clone(), color: color.clone() };
            match api.submit(&update).await {
                Ok(_) => session.epg_colors.update(|c| {
                    c.insert(filename, color);
                }),
                Err(e) => session.set_error(format!("Error updating EPG colour: {}", e.message())),
            }
        });
    };

    view! {
        <div class="space-y-3">
            <FileUploadForm
                title="Upload EPG"
                path="/upload_epg"
                accept=".xml,.xmltv,.gz"
                activity=SettingsActivity::UploadingEpg
                busy=busy
            />
            <div class="bg-[#111111] border border-[#ffffff10] rounded-lg p-3">
                <div class="flex items-center justify-between mb-2">
                    <h3 class="text-[10px] font-semibold text-[#00d9ff] uppercase tracking-wide">"EPG Files"</h3>
                    <button
                        class="bg-[#1a1a1a] border border-[#ffffff08] text-[#cccccc] hover:text-white text-[10px] px-3 py-1 rounded disabled:opacity-50"
                        disabled=move || busy.with(|b| b.is_busy(SettingsActivity::ParsingEpg))
                        on:click=parse_epg
                    >
                        {move || if busy.with(|b| b.is_busy(SettingsActivity::ParsingEpg)) { "Parsing..." } else { "Parse EPG" }}
                    </button>
                </div>
                <Show
                    when=move || !session.epg_files.with(|f| f.is_empty())
                    fallback=|| view! { <p class="text-[10px] text-[#666666]">"No EPG files uploaded."</p> }
                >
                    <ul class="space-y-1">
                        <For
                            each=move || session.epg_files.get()
                            key=|f| f.clone()
                            children={
                                let delete_epg = delete_epg.clone();
                                move |filename| {
                                let color = {
                                    let filename = filename.clone();
                                    Memo::new(move |_| session.epg_colors.with(|c| file_color(c, &filename).to_string()))
                                };
                                let color_target = filename.clone();
                                let delete_target = filename.clone();
                                let delete_epg = delete_epg.clone();
                                view! {
                                    <li class="flex items-center gap-2">
                                        <span
                                            class="w-3 h-3 rounded-full flex-shrink-0 border border-[#ffffff20]"
                                            style=move || format!("background: {};", color.get())
                                        ></span>
                                        <span
                                            class="flex-1 text-[10px] font-mono px-1 rounded truncate"
                                            style=move || {
                                                let c = color.get();
                                                format!("background: {}; color: {};", c, contrast_text_color(&c))
                                            }
                                        >
                                            {filename}
                                        </span>
                                        <input
                                            type="color"
                                            class="w-6 h-5 bg-transparent cursor-pointer"
                                            prop:value=move || color.get()
                                            on:change=move |ev| set_color(color_target.clone(), event_target_value(&ev))
                                        />
                                        <button
                                            class="text-[9px] px-2 py-0.5 rounded bg-[#ff444420] border border-[#ff444440] text-[#ff4444] hover:bg-[#ff444430] disabled:opacity-50"
                                            disabled=move || busy.with(|b| b.is_busy(SettingsActivity::DeletingEpg))
                                            on:click=move |_| delete_epg(delete_target.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </li>
                                }
                                }
                            }
                        />
                    </ul>
                </Show>
                <StatusLine status=status />
            </div>
        </div>
    }
}

#[component]
fn TunerCountForm() -> impl IntoView {
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let (value, set_value) = signal(String::new());
    let (status, set_status) = signal::<Option<InlineStatus>>(None);

    spawn_local(async move {
        match api.get_json::<ServerConfig>("/api/config", &[]).await {
            Ok(server) => set_value.set(server.tuner_count.to_string()),
            Err(e) => log::error!("Error fetching server config: {}", e),
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let tuner_count = match parse_tuner_count(&value.get_untracked()) {
            Ok(n) => n,
            Err(msg) => {
                set_status.set(Some(InlineStatus { text: msg, failed: true }));
                return;
            }
        };
        set_status.set(InlineStatus::pending("Saving..."));
        let reload_delay = config.reload_delay;
        let hide_delay = config.hide_delay;
        spawn_local(async move {
            match api.submit(&TunerConfigUpdate { tuner_count }).await {
                Ok(response) => {
                    set_status.set(Some(InlineStatus { text: response.text(), failed: false }));
                    set_timeout(reload_page, reload_delay);
                }
                Err(e) => {
                    set_status.set(Some(InlineStatus { text: format!("Error: {}", e.message()), failed: true }));
                    set_timeout(move || set_status.set(None), hide_delay);
                }
            }
        });
    };

    view! {
        <form class="bg-[#111111] border border-[#ffffff10] rounded-lg p-3" on:submit=on_submit>
            <h3 class="text-[10px] font-semibold text-[#00d9ff] mb-2 uppercase tracking-wide">"Tuners"</h3>
            <div class="flex items-center gap-2">
                <input
                    type="number"
                    min="1"
                    class="w-24 bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white focus:border-[#00d9ff] focus:outline-none"
                    prop:value=move || value.get()
                    on:input=move |ev| set_value.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    class="bg-[#00d9ff20] border border-[#00d9ff40] text-[#00d9ff] hover:bg-[#00d9ff30] text-[10px] px-3 py-1.5 rounded"
                >
                    "Save"
                </button>
            </div>
            <StatusLine status=status />
        </form>
    }
}
