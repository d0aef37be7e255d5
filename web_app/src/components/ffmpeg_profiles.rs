//! FFmpeg transcode profile manager.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_common::{
    args_warning, is_protected_profile, profile_path, validate_new_profile, validate_profile_args, ApiError, FfmpegProfile,
    NewProfileRequest, ProfileArgsUpdate, ProfileList, SelectProfileRequest, PROFILES_PATH,
};

use crate::api::ApiClient;
use crate::session::confirm;

/// One-line outcome of the last profile action.
#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Success(String),
    Failure(String),
}

/// Floating button plus the profile modal it opens.
#[component]
pub fn FfmpegProfileManager() -> impl IntoView {
    let (open, set_open) = signal(false);

    view! {
        <button
            class="fixed bottom-4 right-4 z-40 bg-[#1a1a1a] hover:bg-[#00d9ff] border border-[#ffffff08] hover:border-[#00d9ff] text-white hover:text-black text-[10px] font-medium py-2 px-3 rounded shadow-lg transition-colors"
            on:click=move |_| set_open.set(true)
        >
            "FFmpeg Profiles"
        </button>
        <Show when=move || open.get()>
            <ProfileModal on_close=move || set_open.set(false) />
        </Show>
    }
}

#[component]
fn ProfileModal(on_close: impl Fn() + 'static + Clone + Send + Sync) -> impl IntoView {
    let api = use_context::<ApiClient>().expect("ApiClient not found");

    let profiles = RwSignal::new(ProfileList::default());
    let notice = RwSignal::new(None::<Notice>);
    let editing = RwSignal::new(None::<String>);
    let (new_name, set_new_name) = signal(String::new());
    let (new_args, set_new_args) = signal(String::new());

    let reload = move || {
        spawn_local(async move {
            match api.get_json::<ProfileList>(PROFILES_PATH, &[]).await {
                Ok(list) => profiles.set(list),
                Err(e) => notice.set(Some(Notice::Failure(format!("Error loading profiles: {}", e.message())))),
            }
        });
    };
    reload();

    // Report a mutation, re-fetching the list after success
    let settle = move |result: Result<serde_json::Value, ApiError>, success: String| match result {
        Ok(_) => {
            log::info!("{}", success);
            notice.set(Some(Notice::Success(success)));
            reload();
        }
        Err(e) => {
            log::error!("Profile action failed: {}", e);
            notice.set(Some(Notice::Failure(e.message().to_string())));
        }
    };

    let add_profile = move |_| {
        let existing = profiles.with_untracked(|p| p.profiles.clone());
        let (name, args) = match validate_new_profile(&new_name.get_untracked(), &new_args.get_untracked(), &existing) {
            Ok(pair) => pair,
            Err(msg) => {
                notice.set(Some(Notice::Failure(msg)));
                return;
            }
        };
        spawn_local(async move {
            let request = NewProfileRequest { name: name.clone(), args };
            let result = api.post_json(PROFILES_PATH, &request).await;
            if result.is_ok() {
                set_new_name.set(String::new());
                set_new_args.set(String::new());
            }
            settle(result, format!("Profile '{}' added.", name));
        });
    };

    let select_profile = move |name: String| {
        spawn_local(async move {
            let request = SelectProfileRequest { name: name.clone() };
            let result = api.post_json(&format!("{}/select", PROFILES_PATH), &request).await;
            settle(result, format!("Profile '{}' selected.", name));
        });
    };

    let save_args = move |name: String, args: String| {
        let args = match validate_profile_args(&args) {
            Ok(args) => args,
            Err(msg) => {
                notice.set(Some(Notice::Failure(msg)));
                return;
            }
        };
        spawn_local(async move {
            let path = profile_path(&name);
            let result = api.put_json(&path, &ProfileArgsUpdate { args }).await;
            if result.is_ok() {
                editing.set(None);
            }
            settle(result, format!("Profile '{}' updated.", name));
        });
    };

    let delete_profile = move |name: String| {
        if !confirm(&format!("Delete profile '{}'?", name)) {
            return;
        }
        spawn_local(async move {
            let result = api.delete(&profile_path(&name)).await;
            settle(result, format!("Profile '{}' deleted.", name));
        });
    };

    let close = on_close.clone();

    view! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-50">
            <div class="bg-[#111111] border border-[#ffffff10] rounded-lg w-[640px] max-h-[85vh] flex flex-col">
                <div class="flex items-center justify-between p-3 border-b border-[#ffffff08]">
                    <h2 class="text-sm font-semibold text-white">"FFmpeg Profiles"</h2>
                    <button class="text-[#666666] hover:text-white" on:click=move |_| close()>
                        <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                        </svg>
                    </button>
                </div>

                <div class="p-3 space-y-2 overflow-y-auto">
                    {move || notice.get().map(|n| match n {
                        Notice::Success(msg) => view! {
                            <div class="bg-[#22c55e20] border border-[#22c55e40] rounded p-2 text-[10px] text-[#22c55e]">{msg}</div>
                        }.into_any(),
                        Notice::Failure(msg) => view! {
                            <div class="bg-[#ff444420] border border-[#ff444440] rounded p-2 text-[10px] text-[#ff4444]">{msg}</div>
                        }.into_any(),
                    })}

                    <For
                        each=move || profiles.get().profiles
                        key=|p| (p.name.clone(), p.args.clone())
                        children=move |profile: FfmpegProfile| {
                            view! {
                                <ProfileEntry
                                    profile=profile
                                    selected=Signal::derive(move || profiles.get().selected)
                                    editing=editing
                                    on_select=Callback::new(move |name: String| select_profile(name))
                                    on_save=Callback::new(move |(name, args): (String, String)| save_args(name, args))
                                    on_delete=Callback::new(move |name: String| delete_profile(name))
                                />
                            }
                        }
                    />
                </div>

                <div class="p-3 border-t border-[#ffffff08] space-y-2">
                    <h3 class="text-[10px] font-semibold text-[#00d9ff] uppercase tracking-wide">"Add Profile"</h3>
                    <input
                        type="text"
                        placeholder="Name"
                        class="w-full bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white focus:border-[#00d9ff] focus:outline-none"
                        prop:value=move || new_name.get()
                        on:input=move |ev| set_new_name.set(event_target_value(&ev))
                    />
                    <textarea
                        placeholder="-i {input} -c copy -f mpegts pipe:1"
                        rows="2"
                        class="w-full bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white font-mono focus:border-[#00d9ff] focus:outline-none"
                        prop:value=move || new_args.get()
                        on:input=move |ev| set_new_args.set(event_target_value(&ev))
                    ></textarea>
                    {move || {
                        let args = new_args.get();
                        (!args.trim().is_empty())
                            .then(|| args_warning(&args))
                            .flatten()
                            .map(|warning| view! { <p class="text-[9px] text-[#facc15]">{warning}</p> })
                    }}
                    <div class="flex justify-end">
                        <button
                            class="bg-[#00d9ff20] border border-[#00d9ff40] text-[#00d9ff] hover:bg-[#00d9ff30] text-[10px] px-3 py-1.5 rounded"
                            on:click=add_profile
                        >
                            "Add"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ProfileEntry(
    profile: FfmpegProfile,
    selected: Signal<Option<String>>,
    editing: RwSignal<Option<String>>,
    on_select: Callback<String>,
    on_save: Callback<(String, String)>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let name = profile.name.clone();
    let protected = is_protected_profile(&name);
    let (draft, set_draft) = signal(profile.args.clone());

    let is_selected = {
        let name = name.clone();
        move || selected.get().as_deref() == Some(name.as_str())
    };
    let is_editing = {
        let name = name.clone();
        move || editing.get().as_deref() == Some(name.as_str())
    };

    let select_name = name.clone();
    let edit_name = name.clone();
    let edit_args = profile.args.clone();
    let save_name = name.clone();
    let delete_name = name.clone();
    let is_selected_badge = is_selected.clone();

    view! {
        <div class=move || format!(
            "border rounded p-2 space-y-1 {}",
            if is_selected() { "border-[#00d9ff40] bg-[#00d9ff08]" } else { "border-[#ffffff08]" }
        )>
            <div class="flex items-center gap-2">
                <span class="text-[11px] font-semibold text-white">{name.clone()}</span>
                <Show when=is_selected_badge.clone()>
                    <span class="text-[8px] px-1.5 py-0.5 rounded bg-[#00d9ff20] text-[#00d9ff]">"SELECTED"</span>
                </Show>
                {protected.then(|| view! {
                    <span class="text-[8px] px-1.5 py-0.5 rounded bg-[#ffffff10] text-[#888888]">"BUILT-IN"</span>
                })}
                <div class="flex-1"></div>
                <button
                    class="text-[9px] px-2 py-0.5 rounded bg-[#1a1a1a] border border-[#ffffff08] text-[#cccccc] hover:text-white"
                    on:click=move |_| on_select.run(select_name.clone())
                >
                    "Select"
                </button>
                {(!protected).then(|| {
                    let edit_name = edit_name.clone();
                    let edit_args = edit_args.clone();
                    let delete_name = delete_name.clone();
                    view! {
                        <button
                            class="text-[9px] px-2 py-0.5 rounded bg-[#1a1a1a] border border-[#ffffff08] text-[#cccccc] hover:text-white"
                            on:click=move |_| {
                                set_draft.set(edit_args.clone());
                                editing.set(Some(edit_name.clone()));
                            }
                        >
                            "Edit"
                        </button>
                        <button
                            class="text-[9px] px-2 py-0.5 rounded bg-[#ff444420] border border-[#ff444440] text-[#ff4444] hover:bg-[#ff444430]"
                            on:click=move |_| on_delete.run(delete_name.clone())
                        >
                            "Delete"
                        </button>
                    }
                })}
            </div>
            <Show
                when=is_editing
                fallback={
                    let args = profile.args.clone();
                    move || view! { <code class="block text-[10px] text-[#888888] break-all">{args.clone()}</code> }
                }
            >
                <div class="flex gap-1">
                    <input
                        type="text"
                        class="flex-1 bg-[#0a0a0a] border border-[#00d9ff] rounded px-2 py-1 text-[10px] text-white font-mono focus:outline-none"
                        prop:value=move || draft.get()
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                    />
                    <button
                        class="text-[9px] px-2 py-0.5 rounded bg-[#00d9ff20] border border-[#00d9ff40] text-[#00d9ff]"
                        on:click={
                            let save_name = save_name.clone();
                            move |_| on_save.run((save_name.clone(), draft.get_untracked()))
                        }
                    >
                        "Save"
                    </button>
                    <button
                        class="text-[9px] px-2 py-0.5 rounded bg-[#1a1a1a] border border-[#ffffff08] text-[#888888]"
                        on:click=move |_| editing.set(None)
                    >
                        "Cancel"
                    </button>
                </div>
            </Show>
        </div>
    }
}
