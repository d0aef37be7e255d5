//! Searchable logo chooser.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_common::{logo_matches, LogoUpdate};

use crate::api::ApiClient;
use crate::session::{AdminSession, LogoTarget};

/// Logo grid bound to `AdminSession::logo_target`. For a channel target
/// the pick is saved right away; for the modal it only fills the field.
#[component]
pub fn LogoPicker() -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");

    let (search, set_search) = signal(String::new());
    let search_ref = NodeRef::<leptos::html::Input>::new();

    spawn_local(async move {
        match api.get_json::<Vec<String>>("/api/logos", &[]).await {
            Ok(logos) => {
                session.logos.set(logos);
                if let Some(input) = search_ref.get_untracked() {
                    let _ = input.focus();
                }
            }
            Err(e) => {
                log::error!("Error fetching logos: {}", e);
                session.set_error(format!("Error fetching logos: {}", e.message()));
            }
        }
    });

    let close = move || session.logo_target.set(LogoTarget::Closed);

    let pick = move |url: String| {
        session.selected_logo.set(url.clone());
        match session.logo_target.get_untracked() {
            LogoTarget::Channel(channel_id) => {
                spawn_local(async move {
                    match api.submit(&LogoUpdate { channel_id, new_logo: url.clone() }).await {
                        Ok(_) => session.channels.update(|m| m.set_logo(channel_id, url)),
                        Err(e) => session.set_error(format!("Failed to update channel logo: {}", e.message())),
                    }
                    close();
                });
            }
            LogoTarget::Modal | LogoTarget::Closed => close(),
        }
    };

    let visible_logos = move || {
        let filter = search.get();
        session
            .logos
            .with(|logos| logos.iter().filter(|url| logo_matches(url, &filter)).cloned().collect::<Vec<_>>())
    };

    view! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-[55]" on:click=move |_| close()>
            <div
                class="bg-[#111111] border border-[#ffffff10] rounded-lg w-[640px] max-h-[80vh] flex flex-col"
                on:click=move |ev| ev.stop_propagation()
            >
                <div class="flex items-center justify-between gap-2 p-3 border-b border-[#ffffff08]">
                    <h2 class="text-sm font-semibold text-white">"Choose Logo"</h2>
                    <input
                        node_ref=search_ref
                        type="text"
                        placeholder="Search logos..."
                        class="flex-1 bg-[#0a0a0a] border border-[#ffffff08] rounded px-2 py-1.5 text-[11px] text-white focus:border-[#00d9ff] focus:outline-none"
                        prop:value=move || search.get()
                        on:input=move |ev| set_search.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Escape" {
                                close();
                            }
                        }
                    />
                    <button class="text-[#666666] hover:text-white" on:click=move |_| close()>
                        <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                        </svg>
                    </button>
                </div>
                <div class="p-3 overflow-y-auto grid grid-cols-6 gap-2">
                    <For
                        each=visible_logos
                        key=|url| url.clone()
                        children=move |url| {
                            let selected_url = url.clone();
                            let pick_url = url.clone();
                            view! {
                                <img
                                    src=url
                                    class=move || format!(
                                        "h-14 w-full object-contain p-1 rounded cursor-pointer border {}",
                                        if session.selected_logo.get() == selected_url {
                                            "border-[#00d9ff] bg-[#00d9ff10]"
                                        } else {
                                            "border-[#ffffff08] hover:border-[#ffffff30]"
                                        }
                                    )
                                    on:click=move |_| pick(pick_url.clone())
                                />
                            }
                        }
                    />
                </div>
            </div>
        </div>
    }
}
