//! One row of the channel table.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_common::{evaluate_number_edit, ActiveUpdate, ChannelColumn, NumberEdit, NumberUpdate};

use super::event_target_checked;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::session::{AdminSession, LogoTarget};

/// DOM id of a row, used to scroll it into view.
pub fn row_element_id(channel_id: i64) -> String {
    format!("channel-row-{}", channel_id)
}

#[component]
pub fn ChannelRowView(channel_id: i64) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api = use_context::<ApiClient>().expect("ApiClient not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");

    let row = Memo::new(move |_| session.channels.with(|m| m.row(channel_id).cloned()));
    let number = Memo::new(move |_| row.with(|r| r.as_ref().map(|r| r.channel.number.clone()).unwrap_or_default()));

    // Input text; the row's number is the baseline it is diffed against
    let (draft, set_draft) = signal(number.get_untracked());
    Effect::new(move |_| set_draft.set(number.get()));
    // Enter commits and blurs; the blur that follows must not commit twice
    let skip_blur = StoredValue::new(false);

    let flag_duration = config.row_flag_duration;
    let commit_number = move || {
        let old = number.get_untracked();
        match evaluate_number_edit(&old, &draft.get_untracked()) {
            NumberEdit::Unchanged => set_draft.set(old),
            NumberEdit::Invalid => {
                set_draft.set(old);
                session.set_error("Channel number must be a whole number.");
            }
            NumberEdit::Commit { old, new } => {
                spawn_local(async move {
                    let update = NumberUpdate {
                        channel_id,
                        current_number: old.clone(),
                        new_number: new.clone(),
                    };
                    match api.submit(&update).await {
                        Ok(_) => {
                            log::info!("Channel {} renumbered {} -> {}", channel_id, old, new);
                            session.channels.update(|m| m.set_number(channel_id, new));
                            set_timeout(
                                move || session.channels.update(|m| m.clear_flag(channel_id)),
                                flag_duration,
                            );
                        }
                        Err(e) => {
                            set_draft.set(old);
                            session.set_error(format!("Error updating channel number: {}", e.message()));
                        }
                    }
                });
            }
        }
    };

    let epg_config = config.clone();
    let on_toggle = move |ev: leptos::ev::Event| {
        let active = event_target_checked(&ev);
        let Some(toggle) = session.channels.try_update(|m| m.begin_toggle(channel_id, active)).flatten() else {
            return;
        };
        let config = epg_config.clone();
        spawn_local(async move {
            match api.submit(&ActiveUpdate { channel_id, active }).await {
                Ok(_) => {
                    if active {
                        session.start_epg_refresh(api, &config, channel_id);
                    }
                }
                Err(e) => {
                    log::warn!("Active toggle for {} failed, reverting", channel_id);
                    session.channels.update(|m| m.revert_toggle(&toggle));
                    session.set_error(format!("Error updating active status: {}", e.message()));
                }
            }
        });
    };

    let open_logo_picker = move |_| {
        if let Some(r) = row.get_untracked() {
            session.selected_logo.set(r.channel.logo_url.clone());
        }
        session.logo_target.set(LogoTarget::Channel(channel_id));
    };

    let open_modal = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        if let Some(r) = row.get_untracked() {
            session.selected_logo.set(r.channel.logo_url.clone());
        }
        session.current_channel.set(Some(channel_id));
    };

    let cell = move |column: ChannelColumn| {
        move || row.with(|r| r.as_ref().map(|r| r.cell_text(column)).unwrap_or_default())
    };

    view! {
        <tr
            id=row_element_id(channel_id)
            class=move || format!(
                "border-b border-[#ffffff08] transition-colors {}",
                if row.with(|r| r.as_ref().is_some_and(|r| r.flagged)) {
                    "bg-[#22c55e20]"
                } else {
                    "hover:bg-[#ffffff05]"
                }
            )
        >
            <td class="px-2 py-1 text-center">
                <input
                    type="checkbox"
                    class="accent-[#00d9ff]"
                    prop:checked=move || row.with(|r| r.as_ref().is_some_and(|r| r.checked))
                    on:change=on_toggle
                />
            </td>
            <td class="px-2 py-1">
                <input
                    type="text"
                    class="w-16 bg-[#0a0a0a] border border-[#ffffff08] rounded px-1.5 py-0.5 text-[11px] text-white font-mono focus:border-[#00d9ff] focus:outline-none"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            skip_blur.set_value(true);
                            commit_number();
                            let _ = event_target::<web_sys::HtmlInputElement>(&ev).blur();
                        }
                    }
                    on:blur=move |_| {
                        if skip_blur.get_value() {
                            skip_blur.set_value(false);
                            return;
                        }
                        commit_number();
                    }
                />
            </td>
            <td class="px-2 py-1">
                <img
                    class="h-6 max-w-[64px] object-contain cursor-pointer"
                    src=move || row.with(|r| r.as_ref().map(|r| r.channel.logo_url.clone()).unwrap_or_default())
                    title="Change logo"
                    on:click=open_logo_picker
                />
            </td>
            <td class="px-2 py-1 text-[11px] text-white">{cell(ChannelColumn::Name)}</td>
            <td class="px-2 py-1 text-[11px] text-[#888888]">{cell(ChannelColumn::Category)}</td>
            <td class="px-2 py-1 text-[11px] text-[#cccccc]">{cell(ChannelColumn::NowPlaying)}</td>
            <td class="px-2 py-1 text-[11px] text-[#888888]">{cell(ChannelColumn::EpgEntry)}</td>
            <td class="px-2 py-1 text-right">
                <button
                    class="text-[10px] px-2 py-0.5 rounded bg-[#1a1a1a] border border-[#ffffff08] text-[#888888] hover:text-white"
                    on:click=open_modal
                >
                    "Edit"
                </button>
            </td>
        </tr>
    }
}
