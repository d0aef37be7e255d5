mod channel_modal;
mod channel_row;
mod channel_table;
mod epg_search;
mod ffmpeg_profiles;
mod logo_picker;
mod settings_page;
mod status_overlay;
mod stream_status;
mod toast;

pub use channel_table::ChannelTablePage;
pub use ffmpeg_profiles::FfmpegProfileManager;
pub use settings_page::SettingsPage;
pub use status_overlay::StatusOverlay;
pub use toast::ToastContainer;

fn event_target_checked(ev: &leptos::ev::Event) -> bool {
    use wasm_bindgen::JsCast;
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|e| e.checked())
        .unwrap_or(false)
}
