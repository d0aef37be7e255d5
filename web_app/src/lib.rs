use leptos::prelude::*;
use leptos::mount::mount_to_body;
use leptos_router::components::{Router, Routes, Route};
use leptos_router::path;
use wasm_bindgen::prelude::*;

mod api;
mod components;
mod config;
mod insert;
mod scheduler;
mod session;
mod storage;

use api::ApiClient;
use components::{ChannelTablePage, FfmpegProfileManager, SettingsPage, StatusOverlay, ToastContainer};
use config::ClientConfig;
use session::AdminSession;

#[wasm_bindgen(start)]
pub fn main() {
    let config = ClientConfig::from_document();
    _ = console_log::init_with_level(config.log_level);
    console_error_panic_hook::set_once();
    log::info!("Channel admin starting, API at {}", config.api_base);

    mount_to_body(move || view! { <App config=config/> });
}

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_context(ApiClient::new(&config.api_base));
    provide_context(config);
    provide_context(AdminSession::new());

    view! {
        <Router>
            <Routes fallback=|| view! { <ChannelTablePage/> }>
                <Route path=path!("/") view=ChannelTablePage />
                <Route path=path!("/web") view=ChannelTablePage />
                <Route path=path!("/settings") view=SettingsPage />
            </Routes>
            <FfmpegProfileManager/>
            <StatusOverlay/>
            <ToastContainer/>
        </Router>
    }
}
