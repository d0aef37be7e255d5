//! Toast notifications for API results.

use leptos::prelude::*;
use crate::session::AdminSession;

/// Toast container - success and error messages from the session.
#[component]
pub fn ToastContainer() -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let api_message = session.api_message;
    let api_error = session.api_error;

    view! {
        <div class="fixed bottom-4 left-4 z-[70] flex flex-col gap-2 max-w-sm">
            <Show when=move || api_message.get().is_some()>
                <SuccessToast message=Signal::derive(move || api_message.get().unwrap_or_default()) />
            </Show>

            <Show when=move || api_error.get().is_some()>
                <ErrorToast message=Signal::derive(move || api_error.get().unwrap_or_default()) />
            </Show>
        </div>
    }
}

/// Success toast
#[component]
fn SuccessToast(message: Signal<String>) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");

    // Auto-dismiss after 5 seconds; a newer message restarts the clock
    Effect::new(move |_| {
        let shown = message.get();
        set_timeout(
            move || {
                if session.api_message.get_untracked().as_deref() == Some(shown.as_str()) {
                    session.clear_api_message();
                }
            },
            std::time::Duration::from_secs(5),
        );
    });

    view! {
        <div class="flex items-start gap-2 p-3 rounded-lg border shadow-lg bg-[#0d0d0d] border-[#22c55e40]">
            <div class="text-[#22c55e]">
                <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M5 13l4 4L19 7"/>
                </svg>
            </div>
            <p class="flex-1 text-[11px] text-white whitespace-pre-line">{move || message.get()}</p>
            <button
                class="text-[#666666] hover:text-white transition-colors"
                on:click=move |_| session.clear_api_message()
            >
                <svg class="w-3 h-3" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                </svg>
            </button>
        </div>
    }
}

/// Error toast
#[component]
fn ErrorToast(message: Signal<String>) -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");

    // Errors stay up longer (8 seconds)
    Effect::new(move |_| {
        let shown = message.get();
        set_timeout(
            move || {
                if session.api_error.get_untracked().as_deref() == Some(shown.as_str()) {
                    session.clear_api_error();
                }
            },
            std::time::Duration::from_secs(8),
        );
    });

    view! {
        <div class="flex items-start gap-2 p-3 rounded-lg border shadow-lg bg-[#0d0d0d] border-[#ff444440]">
            <div class="text-[#ff4444]">
                <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 8v4m0 4h.01M21 12a9 9 0 11-18 0 9 9 0 0118 0z"/>
                </svg>
            </div>
            <p class="flex-1 text-[11px] text-white whitespace-pre-line">{move || message.get()}</p>
            <button
                class="text-[#666666] hover:text-white transition-colors"
                on:click=move |_| session.clear_api_error()
            >
                <svg class="w-3 h-3" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"/>
                </svg>
            </button>
        </div>
    }
}
