//! Blocking progress overlay for multi-step operations.

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::scheduler::ScheduledTask;
use crate::session::AdminSession;

const TICKER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Covers the page while `AdminSession::overlay` is set and shows the
/// progress lines reported so far with an animated ticker.
#[component]
pub fn StatusOverlay() -> impl IntoView {
    let session = use_context::<AdminSession>().expect("AdminSession not found");
    let config = use_context::<ClientConfig>().expect("ClientConfig not found");
    let overlay = session.overlay;

    let (frame, set_frame) = signal(0usize);
    let ticker = ScheduledTask::new();
    let ticker_period = config.ticker_period;

    // Run the ticker only while the overlay is visible
    Effect::new(move |_| {
        if overlay.with(|o| o.is_some()) {
            if !ticker.is_running() {
                set_frame.set(0);
                ticker.start(ticker_period, None, move |_| {
                    set_frame.update(|f| *f = (*f + 1) % TICKER_FRAMES.len());
                });
            }
        } else {
            ticker.stop();
        }
    });
    on_cleanup(move || ticker.stop());

    let list_ref = NodeRef::<leptos::html::Div>::new();
    // Keep the newest line visible
    Effect::new(move |_| {
        overlay.track();
        if let Some(list) = list_ref.get() {
            list.set_scroll_top(list.scroll_height());
        }
    });

    view! {
        <Show when=move || overlay.with(|o| o.is_some())>
            <div class="fixed inset-0 bg-black/70 flex items-center justify-center z-[60]">
                <div class="bg-[#111111] border border-[#ffffff10] rounded-lg w-[460px] flex flex-col">
                    <div class="flex items-center gap-2 p-3 border-b border-[#ffffff08]">
                        <span class="text-[#00d9ff] text-sm w-4 text-center">
                            {move || TICKER_FRAMES[frame.get()]}
                        </span>
                        <h2 class="text-sm font-semibold text-white">
                            {move || overlay.with(|o| o.as_ref().map(|s| s.title.clone()).unwrap_or_default())}
                        </h2>
                    </div>
                    <div
                        node_ref=list_ref
                        class="p-3 max-h-[320px] overflow-y-auto font-mono text-[10px] text-[#cccccc] space-y-0.5"
                    >
                        <For
                            each=move || {
                                overlay.with(|o| {
                                    o.as_ref()
                                        .map(|s| s.lines.iter().cloned().enumerate().collect::<Vec<_>>())
                                        .unwrap_or_default()
                                })
                            }
                            key=|(i, _)| *i
                            children=move |(_, line)| view! { <div>{line}</div> }
                        />
                    </div>
                </div>
            </div>
        </Show>
    }
}
