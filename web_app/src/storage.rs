//! Single-use state carried across one page reload.
//!
//! Values are written right before a reload and removed as soon as the
//! next page reads them.

const FILTER_TEXT_KEY: &str = "filterText";
const SCROLL_ANCHOR_KEY: &str = "scrollAnchorChannel";
const SCROLL_OFFSET_KEY: &str = "scrollOffset";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn put(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("Could not persist {}: {:?}", key, e);
        }
    }
}

fn take(key: &str) -> Option<String> {
    let storage = local_storage()?;
    let value = storage.get_item(key).ok()??;
    let _ = storage.remove_item(key);
    Some(value)
}

pub fn save_filter_text(text: &str) {
    put(FILTER_TEXT_KEY, text);
}

pub fn take_filter_text() -> Option<String> {
    take(FILTER_TEXT_KEY)
}

/// Remember which channel row and scroll offset to restore.
pub fn save_scroll_anchor(channel_id: i64, offset: f64) {
    put(SCROLL_ANCHOR_KEY, &channel_id.to_string());
    put(SCROLL_OFFSET_KEY, &offset.to_string());
}

pub fn take_scroll_anchor() -> Option<i64> {
    take(SCROLL_ANCHOR_KEY)?.parse().ok()
}

pub fn take_scroll_offset() -> Option<f64> {
    take(SCROLL_OFFSET_KEY)?.parse().ok()
}
