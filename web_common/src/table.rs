//! Channel table view-model: filtering, sorting, selection and the
//! optimistic active toggle.
//!
//! Rows are addressed by channel id. The browser side renders whatever
//! [`ChannelTableModel::display_rows`] returns and funnels every change
//! through the accessors here.

use std::cmp::Ordering;

use crate::models::{ChannelRow, CurrentProgram};

/// Status cell text while the programme guide is being fetched.
pub const STATUS_LOADING: &str = "Loading...";
/// Status cell text for inactive channels.
pub const STATUS_INACTIVE: &str = "Channel Inactive";
/// Status cell text when nothing is on air.
pub const STATUS_NO_PROGRAM: &str = "No Program";

/// Columns of the channel table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelColumn {
    Active,
    Number,
    Logo,
    Name,
    Category,
    NowPlaying,
    EpgEntry,
}

impl ChannelColumn {
    pub const ALL: [ChannelColumn; 7] = [
        ChannelColumn::Active,
        ChannelColumn::Number,
        ChannelColumn::Logo,
        ChannelColumn::Name,
        ChannelColumn::Category,
        ChannelColumn::NowPlaying,
        ChannelColumn::EpgEntry,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChannelColumn::Active => "Active",
            ChannelColumn::Number => "Number",
            ChannelColumn::Logo => "Logo",
            ChannelColumn::Name => "Name",
            ChannelColumn::Category => "Category",
            ChannelColumn::NowPlaying => "Now Playing",
            ChannelColumn::EpgEntry => "EPG Entry",
        }
    }

    /// Columns rendered as text; only these take part in filtering.
    pub fn is_text(&self) -> bool {
        !matches!(self, ChannelColumn::Active | ChannelColumn::Logo)
    }
}

/// One rendered row: server data plus client-only UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct RowState {
    pub channel: ChannelRow,
    /// Checkbox state. Starts equal to `channel.active` but select-all
    /// changes it without touching the server.
    pub checked: bool,
    /// Text of the now-playing cell.
    pub status: String,
    /// Briefly set after a successful inline edit.
    pub flagged: bool,
}

impl RowState {
    pub fn new(channel: ChannelRow) -> Self {
        let status = initial_status(&channel);
        Self { checked: channel.active, status, flagged: false, channel }
    }

    pub fn id(&self) -> i64 {
        self.channel.id
    }

    /// Value used for sorting and filtering.
    pub fn cell_text(&self, column: ChannelColumn) -> String {
        match column {
            ChannelColumn::Active => if self.channel.active { "1" } else { "0" }.to_string(),
            ChannelColumn::Number => self.channel.number.trim().to_string(),
            ChannelColumn::Logo => self.channel.logo_file_name().to_string(),
            ChannelColumn::Name => self.channel.name.trim().to_string(),
            ChannelColumn::Category => self.channel.category.trim().to_string(),
            ChannelColumn::NowPlaying => self.status.trim().to_string(),
            ChannelColumn::EpgEntry => self.channel.epg_entry.trim().to_string(),
        }
    }

    /// Case-insensitive substring match over every text cell.
    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        ChannelColumn::ALL
            .iter()
            .filter(|c| c.is_text())
            .any(|c| self.cell_text(*c).to_lowercase().contains(&needle))
    }
}

/// Status text for a freshly loaded row.
pub fn initial_status(channel: &ChannelRow) -> String {
    if !channel.active {
        STATUS_INACTIVE.to_string()
    } else if channel.epg_title.trim().is_empty() {
        STATUS_NO_PROGRAM.to_string()
    } else {
        channel.epg_title.clone()
    }
}

/// Status text for a `GET /api/current_program` answer.
pub fn status_from_program(program: &CurrentProgram) -> String {
    match program.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => STATUS_NO_PROGRAM.to_string(),
    }
}

/// The refresh poll keeps going only while the guide still says loading.
pub fn epg_refresh_settled(status: &str) -> bool {
    status != STATUS_LOADING
}

/// Current sort column and direction. Only one column carries an
/// indicator at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<ChannelColumn>,
    pub ascending: bool,
}

impl SortState {
    /// Header click: flip direction on the same column, otherwise start
    /// ascending on the new one.
    pub fn toggle(&mut self, column: ChannelColumn) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    /// `Some(ascending)` for the sorted column, `None` elsewhere.
    pub fn indicator(&self, column: ChannelColumn) -> Option<bool> {
        (self.column == Some(column)).then_some(self.ascending)
    }
}

/// Numeric value of a cell: strip everything but digits, `.` and `-`,
/// then parse the longest valid leading float.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_float(&cleaned)
}

fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

/// Compare two cell values the way the header sort does.
pub fn compare_cells(a: &str, b: &str, ascending: bool) -> Ordering {
    let ordering = match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    };
    if ascending {
        ordering
    } else {
        ordering.reverse()
    }
}

/// Optimistic active-toggle record, kept so a failure can be undone.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveToggle {
    pub channel_id: i64,
    pub active: bool,
    prev_checked: bool,
    prev_active: bool,
    prev_status: String,
}

/// All rows in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelTableModel {
    rows: Vec<RowState>,
}

impl ChannelTableModel {
    pub fn new(channels: Vec<ChannelRow>) -> Self {
        Self { rows: channels.into_iter().map(RowState::new).collect() }
    }

    /// Swap in a fresh channel list (in-place table body refresh).
    pub fn replace(&mut self, channels: Vec<ChannelRow>) {
        *self = Self::new(channels);
    }

    pub fn rows(&self) -> &[RowState] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: i64) -> Option<&RowState> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn row_mut(&mut self, id: i64) -> Option<&mut RowState> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }

    /// Rows that pass the filter, in the current sort order.
    pub fn display_rows(&self, filter: &str, sort: SortState) -> Vec<&RowState> {
        let mut rows: Vec<&RowState> = self.rows.iter().filter(|r| r.matches_filter(filter)).collect();
        if let Some(column) = sort.column {
            rows.sort_by(|a, b| compare_cells(&a.cell_text(column), &b.cell_text(column), sort.ascending));
        }
        rows
    }

    /// Ids of visible rows in display order.
    pub fn visible_ids(&self, filter: &str, sort: SortState) -> Vec<i64> {
        self.display_rows(filter, sort).into_iter().map(|r| r.id()).collect()
    }

    /// Select-all: set every visible checkbox to `checked`.
    pub fn set_checked_visible(&mut self, filter: &str, checked: bool) {
        for row in self.rows.iter_mut().filter(|r| r.matches_filter(filter)) {
            row.checked = checked;
        }
    }

    /// Ids that are both checked and visible, in server order.
    pub fn checked_visible_ids(&self, filter: &str) -> Vec<i64> {
        self.rows
            .iter()
            .filter(|r| r.checked && r.matches_filter(filter))
            .map(|r| r.id())
            .collect()
    }

    /// Apply a confirmed bulk active update. Checkbox, active flag and
    /// status all follow; activated rows wait on the guide and are
    /// returned so their EPG refresh can start.
    pub fn apply_bulk_active(&mut self, ids: &[i64], active: bool) -> Vec<i64> {
        let mut awaiting_guide = Vec::new();
        for row in self.rows.iter_mut().filter(|r| ids.contains(&r.id())) {
            row.checked = active;
            row.channel.active = active;
            if active {
                row.status = STATUS_LOADING.to_string();
                awaiting_guide.push(row.id());
            } else {
                row.status = STATUS_INACTIVE.to_string();
            }
        }
        awaiting_guide
    }

    /// Optimistically mark a row active/inactive. Returns the undo record.
    pub fn begin_toggle(&mut self, id: i64, active: bool) -> Option<ActiveToggle> {
        let row = self.row_mut(id)?;
        let toggle = ActiveToggle {
            channel_id: id,
            active,
            prev_checked: row.checked,
            prev_active: row.channel.active,
            prev_status: row.status.clone(),
        };
        row.checked = active;
        row.channel.active = active;
        row.status = if active { STATUS_LOADING } else { STATUS_INACTIVE }.to_string();
        Some(toggle)
    }

    /// Restore checkbox, active flag and status cell after a failed toggle.
    pub fn revert_toggle(&mut self, toggle: &ActiveToggle) {
        if let Some(row) = self.row_mut(toggle.channel_id) {
            row.checked = toggle.prev_checked;
            row.channel.active = toggle.prev_active;
            row.status = toggle.prev_status.clone();
        }
    }

    pub fn set_status(&mut self, id: i64, status: impl Into<String>) {
        if let Some(row) = self.row_mut(id) {
            row.status = status.into();
        }
    }

    /// Record a confirmed number change and flag the row.
    pub fn set_number(&mut self, id: i64, number: impl Into<String>) {
        if let Some(row) = self.row_mut(id) {
            row.channel.number = number.into();
            row.flagged = true;
        }
    }

    pub fn clear_flag(&mut self, id: i64) {
        if let Some(row) = self.row_mut(id) {
            row.flagged = false;
        }
    }

    pub fn set_logo(&mut self, id: i64, logo_url: impl Into<String>) {
        if let Some(row) = self.row_mut(id) {
            row.channel.logo_url = logo_url.into();
        }
    }

    /// Row that holds number `at`, or the nearest greater one. Used to keep
    /// the view anchored after an insert.
    pub fn anchor_for_insert(&self, at: u32) -> Option<i64> {
        self.rows
            .iter()
            .filter_map(|r| {
                let n = r.channel.number.trim().parse::<i64>().ok()?;
                (n >= i64::from(at)).then_some((n, r.id()))
            })
            .min_by_key(|(n, _)| *n)
            .map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, number: &str, name: &str, active: bool) -> ChannelRow {
        ChannelRow {
            id,
            number: number.to_string(),
            name: name.to_string(),
            category: String::new(),
            logo_url: String::new(),
            active,
            epg_entry: String::new(),
            epg_title: String::new(),
            stream_url: String::new(),
        }
    }

    #[test]
    fn numeric_parse_follows_leading_float_rules() {
        assert_eq!(parse_numeric("Ch 12"), Some(12.0));
        assert_eq!(parse_numeric("1.2.3"), Some(1.2));
        assert_eq!(parse_numeric("-4"), Some(-4.0));
        assert_eq!(parse_numeric("--4"), None);
        assert_eq!(parse_numeric("News"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("7."), Some(7.0));
    }

    #[test]
    fn numbers_sort_numerically_and_text_lexically() {
        assert_eq!(compare_cells("9", "10", true), Ordering::Less);
        assert_eq!(compare_cells("9", "10", false), Ordering::Greater);
        assert_eq!(compare_cells("alpha", "Beta", true), Ordering::Less);
        assert_eq!(compare_cells("10", "abc", true), Ordering::Less);
    }

    #[test]
    fn first_click_sorts_ascending_then_flips() {
        let mut sort = SortState::default();
        sort.toggle(ChannelColumn::Name);
        assert_eq!(sort.indicator(ChannelColumn::Name), Some(true));
        sort.toggle(ChannelColumn::Name);
        assert_eq!(sort.indicator(ChannelColumn::Name), Some(false));
        sort.toggle(ChannelColumn::Number);
        assert_eq!(sort.indicator(ChannelColumn::Name), None);
        assert_eq!(sort.indicator(ChannelColumn::Number), Some(true));
    }

    #[test]
    fn toggle_revert_restores_previous_state() {
        let mut model = ChannelTableModel::new(vec![row(1, "5", "Five", true)]);
        model.set_status(1, "Evening News");
        let toggle = model.begin_toggle(1, false).unwrap();
        assert_eq!(model.row(1).unwrap().status, STATUS_INACTIVE);
        assert!(!model.row(1).unwrap().checked);

        model.revert_toggle(&toggle);
        let r = model.row(1).unwrap();
        assert!(r.checked);
        assert!(r.channel.active);
        assert_eq!(r.status, "Evening News");
    }

    #[test]
    fn bulk_deactivate_updates_flag_and_status() {
        let mut model = ChannelTableModel::new(vec![row(1, "10", "a", true), row(2, "11", "b", true)]);
        model.set_status(1, "Show");

        let refresh = model.apply_bulk_active(&[1], false);
        assert!(refresh.is_empty());
        let r = model.row(1).unwrap();
        assert!(!r.checked);
        assert!(!r.channel.active);
        assert_eq!(r.status, STATUS_INACTIVE);
        assert_eq!(r.cell_text(ChannelColumn::Active), "0");
        assert!(model.row(2).unwrap().channel.active);
    }

    #[test]
    fn bulk_activate_waits_on_guide() {
        let mut model = ChannelTableModel::new(vec![row(1, "10", "a", false), row(2, "11", "b", false)]);
        let refresh = model.apply_bulk_active(&[1, 2], true);
        assert_eq!(refresh, vec![1, 2]);
        for id in [1, 2] {
            let r = model.row(id).unwrap();
            assert!(r.checked && r.channel.active);
            assert_eq!(r.status, STATUS_LOADING);
        }
    }

    #[test]
    fn program_status_falls_back_to_no_program() {
        let on_air = CurrentProgram { title: Some("Late News".into()), ..Default::default() };
        assert_eq!(status_from_program(&on_air), "Late News");
        assert_eq!(status_from_program(&CurrentProgram::default()), STATUS_NO_PROGRAM);
        assert!(epg_refresh_settled(STATUS_NO_PROGRAM));
        assert!(!epg_refresh_settled(STATUS_LOADING));
    }

    #[test]
    fn anchor_prefers_exact_then_next_greater() {
        let model = ChannelTableModel::new(vec![
            row(1, "99", "a", true),
            row(2, "101", "b", true),
            row(3, "100", "c", true),
        ]);
        assert_eq!(model.anchor_for_insert(100), Some(3));
        assert_eq!(model.anchor_for_insert(101), Some(2));
        assert_eq!(model.anchor_for_insert(102), None);
    }
}
