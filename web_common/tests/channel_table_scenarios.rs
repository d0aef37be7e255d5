use web_common::*;

fn channel(id: i64, number: &str, name: &str, category: &str, active: bool) -> ChannelRow {
    ChannelRow {
        id,
        number: number.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        logo_url: format!("/static/logos/{}.png", name.to_lowercase().replace(' ', "_")),
        active,
        epg_entry: format!("{} HD", name),
        epg_title: if active { "Live Coverage".to_string() } else { String::new() },
        stream_url: format!("http://tuner/{}", id),
    }
}

fn lineup() -> ChannelTableModel {
    ChannelTableModel::new(vec![
        channel(1, "100", "Sky Sports", "Sport", true),
        channel(2, "101", "BBC One", "General", true),
        channel(3, "105", "Eurosport", "Sports", false),
        channel(4, "7", "Cartoon", "Kids", true),
    ])
}

#[test]
fn test_filter_matches_any_text_cell() {
    let model = lineup();
    let ids = model.visible_ids("sport", SortState::default());
    assert_eq!(ids, vec![1, 3]);

    let ids = model.visible_ids("SPORT", SortState::default());
    assert_eq!(ids, vec![1, 3]);

    // Empty filter shows everything.
    assert_eq!(model.visible_ids("", SortState::default()).len(), 4);

    // EPG entry column counts too.
    assert_eq!(model.visible_ids("one hd", SortState::default()), vec![2]);
}

#[test]
fn test_sort_number_column_numerically() {
    let model = lineup();
    let mut sort = SortState::default();
    sort.toggle(ChannelColumn::Number);
    assert_eq!(model.visible_ids("", sort), vec![4, 1, 2, 3]);

    sort.toggle(ChannelColumn::Number);
    assert_eq!(model.visible_ids("", sort), vec![3, 2, 1, 4]);
}

#[test]
fn test_sort_name_column_lexically_with_filter() {
    let model = lineup();
    let mut sort = SortState::default();
    sort.toggle(ChannelColumn::Name);
    assert_eq!(model.visible_ids("", sort), vec![2, 4, 3, 1]);
    assert_eq!(model.visible_ids("sport", sort), vec![3, 1]);
}

#[test]
fn test_select_all_only_touches_visible_rows() {
    let mut model = lineup();
    model.set_checked_visible("", false);
    model.set_checked_visible("sport", true);
    assert_eq!(model.checked_visible_ids(""), vec![1, 3]);

    // Hidden rows are never part of a bulk update even if checked.
    assert_eq!(model.checked_visible_ids("bbc"), Vec::<i64>::new());

    model.apply_bulk_active(&[1, 3], false);
    assert!(model.checked_visible_ids("").is_empty());
    assert_eq!(model.row(1).unwrap().status, STATUS_INACTIVE);
    assert!(!model.row(3).unwrap().channel.active);
}

#[test]
fn test_failed_toggle_off_restores_checkbox_and_status() {
    let mut model = lineup();
    assert_eq!(model.row(1).unwrap().status, "Live Coverage");

    let toggle = model.begin_toggle(1, false).unwrap();
    assert_eq!(model.row(1).unwrap().status, STATUS_INACTIVE);
    assert!(!model.row(1).unwrap().checked);

    model.revert_toggle(&toggle);
    let row = model.row(1).unwrap();
    assert!(row.checked);
    assert!(row.channel.active);
    assert_eq!(row.status, "Live Coverage");
}

#[test]
fn test_toggle_on_shows_loading_until_refreshed() {
    let mut model = lineup();
    assert_eq!(model.row(3).unwrap().status, STATUS_INACTIVE);
    model.begin_toggle(3, true).unwrap();
    assert_eq!(model.row(3).unwrap().status, STATUS_LOADING);
    model.set_status(3, "Cycling Highlights");
    assert_eq!(model.row(3).unwrap().cell_text(ChannelColumn::NowPlaying), "Cycling Highlights");
}

#[test]
fn test_insert_at_100_shifts_from_the_top_down() {
    let channels = vec![
        channel(1, "100", "A", "", true),
        channel(2, "101", "B", "", true),
        channel(3, "105", "C", "", true),
        channel(4, "99", "D", "", true),
        channel(5, "n/a", "E", "", true),
    ];
    let steps = plan_insert_shift(&channels, 100);
    let moves: Vec<(u32, u32)> = steps.iter().map(|s| (s.from, s.to)).collect();
    assert_eq!(moves, vec![(105, 106), (101, 102), (100, 101)]);
    assert_eq!(steps.iter().map(|s| s.channel_id).collect::<Vec<_>>(), vec![3, 2, 1]);

    // No step ever targets a number that is still occupied.
    let mut occupied: Vec<u32> = vec![100, 101, 105, 99];
    for step in &steps {
        assert!(!occupied.contains(&step.to));
        occupied.retain(|n| *n != step.from);
        occupied.push(step.to);
    }
}

#[test]
fn test_inline_number_edit_updates_baseline() {
    let mut model = lineup();
    let old = model.row(4).unwrap().channel.number.clone();

    match evaluate_number_edit(&old, "8") {
        NumberEdit::Commit { new, .. } => model.set_number(4, new),
        other => panic!("expected commit, got {:?}", other),
    }
    let row = model.row(4).unwrap();
    assert_eq!(row.channel.number, "8");
    assert!(row.flagged);

    // The new value is now the baseline: typing it again is a no-op.
    assert_eq!(evaluate_number_edit(&row.channel.number, "8"), NumberEdit::Unchanged);
    assert_eq!(evaluate_number_edit(&row.channel.number, "eight"), NumberEdit::Invalid);
}

#[test]
fn test_auto_number_uses_visible_display_order() {
    let model = lineup();
    let mut sort = SortState::default();
    sort.toggle(ChannelColumn::Number);
    let req = AutoNumberRequest {
        start_number: "1".to_string(),
        channel_ids: model.visible_ids("sport", sort),
    };
    assert_eq!(req.fields()[1], ("channel_ids", "1,3".to_string()));
}
