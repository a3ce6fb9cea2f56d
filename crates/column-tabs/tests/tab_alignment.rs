use column_tabs::{
    ColumnLineInfo, ColumnModelView, ColumnTabs, ColumnTabsError, DelimiterInfo, DelimiterSpec,
    HostEditor, LayoutParams, LineRange, MemoryEditor, compute_layout,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn comma_model(editor: &MemoryEditor) -> ColumnModelView<'static> {
    ColumnModelView::scan(editor, &DelimiterSpec::new(","), LineRange::ALL).unwrap()
}

#[test]
fn test_basic_tab_alignment() {
    let mut editor = MemoryEditor::new("a,bb,ccc\ndddd,e,f");
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    let stops = engine
        .apply_tab_stops_cells(&mut editor, &model, LineRange::ALL, 1)
        .unwrap();

    // 8px cells: "dddd" is the widest first cell (32px), gap 8px, minimum advance 4px.
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0], 32 + 8 + 4);
    assert!(stops[0] < stops[1]);
    assert_eq!(editor.tab_stops(0), stops);
    assert_eq!(editor.tab_stops(1), stops);
    assert!(engine.has_owned_lines());
    // The text is never touched by the tab-stop path.
    assert_eq!(editor.text(), "a,bb,ccc\ndddd,e,f");
}

#[test]
fn test_no_delimiters_sets_no_stops() {
    let mut editor = MemoryEditor::new("alpha\nbeta");
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    let stops = engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();
    assert!(stops.is_empty());
    assert!(!engine.has_owned_lines());
}

#[test]
fn test_apply_is_idempotent() {
    let mut editor = MemoryEditor::new("a,bb\nccc,d");
    editor.add_tab_stop(0, 120);
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    let first = engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();
    let second = engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(editor.tab_stops(0), second);
    assert_eq!(engine.tabstops().saved_manual_stops(0), &[120]);
}

#[test]
fn test_reapply_after_delimiters_removed_clears_stops() {
    let mut editor = MemoryEditor::new("abc,d\nx,y");
    let mut engine = ColumnTabs::new();

    let model = comma_model(&editor);
    let stops = engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();
    assert_eq!(editor.tab_stops(1), stops);

    let second = editor.line_start(1) + 1;
    editor.delete_range(second, second + 1);
    editor.delete_range(3, 4);
    assert_eq!(editor.text(), "abcd\nxy");

    let model = comma_model(&editor);
    let stops = engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();
    assert!(stops.is_empty());
    assert!(editor.tab_stops(0).is_empty());
    assert!(editor.tab_stops(1).is_empty());
}

#[test]
fn test_release_restores_manual_stops() {
    let mut editor = MemoryEditor::new("a,bb\nccc,d\nx,y");
    editor.add_tab_stop(0, 100);
    editor.add_tab_stop(0, 200);
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    engine
        .apply_tab_stops(&mut editor, &model, LineRange::new(0, 1), 16)
        .unwrap();
    assert_ne!(editor.tab_stops(0), vec![100, 200]);
    assert!(editor.tab_stops(2).is_empty());

    assert_eq!(engine.release_tab_stops(&mut editor, true), 2);
    assert_eq!(editor.tab_stops(0), vec![100, 200]);
    assert!(editor.tab_stops(1).is_empty());
    assert!(!engine.has_owned_lines());
}

#[test]
fn test_release_without_restore_clears() {
    let mut editor = MemoryEditor::new("a,bb\nccc,d");
    editor.add_tab_stop(0, 100);
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();
    engine.release_tab_stops(&mut editor, false);
    assert!(editor.tab_stops(0).is_empty());
}

#[test]
fn test_clear_all_and_reset() {
    let mut editor = MemoryEditor::new("a,bb\nccc,d\nmanual");
    editor.add_tab_stop(2, 64);
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    engine
        .apply_tab_stops(&mut editor, &model, LineRange::new(0, 1), 16)
        .unwrap();
    engine.clear_all_tab_stops(&mut editor);
    for line in 0..3 {
        assert!(editor.tab_stops(line).is_empty());
    }
    assert!(!engine.has_owned_lines());

    engine
        .apply_tab_stops(&mut editor, &model, LineRange::new(0, 1), 16)
        .unwrap();
    engine.reset_visual_state();
    assert!(!engine.has_owned_lines());
    // Resetting tracking leaves the editor alone.
    assert!(!editor.tab_stops(0).is_empty());
}

#[test]
fn test_document_switch_drops_line_tracking() {
    let mut editor = MemoryEditor::new("a,bb\nccc,d");
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();
    engine.on_document_switched();
    assert!(!engine.has_owned_lines());
    assert_eq!(engine.release_tab_stops(&mut editor, true), 0);
}

#[test]
fn test_cleanup_visuals_restores_manual_stops() {
    let mut editor = MemoryEditor::new("a,bb\nccc,d");
    editor.add_tab_stop(1, 48);
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 16)
        .unwrap();
    engine.cleanup_visuals(&mut editor);
    assert_eq!(editor.tab_stops(1), vec![48]);
    assert!(editor.tab_stops(0).is_empty());
    assert!(!engine.has_owned_lines());
}

#[test]
fn test_invalid_ranges_are_rejected() {
    let mut editor = MemoryEditor::new("a,b\nc,d");
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    assert_eq!(
        engine.apply_tab_stops(&mut editor, &model, LineRange::new(1, 0), 16),
        Err(ColumnTabsError::EmptyRange { first: 1, last: 0 })
    );

    let empty = ColumnModelView::from_lines(0, Vec::new(), DelimiterInfo::for_bytes(b",", false));
    assert_eq!(
        engine.apply_tab_stops(&mut editor, &empty, LineRange::ALL, 16),
        Err(ColumnTabsError::EmptyModel)
    );
    assert!(editor.tab_stops(0).is_empty());
    assert!(!engine.has_owned_lines());
}

#[test]
fn test_lazy_model_matches_eager_model() {
    let mut editor = MemoryEditor::new("id,name,score\n1,alice,90\n22,bob,7");
    let eager = comma_model(&editor);

    let infos: Vec<ColumnLineInfo> = (0..editor.line_count())
        .map(|line| eager.line_info(line).unwrap().into_owned())
        .collect();
    let lazy = ColumnModelView::from_fn(
        0,
        infos.len(),
        move |i| infos.get(i).cloned(),
        DelimiterInfo::for_bytes(b",", false),
    );

    let mut engine = ColumnTabs::new();
    let from_eager = engine
        .apply_tab_stops(&mut editor, &eager, LineRange::ALL, 16)
        .unwrap();
    let from_lazy = engine
        .apply_tab_stops(&mut editor, &lazy, LineRange::ALL, 16)
        .unwrap();
    assert_eq!(from_eager, from_lazy);
}

#[test]
fn test_proportional_glyphs_drive_widths() {
    let mut editor = MemoryEditor::new("iiii,x\nmm,y").with_glyph_width('i', 2);
    let model = comma_model(&editor);
    let mut engine = ColumnTabs::new();

    let stops = engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 0)
        .unwrap();
    // "mm" (16px) is wider than "iiii" (8px).
    assert_eq!(stops, vec![16 + 4]);
}

#[test]
fn test_collapsed_delimiters_share_a_boundary() {
    let mut editor = MemoryEditor::new("a   b\nccc d");
    let model = ColumnModelView::scan(
        &editor,
        &DelimiterSpec::new(" ").with_collapse(true),
        LineRange::ALL,
    )
    .unwrap();
    let mut engine = ColumnTabs::new();

    let stops = engine
        .apply_tab_stops(&mut editor, &model, LineRange::ALL, 0)
        .unwrap();
    assert_eq!(stops.len(), 1);
}

fn random_document(rng: &mut StdRng) -> String {
    let line_count = rng.gen_range(1..12);
    let mut lines = Vec::with_capacity(line_count);
    for _ in 0..line_count {
        let field_count = rng.gen_range(1..6);
        let fields: Vec<String> = (0..field_count)
            .map(|_| {
                let len = rng.gen_range(0..10);
                (0..len)
                    .map(|_| (b'a' + rng.gen_range(0..26)) as char)
                    .collect()
            })
            .collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

#[test]
fn test_random_layouts_are_monotonic_and_clamped() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let text = random_document(&mut rng);
        let editor = MemoryEditor::new(&text);
        let model = comma_model(&editor);
        let lines = model.resolve_range(LineRange::ALL, editor.line_count()).unwrap();
        let params = LayoutParams::for_host(&editor, rng.gen_range(0..24), 2);
        let layout = compute_layout(&editor, &model, lines.clone(), params);

        assert!(layout.stops.windows(2).all(|w| w[0] <= w[1]), "{text:?}");
        if layout.max_columns >= 2 {
            assert_eq!(layout.stops.len(), layout.max_columns - 1);
        } else {
            assert!(layout.stops.is_empty());
        }

        for (index, line) in lines.enumerate() {
            let field_count = model.fields(line).len();
            for boundary in 0..layout.stops.len() {
                if let Some(clamp) = layout.clamp_for_line(index, field_count, boundary) {
                    assert!(clamp <= layout.natural_end_px[index]);
                    assert!(clamp <= layout.preferred[boundary]);
                    assert!(layout.stops[boundary] >= clamp);
                }
            }
        }
    }
}
