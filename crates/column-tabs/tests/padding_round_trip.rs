use column_tabs::{
    ColumnModelView, ColumnTabs, DelimiterSpec, HostEditor, IndicatorId, LineRange, MemoryEditor,
    PaddingOptions,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn scan(editor: &MemoryEditor, delimiter: &str) -> ColumnModelView<'static> {
    ColumnModelView::scan(editor, &DelimiterSpec::new(delimiter), LineRange::ALL).unwrap()
}

#[test]
fn test_insert_then_remove_restores_text() {
    let original = "name,qty,price\nwidget,3,4.50\ngizmo,12,19.99";
    let mut editor = MemoryEditor::new(original);
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    let inserted = engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(inserted, 6);
    assert_eq!(
        editor.text(),
        "name\t,qty\t,price\nwidget\t,3\t,4.50\ngizmo\t,12\t,19.99"
    );
    assert!(engine.has_padding_current(&editor));
    assert!(editor.is_indicator_invisible(IndicatorId::PADDING));
    // Padding mode sets the visual stops as well.
    assert_eq!(editor.tab_stops(0).len(), 2);

    assert!(engine.remove_padding(&mut editor));
    assert_eq!(editor.text(), original);
    assert!(!engine.has_padding_current(&editor));
}

#[test]
fn test_remove_without_padding_is_a_no_op() {
    let original = "a,b\nc,d";
    let mut editor = MemoryEditor::new(original);
    let mut engine = ColumnTabs::new();

    assert!(!engine.remove_padding(&mut editor));
    assert_eq!(editor.text(), original);
    assert_eq!(editor.undo_group_count(), 0);
}

#[test]
fn test_no_delimiters_inserts_nothing() {
    let mut editor = MemoryEditor::new("alpha\nbeta");
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    let inserted = engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(editor.text(), "alpha\nbeta");
    assert!(!engine.has_padding_current(&editor));
}

#[test]
fn test_fallback_log_removes_when_marks_are_lost() {
    let original = "a,bb,ccc\ndddd,e,f";
    let mut editor = MemoryEditor::new(original);
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    editor.strip_indicator(IndicatorId::PADDING);
    assert!(editor.indicator_runs(IndicatorId::PADDING).is_empty());

    assert!(engine.remove_padding(&mut editor));
    assert_eq!(editor.text(), original);
    let doc = editor.document_id();
    assert!(engine.padding().log(doc).is_some_and(|log| log.is_empty()));
    assert!(!engine.has_padding(doc));
}

#[test]
fn test_fallback_skips_edited_ranges() {
    let mut editor = MemoryEditor::new("a,b");
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(editor.text(), "a\t,b");

    // The marking is lost and the user overwrote the inserted tab.
    editor.strip_indicator(IndicatorId::PADDING);
    editor.delete_range(1, 2);
    editor.insert_text(1, b"X");

    assert!(!engine.remove_padding(&mut editor));
    assert_eq!(editor.text(), "aX,b");
    assert!(engine.has_padding_current(&editor));
}

#[test]
fn test_stale_log_after_host_undo_keeps_user_whitespace() {
    let original = "a,b,  x";
    let mut editor = MemoryEditor::new(original);
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(editor.text(), "a\t,b\t,  x");

    // The host reverts the pass on its own; the engine's log is now stale.
    assert!(editor.undo());
    assert_eq!(editor.text(), original);
    assert!(engine.has_padding_current(&editor));

    assert!(!engine.remove_padding(&mut editor));
    assert_eq!(editor.text(), original);
}

#[test]
fn test_existing_tab_before_delimiter_is_left_alone() {
    let mut editor = MemoryEditor::new("a\t,b\nccc,d");
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    let inserted = engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(editor.text(), "a\t,b\nccc\t,d");

    assert!(engine.remove_padding(&mut editor));
    assert_eq!(editor.text(), "a\t,b\nccc,d");
}

#[test]
fn test_realigning_does_not_double_pad() {
    let mut editor = MemoryEditor::new("a,b\nccc,d");
    let mut engine = ColumnTabs::new();

    let model = scan(&editor, ",");
    engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    let padded = editor.text();

    let model = scan(&editor, ",");
    let inserted = engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(editor.text(), padded);
}

#[test]
fn test_tab_delimiter_sets_stops_without_mutation() {
    let mut editor = MemoryEditor::new("a\tb\ncc\td");
    let model = scan(&editor, "\t");
    let mut engine = ColumnTabs::new();

    let inserted = engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(editor.text(), "a\tb\ncc\td");
    // "cc" = 16px, default gap 2 spaces = 16px, minimum advance 4px.
    assert_eq!(editor.tab_stops(0), vec![36]);
    assert_eq!(editor.tab_stops(1), vec![36]);
    assert_eq!(editor.undo_group_count(), 0);
}

#[test]
fn test_partial_range() {
    let mut editor = MemoryEditor::new("a,b\nc,d\ne,f");
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    let options = PaddingOptions {
        range: LineRange::from_line(1),
        ..PaddingOptions::default()
    };
    assert_eq!(engine.insert_padding(&mut editor, &model, options).unwrap(), 2);
    assert_eq!(editor.text(), "a,b\nc\t,d\ne\t,f");
    assert!(editor.tab_stops(0).is_empty());
}

#[test]
fn test_undo_reverts_whole_pass() {
    let original = "a,bb,ccc\ndddd,e,f";
    let mut editor = MemoryEditor::new(original);
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert_eq!(editor.undo_group_count(), 1);
    assert!(editor.undo());
    assert_eq!(editor.text(), original);
}

#[test]
fn test_padding_flag_is_per_document() {
    let mut first = MemoryEditor::new("a,b");
    let second = MemoryEditor::new("c,d");
    let mut engine = ColumnTabs::new();

    let model = scan(&first, ",");
    engine
        .insert_padding(&mut first, &model, PaddingOptions::default())
        .unwrap();
    engine.on_document_switched();

    assert!(engine.has_padding(first.document_id()));
    assert!(!engine.has_padding(second.document_id()));

    engine.set_padding_flag(second.document_id(), true);
    assert!(engine.has_padding_current(&second));
}

#[test]
fn test_cleanup_all_for_doc() {
    let original = "a,bb\nccc,d";
    let mut editor = MemoryEditor::new(original);
    editor.add_tab_stop(0, 72);
    let model = scan(&editor, ",");
    let mut engine = ColumnTabs::new();

    engine
        .insert_padding(&mut editor, &model, PaddingOptions::default())
        .unwrap();
    assert!(engine.cleanup_all_for_doc(&mut editor));

    assert_eq!(editor.text(), original);
    assert_eq!(editor.tab_stops(0), vec![72]);
    assert!(editor.tab_stops(1).is_empty());
    assert!(!engine.has_owned_lines());
    assert!(!engine.has_padding_current(&editor));
}

#[test]
fn test_random_round_trips() {
    let mut rng = StdRng::seed_from_u64(42);
    let alphabet = b"abcxyz 0123456789.-\t";

    for _ in 0..150 {
        let line_count = rng.gen_range(1..10);
        let lines: Vec<String> = (0..line_count)
            .map(|_| {
                let field_count = rng.gen_range(1..5);
                (0..field_count)
                    .map(|_| {
                        let len = rng.gen_range(0..8);
                        (0..len)
                            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>()
                    .join(";")
            })
            .collect();
        let original = lines.join("\n");

        let mut editor = MemoryEditor::new(&original);
        let mut engine = ColumnTabs::new();
        let numeric = rng.gen_bool(0.5);
        engine
            .align_columns(
                &mut editor,
                &DelimiterSpec::new(";"),
                PaddingOptions::default(),
                numeric,
            )
            .unwrap();

        if rng.gen_bool(0.3) {
            editor.strip_indicator(IndicatorId::PADDING);
        }
        engine.remove_padding(&mut editor);
        assert_eq!(editor.text(), original);
    }
}
