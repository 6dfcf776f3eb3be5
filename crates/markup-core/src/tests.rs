//! End-to-end editing scenarios driven through `MarkupEditor`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::{
    Annotation, AnnotationKind, CollapsedToggle, EditorAction, KindFilter, ListKind, MarkupConfig,
    MarkupEditor, Selection, SpanType, StyleKind, check_invariants, execute_action,
};

/// One annotation, flattened for snapshots.
#[derive(Debug, Serialize)]
struct Row {
    kind: String,
    start: usize,
    end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordinal: Option<usize>,
}

impl From<&Annotation> for Row {
    fn from(annotation: &Annotation) -> Self {
        let (kind, ordinal) = match annotation.kind {
            AnnotationKind::Style(style) => (style.label().to_string(), None),
            AnnotationKind::ListBlock(kind) => (format!("{kind:?}List"), None),
            AnnotationKind::ListLine { kind, ordinal } => (format!("{kind:?}Item"), Some(ordinal)),
        };
        Self {
            kind,
            start: annotation.range.start,
            end: annotation.range.end,
            ordinal,
        }
    }
}

fn rows(editor: &MarkupEditor, filter: KindFilter) -> Vec<Row> {
    editor
        .annotations()
        .iter()
        .filter(|a| filter.matches(&a.kind))
        .map(Row::from)
        .collect()
}

fn word_mode(text: &str) -> MarkupEditor {
    MarkupEditor::from_str(text).with_config(MarkupConfig {
        collapsed_style_toggle: CollapsedToggle::Word,
        ..MarkupConfig::default()
    })
}

fn assert_consistent(editor: &MarkupEditor, context: &str) {
    if let Err(violation) = check_invariants(editor.store(), editor.len_chars()) {
        panic!(
            "{context}: {violation}\ntext: {:?}\nannotations: {:?}",
            editor.text(),
            editor.annotations()
        );
    }
}

#[test]
fn caret_in_word_styles_whole_word() {
    let mut editor = word_mode("hello world");
    editor.set_selection(Selection::collapsed(2));
    assert!(editor.toggle_bold());
    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::Style(StyleKind::Bold)), @r"
    - kind: Bold
      start: 0
      end: 5
    ");

    // Same caret again removes it.
    assert!(editor.toggle_bold());
    assert!(editor.annotations().is_empty());
}

#[test]
fn reversed_selection_is_normalized() {
    let mut editor = MarkupEditor::from_str("hello world");
    editor.set_selection(Selection::new(8, 3));
    assert!(editor.toggle_italic());
    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::Any), @r"
    - kind: Italic
      start: 3
      end: 8
    ");
}

#[test]
fn untoggling_inside_a_span_splits_it() {
    let mut editor = MarkupEditor::from_str("abcdefghij");
    editor.set_selection(Selection::new(0, 8));
    editor.toggle_bold();
    editor.set_selection(Selection::new(3, 5));
    editor.toggle_bold();
    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::Any), @r"
    - kind: Bold
      start: 0
      end: 3
    - kind: Bold
      start: 5
      end: 8
    ");
    assert_consistent(&editor, "after split");
}

#[test]
fn bold_and_italic_overlap_freely() {
    let mut editor = MarkupEditor::from_str("one two three");
    editor.set_selection(Selection::new(0, 7));
    editor.toggle_bold();
    editor.set_selection(Selection::new(4, 13));
    editor.toggle_italic();

    let styles: Vec<_> = editor
        .annotations()
        .into_iter()
        .map(|a| (a.kind, a.range))
        .collect();
    assert_eq!(
        styles,
        vec![
            (AnnotationKind::Style(StyleKind::Bold), 0..7),
            (AnnotationKind::Style(StyleKind::Italic), 4..13),
        ]
    );

    editor.set_selection(Selection::collapsed(5));
    assert!(editor.toggles().bold);
    assert!(editor.toggles().italic);
}

#[test]
fn list_lines_renumber_after_removing_a_line() {
    let mut editor = MarkupEditor::from_str("a\nb\nc\n");
    editor.select_all();
    assert!(editor.toggle_ordered_list());
    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::AnyListLine), @r"
    - kind: NumberedItem
      start: 0
      end: 2
      ordinal: 1
    - kind: NumberedItem
      start: 2
      end: 4
      ordinal: 2
    - kind: NumberedItem
      start: 4
      end: 6
      ordinal: 3
    ");

    editor.set_selection(Selection::collapsed(0));
    assert!(editor.toggle_ordered_list());
    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::AnyListLine), @r"
    - kind: NumberedItem
      start: 2
      end: 4
      ordinal: 1
    - kind: NumberedItem
      start: 4
      end: 6
      ordinal: 2
    ");
    assert_consistent(&editor, "after removing first line");
}

#[test]
fn removing_a_middle_line_splits_the_list() {
    let mut editor = MarkupEditor::from_str("a\nb\nc\n");
    editor.select_all();
    editor.toggle_ordered_list();
    editor.set_selection(Selection::collapsed(2));
    editor.toggle_ordered_list();

    let blocks: Vec<_> = editor
        .annotations()
        .into_iter()
        .filter(|a| a.kind.is_list_block())
        .map(|a| a.range)
        .collect();
    assert_eq!(blocks, vec![0..2, 4..6]);

    let ordinals: Vec<_> = editor
        .annotations()
        .into_iter()
        .filter_map(|a| match a.kind {
            AnnotationKind::ListLine { ordinal, .. } => Some(ordinal),
            _ => None,
        })
        .collect();
    assert_eq!(ordinals, vec![1, 1]);
}

#[test]
fn switching_list_kind_retypes_the_block() {
    let mut editor = MarkupEditor::from_str("a\nb\nc\n");
    editor.select_all();
    editor.toggle_ordered_list();

    // A caret on one line retypes the whole block in place.
    editor.set_selection(Selection::collapsed(3));
    assert!(editor.toggle_unordered_list());
    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::AnyListBlock), @r"
    - kind: BulletList
      start: 0
      end: 6
    ");
    assert_eq!(rows(&editor, KindFilter::AnyListLine).len(), 3);
    assert!(editor.toggles().unordered_list);
    assert!(!editor.toggles().ordered_list);
    assert_consistent(&editor, "after retype");
}

#[test]
fn typing_with_bold_off_breaks_the_run() {
    let mut editor = MarkupEditor::from_str("0123456789abcdefghij");
    editor.set_selection(Selection::new(5, 17));
    editor.toggle_bold();

    editor.set_selection(Selection::collapsed(10));
    assert!(editor.toggles().bold);
    assert!(!editor.toggle_bold());
    editor.insert(10, "xyz");

    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::Any), @r"
    - kind: Bold
      start: 5
      end: 10
    - kind: Bold
      start: 13
      end: 20
    ");
}

#[test]
fn typing_with_bold_on_extends_styled_text() {
    let mut editor = MarkupEditor::from_str("0123456789");
    editor.set_selection(Selection::collapsed(10));
    editor.toggle_bold();
    editor.insert(10, "abc");
    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::Any), @r"
    - kind: Bold
      start: 10
      end: 13
    ");
}

#[test]
fn action_sequence_builds_a_styled_list() {
    let mut editor = MarkupEditor::from_str("");
    let actions = [
        EditorAction::Insert {
            text: "first\nsecond\n".to_string(),
            range: Selection::collapsed(0),
        },
        EditorAction::SelectAll,
        EditorAction::ToggleUnorderedList,
        EditorAction::MoveCursor { offset: 0 },
        EditorAction::ExtendSelection { offset: 5 },
        EditorAction::ToggleItalic,
    ];
    for action in &actions {
        execute_action(&mut editor, action);
        assert_consistent(&editor, &format!("{action:?}"));
    }

    insta::assert_yaml_snapshot!(rows(&editor, KindFilter::Any), @r"
    - kind: Italic
      start: 0
      end: 5
    - kind: BulletItem
      start: 0
      end: 6
      ordinal: 1
    - kind: BulletList
      start: 0
      end: 13
    - kind: BulletItem
      start: 6
      end: 13
      ordinal: 2
    ");
}

#[test]
fn toggling_twice_restores_an_empty_store() {
    let mut rng = StdRng::seed_from_u64(7);
    let alphabet = ['a', 'b', ' ', '\n', 'z'];

    for _ in 0..50 {
        let len = rng.random_range(1..24);
        let text: String = (0..len)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();
        let start = rng.random_range(0..len);
        let end = rng.random_range(start + 1..=len);

        for span_type in [
            SpanType::Bold,
            SpanType::Italic,
            SpanType::OrderedList,
            SpanType::UnorderedList,
        ] {
            let mut editor = MarkupEditor::from_str(&text);
            editor.set_selection(Selection::new(start, end));
            assert!(editor.update_span(span_type));
            assert_consistent(&editor, "first toggle");
            assert!(editor.update_span(span_type));
            assert!(
                editor.annotations().is_empty(),
                "{span_type:?} over {start}..{end} of {text:?} left {:?}",
                editor.annotations()
            );
        }
    }
}

const SNIPPETS: [&str; 7] = ["a", "bc", " ", "\n", "word ", "x\ny", "\n\n"];

fn random_step(editor: &mut MarkupEditor, rng: &mut StdRng) -> String {
    let len = editor.len_chars();
    match rng.random_range(0..6) {
        0 => {
            let at = rng.random_range(0..=len);
            let text = SNIPPETS[rng.random_range(0..SNIPPETS.len())];
            editor.insert(at, text);
            format!("insert {text:?} at {at}")
        }
        1 if len > 0 => {
            let start = rng.random_range(0..len);
            let end = rng.random_range(start + 1..=len.min(start + 4));
            editor.delete(start..end);
            format!("delete {start}..{end}")
        }
        2 => {
            let anchor = rng.random_range(0..=len);
            let head = rng.random_range(0..=len);
            editor.set_selection(Selection::new(anchor, head));
            let style = if rng.random_bool(0.5) {
                StyleKind::Bold
            } else {
                StyleKind::Italic
            };
            editor.toggle_style(style);
            format!("{style:?} over {anchor}..{head}")
        }
        3 => {
            let anchor = rng.random_range(0..=len);
            let head = rng.random_range(0..=len);
            editor.set_selection(Selection::new(anchor, head));
            let kind = if rng.random_bool(0.5) {
                ListKind::Numbered
            } else {
                ListKind::Bullet
            };
            editor.toggle_list(kind);
            format!("{kind:?} list over {anchor}..{head}")
        }
        4 => {
            let caret = rng.random_range(0..=len);
            editor.set_selection(Selection::collapsed(caret));
            editor.toggle_bold();
            editor.insert(caret, "typed");
            format!("sticky bold then type at {caret}")
        }
        _ => {
            let start = rng.random_range(0..=len);
            let end = rng.random_range(start..=len);
            let text = SNIPPETS[rng.random_range(0..SNIPPETS.len())];
            editor.replace(start..end, text);
            format!("replace {start}..{end} with {text:?}")
        }
    }
}

#[test]
fn random_editing_keeps_invariants() {
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut editor = MarkupEditor::from_str("alpha beta\ngamma\n\ndelta epsilon\n");
        for step in 0..150 {
            let what = random_step(&mut editor, &mut rng);
            assert_consistent(&editor, &format!("seed {seed} step {step}: {what}"));
        }
    }
}

#[test]
fn random_word_mode_editing_keeps_invariants() {
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed + 1000);
        let mut editor = word_mode("alpha beta\ngamma\n\ndelta epsilon\n");
        for step in 0..150 {
            let what = if rng.random_bool(0.4) {
                // Collapsed toggles style or carve the word at the caret.
                let caret = rng.random_range(0..=editor.len_chars());
                editor.set_selection(Selection::collapsed(caret));
                let style = if rng.random_bool(0.5) {
                    StyleKind::Bold
                } else {
                    StyleKind::Italic
                };
                editor.toggle_style(style);
                format!("{style:?} on word at {caret}")
            } else {
                random_step(&mut editor, &mut rng)
            };
            assert_consistent(&editor, &format!("seed {seed} step {step}: {what}"));
        }
    }
}
