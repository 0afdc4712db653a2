use std::sync::Arc;

use pdfscan_content::pdfscan_core::{BBox, Ctm, ExtractOptions, Path, PathSegment};
use pdfscan_content::{
    ContentContext, ContentScanner, GLYPH_FILL_COLOR, GraphicsState, Operation, OutlineFont,
    PathRecorder, ShowText, SimpleFont, TextCollector, TextElement, execute, scan_text, show_text,
};

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn helvetica() -> SimpleFont {
    SimpleFont::from_char_widths("Helvetica", &[('A', 600.0), ('B', 600.0), (' ', 278.0)])
}

fn state(font_size: f64) -> GraphicsState {
    let mut gs = GraphicsState::default();
    gs.set_font(Arc::new(helvetica()), font_size);
    gs.begin_text();
    gs
}

fn scan(gs: &GraphicsState, op: &ShowText) -> Vec<(char, BBox)> {
    let mut events = Vec::new();
    let mut sink = |ch: char, bbox: BBox| events.push((ch, bbox));
    scan_text(gs, op, &mut sink).unwrap();
    events
}

fn tj(text: &str) -> ShowText {
    ShowText::Simple(text.as_bytes().to_vec())
}

// --- scenarios ---

#[test]
fn show_a_space_b() {
    let mut gs = state(12.0);
    let events = scan(&gs, &tj("A B"));
    let xs: Vec<f64> = events.iter().map(|(_, b)| b.x0).collect();
    assert_approx(xs[0], 0.0);
    assert_approx(xs[1], 7.2);
    assert_approx(xs[2], 10.536);

    show_text(&mut gs, &tj("A B"), None).unwrap();
    assert_approx(gs.tm().translate_x(), 17.736);
}

#[test]
fn show_a_space_b_with_word_space() {
    let mut gs = state(12.0);
    gs.set_word_space(2.0);
    let events = scan(&gs, &tj("A B"));
    assert_approx(events[2].1.x0, 12.536);

    show_text(&mut gs, &tj("A B"), None).unwrap();
    assert_approx(gs.tm().translate_x(), 19.736);
}

// --- properties ---

#[test]
fn scan_and_render_agree_on_final_position() {
    let op = ShowText::WithAdjustments(vec![
        TextElement::EncodedText(b"AB A".to_vec()),
        TextElement::Adjustment(120.0),
        TextElement::EncodedText(b" BB".to_vec()),
        TextElement::Adjustment(-40.0),
    ]);
    let mut gs = state(9.0);
    gs.set_char_space(0.25);
    gs.set_word_space(1.5);
    gs.set_scale(80.0);

    // Position of a trailing character after the scanned run equals
    // the committed position after rendering the run.
    let mut extended = match &op {
        ShowText::WithAdjustments(elements) => elements.clone(),
        _ => unreachable!(),
    };
    extended.push(TextElement::EncodedText(b"A".to_vec()));
    let events = scan(&gs, &ShowText::WithAdjustments(extended));
    let trailing_x = events.last().map(|(_, b)| b.x0).unwrap();

    show_text(&mut gs, &op, None).unwrap();
    assert_approx(gs.tm().translate_x(), trailing_x);
}

#[test]
fn scanning_leaves_state_unchanged() {
    let mut gs = state(12.0);
    gs.set_lead(14.0);
    gs.set_word_space(1.0);
    gs.set_char_space(0.5);
    gs.translate_text_relative(20.0, 600.0);
    let before = gs.clone();

    let ops = [
        tj("A B"),
        ShowText::next_line("AB"),
        ShowText::next_line_with_spacing("A B", 4.0, 2.0),
        ShowText::WithAdjustments(vec![
            TextElement::EncodedText(b"A".to_vec()),
            TextElement::Adjustment(250.0),
        ]),
    ];
    for op in &ops {
        let mut collector = TextCollector::new();
        execute(&mut gs, op, Some(&mut collector), None).unwrap();
        assert!(!collector.is_empty());
        assert_eq!(gs.tm(), before.tm());
        assert_eq!(gs.tlm(), before.tlm());
        assert_eq!(gs.word_space.to_bits(), before.word_space.to_bits());
        assert_eq!(gs.char_space.to_bits(), before.char_space.to_bits());
    }
}

#[test]
fn positive_adjustment_moves_next_run_left() {
    let gs = state(12.0);
    let plain = ShowText::WithAdjustments(vec![
        TextElement::EncodedText(b"A".to_vec()),
        TextElement::EncodedText(b"B".to_vec()),
    ]);
    let adjusted = ShowText::WithAdjustments(vec![
        TextElement::EncodedText(b"A".to_vec()),
        TextElement::Adjustment(100.0),
        TextElement::EncodedText(b"B".to_vec()),
    ]);
    let without = scan(&gs, &plain)[1].1.x0;
    let with = scan(&gs, &adjusted)[1].1.x0;
    assert_approx(without - with, 100.0 * 0.012);
}

#[test]
fn rescanning_yields_identical_events() {
    let mut gs = state(10.0);
    gs.concat_ctm(Ctm::new(1.5, 0.0, 0.0, 1.5, 10.0, 20.0));
    gs.set_word_space(3.0);
    let op = ShowText::next_line_with_spacing("AB BA", 1.0, 0.5);

    let first = scan(&gs, &op);
    let second = scan(&gs, &op);
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}

#[test]
fn word_space_applies_only_to_space() {
    // NUL has zero width; word spacing must not apply to it.
    let font = SimpleFont::from_char_widths("Z", &[('\0', 0.0), (' ', 0.0), ('A', 500.0)]);
    let mut gs = GraphicsState::default();
    gs.set_font(Arc::new(font), 10.0);
    gs.set_word_space(7.0);

    let events = scan(&gs, &ShowText::Simple(vec![0, b'A', b' ', b'A']));
    let xs: Vec<f64> = events.iter().map(|(_, b)| b.x0).collect();
    assert_approx(xs[1], 0.0);
    assert_approx(xs[2], 5.0);
    assert_approx(xs[3], 12.0);
}

// --- rendering ---

/// 'A' as a y-down triangle: base on the baseline, apex 700 units up.
fn outline_font() -> OutlineFont {
    let mut a = Path::new();
    a.move_to(50.0, 0.0)
        .line_to(550.0, 0.0)
        .line_to(300.0, -700.0)
        .close();
    OutlineFont::new(helvetica().with_ascent_descent(750.0, -250.0)).with_outline('A', a)
}

#[test]
fn render_fills_outlines_in_order() {
    let mut gs = GraphicsState::default();
    gs.set_font(Arc::new(outline_font()), 10.0);
    gs.begin_text();
    gs.translate_text_relative(100.0, 500.0);

    let mut surface = PathRecorder::new();
    show_text(&mut gs, &tj("A A"), Some(&mut surface)).unwrap();

    let fills = surface.fills();
    // space has no outline
    assert_eq!(fills.len(), 2);
    assert!(fills.iter().all(|f| f.color == GLYPH_FILL_COLOR));

    let start = |i: usize| match fills[i].path.segments[0] {
        PathSegment::MoveTo(p) => p,
        ref other => panic!("expected MoveTo, got {other:?}"),
    };
    // Outline x extent 50..550 maps onto the 6pt advance, so the first
    // point lands 50 * 6 / 500 to the right of the glyph origin.
    assert_approx(start(0).x, 100.6);
    assert_approx(start(1).x, 100.6 + 6.0 + 2.78);
    // The base stays on the baseline and the apex rises the full glyph
    // height above it.
    assert_approx(start(0).y, 500.0);
    let PathSegment::LineTo(apex) = fills[0].path.segments[2] else {
        panic!("expected LineTo");
    };
    assert_approx(apex.y, 510.0);

    let bounds = fills[0].path.bounds().unwrap();
    assert_approx(bounds.width(), 6.0);
    assert_approx(bounds.height(), 10.0);
}

// --- driver ---

#[test]
fn scanner_extracts_and_searches_page_text() {
    let mut scanner = ContentScanner::new(ContentContext::new(612.0, 792.0), ExtractOptions::default());
    scanner.add_font("F1", Arc::new(helvetica()));

    let ops = [
        Operation::BeginText,
        Operation::SetFont {
            name: "F1".into(),
            size: 12.0,
        },
        Operation::SetLead(14.0),
        Operation::TranslateTextRelative { tx: 72.0, ty: 720.0 },
        Operation::ShowText(tj("AB A")),
        Operation::ShowText(ShowText::next_line("BAB")),
        Operation::EndText,
    ];
    let result = scanner.collect_text(&ops).unwrap();
    assert!(result.is_clean());

    let collector = result.value;
    assert_eq!(collector.text(), "AB ABAB");
    let hits = collector.search("AB");
    assert_eq!(hits.len(), 3);
    assert_approx(hits[0].x0, 72.0);
    assert_approx(hits[0].width(), 14.4);
    // second line hit: "BAB" -> "AB" starts one glyph in
    assert_approx(hits[2].x0, 72.0 + 7.2);
    assert_approx(hits[2].top - hits[0].top, 14.0);
}

#[test]
fn scanner_render_and_extract_end_at_same_position() {
    let ops = [
        Operation::BeginText,
        Operation::SetFont {
            name: "F1".into(),
            size: 11.0,
        },
        Operation::SetCharSpace(0.3),
        Operation::ShowText(tj("AB")),
        Operation::ShowText(ShowText::next_line_with_spacing("A B", 2.0, 0.1)),
        Operation::ShowText(ShowText::WithAdjustments(vec![
            TextElement::EncodedText(b"B".to_vec()),
            TextElement::Adjustment(-300.0),
        ])),
    ];

    let mut rendering = ContentScanner::default();
    rendering.add_font("F1", Arc::new(helvetica()));
    rendering.render(&ops, None).unwrap();

    let mut extracting = ContentScanner::default();
    extracting.add_font("F1", Arc::new(helvetica()));
    extracting.collect_text(&ops).unwrap();

    assert_eq!(rendering.state().tm(), extracting.state().tm());
    assert_eq!(rendering.state().tlm(), extracting.state().tlm());
    assert_eq!(rendering.state().word_space, 2.0);
    assert_eq!(extracting.state().char_space, 0.1);
}
