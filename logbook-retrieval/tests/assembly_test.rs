//! DefaultAssembler budgets.

use logbook_core::config::AssemblyConfig;
use logbook_core::models::RetrievedItem;
use logbook_core::traits::Assembler;
use logbook_retrieval::assembly::render_item;
use logbook_retrieval::DefaultAssembler;
use proptest::prelude::*;
use test_fixtures::item;

fn fixed_width(width: usize) -> DefaultAssembler {
    DefaultAssembler::with_renderer(move |_: &RetrievedItem| "x".repeat(width))
}

fn items(n: usize) -> Vec<RetrievedItem> {
    (0..n).map(|i| item(&format!("e{i}"), 1.0, "keyword")).collect()
}

#[test]
fn total_budget_keeps_two_full_items_and_clips_the_third() {
    let config = AssemblyConfig {
        max_total_chars: 2500,
        max_chars_per_item: None,
    };

    let context = fixed_width(1000).assemble(items(5), &config).unwrap();

    assert_eq!(context.items().len(), 3);
    assert_eq!(context.total_chars(), 2500);
    assert_eq!(context.text().chars().count(), context.total_chars());
    assert!(context.truncated());
}

#[test]
fn per_item_cap_clips_without_dropping() {
    let config = AssemblyConfig {
        max_total_chars: 10_000,
        max_chars_per_item: Some(300),
    };

    let context = fixed_width(1000).assemble(items(3), &config).unwrap();

    assert_eq!(context.items().len(), 3);
    assert_eq!(context.total_chars(), 900);
    assert!(context.truncated());
}

#[test]
fn clipped_items_keep_headers_on_their_own_lines() {
    let config = AssemblyConfig {
        max_total_chars: 10_000,
        max_chars_per_item: Some(30),
    };
    let entries = vec![item("a1", 2.0, "keyword"), item("b2", 1.0, "keyword")];

    let context = DefaultAssembler::new().assemble(entries, &config).unwrap();

    let text = context.text();
    assert!(context.truncated());
    assert_eq!(context.total_chars(), 60);
    assert!(text.starts_with("[#a1] "));
    assert!(text.contains("\n[#b2] "));
    assert!(text.ends_with("\n\n"));
    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("[#")).collect();
    assert_eq!(headers.len(), 2);
}

#[test]
fn everything_fits_is_not_truncated() {
    let config = AssemblyConfig {
        max_total_chars: 3000,
        max_chars_per_item: Some(1000),
    };

    let context = fixed_width(1000).assemble(items(3), &config).unwrap();

    assert_eq!(context.items().len(), 3);
    assert_eq!(context.total_chars(), 3000);
    assert!(!context.truncated());
}

#[test]
fn exact_fill_then_drop_is_truncated() {
    let config = AssemblyConfig {
        max_total_chars: 2000,
        max_chars_per_item: None,
    };

    let context = fixed_width(1000).assemble(items(3), &config).unwrap();

    assert_eq!(context.items().len(), 2);
    assert!(context.truncated());
}

#[test]
fn empty_input_gives_empty_context() {
    let context = DefaultAssembler::new()
        .assemble(Vec::new(), &AssemblyConfig::default())
        .unwrap();
    assert!(context.is_empty());
    assert_eq!(context.total_chars(), 0);
    assert!(!context.truncated());
}

#[test]
fn budgets_count_characters_not_bytes() {
    let config = AssemblyConfig {
        max_total_chars: 5,
        max_chars_per_item: None,
    };
    let assembler = DefaultAssembler::with_renderer(|_: &RetrievedItem| "ééééé".repeat(2));

    let context = assembler.assemble(items(1), &config).unwrap();

    assert_eq!(context.text(), "ééééé");
    assert_eq!(context.total_chars(), 5);
}

#[test]
fn default_rendering_carries_citation_marker() {
    let rendered = render_item(&item("abc", 1.0, "keyword"));
    assert!(rendered.starts_with("[#abc] "));
    assert!(rendered.contains("content of abc"));
    assert!(rendered.ends_with("\n\n"));
}

proptest! {
    #[test]
    fn text_never_exceeds_budget(
        widths in prop::collection::vec(0usize..400, 0..12),
        total in 0usize..2000,
        cap in prop::option::of(1usize..300),
    ) {
        let widths_for_render = widths.clone();
        let assembler = DefaultAssembler::with_renderer(move |it: &RetrievedItem| {
            let idx: usize = it.entry_id()[1..].parse().unwrap();
            "y".repeat(widths_for_render[idx])
        });
        let config = AssemblyConfig { max_total_chars: total, max_chars_per_item: cap };

        let context = assembler.assemble(items(widths.len()), &config).unwrap();

        prop_assert!(context.total_chars() <= total);
        prop_assert_eq!(context.text().chars().count(), context.total_chars());

        let capped: Vec<usize> = widths.iter().map(|w| cap.map_or(*w, |c| (*w).min(c))).collect();
        let clipped_by_cap = capped != widths;
        let needed: usize = capped.iter().sum();
        if clipped_by_cap || needed > total {
            prop_assert!(context.truncated());
        }
        if !clipped_by_cap && needed < total {
            prop_assert!(!context.truncated());
            prop_assert_eq!(context.items().len(), widths.len());
        }
    }
}
