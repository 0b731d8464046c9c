use csscleaner_lib::style::duplicates::DuplicateReport;
use csscleaner_lib::{
    clean_css, count_duplicated_properties, count_duplicates, get_cleaning_stats, parse_css,
    CleanError, CleanerOptions, CssCleaner,
};
use pretty_assertions::assert_eq;

const PRODUCT_CARD: &str = r#"
    .product-card {
        background: #fff;
        background: #f6f7fb;
        border-radius: 8px;
        box-shadow: 0 2px 8px rgba(0, 0, 0, 0.07);
        box-shadow: 0 2px 8px rgba(0, 0, 0, 0.07);
        margin-bottom: 20px;
        padding: 20px;
        text-align: center;
        transition: transform 0.2s;
        width: 240px;
        width: 220px;
        width: 200px;
    }
"#;

fn clean(css: &str) -> String {
    clean_css(css, &CleanerOptions::default()).expect("cleaning failed")
}

fn declarations_of(output: &str) -> Vec<String> {
    let sheet = parse_css(output).expect("output must parse");
    let mut props = Vec::new();
    sheet.walk_rules(&mut |rule| {
        for decl in rule.declarations() {
            props.push(format!("{}: {}", decl.property, decl.value));
        }
    });
    props
}

#[test]
fn test_merges_duplicate_selectors_and_keeps_all_properties() {
    let css = r#"
        .button { color: red; }
        .link { background: blue; }
        .button { padding: 10px; }
    "#;

    assert_eq!(
        clean(css),
        ".button {\n  color: red;\n  padding: 10px;\n}\n\n.link {\n  background: blue;\n}\n"
    );
}

#[test]
fn test_last_value_wins() {
    let out = clean(".a { p: v1; p: v2; }");
    assert!(out.contains("p: v2"));
    assert!(!out.contains("v1"));
}

#[test]
fn test_cross_rule_duplicates_resolve_after_merge() {
    let out = clean(".a { color: red; margin: 0; } .b { top: 0; } .a { color: blue; }");
    assert_eq!(
        out,
        ".a {\n  margin: 0;\n  color: blue;\n}\n\n.b {\n  top: 0;\n}\n"
    );
}

#[test]
fn test_complex_reconciliation() {
    let css = r#"
        .product-card {
            width: 240px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.07);
            width: 220px;
            margin-bottom: 20px;
            background: #fff;
            transition: transform 0.2s;
            background: #f6f7fb;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.07);
            padding: 20px;
            width: 200px;
            text-align: center;
        }
    "#;

    let out = clean(css);
    assert_eq!(out.matches("width:").count(), 1);
    assert!(out.contains("width: 200px"));
    assert_eq!(out.matches("background:").count(), 1);
    assert!(out.contains("background: #f6f7fb"));
    for prop in ["margin-bottom", "transition", "border-radius", "padding", "text-align"] {
        assert!(out.contains(prop), "missing {}", prop);
    }
}

#[test]
fn test_real_world_product_card() {
    let out = clean(PRODUCT_CARD);
    assert_eq!(
        declarations_of(&out),
        vec![
            "background: #f6f7fb",
            "border-radius: 8px",
            "box-shadow: 0 2px 8px rgba(0, 0, 0, 0.07)",
            "margin-bottom: 20px",
            "padding: 20px",
            "text-align: center",
            "transition: transform 0.2s",
            "width: 200px",
        ]
    );
    assert!(!out.contains("240px") && !out.contains("220px"));
    assert!(!out.contains("#fff;"));
}

#[test]
fn test_output_has_unique_selectors_and_properties() {
    let inputs = [
        PRODUCT_CARD,
        ".a{top:0} .b{top:0} .a{top:1px} .b{left:0} .a{TOP:2px}",
        "@media print { .a { color: red } .a { color: blue } } .a { x: 1; x: 2 }",
        ".a { &:hover { color: red } } .a { &:hover { color: blue } }",
    ];
    for css in inputs {
        let out = clean(css);
        let sheet = parse_css(&out).unwrap();
        let mut top_level: Vec<_> = sheet.rules().map(|r| r.selector.clone()).collect();
        let before = top_level.len();
        top_level.sort();
        top_level.dedup();
        assert_eq!(top_level.len(), before, "duplicate top-level selector in {:?}", out);
        assert_eq!(DuplicateReport::of(&sheet).properties, 0, "duplicate property in {:?}", out);
    }
}

#[test]
fn test_cleaning_is_idempotent() {
    let inputs = [
        PRODUCT_CARD,
        ".button{color:red} .link{background:blue} .button{padding:10px}",
        "/* c */ @import 'a.css'; .a{font-family:'A',serif} @media (min-width: 1px){.a{top:0}.a{left:0}}",
        ".a{transition:opacity 0.3s ease-in-out,transform 0.3s ease-in-out,visibility 0s linear 0.3s}",
        ":root{--x:{a:b};--y:1}",
    ];
    for css in inputs {
        let once = clean(css);
        assert_eq!(clean(&once), once);
    }

    let sorted = CssCleaner::new(CleanerOptions {
        sort_properties: true,
        ..CleanerOptions::default()
    });
    let once = sorted.clean(PRODUCT_CARD).unwrap();
    assert_eq!(sorted.clean(&once).unwrap(), once);
}

#[test]
fn test_count_duplicates() {
    let css = r#"
        .button { color: red; }
        .button { padding: 10px; }
        .button { margin: 5px; }
    "#;
    assert_eq!(count_duplicates(css).unwrap(), 2);
}

#[test]
fn test_count_duplicated_properties() {
    let css = ".test{width:100px;width:200px;width:300px;color:red;color:blue}";
    assert_eq!(count_duplicated_properties(css).unwrap(), 3);
    assert_eq!(count_duplicated_properties(PRODUCT_CARD).unwrap(), 4);
}

#[test]
fn test_detailed_statistics() {
    let css = r#"
        .button { width: 100px; width: 200px; }
        .button { color: red; }
    "#;

    let stats = get_cleaning_stats(css).unwrap();
    assert_eq!(stats.duplicated_selectors_removed, 1);
    assert_eq!(stats.duplicated_properties_removed, 1);
    assert!(stats.cleaned_size < stats.original_size);
    assert!(stats.percent_reduction > 0.0);

    let expected = (stats.original_size as f64 - stats.cleaned_size as f64)
        / stats.original_size as f64
        * 100.0;
    assert_eq!(stats.percent_reduction, expected);
}

#[test]
fn test_product_card_statistics() {
    let stats = get_cleaning_stats(PRODUCT_CARD).unwrap();
    assert_eq!(stats.duplicated_properties_removed, 4);
    assert_eq!(stats.duplicated_selectors_removed, 0);
    assert!(stats.cleaned_size < stats.original_size);
    assert!(stats.percent_reduction > 0.0);
}

#[test]
fn test_formatting_can_grow_the_output() {
    let stats = get_cleaning_stats(".a{top:0}").unwrap();
    assert_eq!(stats.original_size, 9);
    assert_eq!(stats.cleaned_size, ".a {\n  top: 0;\n}\n".len());
    assert!(stats.percent_reduction < 0.0);
}

#[test]
fn test_stats_with_reconciliation_disabled() {
    let cleaner = CssCleaner::new(CleanerOptions {
        remove_duplicated_properties: false,
        remove_duplicated_values: false,
        ..CleanerOptions::default()
    });
    let (out, stats) = cleaner
        .clean_with_stats(".a { color: red; } .a { color: blue; }")
        .unwrap();
    assert_eq!(out, ".a {\n  color: red;\n  color: blue;\n}\n");
    assert_eq!(stats.duplicated_selectors_removed, 1);
    // The merge creates a duplicate that was not there before.
    assert_eq!(stats.duplicated_properties_removed, -1);

    // Exact repeats go whatever the flags say.
    let out = cleaner
        .clean(".a { color: red; color: red; } @import \"x.css\"; @import \"x.css\";")
        .unwrap();
    assert_eq!(out, ".a {\n  color: red;\n}\n\n@import \"x.css\";\n");
}

#[test]
fn test_repeated_at_rules_are_discarded() {
    let out = clean("@import \"x.css\";\n@import \"x.css\";\n.a { top: 0; }");
    assert_eq!(out, "@import \"x.css\";\n\n.a {\n  top: 0;\n}\n");
}

#[test]
fn test_function_values_survive_cleaning() {
    let css = ".a { color: rgb(1, 2, 3); width: calc(100% - 10px); } .a { background: var(--bg, url(\"a.png\")); }";
    assert_eq!(
        clean(css),
        ".a {\n  color: rgb(1, 2, 3);\n  width: calc(100% - 10px);\n  background: var(--bg, url(\"a.png\"));\n}\n"
    );

    let raw = clean_css(
        ".a { color: rgb(1, 2, 3); width: calc(100% - 10px); }",
        &CleanerOptions {
            prettify: false,
            ..CleanerOptions::default()
        },
    )
    .unwrap();
    assert_eq!(raw, ".a { color: rgb(1, 2, 3); width: calc(100% - 10px); }\n");
}

#[test]
fn test_sibling_media_blocks_merge_their_rules() {
    let out = clean("@media print { .a { top: 0; } } .b { top: 0; } @media print { .a { left: 0; } }");
    assert_eq!(
        out,
        "@media print {\n  .a {\n    top: 0;\n    left: 0;\n  }\n}\n\n.b {\n  top: 0;\n}\n"
    );
}

#[test]
fn test_sort_properties() {
    let cleaner = CssCleaner::new(CleanerOptions {
        sort_properties: true,
        ..CleanerOptions::default()
    });
    let out = cleaner
        .clean(".a { z-index: 1; --x: 1; color: red; } .a { z-index: 2; }")
        .unwrap();
    assert_eq!(out, ".a {\n  --x: 1;\n  color: red;\n  z-index: 2;\n}\n");
}

#[test]
fn test_prettify_adds_breaks_and_indentation() {
    let out = clean(".test{color:red;padding:10px;}");
    assert!(out.contains('\n'));
    assert!(out.contains("  "));
}

#[test]
fn test_no_duplicates_preserves_everything() {
    let out = clean(".button { color: red; }\n.link { background: blue; }");
    assert_eq!(
        out,
        ".button {\n  color: red;\n}\n\n.link {\n  background: blue;\n}\n"
    );
}

#[test]
fn test_empty_input() {
    assert_eq!(clean(""), "");
    assert_eq!(clean("  \n ").trim(), "");
    let stats = get_cleaning_stats("").unwrap();
    assert_eq!(stats.original_size, 0);
    assert_eq!(stats.percent_reduction, 0.0);
}

#[test]
fn test_malformed_input_fails_whole_invocation() {
    for css in [
        "invalid css {{{",
        ".a { color: red; }}",
        ".a { content: 'x\n }",
        ".a { content: \"x}",
        ".a { color: rgb(1, 2, 3; }",
    ] {
        let err = clean_css(css, &CleanerOptions::default()).unwrap_err();
        assert!(matches!(err, CleanError::Parse(_)), "{:?} gave {:?}", css, err);
    }
}
