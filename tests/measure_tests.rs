mod common;

use std::sync::Arc;

use serp_pixel::serp_pixel_fonts::{
    CandidateTable, FontCatalog, FontOverride, FontResolver, FontTable, ScriptCategory,
};
use serp_pixel::{FieldKind, LimitEvaluator, SerpConfig, SerpError, Verdict, WidthMeasurer};

#[test]
fn test_measurement_is_deterministic() {
    let mut measurer = common::sans_measurer();
    let text = "Buy Running Shoes Online | Free Shipping";
    let first = measurer.measure(text, FieldKind::Title).unwrap();
    let second = measurer.measure(text, FieldKind::Title).unwrap();
    assert_eq!(first, second);

    // A fresh measurer over the same fonts agrees with the cached one
    let mut fresh = common::sans_measurer();
    assert_eq!(fresh.measure(text, FieldKind::Title).unwrap(), first);
}

#[test]
fn test_empty_text_is_zero_and_ok() {
    let mut measurer = common::sans_measurer();
    for kind in [FieldKind::Title, FieldKind::Description] {
        let m = measurer.measure("", kind).unwrap();
        assert_eq!(m.width_px, 0);
        assert_eq!(m.chars, 0);
        assert_eq!(m.verdict, Verdict::Ok);
        assert_eq!(m.remaining_px, i64::from(kind.limit_px()));
    }
}

#[test]
fn test_empty_text_needs_no_font() {
    let mut measurer = WidthMeasurer::new(FontTable::new());
    let m = measurer.measure("", FieldKind::Title).unwrap();
    assert_eq!(m.width_px, 0);
}

#[test]
fn test_appending_text_never_narrows() {
    let mut measurer = common::sans_measurer();
    let text = "Running shoes for trail and road";
    let mut previous = 0.0;
    for (end, _) in text.char_indices().skip(1) {
        let width = measurer
            .measure_width(&text[..end], FieldKind::Description)
            .unwrap()
            .raw_width_px;
        assert!(
            width >= previous,
            "width shrank at {:?}: {} < {}",
            &text[..end],
            width,
            previous
        );
        previous = width;
    }
}

#[test]
fn test_title_is_wider_than_description() {
    let mut measurer = common::sans_measurer();
    let text = "Free Shipping on All Orders";
    let title = measurer.measure(text, FieldKind::Title).unwrap();
    let desc = measurer.measure(text, FieldKind::Description).unwrap();
    assert!(title.width_px > desc.width_px);
}

#[test]
fn test_mixed_script_uses_font_per_segment() {
    let mut measurer = WidthMeasurer::new(common::split_table());
    let text = "Shoes 신발";
    let breakdown = measurer.measure_width(text, FieldKind::Title).unwrap();

    assert_eq!(breakdown.segments.len(), 2);
    let latin = &breakdown.segments[0];
    let korean = &breakdown.segments[1];
    assert_eq!(latin.category, ScriptCategory::Latin);
    assert_eq!(korean.category, ScriptCategory::Korean);
    assert!(!Arc::ptr_eq(&latin.font, &korean.font));
    assert_eq!(&text[korean.start..korean.start + korean.len], "신발");

    let summed: f64 = breakdown.segments.iter().map(|s| s.width_px).sum();
    assert!((summed - breakdown.raw_width_px).abs() < 1e-9);
    assert_eq!(breakdown.width_px, breakdown.raw_width_px.round() as u32);
}

#[test]
fn test_degraded_category_lowers_confidence() {
    let mut measurer = WidthMeasurer::new(common::split_table());
    let m = measurer.measure("สวัสดี", FieldKind::Title).unwrap();
    assert!(m.confidence.font_fallback);
    assert!(m.is_low_confidence());
    assert!(m.width_px > 0);
}

#[test]
fn test_missing_font_is_an_error() {
    let mut measurer = WidthMeasurer::new(FontTable::new());
    let err = measurer.measure("Shoes", FieldKind::Title).unwrap_err();
    assert!(matches!(err, SerpError::Font(_)));
}

#[test]
fn test_limit_boundaries() {
    assert_eq!(LimitEvaluator::evaluate(580, FieldKind::Title), Verdict::Ok);
    assert_eq!(LimitEvaluator::evaluate(581, FieldKind::Title), Verdict::Over);
    assert_eq!(LimitEvaluator::evaluate(990, FieldKind::Description), Verdict::Ok);
    assert_eq!(LimitEvaluator::evaluate(991, FieldKind::Description), Verdict::Over);
    assert!(matches!(
        LimitEvaluator::evaluate_named(10, "headline"),
        Err(SerpError::InvalidFieldKind(_))
    ));
}

#[test]
fn test_long_title_goes_over() {
    let mut measurer = common::sans_measurer();
    let text = "Buy Running Shoes Online | Free Shipping ".repeat(3);
    let m = measurer.check_title(text.trim()).unwrap();
    assert_eq!(m.verdict, Verdict::Over);
    assert!(m.remaining_px < 0);
    assert_eq!(m.over_by() as i64, -m.remaining_px);
}

#[test]
fn test_fonts_resolve_once_per_catalog() {
    let catalog = common::bundled_catalog();
    let mut measurer = WidthMeasurer::new(catalog);
    measurer.check_title("Shoes").unwrap();
    measurer.check_description("ร้องเท้าวิ่ง").unwrap();
    assert!(measurer.fonts().is_resolved());
    // Latin and Thai share the bundled DejaVu Sans file
    assert_eq!(measurer.shaper().face_count(), 1);
}

#[test]
fn test_override_replaces_latin_only() {
    let cfg = SerpConfig::from_lookup(|key| match key {
        "SERP_FONT_PATH" => Some(common::mono_path().display().to_string()),
        _ => None,
    });
    let catalog = FontCatalog::with_candidates(common::bundled_candidates(), cfg.font_override);

    let latin = catalog.font_for(ScriptCategory::Latin).unwrap();
    let thai = catalog.font_for(ScriptCategory::Thai).unwrap();
    let cjk = catalog.font_for(ScriptCategory::Cjk).unwrap();
    assert_eq!(latin.asset.path(), common::mono_path().as_path());
    assert_eq!(thai.asset.path(), common::sans_path().as_path());
    assert_eq!(cjk.asset.path(), common::mono_path().as_path());
    assert!(!Arc::ptr_eq(&thai.asset, &latin.asset));
}

#[test]
fn test_override_changes_latin_width() {
    let plain = FontCatalog::with_candidates(common::bundled_candidates(), None);
    let overridden = FontCatalog::with_candidates(
        common::bundled_candidates(),
        Some(FontOverride::latin(common::mono_path())),
    );
    let text = "Illuminating lilies";
    let a = WidthMeasurer::new(plain).check_title(text).unwrap();
    let b = WidthMeasurer::new(overridden).check_title(text).unwrap();
    assert_ne!(a.width_px, b.width_px);
}

/// Browser-calibrated reference: 381px in Arial at 20px.
#[test]
fn test_reference_title_width_with_bundled_arial_metrics() {
    let candidates = CandidateTable::empty()
        .with_files(ScriptCategory::Latin, vec![common::arial_metric_path()]);
    let mut measurer = WidthMeasurer::new(FontCatalog::with_candidates(candidates, None));

    let m = measurer
        .check_title("Buy Running Shoes Online | Free Shipping")
        .unwrap();
    assert_eq!(m.width_px, 381);
    assert_eq!(m.remaining_px, 199);
    assert_eq!(m.chars, 40);
    assert_eq!(m.verdict, Verdict::Ok);
    assert!(!m.is_low_confidence());
}

/// Same reference against an installed Arial-metric font, when the host
/// has one.
#[test]
fn test_reference_title_width_with_installed_arial() {
    let catalog = FontCatalog::new(None);
    let Ok(font) = catalog.font_for(ScriptCategory::Latin) else {
        eprintln!("skipping: no Latin font installed");
        return;
    };
    let name = font.asset.name.to_lowercase();
    if !["arial", "liberation", "arimo"]
        .iter()
        .any(|family| name.contains(family))
    {
        eprintln!("skipping: Latin font {} lacks Arial metrics", font.asset.name);
        return;
    }

    let mut measurer = WidthMeasurer::new(catalog);
    let m = measurer
        .check_title("Buy Running Shoes Online | Free Shipping")
        .unwrap();
    assert!(
        (380..=382).contains(&m.width_px),
        "expected about 381px, got {}",
        m.width_px
    );
    assert_eq!(m.verdict, Verdict::Ok);
}
