use rust_decimal_macros::dec;
use tabung::prelude::*;

#[test]
fn test_trace_serialization() {
    let trace = vec![
        CalculationStep::initial("Current Balance", dec!(100)),
        CalculationStep::add("Total Contributions", dec!(50)),
        CalculationStep::rate("ASB Rate", dec!(5.75)),
    ];

    let json = serde_json::to_string(&trace).unwrap();

    assert!(json.contains(r#""operation":"initial""#));
    assert!(json.contains(r#""operation":"add""#));
    assert!(json.contains(r#""operation":"rate""#));
    assert!(json.contains(r#""amount":"100""#));
}

#[test]
fn test_explain_lists_every_step() {
    let details = TabungHajiProjection::new()
        .balance(100)
        .target(1_000_000)
        .label("Someday")
        .project(&TabungConfig::default())
        .unwrap();

    let text = details.explain();
    assert!(text.starts_with("Projection for 'Someday' (Tabung Haji):"));
    for step in &details.calculation_trace {
        assert!(text.contains(&step.description), "missing {}", step.description);
    }
}

#[test]
fn test_display_mentions_label_and_years() {
    let details = AsbProjection::new()
        .balance(2000)
        .years(3)
        .project(&TabungConfig::default())
        .unwrap();
    let shown = details.to_string();
    assert!(shown.contains("Account: Account (Type: ASB)"));
    assert!(shown.contains("Projected after 3 years"));
}
