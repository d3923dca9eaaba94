use rust_decimal_macros::dec;
use tabung::prelude::*;

#[test]
fn test_portfolio_from_json_accounts() {
    let json = r#"[
        {"type": "Asb", "years": 1, "rate_year": null, "current_balance": "10000",
         "monthly_contribution": "0", "label": "ASB", "id": "00000000-0000-0000-0000-000000000001"},
        {"type": "TabungHaji", "target": "45000", "pilgrimage": "Hajj", "rate_method": null,
         "current_balance": "45000", "monthly_contribution": "0", "label": "Hajj Fund",
         "id": "00000000-0000-0000-0000-000000000002"}
    ]"#;
    let items: Vec<AccountItem> = serde_json::from_str(json).unwrap();

    let portfolio = items
        .into_iter()
        .fold(SavingsPortfolio::new(), |p, item| p.add(item));
    let result = portfolio.project_all(&TabungConfig::default());

    assert!(result.is_clean());
    assert_eq!(result.items_attempted, 2);
    assert_eq!(result.total_projected_balance, dec!(55575));
}

#[test]
fn test_one_bad_account_does_not_sink_the_rest() {
    let portfolio = SavingsPortfolio::new()
        .add(AsbProjection::new().balance(10000).years(1).label("ASB"))
        .add(
            EpfProjection::new()
                .salary(3000)
                .ages(40, 60)
                .settings(EpfContributionSettings::new().employer(35))
                .label("EPF"),
        )
        .add(TabungHajiProjection::new().balance(1000).label("TH"));

    let result = portfolio.project_all(&TabungConfig::default());

    assert_eq!(result.status, PortfolioStatus::Partial);
    assert_eq!(result.items_failed, 1);
    assert_eq!(result.successes().len(), 2);

    let failure = result.failures()[0];
    match failure {
        PortfolioItemResult::Failure { source, error } => {
            assert_eq!(source, "EPF");
            assert!(error.to_string().contains("employer_percentage"));
        }
        PortfolioItemResult::Success(_) => unreachable!(),
    }
}

#[test]
fn test_all_failed_status() {
    let bad = || EpfProjection::new().settings(EpfContributionSettings::new().employee(-3));
    let result = SavingsPortfolio::new()
        .add(bad())
        .add(bad())
        .project_all(&TabungConfig::default());
    assert_eq!(result.status, PortfolioStatus::Failed);
    assert_eq!(result.total_projected_balance, dec!(0));
}
