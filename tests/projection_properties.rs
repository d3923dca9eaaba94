use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tabung::prelude::*;

#[test]
fn test_compounding_never_loses_money() {
    for years in 1..=10u32 {
        for rate in [dec!(0), dec!(1.25), dec!(5.75), dec!(10)] {
            for monthly in [dec!(0), dec!(150)] {
                let res = project(dec!(2500), monthly, rate, years).unwrap();
                assert!(res.projected_balance >= dec!(2500), "years={} rate={}", years, rate);
            }
        }
    }
}

#[test]
fn test_zero_horizon_is_identity() {
    let res = project(dec!(12345.67), dec!(500), dec!(6.3), 0).unwrap();
    assert_eq!(res.projected_balance, dec!(12345.67));
    assert_eq!(res.total_dividends, Decimal::ZERO);
    assert_eq!(res.total_contributions, Decimal::ZERO);
    assert!(res.yearly_breakdown.is_empty());
}

#[test]
fn test_contribution_total_ignores_rate() {
    for rate in [dec!(0), dec!(3.1), dec!(7.75)] {
        let res = project(dec!(1000), dec!(321.50), rate, 7).unwrap();
        assert_eq!(res.total_contributions, dec!(321.50) * dec!(12) * dec!(7));
        assert_eq!(res.years(), 7);
    }
}

#[test]
fn test_breakdown_is_chronological() {
    let res = project(dec!(1000), dec!(100), dec!(5), 5).unwrap();
    let years: Vec<u32> = res.yearly_breakdown.iter().map(|y| y.year).collect();
    assert_eq!(years, vec![1, 2, 3, 4, 5]);
    assert_eq!(res.yearly_breakdown.last().unwrap().balance, res.projected_balance);
    let dividends: Decimal = res.yearly_breakdown.iter().map(|y| y.dividend).sum();
    assert_eq!(dividends, res.total_dividends);
}

#[test]
fn test_select_rate_boundaries() {
    let tables = RateTables::default();
    let (latest_year, latest_rate) = tables.asb.latest().unwrap();
    assert_eq!(latest_year, 2024);
    assert_eq!(select_rate(&tables.asb, RateMethod::Latest).unwrap(), latest_rate);

    let empty = RateTable::new();
    for method in [
        RateMethod::Latest,
        RateMethod::ThreeYearAverage,
        RateMethod::FiveYearAverage,
        RateMethod::HistoricalAverage,
    ] {
        assert_eq!(select_rate(&empty, method).unwrap(), Decimal::ZERO);
    }
}

#[test]
fn test_epf_split_with_and_without_total() {
    let salary = dec!(6500);
    let settings = EpfContributionSettings::new().employee(11).employer(12).use_total(true);
    let res = calculate_contribution(salary, &settings).unwrap();
    assert_eq!(res.total_contribution, salary * dec!(0.11) + salary * dec!(0.12));
    assert_eq!(res.used_contribution, res.total_contribution);

    let res = calculate_contribution(salary, &settings.use_total(false)).unwrap();
    assert_eq!(res.used_contribution, res.employee_contribution);
}

#[test]
fn test_asb_scenario() {
    let details = AsbProjection::new()
        .balance(10000)
        .years(1)
        .project(&TabungConfig::default())
        .unwrap();
    assert_eq!(details.result.projected_balance, dec!(10575));
}

#[test]
fn test_tabung_haji_affordable_today() {
    let details = TabungHajiProjection::new()
        .balance(45000)
        .target(45000)
        .project(&TabungConfig::default())
        .unwrap();
    match details.payload {
        ProjectionPayload::TabungHaji { years_to_target, shortfall, .. } => {
            assert_eq!(years_to_target, 0);
            assert_eq!(shortfall, Decimal::ZERO);
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_epf_retirement_projection() {
    let details = EpfProjection::new()
        .balance(50000)
        .salary(5000)
        .ages(35, 60)
        .project(&TabungConfig::default())
        .unwrap();

    assert_eq!(details.years, 25);
    // 5000 * 23%
    assert_eq!(details.monthly_contribution, dec!(1150));
    assert!(details.result.projected_balance > dec!(50000) + dec!(1150) * dec!(12) * dec!(25));
    match details.payload {
        ProjectionPayload::Epf { account_split, .. } => {
            assert_eq!(account_split.total(), details.result.projected_balance);
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_epf_past_retirement_age_is_no_op() {
    let details = EpfProjection::new()
        .balance(300000)
        .salary(8000)
        .ages(62, 60)
        .project(&TabungConfig::default())
        .unwrap();
    assert_eq!(details.years, 0);
    assert_eq!(details.result.projected_balance, dec!(300000));
}

#[test]
fn test_benchmark_comparison_uses_shared_classifier() {
    let config = TabungConfig::default();
    let behind = compare_with_benchmark(30, dec!(10000), &config.epf_benchmarks).unwrap();
    assert_eq!(behind.status, ProgressStatus::Behind);

    let ahead = compare_with_benchmark(55, dec!(300000), &config.epf_benchmarks).unwrap();
    assert_eq!(ahead.status, ProgressStatus::Ahead);
}
