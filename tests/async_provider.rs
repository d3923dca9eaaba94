#![cfg(feature = "async")]

use rust_decimal_macros::dec;
use tabung::prelude::*;
use tabung::provider::JsonFileRateProvider;

fn announced_2025() -> RateTables {
    let mut tables = RateTables::default();
    tables.asb.insert(2025, dec!(6.10));
    tables.tabung_haji.insert(2025, dec!(3.50));
    tables
}

#[tokio::test]
async fn test_config_from_provider() {
    let provider = StaticRateProvider::new(announced_2025()).unwrap();
    let config = TabungConfig::from_provider(&provider).await.unwrap();
    assert_eq!(config.rates.asb.latest(), Some((2025, dec!(6.10))));
    assert_eq!(config.hajj_cost, dec!(45000));
}

#[tokio::test]
async fn test_refresh_rates_replaces_tables() {
    let mut config = TabungConfig::default();
    let provider = StaticRateProvider::new(announced_2025()).unwrap();
    config.refresh_rates(&provider).await.unwrap();

    let details = AsbProjection::new().balance(10000).years(1).project(&config).unwrap();
    assert_eq!(details.result.projected_balance, dec!(10610));
}

#[tokio::test]
async fn test_json_file_provider() {
    let path = std::env::temp_dir().join(format!("tabung-rates-{}.json", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, serde_json::to_string(&announced_2025()).unwrap())
        .await
        .unwrap();

    let provider = JsonFileRateProvider::new(path.to_string_lossy());
    let tables = provider.get_rate_tables().await.unwrap();
    assert_eq!(tables.tabung_haji.latest(), Some((2025, dec!(3.50))));

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn test_try_from_json_async() {
    let path = std::env::temp_dir().join(format!("tabung-config-{}.json", uuid::Uuid::new_v4()));
    let mut saved = TabungConfig::default();
    saved.hajj_cost = dec!(47000);
    saved.tabung_haji_rate_method = RateMethod::FiveYearAverage;
    tokio::fs::write(&path, serde_json::to_string(&saved).unwrap()).await.unwrap();

    let config = TabungConfig::try_from_json_async(path.to_str().unwrap()).await.unwrap();
    assert_eq!(config.hajj_cost, dec!(47000));
    assert_eq!(config.tabung_haji_rate_method, RateMethod::FiveYearAverage);
    assert_eq!(config, saved);

    tokio::fs::remove_file(&path).await.unwrap();
    let err = TabungConfig::try_from_json_async(path.to_str().unwrap()).await.unwrap_err();
    assert!(matches!(err, TabungError::ConfigurationError { .. }));
}

#[tokio::test]
async fn test_async_portfolio() {
    let config = TabungConfig::default();
    let result = AsyncSavingsPortfolio::new()
        .add(AsbProjection::new().balance(10000).years(1))
        .add(EpfProjection::new().settings(EpfContributionSettings::new().employee(50)))
        .project_all_async(&config)
        .await;

    assert_eq!(result.status, PortfolioStatus::Partial);
    assert_eq!(result.total_projected_balance, dec!(10575));
}
