//! Built-in defaults, user layers on disk, the secret guard and the
//! unused-key report.

use std::io::Write;

use chrono::NaiveDate;
use xvol_config::{load_layered_yaml_from_strings, load_with_defaults, report_unused_keys, UnusedKeyPolicy};

fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn defaults_carry_both_universes() {
    let loaded = load_with_defaults(&[]).unwrap();
    let cfg = loaded.analysis().unwrap();

    let adrs = cfg.universe("adrs").unwrap();
    assert_eq!(adrs.venue, "nyse");
    assert_eq!(adrs.tickers.len(), 13);
    assert!(adrs.tickers.contains(&"YPF".to_string()));

    let merval = cfg.universe("merval").unwrap();
    assert_eq!(merval.venue, "bcba");
    assert!(merval.tickers.iter().all(|t| t.ends_with(".BA")));
    assert_eq!(merval.tickers.first().map(String::as_str), Some("GGAL.BA"));

    assert_eq!(cfg.analysis.window_size, 20);
    assert_eq!(cfg.analysis.window_calendar_days, 30);
    assert_eq!(cfg.fetch.cache_ttl_secs, 300);

    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap();
    assert!(report.is_clean());
}

#[test]
fn user_file_layers_over_defaults() {
    let f = write_tmp(
        r#"
universes:
  adrs:
    venue: nyse
    tickers: [YPF]
venues:
  bcba:
    extra_holidays: ["2025-12-24", "2025-12-31"]
fetch:
  concurrency: 1
"#,
    );
    let path = f.path().to_str().unwrap().to_string();
    let loaded = load_with_defaults(&[path.as_str()]).unwrap();
    let cfg = loaded.analysis().unwrap();

    assert_eq!(cfg.universe("adrs").unwrap().tickers, vec!["YPF"]);
    assert!(cfg.universe("merval").unwrap().tickers.len() > 10);
    assert_eq!(cfg.fetch.concurrency, 1);
    assert_eq!(cfg.fetch.timeout_secs, 15);
    assert_eq!(
        cfg.extra_holidays("bcba"),
        &[
            NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        ]
    );
}

#[test]
fn missing_file_names_the_path() {
    let err = load_with_defaults(&["/nonexistent/xvol.yaml"]).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/xvol.yaml"));
}

#[test]
fn unknown_universe_lists_known_ones() {
    let cfg = load_with_defaults(&[]).unwrap().analysis().unwrap();
    let err = cfg.universe("nasdaq").unwrap_err().to_string();
    assert!(err.contains("adrs") && err.contains("merval"), "{err}");
}

#[test]
fn secret_literal_is_rejected_and_redacted() {
    let yaml = r#"
fetch:
  api_key: "sk_live_0123456789abcdef"
"#;
    let err = load_layered_yaml_from_strings(&[yaml]).unwrap_err().to_string();
    assert!(err.contains("CONFIG_SECRET_DETECTED"));
    assert!(err.contains("/fetch/api_key"));
    assert!(!err.contains("0123456789abcdef"));
}

#[test]
fn typo_is_reported_as_unused() {
    let loaded = load_layered_yaml_from_strings(&["analysis:\n  windw_size: 5\n"]).unwrap();

    let warn = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn).unwrap();
    assert_eq!(warn.unused_leaf_pointers, vec!["/analysis/windw_size".to_string()]);

    let err = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap_err();
    assert!(err.to_string().contains("CONFIG_UNUSED_KEYS"));
}
