use shelflife::InvalidDatePolicy;
use shelflife::config::{Config, LogLevel, MAX_BAR_WIDTH};
use shelflife::context::{AppContext, TestContext};
use std::fs;

#[test]
fn test_missing_config_is_reported_and_defaults_apply() {
    let ctx = TestContext::new();

    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));

    let cfg = Config::load_or_default(&ctx).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.item_column, "Item Name");
    assert_eq!(cfg.on_invalid_date, InvalidDatePolicy::Drop);
}

#[test]
fn test_partial_config_fills_in_defaults() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(
        &path,
        "on_invalid_date = \"reject\"\nday_first = true\ndate_formats = [\"%d|%m|%Y\"]\nlog_level = \"debug\"\n",
    )
    .unwrap();

    let cfg = Config::load(&ctx).unwrap();
    assert_eq!(cfg.on_invalid_date, InvalidDatePolicy::Reject);
    assert!(cfg.day_first);
    assert_eq!(cfg.date_formats, vec!["%d|%m|%Y".to_string()]);
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.expiry_column, "Date of Expiry");
    assert_eq!(cfg.bar_width, 40);
}

#[test]
fn test_broken_config_is_an_error_not_defaults() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "on_invalid_date = \"sometimes\"\n").unwrap();

    let err = Config::load_or_default(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_saved_config_is_loaded_back() {
    let ctx = TestContext::new();
    let cfg = Config {
        delimiter: ';',
        item_column: "Product".to_string(),
        ..Config::default()
    };
    cfg.save(&ctx).unwrap();

    assert!(ctx.get_config_file_path().unwrap().exists());
    assert_eq!(Config::load(&ctx).unwrap(), cfg);
}

#[test]
fn test_non_ascii_delimiter_is_rejected() {
    let cfg = Config {
        delimiter: '§',
        ..Config::default()
    };
    assert!(cfg.input_options().is_err());
    assert_eq!(Config::default().input_options().unwrap().delimiter, b',');
}

#[test]
fn test_oversized_bar_width_is_capped() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "bar_width = 100000000\n").unwrap();

    let cfg = Config::load(&ctx).unwrap();
    assert_eq!(cfg.bar_width, MAX_BAR_WIDTH);

    let built = Config {
        bar_width: usize::MAX,
        ..Config::default()
    };
    assert_eq!(built.bar_width(), MAX_BAR_WIDTH);
    assert_eq!(Config::default().bar_width(), 40);
}
