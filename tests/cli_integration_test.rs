//! CLI integration tests for the backtest command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_backtest_config) and symbol overrides
//! - Data and output locations with their defaults
//! - Validate and list-symbols subcommands on real INI files
//! - Full backtest with CSV files on disk and the CSV report

mod common;

use clap::Parser;
use common::*;
use pairtrader::adapters::file_config_adapter::FileConfigAdapter;
use pairtrader::cli::{self, Cli};
use pairtrader::domain::error::PairtraderError;
use pairtrader::domain::indicator::RsiSource;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ExitCode has no PartialEq, compare through Debug
fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{:?}", actual) == format!("{:?}", expected)
}

const VALID_INI: &str = r#"
[backtest]
start_date = 2020-01-01
end_date = 2024-12-31
symbol_a = KO
symbol_b = PEP

[data]
path = /srv/prices

[strategy]
lookback = 30
rsi_period = 10
rsi_source = price_b
entry_deviation = 2.5
exit_deviation = 0.75

[report]
output_dir = results/ko_pep
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_backtest_config_from_ini() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();

        assert_eq!(config.symbol_a, "KO");
        assert_eq!(config.symbol_b, "PEP");
        assert_eq!(config.start_date, date(2020, 1, 1));
        assert_eq!(config.end_date, date(2024, 12, 31));
        assert_eq!(config.lookback, 30);
        assert_eq!(config.rsi_period, 10);
        assert_eq!(config.rsi_source, RsiSource::PriceB);
        assert_eq!(config.entry_deviation, 2.5);
        assert_eq!(config.exit_deviation, 0.75);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn strategy_defaults_apply() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2020-06-30\nsymbol_a = KO\nsymbol_b = PEP\n",
        )
        .unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();

        assert_eq!(config.lookback, 20);
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.rsi_source, RsiSource::Ratio);
        assert_eq!(config.entry_deviation, 2.0);
        assert_eq!(config.exit_deviation, 0.5);
    }

    #[test]
    fn missing_symbol_is_config_missing() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2020-06-30\nsymbol_a = KO\n",
        )
        .unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, PairtraderError::ConfigMissing { key, .. } if key == "symbol_b"));
    }

    #[test]
    fn bad_date_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 01/01/2020\nend_date = 2020-06-30\nsymbol_a = KO\nsymbol_b = PEP\n",
        )
        .unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, PairtraderError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn zero_lookback_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2020-06-30\nsymbol_a = KO\nsymbol_b = PEP\n[strategy]\nlookback = 0\n",
        )
        .unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, PairtraderError::ConfigInvalid { key, .. } if key == "lookback"));
    }

    #[test]
    fn non_numeric_lookback_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2020-06-30\nsymbol_a = KO\nsymbol_b = PEP\n[strategy]\nlookback = abc\n",
        )
        .unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, PairtraderError::ConfigInvalid { key, .. } if key == "lookback"));
    }

    #[test]
    fn non_numeric_entry_deviation_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2020-06-30\nsymbol_a = KO\nsymbol_b = PEP\n[strategy]\nentry_deviation = two\n",
        )
        .unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(
            matches!(err, PairtraderError::ConfigInvalid { key, .. } if key == "entry_deviation")
        );
    }

    #[test]
    fn symbol_overrides_replace_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let mut config = cli::build_backtest_config(&adapter).unwrap();

        cli::apply_symbol_overrides(&mut config, Some("XOM"), None);
        assert_eq!(config.symbol_a, "XOM");
        assert_eq!(config.symbol_b, "PEP");

        cli::apply_symbol_overrides(&mut config, None, Some(" CVX "));
        assert_eq!(config.symbol_b, "CVX");
    }

    #[test]
    fn locations_from_config_and_defaults() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert_eq!(cli::data_path(&adapter), PathBuf::from("/srv/prices"));
        assert_eq!(cli::output_dir(&adapter), PathBuf::from("results/ko_pep"));

        let bare = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert_eq!(cli::data_path(&bare), PathBuf::from(cli::DEFAULT_DATA_PATH));
        assert_eq!(cli::output_dir(&bare), PathBuf::from(cli::DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn load_config_missing_file_fails() {
        assert!(cli::load_config(Path::new("/nonexistent/pairtrader.ini")).is_err());
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn validate_accepts_valid_config() {
        let ini = write_temp_ini(VALID_INI);
        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "validate",
            "-c",
            ini.path().to_str().unwrap(),
        ]));
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn validate_rejects_exit_above_entry() {
        let ini = write_temp_ini(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2024-12-31\nsymbol_a = KO\nsymbol_b = PEP\n[strategy]\nentry_deviation = 1.0\nexit_deviation = 2.0\n",
        );
        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "validate",
            "--config",
            ini.path().to_str().unwrap(),
        ]));
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn validate_rejects_malformed_numbers() {
        let ini = write_temp_ini(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2024-12-31\nsymbol_a = KO\nsymbol_b = PEP\n[strategy]\nlookback = abc\nentry_deviation = two\nexit_deviation = 0.5x\n",
        );
        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "validate",
            "-c",
            ini.path().to_str().unwrap(),
        ]));
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn validate_missing_file_is_config_error() {
        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "validate",
            "-c",
            "/nonexistent/pairtrader.ini",
        ]));
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn list_symbols_reads_data_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("KO.csv"), "date,close\n2024-01-02,60.0\n").unwrap();
        let ini = write_temp_ini(&format!("[data]\npath = {}\n", dir.path().display()));

        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "list-symbols",
            "-c",
            ini.path().to_str().unwrap(),
        ]));
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn backtest_requires_config_flag() {
        assert!(Cli::try_parse_from(["pairtrader", "backtest"]).is_err());
    }
}

mod end_to_end {
    use super::*;

    fn write_prices(dir: &Path, symbol: &str, header: &str, prices: &[f64]) {
        let mut content = format!("{header}\n");
        for (i, p) in prices.iter().enumerate() {
            content.push_str(&format!("2024-01-{:02},{}\n", i + 1, p));
        }
        fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
    }

    fn setup() -> (TempDir, tempfile::NamedTempFile, PathBuf) {
        let dir = TempDir::new().unwrap();
        let a: Vec<f64> = SCENARIO_RATIOS.iter().map(|r| r * 100.0).collect();
        write_prices(dir.path(), "AAA", "date,adj_close", &a);
        write_prices(dir.path(), "BBB", "Date,Close", &[100.0; 7]);
        write_prices(dir.path(), "CCC", "date,price", &[50.0; 7]);

        let out = dir.path().join("report");
        let ini = write_temp_ini(&format!(
            "[backtest]\nstart_date = 2024-01-01\nend_date = 2024-01-31\nsymbol_a = AAA\nsymbol_b = BBB\n\
             [data]\npath = {}\n\
             [strategy]\nlookback = 3\nrsi_period = 2\nentry_deviation = 1.0\nexit_deviation = 0.3\n\
             [report]\noutput_dir = {}\n",
            dir.path().display(),
            out.display(),
        ));
        (dir, ini, out)
    }

    #[test]
    fn backtest_writes_report() {
        let (_dir, ini, out) = setup();

        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
        ]));
        assert!(same_code(code, ExitCode::SUCCESS));

        let signals = fs::read_to_string(out.join("signals.csv")).unwrap();
        assert_eq!(signals.lines().count(), 8);
        assert!(signals.lines().nth(1).unwrap().ends_with(",,,Flat"));

        let trades = fs::read_to_string(out.join("trades.csv")).unwrap();
        let lines: Vec<&str> = trades.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2024-01-03,2024-01-07,Short,"));

        let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
        assert!(summary.contains("Total Trades,1"));
        assert!(summary.contains("Short Lose Rate (%),100.00"));
        assert!(summary.contains("Max Drawdown (%),-13.64"));
    }

    #[test]
    fn output_flag_overrides_config() {
        let (dir, ini, out) = setup();
        let custom = dir.path().join("custom");

        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
            "-o",
            custom.to_str().unwrap(),
        ]));
        assert!(same_code(code, ExitCode::SUCCESS));
        assert!(custom.join("summary.csv").exists());
        assert!(!out.exists());
    }

    #[test]
    fn symbol_override_selects_other_file() {
        let (_dir, ini, out) = setup();

        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
            "--symbol-b",
            "CCC",
        ]));
        assert!(same_code(code, ExitCode::SUCCESS));

        let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
        assert!(summary.contains("Symbol B,CCC"));
    }

    #[test]
    fn missing_symbol_file_is_data_source_error() {
        let (_dir, ini, _out) = setup();

        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
            "--symbol-a",
            "ZZZ",
        ]));
        assert!(same_code(code, ExitCode::from(4)));
    }

    #[test]
    fn same_symbol_override_is_invalid_input() {
        let (_dir, ini, _out) = setup();

        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
            "--symbol-a",
            "BBB",
        ]));
        assert!(same_code(code, ExitCode::from(3)));
    }

    #[test]
    fn window_without_data_is_unavailable() {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "AAA", "date,close", &[10.0, 11.0]);
        write_prices(dir.path(), "BBB", "date,close", &[20.0, 21.0]);
        let ini = write_temp_ini(&format!(
            "[backtest]\nstart_date = 2023-01-01\nend_date = 2023-12-31\nsymbol_a = AAA\nsymbol_b = BBB\n[data]\npath = {}\n[report]\noutput_dir = {}\n",
            dir.path().display(),
            dir.path().join("out").display(),
        ));

        let code = cli::run(Cli::parse_from([
            "pairtrader",
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
        ]));
        assert!(same_code(code, ExitCode::from(5)));
    }
}
