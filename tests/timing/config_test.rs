//! Configuration files driving the timebase.

use chronon_core::{ChrononConfig, ClockSource, ConfigError, Duration};
use chronon_platform::Timebase;
use std::io::Write;

#[test]
fn test_config_file_builds_timebase() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[timebase]\nsource = \"monotonic\"\n\n[ticker]\nperiod = \"50ms\"\nrun_for = \"300ms\""
    )
    .unwrap();

    let config = ChrononConfig::from_file(file.path()).unwrap();
    assert_eq!(config.ticker.period().unwrap(), Duration::from_milliseconds_i32(50));
    assert_eq!(config.ticker.work().unwrap(), Duration::ZERO);

    let timebase = Timebase::new(&config.timebase).unwrap();
    assert_eq!(timebase.source(), ClockSource::Monotonic);
    assert!(timebase.try_now().unwrap().is_positive());
}

#[test]
fn test_written_config_reloads() {
    let mut config = ChrononConfig::default();
    config.ticker.period = std::time::Duration::from_millis(20);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chronon.toml");
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();

    assert_eq!(ChrononConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_bad_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ticker]\nperiod = \"soon\"").unwrap();
    assert!(matches!(
        ChrononConfig::from_file(file.path()),
        Err(ConfigError::Parse(_))
    ));
}
