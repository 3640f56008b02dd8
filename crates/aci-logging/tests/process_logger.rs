//! Process-level initialization: environment variables and the global
//! `tracing` bridge. Kept in one test so environment mutation cannot race.

use aci_logging::{
    global, init_from_env, install, install_tracing_bridge, Level, LogFormat, LOGGER_NAME,
};

#[test]
fn test_env_configured_process_logger() {
    std::env::set_var("LOG_LEVEL", "warning");
    std::env::set_var("LOG_JSON", "Yes");
    std::env::remove_var("DEBUG");

    let logger = init_from_env();
    assert_eq!(logger.name(), LOGGER_NAME);
    assert_eq!(logger.level(), Level::Warning);
    assert!(!logger.propagate());
    assert_eq!(logger.sinks().len(), 1);
    assert_eq!(logger.sinks()[0].formatter().kind(), LogFormat::Json);

    std::env::set_var("LOG_LEVEL", "bogus");
    std::env::set_var("LOG_JSON", "no");
    let fallback = init_from_env();
    assert_eq!(fallback.level(), Level::Info);
    assert_eq!(fallback.sinks()[0].formatter().kind(), LogFormat::Text);

    std::env::set_var("DEBUG", "1");
    let debug = init_from_env();
    assert_eq!(debug.level(), Level::Debug);

    let installed = install(logger.clone()).unwrap();
    assert_eq!(installed.level(), Level::Warning);
    assert!(install(debug).is_err());
    assert_eq!(global().map(|l| l.level()), Some(Level::Warning));

    install_tracing_bridge(logger).unwrap();
    assert!(install_tracing_bridge(fallback).is_err());
    tracing::error!(code = 7, "bridged through the process logger");
}
