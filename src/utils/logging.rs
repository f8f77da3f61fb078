use env_logger::{Builder, Target};
use log::{info, LevelFilter};

pub const ENV_LOG_LEVEL: &str = "SIGCHOS_LOG";

const LOG_ERROR_LEVEL_MOD: &[&str] = &[
    "reqwest::async_impl::client",
    "reqwest::connect",
    "hyper_util::client",
];

fn get_log_level(log_level: &str) -> LevelFilter {
    match log_level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Splits `info,sigchos::auth=debug` into a default level and module filters.
fn parse_log_levels(log_level: &str) -> (Option<LevelFilter>, Vec<(String, LevelFilter)>) {
    let mut default_level = None;
    let mut modules = vec![];
    for pair in log_level.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some((module, level)) = pair.split_once('=') {
            modules.push((module.trim().to_string(), get_log_level(level)));
        } else {
            default_level = Some(get_log_level(pair));
        }
    }
    (default_level, modules)
}

pub fn init_logger(user_log_level: Option<&str>, config_log_level: Option<&str>) {
    let env_log_level = std::env::var(ENV_LOG_LEVEL).ok();

    let mut log_builder = Builder::from_default_env();
    // stdout carries command output
    log_builder.target(Target::Stderr);

    // priority  CLI-Argument, Env-Var, Config, Default
    let log_level = user_log_level
        .map(ToString::to_string)
        .or(env_log_level)
        .or_else(|| config_log_level.map(ToString::to_string))
        .unwrap_or_else(|| "info".to_string());

    let (default_level, modules) = parse_log_levels(&log_level);
    log_builder.filter_level(default_level.unwrap_or(LevelFilter::Info));
    for (module, level) in &modules {
        log_builder.filter_module(module, *level);
    }
    for module in LOG_ERROR_LEVEL_MOD {
        log_builder.filter_module(module, LevelFilter::Error);
    }
    if log_builder.try_init().is_ok() {
        info!("Log Level {log_level}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_levels() {
        let (level, modules) = parse_log_levels("warn, sigchos::auth=debug");
        assert_eq!(level, Some(LevelFilter::Warn));
        assert_eq!(modules, vec![("sigchos::auth".to_string(), LevelFilter::Debug)]);

        let (level, modules) = parse_log_levels("sigchos=trace");
        assert_eq!(level, None);
        assert_eq!(modules.len(), 1);
        assert_eq!(get_log_level("bogus"), LevelFilter::Info);
    }
}
