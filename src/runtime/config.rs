//! Configuration Management
use config::File;
use config::Source;
use config::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::MutexGuard;
use tracing::level_filters::LevelFilter;

/// Get global configuration
pub fn config() -> Config {
    get_config().clone()
}

// helper to deal with poisoned Mutex
fn get_config() -> MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(|poison| {
        warn!("config poisoned, restoring initial config");
        let mut c = poison.into_inner();
        *c = init_config();
        CONFIG.clear_poison();
        c
    })
}

/// Set config value
pub fn set<V: Into<config::Value>>(name: impl Into<String>, value: V) {
    get_config().set_value(name, value);
}

/// Remove a value that is not one of the known keys
pub fn unset(name: &str) {
    get_config().misc.remove(name);
}

/// Get value from config
pub fn get_value(name: &str) -> Option<Value> {
    get_config().misc.get(name).cloned()
}

fn init_config() -> Config {
    let mut settings = ::config::Config::builder();

    // user config
    if let Some(mut path) = dirs::config_dir() {
        path.push("openlst");
        path.push("config.toml");

        settings = settings.add_source(File::from(path).required(false));
    }

    // project config
    settings =
        settings.add_source(File::new("config.toml", config::FileFormat::Toml).required(false));

    // env config
    settings = settings.add_source(config::Environment::with_prefix("openlst"));

    let mut c = Config::default();

    match settings.build() {
        Ok(settings) => match settings.collect() {
            Ok(config) => {
                for (k, v) in config.into_iter() {
                    c.set_value(k, v);
                }
            }
            Err(e) => warn!("error parsing config {e:?}"),
        },
        Err(e) => warn!("error reading config {e:?}"),
    }
    c
}

static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(init_config()));

/// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of transmit units a framer block queues
    pub queue_size: usize,
    /// Log level
    pub log_level: LevelFilter,
    misc: HashMap<String, Value>,
}

impl Config {
    fn set_value<V: Into<config::Value>>(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        let value = value.into();

        match name.as_str() {
            "queue_size" => {
                if let Some(v) = config_parse::<usize>(&name, &value) {
                    self.queue_size = v;
                }
            }
            "log_level" => {
                if let Some(v) = config_parse::<LevelFilter>(&name, &value) {
                    self.log_level = v;
                }
            }
            _ => {
                self.misc.insert(name, value);
            }
        }
    }
}

impl Default for Config {
    #[cfg(debug_assertions)]
    fn default() -> Self {
        Config {
            queue_size: 1000,
            log_level: LevelFilter::DEBUG,
            misc: HashMap::new(),
        }
    }

    #[cfg(not(debug_assertions))]
    fn default() -> Self {
        Config {
            queue_size: 1000,
            log_level: LevelFilter::INFO,
            misc: HashMap::new(),
        }
    }
}

fn config_parse<T: FromStr>(name: &str, v: &Value) -> Option<T> {
    let parsed = v
        .clone()
        .into_string()
        .ok()
        .and_then(|s| s.parse::<T>().ok());
    if parsed.is_none() {
        warn!("invalid config value for {name}: {v:?}, keeping default");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_are_typed() {
        let mut c = Config::default();
        c.set_value("queue_size", "12");
        c.set_value("log_level", "warn");
        assert_eq!(c.queue_size, 12);
        assert_eq!(c.log_level, LevelFilter::WARN);
    }

    #[test]
    fn invalid_known_key_keeps_default() {
        let mut c = Config::default();
        c.set_value("queue_size", "lots");
        assert_eq!(c.queue_size, Config::default().queue_size);
    }

    #[test]
    fn unknown_keys_land_in_misc() {
        let mut c = Config::default();
        c.set_value("sync_words", 3i64);
        assert_eq!(
            c.misc.get("sync_words").cloned().map(|v| v.into_string().unwrap()),
            Some("3".to_string())
        );
    }
}
