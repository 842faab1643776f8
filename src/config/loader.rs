//! Configuration loading with layered precedence.
//!
//! Layers, lowest to highest: defaults, configuration file, environment
//! variables, command-line arguments.
//!
//! The layers are composed by hand with `MergeComposer` because the `Cli`
//! struct owns subcommand dispatch, and because typed environment variables
//! must fail loudly instead of being silently ignored.
//!
//! # Environment Variable Handling
//!
//! String fields such as `GITSERVER_HARNESS_BASE_URL` are always accepted.
//! Typed fields such as `GITSERVER_HARNESS_BROWSER_HEADLESS` or
//! `GITSERVER_HARNESS_TIMEOUTS_LONG_MS` must parse, otherwise loading fails
//! with `ConfigError::InvalidValue` naming the variable.

use camino::Utf8PathBuf;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{Cli, HarnessConfig};
use crate::error::{ConfigError, FilesystemError, Result};
use crate::files;

#[derive(Clone, Copy)]
enum EnvVarType {
    String,
    Bool,
    U64,
}

struct EnvVarSpec {
    env_var: &'static str,
    path: &'static [&'static str],
    var_type: EnvVarType,
}

const fn spec(
    env_var: &'static str,
    path: &'static [&'static str],
    var_type: EnvVarType,
) -> EnvVarSpec {
    EnvVarSpec {
        env_var,
        path,
        var_type,
    }
}

/// Every environment variable the loader reads, with its JSON path.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    spec("GITSERVER_HARNESS_BASE_URL", &["base_url"], EnvVarType::String),
    spec(
        "GITSERVER_HARNESS_WEBDRIVER_URL",
        &["webdriver_url"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_BROWSER_KIND",
        &["browser", "kind"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_BROWSER_HEADLESS",
        &["browser", "headless"],
        EnvVarType::Bool,
    ),
    spec(
        "GITSERVER_HARNESS_TIMEOUTS_SHORT_MS",
        &["timeouts", "short_ms"],
        EnvVarType::U64,
    ),
    spec(
        "GITSERVER_HARNESS_TIMEOUTS_LONG_MS",
        &["timeouts", "long_ms"],
        EnvVarType::U64,
    ),
    spec(
        "GITSERVER_HARNESS_TIMEOUTS_POLL_INTERVAL_MS",
        &["timeouts", "poll_interval_ms"],
        EnvVarType::U64,
    ),
    spec(
        "GITSERVER_HARNESS_DATA_PROJECT_DIR",
        &["data", "project_dir"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_DATA_TEST_DATA",
        &["data", "test_data"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_DATA_CLI_CONFIG",
        &["data", "cli_config"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_SETUP_TEMPLATE",
        &["setup", "template"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_SETUP_LIVE",
        &["setup", "live"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_SETUP_SETTLE_MS",
        &["setup", "settle_ms"],
        EnvVarType::U64,
    ),
    spec(
        "GITSERVER_HARNESS_TOOL_PROGRAM",
        &["tool", "program"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_PROBE_ADDRESS",
        &["probe", "address"],
        EnvVarType::String,
    ),
    spec(
        "GITSERVER_HARNESS_PROBE_TIMEOUT_MS",
        &["probe", "timeout_ms"],
        EnvVarType::U64,
    ),
];

/// Names of every environment variable the loader reads.
///
/// Tests use this to clear the environment without keeping a second list.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|entry| entry.env_var).collect()
}

fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let content = files::read_to_string(path).map_err(|error| match error {
        FilesystemError::NotFound { path: missing } => ConfigError::FileNotFound { path: missing },
        other @ FilesystemError::IoError { .. } => ConfigError::ParseError {
            message: other.to_string(),
        },
    })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    tracing::debug!(path = %path, "loaded configuration file");
    composer.push_file(value, Some(path.clone()));
    Ok(())
}

fn discover_config_file(cli: &Cli) -> Option<Utf8PathBuf> {
    cli.config.clone().filter(|p| files::exists(p)).or_else(|| {
        let discovery = ConfigDiscovery::builder("gitserver-harness")
            .env_var("GITSERVER_HARNESS_CONFIG_PATH")
            .config_file_name("config.toml")
            .dotfile_name(".gitserver-harness.toml")
            .build();
        discovery
            .candidates()
            .into_iter()
            .filter_map(|p| Utf8PathBuf::try_from(p).ok())
            .find(|p| files::exists(p))
    })
}

/// Load configuration with full layer precedence and validate the result.
///
/// # Errors
///
/// Returns `ConfigError` when a configuration file is malformed, a typed
/// environment variable does not parse, the layers fail to merge, or the
/// merged configuration is inconsistent.
pub fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(HarnessConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(ref path) = discover_config_file(cli) {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars()?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        HarnessConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.validate()?;

    Ok(config)
}

fn collect_env_vars() -> Result<Value> {
    let mut root = Map::new();

    for entry in ENV_VAR_SPECS {
        let Ok(raw_value) = std::env::var(entry.env_var) else {
            continue;
        };

        let json_value = match entry.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: entry.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::U64 => match raw_value.parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: entry.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, entry.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert `value` at a nested path, creating intermediate objects.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref url) = cli.base_url {
        insert_at_path(&mut overrides, &["base_url"], Value::String(url.clone()));
    }

    if let Some(ref url) = cli.webdriver_url {
        insert_at_path(&mut overrides, &["webdriver_url"], Value::String(url.clone()));
    }

    if let Some(ref dir) = cli.project_dir {
        insert_at_path(
            &mut overrides,
            &["data", "project_dir"],
            Value::String(dir.to_string()),
        );
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
