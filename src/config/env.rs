//! Environment override layer
//!
//! Variables named `RESONANCE_<KEY>` override the config key `<key>`.
//! Values are coerced to the field's type; a value that does not coerce is
//! skipped, never an error.

use super::schema::ConfigPatch;
use std::path::PathBuf;
use tracing::debug;

/// Prefix shared by all config environment variables
pub const ENV_PREFIX: &str = "RESONANCE_";

/// Build a patch from the current process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
pub fn patch_from_process_env() -> ConfigPatch {
    let vars = std::env::vars_os().filter_map(|(name, value)| {
        match (name.to_str(), value.to_str()) {
            (Some(name), Some(value)) => Some((name.to_string(), value.to_string())),
            _ => {
                debug!("Skipping non-Unicode environment variable {:?}", name);
                None
            }
        }
    });
    patch_from_vars(vars)
}

/// Build a patch from an explicit set of variables
pub fn patch_from_vars<I, K, V>(vars: I) -> ConfigPatch
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut patch = ConfigPatch::default();

    for (name, value) in vars {
        let Some(key) = name.as_ref().strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let key = key.to_lowercase();
        let value = value.as_ref();

        if !set_field(&mut patch, &key, value) {
            debug!("Ignoring environment override {}{}", ENV_PREFIX, key.to_uppercase());
        }
    }

    patch
}

/// Coerce `value` into the field named `key`. Returns false when the key is
/// unknown or the value does not parse.
fn set_field(patch: &mut ConfigPatch, key: &str, value: &str) -> bool {
    match key {
        "threshold" => parse_into(&mut patch.threshold, value),
        "seed" => parse_into(&mut patch.seed, value),
        "jobs" => parse_into(&mut patch.jobs, value),
        "max_cache_size_mb" => parse_into(&mut patch.max_cache_size_mb, value),
        "max_file_count" => parse_into(&mut patch.max_file_count, value),
        "max_total_bytes" => parse_into(&mut patch.max_total_bytes, value),
        "max_file_size_bytes" => parse_into(&mut patch.max_file_size_bytes, value),
        "no_cache" => set(&mut patch.no_cache, parse_bool(value)),
        "clear_cache" => set(&mut patch.clear_cache, parse_bool(value)),
        "verbose" => set(&mut patch.verbose, parse_bool(value)),
        "include_globs" => set(&mut patch.include_globs, parse_list(value)),
        "exclude_globs" => set(&mut patch.exclude_globs, parse_list(value)),
        "cache_dir" => set(&mut patch.cache_dir, PathBuf::from(value)),
        "reference" => set(&mut patch.reference, PathBuf::from(value)),
        "schema_version" => set(&mut patch.schema_version, value.to_string()),
        _ => false,
    }
}

fn set<T>(slot: &mut Option<T>, value: T) -> bool {
    *slot = Some(value);
    true
}

fn parse_into<T: std::str::FromStr>(slot: &mut Option<T>, value: &str) -> bool {
    match value.trim().parse() {
        Ok(parsed) => set(slot, parsed),
        Err(_) => false,
    }
}

fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}
