//! Resolves `AUTO`-sized config knobs against the live machine and
//! validates the run's resource posture before any worker spawns.

use sysinfo::System;
use tracing::info;
use vpfusion_core::config::{AutoSized, Config};
use vpfusion_core::constants::{CHUNK_SIZE_BYTES_PER_FILE, CHUNK_SIZE_MAX, CHUNK_SIZE_MIN};
use vpfusion_error::{Error, Result};

pub struct Environment {
    pub cpu_count: usize,
    pub available_memory_bytes: u64,
    pub total_memory_bytes: u64,
}

pub fn probe() -> Environment {
    let mut sys = System::new();
    sys.refresh_memory();
    Environment {
        cpu_count: std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1),
        available_memory_bytes: sys.available_memory(),
        total_memory_bytes: sys.total_memory(),
    }
}

fn resolve_cpu_count(config: &Config, env: &Environment) -> usize {
    match config.cpu_count_setting() {
        AutoSized::Auto => env.cpu_count,
        AutoSized::Fixed(n) => n.max(1),
    }
}

/// `memory_limit = "ALL"`/`"AUTO"` resolves to 80% of the machine's total
/// RAM rather than being parsed as a plain number.
fn resolve_memory_limit_gib(config: &Config, env: &Environment) -> Result<f64> {
    match config.memory_limit_setting() {
        AutoSized::Fixed(n) => Ok(n as f64),
        AutoSized::Auto => {
            if env.total_memory_bytes == 0 {
                return Err(Error::config_invalid("could not determine total system memory for memory_limit=ALL"));
            }
            Ok(env.total_memory_bytes as f64 / 1024f64.powi(3) * 0.80)
        }
    }
}

/// `chunk_size = "AUTO"` resolves as:
/// `memory_based = memory_limit_gib * 0.30 * 1024^3 / 60_000`,
/// `cpu_balanced = max(100, memory_based / (cpu_count * 15))`,
/// `chunk_size   = clamp(cpu_balanced, 50, 5000)`.
fn resolve_chunk_size(config: &Config, cpu_count: usize, env: &Environment) -> Result<usize> {
    match config.chunk_size_setting() {
        AutoSized::Fixed(n) => Ok(n.clamp(CHUNK_SIZE_MIN, CHUNK_SIZE_MAX)),
        AutoSized::Auto => {
            let memory_limit_gib = resolve_memory_limit_gib(config, env)?;
            let memory_based = memory_limit_gib * 0.30 * 1024f64.powi(3) / CHUNK_SIZE_BYTES_PER_FILE as f64;
            let cpu_balanced = (memory_based / (cpu_count.max(1) as f64 * 15.0)).max(100.0);
            Ok((cpu_balanced as usize).clamp(CHUNK_SIZE_MIN, CHUNK_SIZE_MAX))
        }
    }
}

/// Startup validation of `cpu_count`/`batch_size`/`chunk_size`/`memory_limit`
/// before any worker spawns. Any failure here is fatal.
pub fn validate_parallel_config(config: &Config, env: &Environment) -> Result<(usize, usize)> {
    let cpu_count = resolve_cpu_count(config, env);
    if cpu_count == 0 {
        return Err(Error::config_invalid("resolved cpu_count is zero"));
    }
    let chunk_size = resolve_chunk_size(config, cpu_count, env)?;

    info!(
        "environment: {} logical CPU(s), {:.1} GiB memory available",
        env.cpu_count,
        env.available_memory_bytes as f64 / 1024f64.powi(3)
    );
    info!("resolved cpu_count={cpu_count} chunk_size={chunk_size} batch_size={}", config.batch_size);

    Ok((cpu_count, chunk_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(total_memory_bytes: u64) -> Environment {
        Environment { cpu_count: 4, available_memory_bytes: total_memory_bytes, total_memory_bytes }
    }

    #[test]
    fn memory_limit_all_resolves_against_total_system_memory() {
        let mut config = Config::default();
        config.memory_limit = "ALL".to_string();
        let sixteen_gib = 16 * 1024u64.pow(3);
        let gib = resolve_memory_limit_gib(&config, &env(sixteen_gib)).unwrap();
        assert!((gib - 12.8).abs() < 0.01);
    }

    #[test]
    fn memory_limit_fixed_number_is_used_as_is() {
        let mut config = Config::default();
        config.memory_limit = "8".to_string();
        let gib = resolve_memory_limit_gib(&config, &env(16 * 1024u64.pow(3))).unwrap();
        assert_eq!(gib, 8.0);
    }

    #[test]
    fn chunk_size_auto_does_not_error_when_memory_limit_is_all() {
        let mut config = Config::default();
        config.memory_limit = "ALL".to_string();
        config.chunk_size = "AUTO".to_string();
        assert!(resolve_chunk_size(&config, 4, &env(16 * 1024u64.pow(3))).is_ok());
    }
}
