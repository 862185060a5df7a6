//! Run-seed resolution: an explicit `--seed` flag wins, otherwise a
//! runtime seed is derived from process entropy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource {
    Flag(u64),
    Generated(u64),
}

impl SeedSource {
    pub fn value(self) -> u64 {
        match self {
            Self::Flag(seed) | Self::Generated(seed) => seed,
        }
    }
}

static RUNTIME_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fresh seed per call, mixed from wall clock, pid, and a counter.
pub fn runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |elapsed| elapsed.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = RUNTIME_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy =
        (now_nanos as u64) ^ ((now_nanos >> 64) as u64) ^ pid.rotate_left(17) ^ counter.rotate_left(7);
    mix(entropy)
}

/// Picks the seed from `--seed <n>` / `--seed=<n>` args, falling back
/// to the given generated seed.
pub fn resolve_seed(args: &[String], generated: u64) -> Result<SeedSource, String> {
    let mut flag_seed = None;
    let mut args_iter = args.iter().skip(1);

    while let Some(argument) = args_iter.next() {
        let value = if argument == "--seed" {
            match args_iter.next() {
                Some(value) => value.as_str(),
                None => return Err("missing value for --seed".to_string()),
            }
        } else if let Some(value) = argument.strip_prefix("--seed=") {
            value
        } else {
            continue;
        };

        if flag_seed.is_some() {
            return Err("seed provided more than once".to_string());
        }
        flag_seed = Some(
            value
                .parse::<u64>()
                .map_err(|_| format!("seed value '{value}' must be a number"))?,
        );
    }

    Ok(match flag_seed {
        Some(seed) => SeedSource::Flag(seed),
        None => SeedSource::Generated(generated),
    })
}

fn mix(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
