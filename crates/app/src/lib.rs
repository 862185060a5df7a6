pub mod app_loop;
pub mod presets;
pub mod save_location;
pub mod seed;

pub const APP_NAME: &str = "High Noon";

/// Format a seed as an exact decimal string with no prefix or suffix.
pub fn format_seed(seed: u64) -> String {
    seed.to_string()
}

/// Format a map fingerprint as `0x` followed by 16 lowercase hex
/// digits.
pub fn format_fingerprint(fingerprint: u64) -> String {
    format!("0x{fingerprint:016x}")
}
