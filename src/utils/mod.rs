//! Utilities module for error types, logging, and small numeric helpers

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{PawShieldError, PredictError, Result};
pub use logging::{init_logging, LogConfig, LogLevel};

/// Round to a fixed number of decimal places
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f64.powi(decimals);
    ((value as f64 * factor).round() / factor) as f32
}

/// Capitalize the first character and lowercase the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
