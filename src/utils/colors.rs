/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Goal percentage color:
/// \>= 100 → green
/// \>= `warn_at` → yellow
/// below → red
pub fn color_for_percentage(pct: f64, warn_at: f64) -> &'static str {
    if pct >= 100.0 {
        GREEN
    } else if pct >= warn_at {
        YELLOW
    } else {
        RED
    }
}

/// Week-over-week variation: up green, down red, flat unchanged.
pub fn color_for_variation(value: f64) -> &'static str {
    if value > 0.0 {
        GREEN
    } else if value < 0.0 {
        RED
    } else {
        RESET
    }
}

/// Grey out zero values so gaps stand out in series tables.
pub fn colorize_points(value: u64, text: &str) -> String {
    if value == 0 {
        format!("{GREY}{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}
