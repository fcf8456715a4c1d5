//! Terminal output with colored module prefixes. The [`log!`] macro prints
//! `[module] message` lines, coloring the prefix so build phases stand out
//! from surrounding shell noise.

use colored::{ColoredString, Colorize};

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Prints `message` behind a colored `[module]` prefix.
pub fn log(module: &str, message: &str) {
    println!("{} {}", colorize_prefix(module), message);
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{}]", module);
    match module {
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}
