//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;

use colored::Colorize;

use crate::domain::ClassLabel;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print `label: value` with a dimmed label
pub fn field(label: &str, value: &(impl Display + ?Sized)) {
    println!("  {}: {}", label.dimmed(), value);
}

/// Print one group line, coloured by class when known
pub fn group(name: &str, count: usize, class: Option<ClassLabel>) {
    let tag = match class {
        Some(ClassLabel::Typical) => "typical".green().to_string(),
        Some(ClassLabel::Special) => "special".yellow().to_string(),
        None => String::new(),
    };
    println!("  {:>6}  {}  {}", count, name, tag);
}

/// Print one instance line
pub fn instance(id: &str, definition: Option<&str>) {
    match definition {
        Some(name) => println!("{}  {}", id, name.cyan()),
        None => println!("{}  {}", id, "<unnamed>".dimmed()),
    }
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
