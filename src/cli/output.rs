//! CLI output formatting utilities.

use console::style;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a citation with an optional link.
    pub fn source(text: &str, link: Option<&str>) {
        match link {
            Some(link) => println!(
                "  {} {} ({})",
                style("*").green(),
                style(text).bold(),
                style(link).dim()
            ),
            None => println!("  {} {}", style("*").green(), style(text).bold()),
        }
    }
}
