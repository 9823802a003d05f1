//! Terminal styling helpers

use console::style;
use std::path::Path;

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("✦ exohab").cyan().bold(),
        style("Exoplanet habitability pipeline").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print the run configuration
pub fn print_config(inputs: &[std::path::PathBuf], output: &Path) {
    println!();
    for input in inputs {
        println!("    {} {}", style("catalog:").dim(), input.display());
    }
    println!("    {} {}", style("output: ").dim(), output.display());
}

/// Print a step header
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", style("ℹ").cyan(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!(
        "    {} {}",
        style("!").yellow().bold(),
        style(message).yellow()
    );
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize) {
    println!(
        "      {} {}",
        style(count).yellow().bold(),
        description
    );
}

/// Print elapsed time for a step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!("    {}", style(format!("({:.2?})", elapsed)).dim());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        style("»").cyan(),
        style("Reference table ready.").green().bold()
    );
    println!();
}
