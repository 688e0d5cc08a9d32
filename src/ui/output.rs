use crate::error::{DepackError, UserFriendlyError};
use crate::unpack::report::RunReport;
use console::{style, Emoji, Term};
use serde_json;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static PACKAGE: Emoji = Emoji("📦 ", "* ");

enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    /// One line per resolved artifact, shown whenever the run is not quiet.
    pub fn print_resolved(&self, file_name: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}Resolved: {}", PACKAGE, style(file_name).cyan());
                    } else {
                        println!("Resolved: {}", file_name);
                    }
                }
                OutputMode::Json => self.print_json_message("resolved", file_name),
                OutputMode::Plain => println!("Resolved: {}", file_name),
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &DepackError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    println!();
                    if self.use_colors {
                        println!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Summary and reporting
    pub fn print_run_summary(&self, report: &RunReport) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Json => self.print_json_summary(report),
            OutputMode::Plain => self.print_plain_summary(report),
        }
    }

    pub fn print_run_report(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            // The human/plain summary was already printed at the end of the
            // run; nothing more to add here.
            OutputMode::Human | OutputMode::Plain => {}
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {} // No separator in JSON mode
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, report: &RunReport) {
        println!();
        self.print_separator();

        if self.use_colors {
            println!(
                "{} {}",
                style("Dependency unpack completed!").green().bold(),
                CHECKMARK
            );
        } else {
            println!("✓ Dependency unpack completed!");
        }

        println!();
        println!(
            "  Items processed: {}",
            self.styled_count(report.total())
        );
        println!("  Extracted:       {}", self.styled_count(report.extracted));
        println!("  Up to date:      {}", self.styled_count(report.up_to_date));
        if report.skipped > 0 {
            println!("  Skipped:         {}", self.styled_count(report.skipped));
        }
        println!("  Time taken:      {:.2?}", report.duration);
        println!();
    }

    fn print_json_summary(&self, report: &RunReport) {
        self.print_json_object(&serde_json::json!({
            "type": "summary",
            "items_processed": report.total(),
            "extracted": report.extracted,
            "up_to_date": report.up_to_date,
            "skipped": report.skipped,
            "duration_ms": report.duration.as_millis(),
        }));
    }

    fn print_plain_summary(&self, report: &RunReport) {
        println!("COMPLETED: {} items processed", report.total());
        println!("  extracted: {}", report.extracted);
        println!("  up to date: {}", report.up_to_date);
        println!("  skipped: {}", report.skipped);
    }

    fn styled_count(&self, count: usize) -> String {
        if self.use_colors {
            style(count).cyan().bold().to_string()
        } else {
            count.to_string()
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpack::report::{ItemReport, RunReport};
    use crate::unpack::Outcome;
    use std::time::Duration;

    fn report() -> RunReport {
        RunReport::new(
            vec![
                ItemReport {
                    coordinate: "org.example:lib:jar:1.0".to_string(),
                    outcome: Outcome::Extracted,
                    archive: "/repo/lib-1.0.jar".to_string(),
                    destination: "/out".to_string(),
                },
                ItemReport {
                    coordinate: "org.example:other:jar:2.0".to_string(),
                    outcome: Outcome::SkippedUpToDate,
                    archive: "/repo/other-2.0.jar".to_string(),
                    destination: "/out".to_string(),
                },
            ],
            Duration::from_millis(10),
        )
    }

    #[test]
    fn test_output_mode_parsing() {
        assert_eq!(OutputMode::from_string("json"), OutputMode::Json);
        assert_eq!(OutputMode::from_string("PLAIN"), OutputMode::Plain);
        assert_eq!(OutputMode::from_string("anything"), OutputMode::Human);
    }

    #[test]
    fn test_formatter_construction() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 2, false);
        assert_eq!(formatter.mode(), OutputMode::Plain);
        assert!(!formatter.is_quiet());

        let quiet = OutputFormatter::new(OutputMode::Human, 3, true);
        assert!(quiet.is_quiet());
        assert_eq!(quiet.verbose_level, 0);
    }

    #[test]
    fn test_quiet_suppresses_colors() {
        let formatter = OutputFormatter::new(OutputMode::Human, 0, true);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_summary_does_not_panic_in_any_mode() {
        for mode in [OutputMode::Human, OutputMode::Json, OutputMode::Plain] {
            let formatter = OutputFormatter::new(mode, 0, false);
            formatter.print_run_summary(&report());
            formatter.print_run_report(&report());
        }
    }
}
