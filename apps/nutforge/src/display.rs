//! Final result rendering

use crate::error::CliError;
use nutforge_ops::OperationResult;

/// Renders the final operation result as text or JSON
pub struct OutputRenderer {
    json: bool,
}

impl OutputRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn render_result(&self, result: &OperationResult) -> Result<(), CliError> {
        if self.json {
            println!("{}", result.to_json()?);
            return Ok(());
        }

        match result {
            OperationResult::InstallReport(report) => {
                println!();
                println!(
                    "{} {} installed to {}",
                    report.package,
                    report.version,
                    report.prefix.display()
                );
                println!("  binary: {}", report.binary.display());
                println!("  files staged: {}", report.staged_files);
                if report.themes_seeded > 0 {
                    println!(
                        "  themes seeded: {} (into {})",
                        report.themes_seeded,
                        report.user_root.display()
                    );
                }
            }
            OperationResult::VerifyReport(report) => {
                println!();
                println!(
                    "verification passed: {} (exit code {})",
                    report.binary.display(),
                    report.exit_code
                );
            }
        }

        Ok(())
    }
}
