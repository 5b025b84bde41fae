use std::fmt;

use crate::core::format_brl;

use super::reconcile::{ImportBatchResult, ImportItemOutcome, ItemResult};

impl ImportBatchResult {
    /// Human-readable aggregate report: a summary line, then one line per file.
    pub fn report(&self) -> String {
        self.to_string()
    }

    /// The summary line on its own, e.g. `3 arquivo(s) processado(s): 2 importado(s), 1 com falha`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} arquivo(s) processado(s): {} importado(s), {} com falha",
            self.total_files(),
            self.succeeded_count(),
            self.failed_count()
        )
    }
}

impl fmt::Display for ImportBatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary_line())?;
        for item in self.items() {
            write!(f, "\n{item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ImportItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            ItemResult::Imported(invoice) => {
                write!(
                    f,
                    "[OK] {}: NFS-e {}",
                    self.file_name,
                    invoice.number.as_deref().unwrap_or("s/n")
                )?;
                if let Some(status) = &invoice.audit_status {
                    write!(f, ", {}", status.code())?;
                }
                write!(f, ", {}", format_brl(invoice.gross_value))
            }
            ItemResult::Failed(message) => write!(f, "[FALHA] {}: {message}", self.file_name),
        }
    }
}
