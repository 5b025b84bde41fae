use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::core::{ImportError, InvoiceSummary};

use super::transport::{BatchItem, BatchResponse, TransportOutcome};

/// Outcome of importing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItemOutcome {
    pub file_name: String,
    pub result: ItemResult,
}

/// Either the stored invoice or the reason the file was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemResult {
    Imported(InvoiceSummary),
    Failed(String),
}

impl ImportItemOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.result, ItemResult::Imported(_))
    }

    pub fn invoice(&self) -> Option<&InvoiceSummary> {
        match &self.result {
            ItemResult::Imported(inv) => Some(inv),
            ItemResult::Failed(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            ItemResult::Imported(_) => None,
            ItemResult::Failed(msg) => Some(msg),
        }
    }
}

impl Serialize for ImportItemOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ImportItemOutcome", 3)?;
        s.serialize_field("fileName", &self.file_name)?;
        s.serialize_field("succeeded", &self.succeeded())?;
        match &self.result {
            ItemResult::Imported(inv) => s.serialize_field("invoice", inv)?,
            ItemResult::Failed(msg) => s.serialize_field("errorMessage", msg)?,
        }
        s.end()
    }
}

/// Aggregate result of one import submission.
///
/// Only [`reconcile`] builds these, so `succeeded + failed == total == items.len()`
/// always holds.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatchResult {
    total_files: usize,
    succeeded_count: usize,
    failed_count: usize,
    items: Vec<ImportItemOutcome>,
}

impl ImportBatchResult {
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Per-file outcomes in submission order.
    pub fn items(&self) -> &[ImportItemOutcome] {
        &self.items
    }

    /// Invoices that were stored, in submission order.
    pub fn imported_invoices(&self) -> impl Iterator<Item = &InvoiceSummary> {
        self.items.iter().filter_map(ImportItemOutcome::invoice)
    }
}

/// Merge a transport outcome into the uniform aggregate shape.
///
/// A single-file outcome is always a success (failures arrive as transport
/// errors). A batch outcome passes through unchanged after its invariants are
/// checked; any violation is a [`ImportError::MalformedResponse`].
pub fn reconcile(
    outcome: TransportOutcome,
    requested_file_count: usize,
) -> Result<ImportBatchResult, ImportError> {
    match outcome {
        TransportOutcome::Single { file_name, invoice } => {
            if requested_file_count != 1 {
                return Err(malformed(format!(
                    "single-file response for {requested_file_count} requested files"
                )));
            }
            Ok(ImportBatchResult {
                total_files: 1,
                succeeded_count: 1,
                failed_count: 0,
                items: vec![ImportItemOutcome {
                    file_name,
                    result: ItemResult::Imported(invoice),
                }],
            })
        }
        TransportOutcome::Batch(response) => reconcile_batch(response, requested_file_count),
    }
}

/// [`reconcile`], then check that the items answer the submitted files in
/// submission order.
///
/// A reordered, renamed or unnamed item is a [`ImportError::MalformedResponse`].
pub fn reconcile_for(
    outcome: TransportOutcome,
    submitted_names: &[&str],
) -> Result<ImportBatchResult, ImportError> {
    let result = reconcile(outcome, submitted_names.len())?;
    for (idx, (item, expected)) in result.items.iter().zip(submitted_names).enumerate() {
        if item.file_name != *expected {
            return Err(malformed(format!(
                "results[{idx}] is '{}' but '{expected}' was submitted at that position",
                item.file_name
            )));
        }
    }
    Ok(result)
}

fn reconcile_batch(
    response: BatchResponse,
    requested_file_count: usize,
) -> Result<ImportBatchResult, ImportError> {
    let BatchResponse {
        total,
        succeeded,
        failed,
        results,
    } = response;

    if total != requested_file_count {
        return Err(malformed(format!(
            "total {total} does not match {requested_file_count} submitted files"
        )));
    }
    if succeeded.checked_add(failed) != Some(total) {
        return Err(malformed(format!(
            "succeeded {succeeded} + failed {failed} != total {total}"
        )));
    }
    if results.len() != total {
        return Err(malformed(format!(
            "{} results for {total} files",
            results.len()
        )));
    }

    let items = results
        .into_iter()
        .enumerate()
        .map(|(idx, item)| to_outcome(idx, item))
        .collect::<Result<Vec<_>, _>>()?;

    let actual_succeeded = items.iter().filter(|i| i.succeeded()).count();
    if actual_succeeded != succeeded {
        return Err(malformed(format!(
            "succeeded count {succeeded} but {actual_succeeded} items succeeded"
        )));
    }

    Ok(ImportBatchResult {
        total_files: total,
        succeeded_count: succeeded,
        failed_count: failed,
        items,
    })
}

fn to_outcome(idx: usize, item: BatchItem) -> Result<ImportItemOutcome, ImportError> {
    let result = match (item.succeeded, item.invoice, item.error) {
        (true, Some(invoice), None) => ItemResult::Imported(invoice),
        (false, None, Some(error)) => ItemResult::Failed(error),
        (succeeded, invoice, error) => {
            return Err(malformed(format!(
                "results[{idx}] ('{}'): succeeded={succeeded} with invoice {} and error {}",
                item.file_name,
                if invoice.is_some() { "present" } else { "absent" },
                if error.is_some() { "present" } else { "absent" },
            )));
        }
    };
    Ok(ImportItemOutcome {
        file_name: item.file_name,
        result,
    })
}

fn malformed(message: String) -> ImportError {
    tracing::error!(%message, "audit service response violates result invariants");
    ImportError::MalformedResponse(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_item(name: &str) -> BatchItem {
        BatchItem {
            file_name: name.into(),
            succeeded: true,
            invoice: Some(InvoiceSummary::default()),
            error: None,
        }
    }

    fn failed_item(name: &str) -> BatchItem {
        BatchItem {
            file_name: name.into(),
            succeeded: false,
            invoice: None,
            error: Some("Layout de XML desconhecido".into()),
        }
    }

    fn batch(results: Vec<BatchItem>) -> BatchResponse {
        let succeeded = results.iter().filter(|r| r.succeeded).count();
        BatchResponse {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    #[test]
    fn names_must_follow_submission_order() {
        let resp = batch(vec![ok_item("b.xml"), ok_item("zzz.xml")]);
        let err = reconcile_for(TransportOutcome::Batch(resp), &["a.xml", "b.xml"]).unwrap_err();
        assert!(matches!(err, ImportError::MalformedResponse(_)));

        let resp = batch(vec![ok_item("b.xml"), failed_item("a.xml")]);
        assert!(reconcile_for(TransportOutcome::Batch(resp), &["a.xml", "b.xml"]).is_err());

        let resp = batch(vec![ok_item("a.xml"), failed_item("")]);
        assert!(reconcile_for(TransportOutcome::Batch(resp), &["a.xml", "b.xml"]).is_err());

        let resp = batch(vec![ok_item("a.xml"), failed_item("b.xml")]);
        let result = reconcile_for(TransportOutcome::Batch(resp), &["a.xml", "b.xml"]).unwrap();
        assert_eq!(result.failed_count(), 1);
    }

    #[test]
    fn single_success_is_wrapped() {
        let outcome = TransportOutcome::Single {
            file_name: "nota.xml".into(),
            invoice: InvoiceSummary::default(),
        };
        let result = reconcile(outcome, 1).unwrap();
        assert_eq!(result.total_files(), 1);
        assert_eq!(result.succeeded_count(), 1);
        assert_eq!(result.failed_count(), 0);
        assert_eq!(result.items()[0].file_name, "nota.xml");
    }

    #[test]
    fn single_for_many_files_is_malformed() {
        let outcome = TransportOutcome::Single {
            file_name: "nota.xml".into(),
            invoice: InvoiceSummary::default(),
        };
        assert!(matches!(reconcile(outcome, 2), Err(ImportError::MalformedResponse(_))));
    }

    #[test]
    fn batch_passes_through_in_order() {
        let resp = batch(vec![ok_item("a.xml"), failed_item("b.xml"), ok_item("c.xml")]);
        let result = reconcile(TransportOutcome::Batch(resp), 3).unwrap();
        assert_eq!(result.items().len(), 3);
        assert_eq!(result.succeeded_count(), 2);
        assert_eq!(result.failed_count(), 1);
        let names: Vec<_> = result.items().iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, ["a.xml", "b.xml", "c.xml"]);
        assert_eq!(result.items()[1].error_message(), Some("Layout de XML desconhecido"));
        assert_eq!(result.imported_invoices().count(), 2);
    }

    #[test]
    fn total_mismatch_is_malformed() {
        let resp = batch(vec![ok_item("a.xml"), ok_item("b.xml")]);
        assert!(matches!(
            reconcile(TransportOutcome::Batch(resp), 3),
            Err(ImportError::MalformedResponse(_))
        ));
    }

    #[test]
    fn counts_not_summing_is_malformed() {
        let mut resp = batch(vec![ok_item("a.xml"), failed_item("b.xml")]);
        resp.failed = 0;
        assert!(reconcile(TransportOutcome::Batch(resp), 2).is_err());
    }

    #[test]
    fn counts_disagreeing_with_items_is_malformed() {
        let mut resp = batch(vec![ok_item("a.xml"), failed_item("b.xml")]);
        resp.succeeded = 0;
        resp.failed = 2;
        assert!(reconcile(TransportOutcome::Batch(resp), 2).is_err());
    }

    #[test]
    fn success_without_invoice_is_malformed() {
        let mut item = ok_item("a.xml");
        item.invoice = None;
        let err = reconcile(TransportOutcome::Batch(batch(vec![item])), 1).unwrap_err();
        assert!(err.to_string().contains("results[0]"));
    }

    #[test]
    fn failure_with_both_fields_is_malformed() {
        let mut item = failed_item("a.xml");
        item.invoice = Some(InvoiceSummary::default());
        assert!(reconcile(TransportOutcome::Batch(batch(vec![item])), 1).is_err());
    }

    #[test]
    fn serializes_to_ui_shape() {
        let resp = batch(vec![ok_item("a.xml"), failed_item("b.xml")]);
        let result = reconcile(TransportOutcome::Batch(resp), 2).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalFiles"], 2);
        assert_eq!(json["items"][0]["succeeded"], true);
        assert!(json["items"][0].get("errorMessage").is_none());
        assert_eq!(json["items"][1]["errorMessage"], "Layout de XML desconhecido");
        assert!(json["items"][1].get("invoice").is_none());
    }
}
