//! Batch driver: fetch, extract, collapse and emit, one device at a time.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::{debug, warn};

use crate::context::RunContext;
use crate::error::{DeviceError, ExtractError};
use crate::extract::extract;
use crate::model::Equipment;
use crate::output::{collapse, emit};
use crate::record::Record;
use crate::source::{ConfigSource, RawDevice};
use crate::summary::{BatchSummary, DeviceOutcome, OutcomeStatus};

/// Turn one fetched device into a record tagged with its producer.
pub fn extract_record(device: &RawDevice) -> Result<Record, ExtractError> {
    let (router, extractor) = extract(&device.config, device.chassis.as_ref())?;
    debug!(
        source = %device.label,
        device = router.name(),
        extractor = extractor.name(),
        interfaces = router.interfaces().len(),
        bgp_peerings = router.bgp_peerings().len(),
        "extracted router"
    );
    Ok(Record::new(&Equipment::Router(router), extractor.producer()))
}

/// Process every source; a failing device never stops the others.
pub fn run_batch<W: Write>(
    sources: &[Box<dyn ConfigSource>],
    ctx: &RunContext,
    stdout: &mut W,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let mut records = Vec::new();
    let mut labels: BTreeMap<String, String> = BTreeMap::new();

    for source in sources {
        let label = source.label();
        let result = source
            .fetch(ctx)
            .map_err(DeviceError::from)
            .and_then(|device| extract_record(&device).map_err(DeviceError::from));

        match result {
            Ok(record) => {
                if let Some(previous) = labels.insert(record.name().to_string(), label) {
                    summary.push(
                        DeviceOutcome::new(previous, OutcomeStatus::Superseded)
                            .device(record.name()),
                    );
                }
                records.push(record);
            }
            Err(DeviceError::Extract(ExtractError::UnsupportedVendor)) => {
                warn!(source = %label, "skipping device: no extractor recognises it");
                summary.push(
                    DeviceOutcome::new(label, OutcomeStatus::Skipped)
                        .error(&ExtractError::UnsupportedVendor),
                );
            }
            Err(err) => {
                warn!(source = %label, error = %err, "device failed");
                summary.push(DeviceOutcome::new(label, OutcomeStatus::Failed).error(&err));
            }
        }
    }

    let records = collapse(records);
    for (record, result) in records.iter().zip(emit(&records, ctx, stdout)) {
        let label = labels
            .get(record.name())
            .cloned()
            .unwrap_or_else(|| record.name().to_string());
        let outcome = match result {
            Ok(emitted) => {
                let status = if emitted.path.is_some() {
                    OutcomeStatus::Written
                } else {
                    OutcomeStatus::Printed
                };
                DeviceOutcome::new(label, status)
                    .device(&emitted.device)
                    .path(emitted.path)
            }
            Err(err) => {
                warn!(source = %label, error = %err, "device failed");
                DeviceOutcome::new(label, OutcomeStatus::Failed)
                    .device(record.name())
                    .error(&err)
            }
        };
        summary.push(outcome);
    }

    summary
}
