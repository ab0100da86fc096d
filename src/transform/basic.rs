//! Basic normalization/enrichment transformer

use crate::batch::{Batch, Record};
use crate::error::TransformError;
use crate::etl::Transformer;

use std::collections::HashSet;

/// The reference transform policy, applied in order:
///
/// 1. stable deduplication — records field-for-field identical to an earlier
///    record are dropped, first occurrence kept, order otherwise untouched;
/// 2. forward-fill — a missing `quantity`/`price` takes the value of the
///    nearest earlier record that has one;
/// 3. derived column — `total = quantity * price` from the (possibly filled)
///    fields, as a floating-point product.
///
/// A field missing from every record of a non-empty batch fails with
/// [`TransformError::MissingRequiredField`]; a leading record with no
/// earlier donor fails with [`TransformError::FillDonorUnavailable`] rather
/// than passing the hole through.
///
/// # Example
/// ```
/// use tabular_etl::etl::Transformer;
/// use tabular_etl::transform::BasicTransformer;
/// use tabular_etl::{Batch, Record, SourceTag};
///
/// let batch = Batch::new(
///     SourceTag::File,
///     vec![
///         Record::new(1, "2024-07-01").with_quantity(10).with_price(9.99),
///         Record::new(2, "2024-07-02").with_price(9.99),
///     ],
/// );
///
/// let output = BasicTransformer::new().transform(batch).unwrap();
/// // The second record inherited quantity 10 from the first
/// assert_eq!(output.records()[1].total, Some(10.0 * 9.99));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicTransformer;

impl BasicTransformer {
    pub fn new() -> Self {
        Self
    }

    fn deduplicate(records: &[Record]) -> Vec<Record> {
        // f64 fields enter the key by bit pattern: identity, not numeric equality
        let mut seen: HashSet<(i64, String, Option<i64>, Option<u64>, Option<u64>)> =
            HashSet::new();

        records
            .iter()
            .filter(|record| {
                seen.insert((
                    record.identifier,
                    record.date.clone(),
                    record.quantity,
                    record.price.map(f64::to_bits),
                    record.total.map(f64::to_bits),
                ))
            })
            .cloned()
            .collect()
    }

    fn check_field_present_somewhere(
        records: &[Record],
        field: &'static str,
        has_field: impl Fn(&Record) -> bool,
    ) -> Result<(), TransformError> {
        match records.iter().any(has_field) {
            true => Ok(()),
            false => Err(TransformError::MissingRequiredField { field }),
        }
    }

    fn fill_and_total(records: Vec<Record>) -> Result<Vec<Record>, TransformError> {
        let mut last_quantity = None;
        let mut last_price = None;

        records
            .into_iter()
            .enumerate()
            .map(|(index, mut record)| {
                let quantity = record.quantity.or(last_quantity).ok_or(
                    TransformError::FillDonorUnavailable {
                        field: "quantity",
                        index,
                    },
                )?;
                let price = record.price.or(last_price).ok_or(
                    TransformError::FillDonorUnavailable {
                        field: "price",
                        index,
                    },
                )?;

                last_quantity = Some(quantity);
                last_price = Some(price);

                record.quantity = Some(quantity);
                record.price = Some(price);
                record.total = Some(quantity as f64 * price);
                Ok(record)
            })
            .collect()
    }
}

impl Transformer for BasicTransformer {
    fn transform(&self, batch: Batch) -> Result<Batch, TransformError> {
        if batch.is_empty() {
            return Ok(batch);
        }

        let deduplicated = Self::deduplicate(batch.records());
        if deduplicated.len() < batch.len() {
            log::debug!(
                "Dropped {} duplicate record(s)",
                batch.len() - deduplicated.len()
            );
        }

        Self::check_field_present_somewhere(&deduplicated, "quantity", |record| {
            record.quantity.is_some()
        })?;
        Self::check_field_present_somewhere(&deduplicated, "price", |record| {
            record.price.is_some()
        })?;

        let records = Self::fill_and_total(deduplicated)?;

        Ok(batch.with_records(records))
    }
}
