//! Tabular data model shared by every pipeline stage
//!
//! A [`Batch`] is the unit of work handed from extract to transform to load:
//! an ordered collection of [`Record`]s plus the two system columns, the
//! provenance [`SourceTag`] stamped by the extractor and the load timestamp
//! stamped by the sink. Batches are never mutated in place; each stage
//! consumes its input and builds a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Fixed provenance tag set, one literal per source adapter variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// Local delimited text file
    File,
    /// HTTP JSON endpoint
    Api,
    /// Local XML document
    Xml,
    /// Relational query
    Sql,
}

impl SourceTag {
    /// The literal written to the `source` column
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::File => "file",
            SourceTag::Api => "api",
            SourceTag::Xml => "xml",
            SourceTag::Sql => "sql",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of domain data
///
/// `identifier` and `date` are always present; `quantity` and `price` may be
/// missing and stay `None` until the transform forward-fills them. `total`
/// only exists on transformed records.
///
/// # Example
/// ```
/// use tabular_etl::Record;
///
/// let record = Record::new(1, "2024-07-01").with_quantity(10).with_price(9.99);
/// assert_eq!(record.quantity, Some(10));
/// assert!(record.total.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub identifier: i64,
    pub date: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

impl Record {
    /// Create a record with the two required fields; quantity and price start missing
    pub fn new(identifier: i64, date: impl Into<String>) -> Self {
        Self {
            identifier,
            date: date.into(),
            quantity: None,
            price: None,
            total: None,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// An ordered, homogeneous batch of records with its system columns
///
/// The extractor fixes `source` at construction; the sink assigns `loaded_at`
/// exactly once, at the moment `load` begins. Everything else about a batch
/// is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    source: SourceTag,
    records: Vec<Record>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Batch {
    /// Create a batch of freshly extracted records tagged with their provenance
    pub fn new(source: SourceTag, records: Vec<Record>) -> Self {
        Self {
            source,
            records,
            loaded_at: None,
        }
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load time, present only after a sink has stamped the batch
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Build a new batch with the same provenance but different rows
    ///
    /// This is how transformers construct their output without touching the
    /// input's system columns.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            source: self.source,
            records,
            loaded_at: self.loaded_at,
        }
    }

    /// Stamp the load time; a timestamp already assigned is never overwritten
    pub fn stamped(mut self, loaded_at: DateTime<Utc>) -> Self {
        if self.loaded_at.is_none() {
            self.loaded_at = Some(loaded_at);
        }
        self
    }

    /// Render the batch as NDJSON, one flat object per record, including the
    /// ambient `source` and (once stamped) `timestamp` fields
    ///
    /// Intended for interchange and debugging, not persistence.
    ///
    /// # Example
    /// ```
    /// use tabular_etl::{Batch, Record, SourceTag};
    ///
    /// let batch = Batch::new(SourceTag::File, vec![Record::new(1, "2024-07-01")]);
    /// let ndjson = batch.to_ndjson().unwrap();
    /// assert!(ndjson.contains(r#""source":"file""#));
    /// ```
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let lines = self
            .records
            .iter()
            .map(|record| {
                let mut value = serde_json::to_value(record)?;
                if let Some(object) = value.as_object_mut() {
                    object.insert("source".to_string(), json!(self.source.as_str()));
                    if let Some(loaded_at) = self.loaded_at {
                        object.insert("timestamp".to_string(), json!(loaded_at.to_rfc3339()));
                    }
                }
                serde_json::to_string(&value)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match lines.is_empty() {
            true => String::new(),
            false => format!("{}\n", lines.join("\n")),
        })
    }
}
