//! XML-file source adapter
//!
//! Each child element of the document root yields one record from its
//! attributes. Attribute values are validated as they are read, so a
//! malformed field fails the whole extraction instead of leaking untyped
//! values downstream.

use crate::batch::{Batch, Record, SourceTag};
use crate::error::ExtractionError;
use crate::etl::Extractor;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extractor for local XML documents
///
/// Expects a document shaped like
/// `<data><record identifier="1" date="2024-07-01" quantity="10" price="9.99"/>...</data>`;
/// children are read in document order and every record is tagged `xml`.
pub struct XmlExtractor {
    path: PathBuf,
}

impl XmlExtractor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_records(&self) -> Result<Vec<Record>, ExtractionError> {
        let resource = self.path.display().to_string();

        let content = std::fs::read_to_string(&self.path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => ExtractionError::NotFound {
                resource: resource.clone(),
            },
            _ => ExtractionError::Transport {
                resource: resource.clone(),
                message: error.to_string(),
            },
        })?;

        let mut reader = Reader::from_str(&content);
        let mut records = Vec::new();
        let mut depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) => {
                    depth += 1;
                    if depth == 2 {
                        records.push(record_from_element(&resource, records.len(), &element)?);
                    }
                }
                Ok(Event::Empty(element)) => {
                    if depth == 1 {
                        records.push(record_from_element(&resource, records.len(), &element)?);
                    }
                }
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(error) => {
                    return Err(ExtractionError::MalformedPayload {
                        resource,
                        message: error.to_string(),
                    });
                }
            }
        }

        Ok(records)
    }
}

impl Extractor for XmlExtractor {
    async fn extract(&self) -> Result<Batch, ExtractionError> {
        log::debug!("Parsing XML document {}", self.path.display());

        let records = self.read_records()?;

        log::info!(
            "Extracted {} record(s) from {}",
            records.len(),
            self.path.display()
        );

        Ok(Batch::new(SourceTag::Xml, records))
    }
}

/// Validated record constructor over one element's attributes
fn record_from_element(
    resource: &str,
    index: usize,
    element: &BytesStart<'_>,
) -> Result<Record, ExtractionError> {
    let malformed = |message: String| ExtractionError::MalformedPayload {
        resource: resource.to_string(),
        message,
    };

    let mut attributes = HashMap::new();
    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|error| malformed(format!("record {index}: {error}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|error| malformed(format!("record {index}: {key}: {error}")))?
            .into_owned();
        attributes.insert(key, value);
    }

    let identifier = attributes
        .get("identifier")
        .ok_or_else(|| malformed(format!("record {index}: missing 'identifier' attribute")))?
        .parse::<i64>()
        .map_err(|error| malformed(format!("record {index}: identifier: {error}")))?;

    let date = attributes
        .get("date")
        .ok_or_else(|| malformed(format!("record {index}: missing 'date' attribute")))?
        .clone();

    let quantity = match attributes.get("quantity").filter(|v| !v.is_empty()) {
        Some(value) => Some(
            value
                .parse::<i64>()
                .map_err(|error| malformed(format!("record {index}: quantity: {error}")))?,
        ),
        None => None,
    };

    let price = match attributes.get("price").filter(|v| !v.is_empty()) {
        Some(value) => Some(
            value
                .parse::<f64>()
                .map_err(|error| malformed(format!("record {index}: price: {error}")))?,
        ),
        None => None,
    };

    Ok(Record {
        identifier,
        date,
        quantity,
        price,
        total: None,
    })
}
