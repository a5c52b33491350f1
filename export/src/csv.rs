use std::sync::Arc;

use containers::{EpochFilter, SlotRecord};
use storage::{SlotStore, StoreError};
use tracing::debug;

pub const CONTENT_TYPE: &str = "text/csv";

pub const HEADER: [&str; 7] = [
    "Epoch",
    "Slot",
    "Graffiti",
    "Proposer",
    "Fee Recipient",
    "Exec Block Hash",
    "Exec Block Number",
];

/// Renders stored records as CSV.
///
/// Every field is double-quoted and embedded quotes are doubled. Commas and
/// line breaks inside a field are left as they are; the quoting already
/// delimits them.
pub struct CsvExporter<S: ?Sized> {
    store: Arc<S>,
}

impl<S: SlotStore + ?Sized> CsvExporter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn export(&self, filter: EpochFilter) -> Result<String, StoreError> {
        let records = self.store.query(filter).await?;
        debug!(filter = ?filter, records = records.len(), "Exporting slot records");
        Ok(render(&records))
    }
}

/// Header line followed by one line per record, each ending in `\n`.
pub fn render(records: &[SlotRecord]) -> String {
    let mut out = String::new();
    push_line(&mut out, HEADER.iter().copied());

    for record in records {
        let epoch = record.epoch.to_string();
        let slot = record.slot_number.to_string();
        let proposer = record.proposer.to_string();
        let block_number = record.exec_block_number.to_string();
        push_line(
            &mut out,
            [
                epoch.as_str(),
                slot.as_str(),
                record.graffiti.as_str(),
                proposer.as_str(),
                record.exec_fee_recipient.as_str(),
                record.exec_block_hash.as_str(),
                block_number.as_str(),
            ],
        );
    }

    out
}

fn push_line<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}

/// Splits one rendered line back into its fields.
///
/// Inverse of the quoting `render` applies. Returns `None` if the line is
/// not a sequence of quoted fields separated by commas.
pub fn parse_line(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        if chars.next()? != '"' {
            return None;
        }
        let mut field = String::new();
        loop {
            match chars.next()? {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => break,
                c => field.push(c),
            }
        }
        fields.push(field);

        match chars.next() {
            None => return Some(fields),
            Some(',') => continue,
            Some(_) => return None,
        }
    }
}
