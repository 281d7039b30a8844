use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use rust_htslib::bam::record::Aux;
use rust_htslib::{bam, bam::Read};
use std::path::Path;

use crate::errors::TagError;
use crate::name::{join_fields, split_name, trim_last};
use crate::resolver::resolve;
use crate::whitelist::Whitelist;

const BATCH_SIZE: usize = 10_000;

/// Which fields of the delimited record name hold identity information.
///
/// Indices are 0-based. All three values are required; there are no
/// defaults, because a wrong guess here silently mislabels every record.
#[derive(Debug, Clone, Copy)]
pub struct TagConfig {
    pub delimiter: char,
    pub cbc_field: usize,
    pub umi_field: usize,
}

/// Per-record resolution output: the three tag values plus the record name
/// with its trailing sequence field removed.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedTags {
    pub canonical: String,
    pub umi: String,
    pub observed: String,
    pub trimmed_name: String,
}

/// Decompose one record name and resolve its cell barcode.
///
/// Splits `name` on the configured delimiter, resolves the barcode field
/// against the whitelist, and rebuilds the name without its final field
/// (rejoined with `:`, trailing delimiter kept). A field index past the end
/// of the split is a configuration error, reported distinctly from a
/// malformed record: it means the supplied indices do not match the
/// identifier format at all.
pub fn tag_name(
    name: &str,
    config: &TagConfig,
    whitelist: &Whitelist,
) -> Result<ResolvedTags, TagError> {
    let fields = split_name(name, config.delimiter);

    for (which, index) in [
        ("cell barcode", config.cbc_field),
        ("UMI", config.umi_field),
    ] {
        if index >= fields.len() {
            return Err(TagError::FieldIndexOutOfRange {
                which,
                index,
                available: fields.len(),
                name: name.to_string(),
            });
        }
    }

    let observed = fields[config.cbc_field].clone();
    let umi = fields[config.umi_field].clone();
    let canonical = resolve(&observed, whitelist).to_string();
    let trimmed_name = join_fields(&trim_last(fields, name)?, ":");

    Ok(ResolvedTags {
        canonical,
        umi,
        observed,
        trimmed_name,
    })
}

fn resolve_record(
    rec: &bam::Record,
    config: &TagConfig,
    whitelist: &Whitelist,
) -> Result<ResolvedTags, TagError> {
    let name = std::str::from_utf8(rec.qname()).map_err(|_| TagError::MalformedRecord {
        name: String::from_utf8_lossy(rec.qname()).into_owned(),
        reason: "record name is not valid UTF-8".to_string(),
    })?;
    tag_name(name, config, whitelist)
}

/// Process a batch of records: parallel barcode resolution, then serial
/// in-order tagging and writing.
///
/// The resolver and parser are pure, so the batch is resolved with Rayon
/// against the shared read-only whitelist; writes stay serial to preserve
/// input record order. Returns the number of records written.
fn process_batch(
    batch: Vec<bam::Record>,
    writer: &mut bam::Writer,
    config: &TagConfig,
    whitelist: &Whitelist,
) -> Result<usize> {
    if batch.is_empty() {
        return Ok(0);
    }

    // 1. Parallel compute
    let results: Vec<Result<ResolvedTags, TagError>> = batch
        .par_iter()
        .map(|rec| resolve_record(rec, config, whitelist))
        .collect();

    // 2. Serial write
    let written = batch.len();
    for (mut rec, result) in batch.into_iter().zip(results) {
        let tags = result?;
        rec.push_aux(b"CN", Aux::String(&tags.canonical))
            .context("Failed to append CN tag")?;
        rec.push_aux(b"BX", Aux::String(&tags.umi))
            .context("Failed to append BX tag")?;
        rec.push_aux(b"CB", Aux::String(&tags.observed))
            .context("Failed to append CB tag")?;
        writer.write(&rec).context("Failed to write BAM record")?;
    }
    Ok(written)
}

/// Stream a BAM/SAM file, tagging every record with the resolved canonical
/// name (`CN`), UMI (`BX`), and observed barcode (`CB`).
///
/// The input header passes through to the output unmodified, records keep
/// their input order, and nothing else about a record changes. Returns the
/// total number of records written.
pub fn process_bam(
    input: &Path,
    output: &Path,
    config: &TagConfig,
    whitelist: &Whitelist,
) -> Result<u64> {
    let mut reader = bam::Reader::from_path(input).context("Failed to open BAM file")?;

    // Read header immediately to set up the output writer
    let header = bam::Header::from_template(reader.header());
    let mut writer = bam::Writer::from_path(output, &header, bam::Format::Bam)
        .context("Failed to create BAM writer")?;

    let mut total: u64 = 0;
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    for result in reader.records() {
        let rec = result?;
        batch.push(rec);

        if batch.len() >= BATCH_SIZE {
            total += process_batch(batch, &mut writer, config, whitelist)? as u64;
            batch = Vec::with_capacity(BATCH_SIZE);
        }
    }

    // Final flush
    total += process_batch(batch, &mut writer, config, whitelist)? as u64;

    info!("Tagged {} records from {}", total, input.display());
    Ok(total)
}
