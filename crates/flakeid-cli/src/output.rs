use std::io::Write;

use flakeid::SnowflakeId;
use serde::Serialize;

use crate::config::OutputFormat;

/// Every field packed into an ID, as printed by `--format json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdRecord {
    pub id: SnowflakeId,
    pub timestamp: u64,
    pub unix_millis: u64,
    pub datacenter_id: u64,
    pub worker_id: u64,
    pub sequence: u64,
}

impl From<SnowflakeId> for IdRecord {
    fn from(id: SnowflakeId) -> Self {
        Self {
            id,
            timestamp: id.timestamp(),
            unix_millis: id.unix_millis(),
            datacenter_id: id.datacenter_id(),
            worker_id: id.worker_id(),
            sequence: id.sequence(),
        }
    }
}

/// Writes a freshly generated ID.
pub fn write_generated(
    out: &mut impl Write,
    id: SnowflakeId,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{id}")?,
        OutputFormat::Json => write_json(out, id)?,
    }
    Ok(())
}

/// Writes the fields of an ID being decoded.
pub fn write_decoded(
    out: &mut impl Write,
    id: SnowflakeId,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let record = IdRecord::from(id);
            writeln!(
                out,
                "{} timestamp={} unix_millis={} datacenter_id={} worker_id={} sequence={}",
                record.id,
                record.timestamp,
                record.unix_millis,
                record.datacenter_id,
                record.worker_id,
                record.sequence
            )?;
        }
        OutputFormat::Json => write_json(out, id)?,
    }
    Ok(())
}

fn write_json(out: &mut impl Write, id: SnowflakeId) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, &IdRecord::from(id))?;
    writeln!(out)?;
    Ok(())
}
