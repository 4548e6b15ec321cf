//! Surface lists and batch counts as polars tables.

use anyhow::{bail, Context, Result};
use normalsurf::prelude::*;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// One row per surface. Queries that do not apply (spun surfaces, oversized
/// walks) are null.
pub fn surfaces_frame(list: &NormalSurfaces) -> Result<DataFrame> {
    let mut index = Vec::with_capacity(list.len());
    let mut euler = Vec::with_capacity(list.len());
    let mut orientable = Vec::with_capacity(list.len());
    let mut two_sided = Vec::with_capacity(list.len());
    let mut compact = Vec::with_capacity(list.len());
    let mut connected = Vec::with_capacity(list.len());
    let mut vertex_link = Vec::with_capacity(list.len());
    let mut octagon = Vec::with_capacity(list.len());
    let mut vector = Vec::with_capacity(list.len());
    for (i, s) in list.iter().enumerate() {
        index.push(i as u32);
        euler.push(s.euler_char().ok().map(|x| x.to_string()));
        orientable.push(s.is_orientable().ok());
        two_sided.push(s.is_two_sided().ok());
        compact.push(s.is_compact());
        connected.push(s.is_connected().ok());
        vertex_link.push(s.is_vertex_linking());
        octagon.push(s.oct_position().is_some());
        vector.push(s.to_string());
    }
    let df = df!(
        "index" => index,
        "euler" => euler,
        "orientable" => orientable,
        "two_sided" => two_sided,
        "compact" => compact,
        "connected" => connected,
        "vertex_link" => vertex_link,
        "octagon" => octagon,
        "vector" => vector,
    )?;
    Ok(df)
}

/// Per-triangulation outcome of a batch run.
pub struct BatchRow {
    pub sig: String,
    pub tetrahedra: Option<u32>,
    pub surfaces: Option<u32>,
    pub complete: Option<bool>,
    pub error: Option<String>,
}

pub fn batch_frame(rows: &[BatchRow]) -> Result<DataFrame> {
    let df = df!(
        "sig" => rows.iter().map(|r| r.sig.clone()).collect::<Vec<_>>(),
        "tetrahedra" => rows.iter().map(|r| r.tetrahedra).collect::<Vec<_>>(),
        "surfaces" => rows.iter().map(|r| r.surfaces).collect::<Vec<_>>(),
        "complete" => rows.iter().map(|r| r.complete).collect::<Vec<_>>(),
        "error" => rows.iter().map(|r| r.error.clone()).collect::<Vec<_>>(),
    )?;
    Ok(df)
}

/// Write `df` as CSV or Parquet, chosen by the extension of `out`.
pub fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let ext = out.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !matches!(ext, "csv" | "parquet") {
        bail!("unsupported table extension {ext:?}; use .csv or .parquet");
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    if ext == "csv" {
        CsvWriter::new(&mut file).finish(df)?;
    } else {
        ParquetWriter::new(file).finish(df)?;
    }
    tracing::info!(rows = df.height(), out = %out.display(), "table written");
    Ok(())
}

/// Signatures from the `sig` column of a CSV file.
pub fn read_signatures(input: &Path) -> Result<Vec<String>> {
    let df = LazyCsvReader::new(input)
        .with_infer_schema_length(Some(100))
        .finish()?
        .select([col("sig").cast(DataType::String)])
        .collect()
        .with_context(|| format!("reading column sig from {}", input.display()))?;
    let sigs = df.column("sig")?.str()?.into_iter().flatten().map(str::to_string).collect();
    Ok(sigs)
}
