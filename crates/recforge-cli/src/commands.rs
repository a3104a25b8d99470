//! Subcommand implementations

use anyhow::{Context, Result};
use recforge_build::{BuildSpec, FieldSet, RecordBuilder, RecordSet};
use recforge_cache::ObjectCache;
use recforge_model::{Datum, Partition, ResultRecord};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Options for `recforge build`
#[derive(Debug, Clone)]
pub(crate) struct BuildArgs {
    pub(crate) spec: PathBuf,
    pub(crate) input: PathBuf,
    pub(crate) output: Option<PathBuf>,
    pub(crate) pretty: bool,
    /// String standing for an undefined value in the input
    pub(crate) undefined: Option<String>,
}

#[derive(Debug, Serialize)]
struct BuildOutput<'a> {
    records: &'a [ResultRecord],
    vals: Option<&'a Partition>,
}

/// Build records from a spec file and a JSON field file
pub(crate) fn build(args: &BuildArgs) -> Result<()> {
    let spec = BuildSpec::from_path(&args.spec)
        .with_context(|| format!("loading spec {}", args.spec.display()))?;
    let fields = read_fields(&args.input, args.undefined.as_deref())?;

    let builder = RecordBuilder::new(spec).context("preparing record builder")?;
    let records = builder
        .build(&fields)
        .with_context(|| format!("building records from {}", args.input.display()))?;
    tracing::info!(records = records.len(), "built result records");

    let rendered = render(&records, args.pretty)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered + "\n")
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Read a JSON object of fields
///
/// JSON has no undefined value; `null` stays a null. Strings equal to
/// `undefined` are read as undefined, at any depth.
fn read_fields(path: &Path, undefined: Option<&str>) -> Result<FieldSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let object: serde_json::Map<String, Value> = serde_json::from_str(&text)
        .with_context(|| format!("parsing fields from {}", path.display()))?;
    Ok(object
        .into_iter()
        .map(|(name, value)| (name, to_datum(value, undefined)))
        .collect())
}

fn to_datum(value: Value, undefined: Option<&str>) -> Datum {
    match value {
        Value::String(s) if Some(s.as_str()) == undefined => Datum::Undefined,
        Value::Array(items) => Datum::Seq(
            items
                .into_iter()
                .map(|item| to_datum(item, undefined))
                .collect(),
        ),
        other => Datum::Value(other),
    }
}

fn render(records: &RecordSet, pretty: bool) -> Result<String> {
    let output = BuildOutput {
        records: &records.records,
        vals: records.vals(),
    };
    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(rendered)
}

/// Resolve the cache file for a category and optional identifier
pub(crate) fn cache_path(workdir: &Path, category: &str, identifier: Option<&str>) -> PathBuf {
    let cache = ObjectCache::new(workdir);
    let identifier = identifier.as_ref().map(|id| id as &dyn fmt::Display);
    let path = cache.path_for(category, identifier);
    tracing::debug!(exists = path.is_file(), path = %path.display(), "resolved cache path");
    path
}
