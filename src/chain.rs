//! Classifying candidate files and resolving their copy-on-write lineage

use crate::{
    errors::{CatalogError, FieldError},
    executor::{field, CommandExecutor, Row},
    image::{base_name, classify, is_known_image, ImageRecord},
};

/// Command that inspects an image and every ancestor in its backing chain
pub fn inspect_command(path: &str) -> String {
    format!("disk info {} recursive", path)
}

/// Parse a boolean the way the inspection tool prints one
pub fn parse_flag(field_name: &'static str, value: &str) -> Result<bool, FieldError> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(FieldError::Malformed {
            field: field_name,
            value: value.to_owned(),
        }),
    }
}

/// Turn one recursive inspection into catalog records
///
/// Row 0 is the queried image and each following row is the next ancestor,
/// so every record's backing chain is the names of all rows after it.
pub fn records_from_chain(
    rows: &[Row],
    host: Option<&str>,
    experiment: Option<&str>,
) -> Vec<ImageRecord> {
    let names: Vec<String> = rows
        .iter()
        .map(|row| base_name(field(row, "image")))
        .collect();

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let name = names[i].clone();
            let format = row.get("format").map(String::as_str);
            let in_use = match row.get("inuse") {
                None => false,
                Some(value) => parse_flag("inuse", value).unwrap_or_else(|err| {
                    log::warn!("could not determine if {} is in use: {}", name, err);
                    false
                }),
            };
            ImageRecord {
                kind: classify(&name, format),
                full_path: field(row, "image").to_owned(),
                host: host.filter(|host| !host.is_empty()).map(str::to_owned),
                size: field(row, "disksize").to_owned(),
                virtual_size: field(row, "virtualsize").to_owned(),
                experiment: experiment.map(str::to_owned),
                backing_images: names[i + 1..].to_vec(),
                in_use,
                name,
            }
        })
        .collect()
}

/// Resolve a candidate path into records for it and all of its ancestors
///
/// Paths without a recognized image suffix are not images; they produce no
/// records and issue no command.
pub async fn resolve_image<E>(
    executor: &E,
    path: &str,
    host: Option<&str>,
    experiment: Option<&str>,
) -> Result<Vec<ImageRecord>, CatalogError>
where
    E: CommandExecutor + ?Sized,
{
    if !is_known_image(path) {
        log::debug!("{:?} doesn't match a known image suffix", path);
        return Ok(Vec::new());
    }
    let rows = executor.run(&inspect_command(path)).await?;
    let records = records_from_chain(&rows, host, experiment);
    log::trace!("{:?} resolved to {} chain records", path, records.len());
    Ok(records)
}
