//! Running commands against the cluster's control plane


mod minimega;

pub use minimega::{MinimegaClient, MinimegaClientBuilder};

use crate::errors::CatalogError;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};

/// One row of tabular command output, keyed by column name
///
/// Every row also carries a `host` field naming the cluster node that
/// produced it.
pub type Row = HashMap<String, String>;

/// Executes command strings against the cluster's control plane
///
/// Rows come back in the order the tool produced them. A command that the
/// tool rejects, or that can't be delivered, is an error; nothing is retried
/// here.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, command: &str) -> Result<Vec<Row>, CatalogError>;
}

#[async_trait]
impl<T: CommandExecutor + ?Sized> CommandExecutor for Arc<T> {
    async fn run(&self, command: &str) -> Result<Vec<Row>, CatalogError> {
        (**self).run(command).await
    }
}

/// Borrow a field from a row, treating a missing column as empty
pub(crate) fn field<'a>(row: &'a Row, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

/// Zip a header with each tabular row, tagging every row with its host
pub(crate) fn tabular_rows(host: &str, header: &[String], tabular: &[Vec<String>]) -> Vec<Row> {
    tabular
        .iter()
        .map(|values| {
            let mut row: Row = header.iter().cloned().zip(values.iter().cloned()).collect();
            row.insert("host".to_owned(), host.to_owned());
            row
        })
        .collect()
}
