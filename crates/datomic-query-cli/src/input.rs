use anyhow::{Context, Result};
use datomic_query::{document::QueryDocument, validate::validate_json, value::Value};
use std::{
    io::{self, Read},
    path::Path,
};

/// Read a file, or stdin for `-`.
pub fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("reading stdin")?;
        return Ok(source);
    }

    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Decode a document, validating unless told otherwise.
pub fn load_document(path: &Path, validate: bool) -> Result<QueryDocument> {
    let source = read_source(path)?;

    let document = if validate {
        validate_json(&source).map_err(datomic_query::Error::from)?
    } else {
        QueryDocument::from_json_str(&source).map_err(datomic_query::Error::from)?
    };

    Ok(document)
}

/// `--args` takes a JSON array of input values.
pub fn parse_args(json: &str) -> Result<Vec<Value>> {
    serde_json::from_str(json).context("--args must be a JSON array of input values")
}
