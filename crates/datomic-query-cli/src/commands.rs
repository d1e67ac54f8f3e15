use crate::input::{load_document, parse_args};
use anyhow::Result;
use clap::Args;
use datomic_query::{
    ApiClient, Error,
    config::Settings,
    schema::{SchemaAttribute, SchemaFilter, SchemaStats, group_by_namespace},
    submit::Submitter,
    validate::validate,
};
use std::path::Path;

///
/// SchemaArgs
///

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct SchemaArgs {
    /// Case-insensitive match on ident, namespace or doc
    #[arg(long)]
    search: Option<String>,

    /// Only attributes with a uniqueness constraint
    #[arg(long)]
    only_unique: bool,

    /// Only component attributes
    #[arg(long)]
    only_components: bool,

    /// Hide idents
    #[arg(long)]
    no_ident: bool,

    /// Hide database functions
    #[arg(long)]
    no_fn: bool,

    /// Hide attributes
    #[arg(long)]
    no_attribute: bool,

    /// Print catalog counts instead of the listing
    #[arg(long)]
    stats: bool,
}

impl SchemaArgs {
    fn filter(&self) -> SchemaFilter {
        let filter = SchemaFilter {
            show_ident: !self.no_ident,
            show_fn: !self.no_fn,
            show_attribute: !self.no_attribute,
            only_unique: self.only_unique,
            only_components: self.only_components,
            search: None,
        };

        match &self.search {
            Some(term) => filter.search(term.as_str()),
            None => filter,
        }
    }
}

// ----------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------

pub fn validate_file(path: &Path) -> Result<()> {
    let document = load_document(path, true)?;
    println!(
        "ok: {} find term(s), {} clause(s)",
        document.find.len(),
        document.clauses.as_ref().map_or(0, Vec::len)
    );

    Ok(())
}

pub async fn run(
    settings: &Settings,
    path: &Path,
    args: Option<&str>,
    skip_validation: bool,
) -> Result<()> {
    let mut document = load_document(path, false)?;
    if let Some(json) = args {
        document
            .args
            .get_or_insert_with(Vec::new)
            .extend(parse_args(json)?);
    }

    if skip_validation {
        tracing::debug!("skipping validation");
    } else {
        validate(&document).map_err(Error::from)?;
    }

    let client = ApiClient::from_settings(settings).map_err(Error::from)?;
    let response = client.submit(&document).await.map_err(Error::from)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

pub async fn translate(settings: &Settings, path: &Path) -> Result<()> {
    let document = load_document(path, true)?;

    let client = ApiClient::from_settings(settings).map_err(Error::from)?;
    let response = client.translate(&document).await.map_err(Error::from)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

pub async fn schema(settings: &Settings, args: &SchemaArgs) -> Result<()> {
    let client = ApiClient::from_settings(settings).map_err(Error::from)?;
    let catalog = client.fetch_schema().await.map_err(Error::from)?;

    if args.stats {
        print_stats(&SchemaStats::collect(&catalog));
        return Ok(());
    }

    let matching = args.filter().apply(&catalog);
    if matching.is_empty() {
        println!("no matching attributes");
        return Ok(());
    }

    for (namespace, attrs) in group_by_namespace(matching) {
        println!("{namespace}");
        for attr in attrs {
            println!("  {}", describe(attr));
        }
    }

    Ok(())
}

// ----------------------------------------------------------------------
// Output
// ----------------------------------------------------------------------

fn describe(attr: &SchemaAttribute) -> String {
    let mut line = attr.ident.clone();

    let mut tags = Vec::new();
    if let Some(value_type) = &attr.value_type {
        tags.push(value_type.clone());
    }
    if let Some(cardinality) = &attr.cardinality {
        tags.push(cardinality.clone());
    }
    if attr.is_unique {
        tags.push("unique".to_string());
    }
    if attr.is_component {
        tags.push("component".to_string());
    }
    if attr.is_function {
        tags.push("fn".to_string());
    }
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }

    if let Some(doc) = &attr.doc {
        line.push_str(&format!("  {doc}"));
    }

    line
}

fn print_stats(stats: &SchemaStats) {
    println!("attributes  {}", stats.attributes);
    println!("idents      {}", stats.idents);
    println!("functions   {}", stats.functions);
    println!("unique      {}", stats.unique);
    println!("components  {}", stats.components);
}
