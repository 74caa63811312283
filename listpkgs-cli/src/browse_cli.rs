//! Browse commands: search, show, facets, config
//!
//! Text output is rendered with tabled; `--json` prints the core's
//! serialized results unchanged so scripts see the same shapes a front-end
//! would.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::Path;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use listpkgs_core::config::BrowserConfig;
use listpkgs_core::facets::FacetCount;
use listpkgs_core::{
    apply_filters, group_by_category_sorted, group_by_first_letter, sort_by_name, Catalog,
    Facets, FilterSelection, Package, PackageGroup, SortKey,
};

const DESCRIPTION_WIDTH: usize = 50;

/// How search results are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GroupMode {
    /// A single name-sorted list
    #[default]
    None,
    /// One section per first letter
    Letter,
    /// One section per category
    Category,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search term (matches name, description and key)
    pub term: Option<String>,

    /// Architecture substrings, comma-separated
    #[clap(long)]
    pub arch: Option<String>,

    /// Category tokens, comma-separated (core, applications, libraries, ...)
    #[clap(long = "type")]
    pub package_type: Option<String>,

    /// Exact maintainer (repeatable)
    #[clap(long = "maintainer")]
    pub maintainers: Vec<String>,

    /// Exact license (repeatable)
    #[clap(long = "license")]
    pub licenses: Vec<String>,

    /// Exact source repository (repeatable)
    #[clap(long = "source")]
    pub sources: Vec<String>,

    /// Group results
    #[clap(long, value_enum, default_value_t = GroupMode::None)]
    pub group: GroupMode,

    /// Output results as JSON
    #[clap(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            architecture: self.arch.clone().unwrap_or_default(),
            package_type: self.package_type.clone().unwrap_or_default(),
            maintainers: self.maintainers.iter().cloned().collect(),
            licenses: self.licenses.iter().cloned().collect(),
            sources: self.sources.iter().cloned().collect(),
        }
    }
}

/// Table row for search results
#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Arch")]
    architecture: String,
    #[tabled(rename = "Type")]
    package_type: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Package> for PackageRow {
    fn from(pkg: &Package) -> Self {
        Self {
            name: pkg.name.clone(),
            version: pkg.version.clone(),
            architecture: pkg.architecture_display().to_string(),
            package_type: pkg.type_or_unknown().to_string(),
            description: truncate(pkg.description_display(), DESCRIPTION_WIDTH),
        }
    }
}

/// Table row for facet counts
#[derive(Tabled)]
struct FacetRow {
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Count")]
    count: usize,
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn render_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

fn package_table(packages: &[&Package]) -> String {
    let rows: Vec<PackageRow> = packages.iter().map(|pkg| PackageRow::from(*pkg)).collect();
    render_table(&rows)
}

pub fn execute_search(catalog: &Catalog, args: &SearchArgs) -> Result<()> {
    println!("{}", render_search(catalog, args)?);
    Ok(())
}

/// Search output, either JSON or text tables
fn render_search(catalog: &Catalog, args: &SearchArgs) -> Result<String> {
    let selection = args.selection();
    let term = args.term.as_deref().unwrap_or_default();

    let matched = apply_filters(catalog, term, &selection);
    let count = matched.len();

    let groups: Option<Vec<PackageGroup<'_>>> = match args.group {
        GroupMode::None => None,
        GroupMode::Letter => Some(group_by_first_letter(matched.iter().copied())),
        GroupMode::Category => Some(group_by_category_sorted(
            matched.iter().copied(),
            SortKey::for_selection(&selection),
        )),
    };

    // Empty results are still valid JSON for scripts
    if args.json {
        let output = match &groups {
            Some(groups) => serde_json::to_string_pretty(groups)?,
            None => serde_json::to_string_pretty(&sort_by_name(matched))?,
        };
        return Ok(output);
    }

    if count == 0 {
        return Ok("No packages found.".to_string());
    }

    let mut output = format!("Found {} of {} package(s):\n", count, catalog.len());

    match groups {
        Some(groups) => {
            for group in &groups {
                output.push_str(&format!("\n{} ({})\n", group.label(), group.len()));
                output.push_str(&package_table(group.packages()));
                output.push('\n');
            }
        }
        None => {
            output.push('\n');
            output.push_str(&package_table(&sort_by_name(matched)));
        }
    }

    Ok(output.trim_end().to_string())
}

pub fn execute_show(catalog: &Catalog, key: &str, json_output: bool) -> Result<()> {
    let pkg = catalog
        .get(key)
        .with_context(|| format!("Package '{key}' not found in catalog"))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(pkg)?);
        return Ok(());
    }

    println!("Package:      {}", pkg.name);
    println!("Key:          {}", pkg.key);
    println!("Version:      {}", pkg.version);
    println!("Type:         {}", pkg.type_or_unknown());
    println!("Architecture: {}", pkg.architecture_display());
    println!("Maintainer:   {}", pkg.maintainer_or_unknown());
    println!("License:      {}", pkg.license_or_unknown());
    println!("Source:       {}", pkg.source_or_unknown());

    if let Some(homepage) = &pkg.homepage {
        println!("Homepage:     {homepage}");
    }

    match pkg.last_updated_at() {
        Some(updated) => println!("Updated:      {}", updated.format("%Y-%m-%d %H:%M UTC")),
        None => {
            if let Some(raw) = &pkg.last_updated {
                println!("Updated:      {raw}");
            }
        }
    }

    for (label, values) in [
        ("Depends on", &pkg.dependencies),
        ("Conflicts", &pkg.conflicts),
        ("Provides", &pkg.provides),
        ("Replaces", &pkg.replaces),
        ("Tags", &pkg.tags),
    ] {
        if !values.is_empty() {
            println!("{:<14}{}", format!("{label}:"), values.join(", "));
        }
    }

    println!();
    println!("Description:");
    for line in pkg.description_display().lines() {
        println!("  {line}");
    }

    Ok(())
}

pub fn execute_facets(catalog: &Catalog, json_output: bool) -> Result<()> {
    let facets = Facets::from_packages(catalog);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&facets)?);
        return Ok(());
    }

    for (title, counts) in [
        ("Architectures", &facets.architectures),
        ("Categories", &facets.categories),
        ("Maintainers", &facets.maintainers),
        ("Licenses", &facets.licenses),
        ("Sources", &facets.sources),
    ] {
        println!("\n{title}:");
        println!("{}", render_table(&facet_rows(counts)));
    }

    Ok(())
}

fn facet_rows(counts: &[FacetCount]) -> Vec<FacetRow> {
    counts
        .iter()
        .map(|facet| FacetRow {
            value: facet.value.clone(),
            count: facet.count,
        })
        .collect()
}

pub fn execute_config(config: &BrowserConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        config.save_to_path(path)?;
        println!("Wrote {}", path.display());
    }

    let content = serde_yaml_ng::to_string(config).context("Failed to serialize config")?;
    print!("{content}");

    Ok(())
}
