//! Catalog file inspection.

use std::collections::BTreeMap;
use std::path::Path;

use amarine_storefront::catalog::{Catalog, CatalogQuery, average_rating};
use tracing::info;

/// Validate a catalog file and print a per-category summary.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(path)?;

    let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
    for product in catalog.products() {
        *per_category.entry(product.category.as_str()).or_insert(0) += 1;
    }

    info!(
        products = catalog.len(),
        categories = catalog.categories().len(),
        currency = catalog.currency().code(),
        "Catalog is valid"
    );

    #[allow(clippy::print_stdout)]
    {
        println!("{}: OK", path.display());
        println!("  products:   {}", catalog.len());
        println!("  currency:   {}", catalog.currency().code());
        for (category, count) in &per_category {
            println!("  {category:<12} {count}");
        }
    }
    Ok(())
}

/// Print products matching the filters, one per line.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn list(path: &Path, query: &CatalogQuery) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(path)?;
    let found = catalog.search(query);

    #[allow(clippy::print_stdout)]
    {
        for product in &found {
            let reviews = catalog.reviews_for(product);
            println!(
                "{:>4}  {:<24} {:>10}  {:<12} {:<12} {} ({})",
                product.id.as_str(),
                product.name,
                product.price.to_string(),
                product.category.as_str(),
                product.difficulty.as_str(),
                average_rating(&reviews),
                reviews.len(),
            );
        }
        println!("{} of {} products", found.len(), catalog.len());
    }
    Ok(())
}
