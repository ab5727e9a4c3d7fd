//! Startup seeding for an empty catalog.
//!
//! Generates a fixed category tree and brand list plus randomized products,
//! and writes everything through the same [`CatalogStore`] interface the
//! request path reads from, so the engine never special-cases seeded data.

use domain_catalog::{Brand, CatalogStore, Category, ProductRecord, QueryPlan};
use rand::Rng;
use rand::RngExt;
use tracing::info;
use uuid::Uuid;

const PRODUCTS_PER_PRIMARY_CATEGORY: usize = 100;
const LOOP_SAFETY: usize = 1000;
const MAX_PRICE: i64 = 100_000;
const MAX_RATING: f32 = 5.0;

/// Primary category, its product noun, and its secondary categories.
const CATEGORY_TREE: &[(&str, &str, &[&str])] = &[
    (
        "Electronics",
        "Gadget",
        &["Audio", "Computing", "Displays", "Accessories"],
    ),
    (
        "Furniture",
        "Furnishing",
        &["Office", "Living Room", "Bedroom", "Storage"],
    ),
    (
        "Outdoors",
        "Gear",
        &["Camping", "Hiking", "Cycling", "Water Sports"],
    ),
];

const BRAND_NAMES: &[&str] = &[
    "Northfield",
    "Apex Supply",
    "Bluelark",
    "Crestware",
    "Duneway",
    "Emberline",
];

/// Populate an empty catalog with sample data. Skipped when the catalog
/// already has rows.
pub async fn seed_catalog<S: CatalogStore>(store: &S) -> eyre::Result<()> {
    let probe = store.count_matches(&QueryPlan::unfiltered()).await;
    match probe.value() {
        Some(count) if *count > 0 => {
            info!(products = count, "Catalog already seeded, skipping");
            return Ok(());
        }
        Some(_) => {}
        None => {
            if let Some(error) = probe.error() {
                return Err(eyre::eyre!("Catalog probe failed: {}", error));
            }
        }
    }

    let mut rng = rand::rng();

    let brands: Vec<Brand> = BRAND_NAMES
        .iter()
        .map(|name| Brand {
            id: Uuid::new_v4(),
            name: (*name).to_string(),
        })
        .collect();

    let mut categories = Vec::new();
    let mut products = Vec::new();

    for (primary_name, noun, secondary_names) in CATEGORY_TREE {
        let primary = Category {
            id: Uuid::new_v4(),
            parent_id: None,
            name: (*primary_name).to_string(),
        };

        let secondary: Vec<Category> = secondary_names
            .iter()
            .map(|name| Category {
                id: Uuid::new_v4(),
                parent_id: Some(primary.id),
                name: (*name).to_string(),
            })
            .collect();

        for iteration in 0..PRODUCTS_PER_PRIMARY_CATEGORY {
            products.push(generate_product(
                &mut rng,
                &primary,
                &secondary,
                &brands,
                noun,
                iteration,
            ));
        }

        categories.push(primary);
        categories.extend(secondary);
    }

    store.insert_categories(&categories).await.into_result()?;
    store.insert_brands(&brands).await.into_result()?;
    let inserted = store.insert_products(&products).await.into_result()?;

    info!(
        categories = categories.len(),
        brands = brands.len(),
        products = inserted,
        "Catalog seeded"
    );
    Ok(())
}

fn generate_product(
    rng: &mut impl Rng,
    primary: &Category,
    secondary: &[Category],
    brands: &[Brand],
    noun: &str,
    iteration: usize,
) -> ProductRecord {
    let price = rng.random_range(100..=MAX_PRICE);

    ProductRecord {
        id: Uuid::new_v4(),
        brand_id: brands[rng.random_range(0..brands.len())].id,
        name: format!("{} {}", noun, iteration),
        image: format!(
            "/images/{}/{}.jpg",
            primary.name.to_lowercase(),
            rng.random_range(0..8)
        ),
        description: format!("{} {} from the {} range", noun, iteration, primary.name),
        price,
        sale_price: pick_sale_price(rng, price),
        rating: rng.random_range(0.0..=MAX_RATING),
        is_in_stock: rng.random_bool(0.95),
        is_featured: rng.random_bool(0.2),
        category_ids: pick_categories(rng, primary, secondary),
    }
}

/// 20% of products get a sale price strictly below the list price.
fn pick_sale_price(rng: &mut impl Rng, price: i64) -> i64 {
    if !rng.random_bool(0.2) {
        return 0;
    }

    let ceiling = (price * 9 / 10).max(1);
    rng.random_range(1..=ceiling)
}

/// The primary category plus one to three distinct secondary categories.
fn pick_categories(rng: &mut impl Rng, primary: &Category, secondary: &[Category]) -> Vec<Uuid> {
    let mut selected = vec![primary.id];

    if secondary.is_empty() {
        return selected;
    }

    let wanted = rng.random_range(1..=3usize.min(secondary.len()));
    for _ in 0..wanted {
        for _ in 0..LOOP_SAFETY {
            let candidate = secondary[rng.random_range(0..secondary.len())].id;
            if !selected.contains(&candidate) {
                selected.push(candidate);
                break;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_catalog::InMemoryCatalogStore;

    #[tokio::test]
    async fn test_seed_populates_an_empty_catalog() {
        let store = InMemoryCatalogStore::new();
        seed_catalog(&store).await.unwrap();

        let total = store
            .count_matches(&QueryPlan::unfiltered())
            .await
            .into_result()
            .unwrap();
        assert_eq!(
            total as usize,
            PRODUCTS_PER_PRIMARY_CATEGORY * CATEGORY_TREE.len()
        );

        let categories = store.list_categories().await.into_result().unwrap();
        assert!(categories.iter().any(|c| c.parent_id.is_none()));
        assert!(categories.iter().any(|c| c.parent_id.is_some()));
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_catalog_has_rows() {
        let store = InMemoryCatalogStore::new();
        seed_catalog(&store).await.unwrap();
        let before = store
            .count_matches(&QueryPlan::unfiltered())
            .await
            .into_result()
            .unwrap();

        seed_catalog(&store).await.unwrap();
        let after = store
            .count_matches(&QueryPlan::unfiltered())
            .await
            .into_result()
            .unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_seeded_sale_prices_are_real_discounts() {
        let store = InMemoryCatalogStore::new();
        seed_catalog(&store).await.unwrap();

        // Every product on sale must satisfy the on-sale invariant.
        let filters = domain_catalog::SearchFilters {
            is_on_sale: true,
            page_size: u32::MAX,
            ..Default::default()
        };
        let plan = domain_catalog::plan(&filters).into_result().unwrap();
        let page = match store.fetch_page(&plan).await {
            domain_catalog::Reply::Success(items) => items,
            domain_catalog::Reply::Empty => Vec::new(),
            domain_catalog::Reply::Failure(e) => panic!("unexpected failure: {}", e),
        };

        for item in page {
            assert!(item.sale_price > 0);
            assert!(item.sale_price < item.price);
        }
    }
}
