//! PostgreSQL implementation of [`CatalogStore`].
//!
//! Renders each [`QueryPlan`] to one parameterized SQL statement and runs it
//! as a raw SeaORM [`Statement`]. This is the collaborator boundary: store
//! faults are logged here in full and collapsed into sanitized failures.
//! Connection trouble becomes `StoreUnavailable`, execution faults become
//! `ExecutionFailure`, and a mutation touching zero rows becomes
//! `NoRowsAffected`. A query that simply matches nothing is never a failure.
//!
//! Expected schema:
//! `products(id, brand_id, name, image, description, price, sale_price,
//! rating, is_in_stock, is_featured)`,
//! `product_categories(product_id, category_id)`,
//! `categories(id, parent_id, name)`, `brands(id, name)`.

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, QueryResult, Statement, Value,
};
use std::collections::HashMap;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::error::CatalogError;
use crate::models::{Brand, Category, ProductDetails, ProductRecord, ProductSummary, SortOrder};
use crate::planner::{Predicate, QueryPlan};
use crate::reply::Reply;
use crate::store::CatalogStore;

/// Effective price: sale price when one is active, list price otherwise.
const EFFECTIVE_PRICE: &str = "CASE WHEN p.sale_price > 0 THEN p.sale_price ELSE p.price END";

const SUMMARY_COLUMNS: &str =
    "p.id, p.brand_id, p.name, p.image, p.price, p.sale_price, p.rating, p.is_in_stock";

/// PostgreSQL catalog store.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    db: DatabaseConnection,
}

impl PgCatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn statement(sql: String, values: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values)
    }

    /// Render the plan's predicate conjunction, binding `$n` placeholders.
    /// Returns an empty string when the plan has no predicates.
    fn render_where(predicates: &[Predicate], values: &mut Vec<Value>) -> String {
        if predicates.is_empty() {
            return String::new();
        }

        let mut clauses = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            match predicate {
                Predicate::TextSearch(text) => {
                    let pattern = format!("%{}%", text);
                    values.push(pattern.clone().into());
                    let name_param = values.len();
                    values.push(pattern.into());
                    let description_param = values.len();
                    clauses.push(format!(
                        "(p.name ILIKE ${} OR p.description ILIKE ${})",
                        name_param, description_param
                    ));
                }
                Predicate::Category(category_id) => {
                    values.push((*category_id).into());
                    clauses.push(format!(
                        "EXISTS (SELECT 1 FROM product_categories pc \
                         WHERE pc.product_id = p.id AND pc.category_id = ${})",
                        values.len()
                    ));
                }
                Predicate::BrandIn(brand_ids) if brand_ids.is_empty() => {
                    // Membership in an empty set matches nothing.
                    clauses.push("FALSE".to_string());
                }
                Predicate::BrandIn(brand_ids) => {
                    let placeholders: Vec<String> = brand_ids
                        .iter()
                        .map(|brand_id| {
                            values.push((*brand_id).into());
                            format!("${}", values.len())
                        })
                        .collect();
                    clauses.push(format!("p.brand_id IN ({})", placeholders.join(", ")));
                }
                Predicate::MinEffectivePrice(min) => {
                    values.push((*min).into());
                    clauses.push(format!("{} >= ${}", EFFECTIVE_PRICE, values.len()));
                }
                Predicate::MaxEffectivePrice(max) => {
                    values.push((*max).into());
                    clauses.push(format!("{} <= ${}", EFFECTIVE_PRICE, values.len()));
                }
                Predicate::Featured(featured) => {
                    values.push((*featured).into());
                    clauses.push(format!("p.is_featured = ${}", values.len()));
                }
                Predicate::InStock(in_stock) => {
                    values.push((*in_stock).into());
                    clauses.push(format!("p.is_in_stock = ${}", values.len()));
                }
                Predicate::OnSale => {
                    clauses.push("(p.sale_price > 0 AND p.sale_price < p.price)".to_string());
                }
            }
        }

        format!(" WHERE {}", clauses.join(" AND "))
    }

    /// Per-ordinal ordering; every variant ends with the id tie-break so
    /// pagination stays stable under equal sort keys.
    fn order_clause(order: SortOrder) -> String {
        match order {
            SortOrder::Featured => "p.is_featured DESC, p.rating DESC, p.id ASC".to_string(),
            SortOrder::PriceAscending => format!("{} ASC, p.id ASC", EFFECTIVE_PRICE),
            SortOrder::PriceDescending => format!("{} DESC, p.id ASC", EFFECTIVE_PRICE),
            SortOrder::RatingDescending => "p.rating DESC, p.id ASC".to_string(),
        }
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, CatalogError> {
        self.db
            .query_all_raw(stmt)
            .await
            .map_err(|e| store_error("query", e))
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, CatalogError> {
        self.db
            .query_one_raw(stmt)
            .await
            .map_err(|e| store_error("query_one", e))
    }

    async fn execute(&self, stmt: Statement) -> Result<u64, CatalogError> {
        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| store_error("execute", e))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NoRowsAffected);
        }

        Ok(result.rows_affected())
    }
}

fn summary_from_row(row: &QueryResult) -> Result<ProductSummary, DbErr> {
    Ok(ProductSummary {
        id: row.try_get("", "id")?,
        brand_id: row.try_get("", "brand_id")?,
        name: row.try_get("", "name")?,
        image: row.try_get("", "image")?,
        price: row.try_get("", "price")?,
        sale_price: row.try_get("", "sale_price")?,
        rating: row.try_get("", "rating")?,
        is_in_stock: row.try_get("", "is_in_stock")?,
        estimated_shipping_days: None,
    })
}

fn details_from_row(row: &QueryResult) -> Result<ProductDetails, DbErr> {
    Ok(ProductDetails {
        id: row.try_get("", "id")?,
        brand_id: row.try_get("", "brand_id")?,
        name: row.try_get("", "name")?,
        image: row.try_get("", "image")?,
        description: row.try_get("", "description")?,
        price: row.try_get("", "price")?,
        sale_price: row.try_get("", "sale_price")?,
        rating: row.try_get("", "rating")?,
        is_in_stock: row.try_get("", "is_in_stock")?,
        is_featured: row.try_get("", "is_featured")?,
        estimated_shipping_days: None,
    })
}

/// Collapse a store fault into a sanitized failure. Full detail is logged
/// here at the collaborator boundary and goes no further.
fn store_error(operation: &str, err: DbErr) -> CatalogError {
    error!(operation, error = %err, "catalog store operation failed");
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            CatalogError::StoreUnavailable("The catalog store is not reachable".to_string())
        }
        _ => CatalogError::ExecutionFailure(
            "An internal error occurred while querying the catalog".to_string(),
        ),
    }
}

fn decode_error(err: DbErr) -> CatalogError {
    error!(error = %err, "failed to decode catalog row");
    CatalogError::ExecutionFailure(
        "An internal error occurred while reading the catalog".to_string(),
    )
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[instrument(skip(self, plan))]
    async fn count_matches(&self, plan: &QueryPlan) -> Reply<u64> {
        let mut values = Vec::new();
        let where_clause = Self::render_where(&plan.predicates, &mut values);
        let sql = format!("SELECT COUNT(*) AS total FROM products p{}", where_clause);

        match self.query_one(Self::statement(sql, values)).await {
            Ok(Some(row)) => match row.try_get::<i64>("", "total") {
                Ok(total) => Reply::success(total.max(0) as u64),
                Err(e) => Reply::fail(decode_error(e)),
            },
            Ok(None) => Reply::success(0),
            Err(error) => Reply::fail(error),
        }
    }

    #[instrument(skip(self, plan), fields(offset = plan.offset, limit = plan.limit))]
    async fn fetch_page(&self, plan: &QueryPlan) -> Reply<Vec<ProductSummary>> {
        let mut values = Vec::new();
        let where_clause = Self::render_where(&plan.predicates, &mut values);

        values.push((plan.limit as i64).into());
        let limit_param = values.len();
        values.push((plan.offset as i64).into());
        let offset_param = values.len();

        let sql = format!(
            "SELECT {} FROM products p{} ORDER BY {} LIMIT ${} OFFSET ${}",
            SUMMARY_COLUMNS,
            where_clause,
            Self::order_clause(plan.order),
            limit_param,
            offset_param,
        );

        let rows = match self.query_all(Self::statement(sql, values)).await {
            Ok(rows) => rows,
            Err(error) => return Reply::fail(error),
        };

        let mut page = Vec::with_capacity(rows.len());
        for row in &rows {
            match summary_from_row(row) {
                Ok(summary) => page.push(summary),
                Err(e) => return Reply::fail(decode_error(e)),
            }
        }

        Reply::from_rows(page)
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn fetch_by_ids(&self, ids: &[Uuid]) -> Reply<Vec<ProductSummary>> {
        if ids.is_empty() {
            return Reply::empty();
        }

        let mut values: Vec<Value> = Vec::with_capacity(ids.len());
        let placeholders: Vec<String> = ids
            .iter()
            .map(|id| {
                values.push((*id).into());
                format!("${}", values.len())
            })
            .collect();

        let sql = format!(
            "SELECT {} FROM products p WHERE p.id IN ({})",
            SUMMARY_COLUMNS,
            placeholders.join(", ")
        );

        let rows = match self.query_all(Self::statement(sql, values)).await {
            Ok(rows) => rows,
            Err(error) => return Reply::fail(error),
        };

        let mut by_id = HashMap::with_capacity(rows.len());
        for row in &rows {
            match summary_from_row(row) {
                Ok(summary) => {
                    by_id.insert(summary.id, summary);
                }
                Err(e) => return Reply::fail(decode_error(e)),
            }
        }

        // Re-establish request order; unknown ids are skipped without a
        // placeholder.
        let found: Vec<ProductSummary> = ids
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .collect();

        Reply::from_rows(found)
    }

    #[instrument(skip(self))]
    async fn fetch_details(&self, id: Uuid) -> Reply<ProductDetails> {
        let sql = format!(
            "SELECT {}, p.description, p.is_featured FROM products p WHERE p.id = $1",
            SUMMARY_COLUMNS
        );

        match self.query_one(Self::statement(sql, vec![id.into()])).await {
            Ok(Some(row)) => match details_from_row(&row) {
                Ok(details) => Reply::success(details),
                Err(e) => Reply::fail(decode_error(e)),
            },
            Ok(None) => Reply::empty(),
            Err(error) => Reply::fail(error),
        }
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Reply<Vec<Category>> {
        let sql = "SELECT c.id, c.parent_id, c.name FROM categories c ORDER BY c.name".to_string();

        let rows = match self.query_all(Self::statement(sql, Vec::new())).await {
            Ok(rows) => rows,
            Err(error) => return Reply::fail(error),
        };

        let mut categories = Vec::with_capacity(rows.len());
        for row in &rows {
            let category = (|| -> Result<Category, DbErr> {
                Ok(Category {
                    id: row.try_get("", "id")?,
                    parent_id: row.try_get("", "parent_id")?,
                    name: row.try_get("", "name")?,
                })
            })();
            match category {
                Ok(category) => categories.push(category),
                Err(e) => return Reply::fail(decode_error(e)),
            }
        }

        Reply::from_rows(categories)
    }

    #[instrument(skip(self))]
    async fn list_brands(&self) -> Reply<Vec<Brand>> {
        let sql = "SELECT b.id, b.name FROM brands b ORDER BY b.name".to_string();

        let rows = match self.query_all(Self::statement(sql, Vec::new())).await {
            Ok(rows) => rows,
            Err(error) => return Reply::fail(error),
        };

        let mut brands = Vec::with_capacity(rows.len());
        for row in &rows {
            let brand = (|| -> Result<Brand, DbErr> {
                Ok(Brand {
                    id: row.try_get("", "id")?,
                    name: row.try_get("", "name")?,
                })
            })();
            match brand {
                Ok(brand) => brands.push(brand),
                Err(e) => return Reply::fail(decode_error(e)),
            }
        }

        Reply::from_rows(brands)
    }

    #[instrument(skip(self, categories), fields(count = categories.len()))]
    async fn insert_categories(&self, categories: &[Category]) -> Reply<u64> {
        if categories.is_empty() {
            return Reply::fail(CatalogError::NoRowsAffected);
        }

        let mut values: Vec<Value> = Vec::with_capacity(categories.len() * 3);
        let rows: Vec<String> = categories
            .iter()
            .map(|category| {
                values.push(category.id.into());
                values.push(category.parent_id.into());
                values.push(category.name.clone().into());
                let base = values.len() - 3;
                format!("(${}, ${}, ${})", base + 1, base + 2, base + 3)
            })
            .collect();

        let sql = format!(
            "INSERT INTO categories (id, parent_id, name) VALUES {}",
            rows.join(", ")
        );

        match self.execute(Self::statement(sql, values)).await {
            Ok(affected) => Reply::success(affected),
            Err(error) => Reply::fail(error),
        }
    }

    #[instrument(skip(self, brands), fields(count = brands.len()))]
    async fn insert_brands(&self, brands: &[Brand]) -> Reply<u64> {
        if brands.is_empty() {
            return Reply::fail(CatalogError::NoRowsAffected);
        }

        let mut values: Vec<Value> = Vec::with_capacity(brands.len() * 2);
        let rows: Vec<String> = brands
            .iter()
            .map(|brand| {
                values.push(brand.id.into());
                values.push(brand.name.clone().into());
                let base = values.len() - 2;
                format!("(${}, ${})", base + 1, base + 2)
            })
            .collect();

        let sql = format!("INSERT INTO brands (id, name) VALUES {}", rows.join(", "));

        match self.execute(Self::statement(sql, values)).await {
            Ok(affected) => Reply::success(affected),
            Err(error) => Reply::fail(error),
        }
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn insert_products(&self, products: &[ProductRecord]) -> Reply<u64> {
        if products.is_empty() {
            return Reply::fail(CatalogError::NoRowsAffected);
        }

        let mut values: Vec<Value> = Vec::with_capacity(products.len() * 10);
        let rows: Vec<String> = products
            .iter()
            .map(|product| {
                values.push(product.id.into());
                values.push(product.brand_id.into());
                values.push(product.name.clone().into());
                values.push(product.image.clone().into());
                values.push(product.description.clone().into());
                values.push(product.price.into());
                values.push(product.sale_price.into());
                values.push(product.rating.into());
                values.push(product.is_in_stock.into());
                values.push(product.is_featured.into());
                let base = values.len() - 10;
                let params: Vec<String> =
                    (base + 1..=base + 10).map(|n| format!("${}", n)).collect();
                format!("({})", params.join(", "))
            })
            .collect();

        let sql = format!(
            "INSERT INTO products (id, brand_id, name, image, description, \
             price, sale_price, rating, is_in_stock, is_featured) VALUES {}",
            rows.join(", ")
        );

        let affected = match self.execute(Self::statement(sql, values)).await {
            Ok(affected) => affected,
            Err(error) => return Reply::fail(error),
        };

        // Category links ride along in a second statement.
        let mut link_values: Vec<Value> = Vec::new();
        let link_rows: Vec<String> = products
            .iter()
            .flat_map(|product| {
                let product_id = product.id;
                product.category_ids.iter().map(move |category_id| {
                    (product_id, *category_id)
                })
            })
            .map(|(product_id, category_id)| {
                link_values.push(product_id.into());
                link_values.push(category_id.into());
                let base = link_values.len() - 2;
                format!("(${}, ${})", base + 1, base + 2)
            })
            .collect();

        if !link_rows.is_empty() {
            let link_sql = format!(
                "INSERT INTO product_categories (product_id, category_id) VALUES {}",
                link_rows.join(", ")
            );
            if let Err(error) = self.execute(Self::statement(link_sql, link_values)).await {
                return Reply::fail(error);
            }
        }

        Reply::success(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_where_empty_plan_has_no_clause() {
        let mut values = Vec::new();
        let clause = PgCatalogStore::render_where(&[], &mut values);
        assert_eq!(clause, "");
        assert!(values.is_empty());
    }

    #[test]
    fn test_render_where_ands_predicates_in_order() {
        let brand = Uuid::new_v4();
        let mut values = Vec::new();
        let clause = PgCatalogStore::render_where(
            &[
                Predicate::TextSearch("lamp".to_string()),
                Predicate::BrandIn(vec![brand]),
                Predicate::MinEffectivePrice(100),
                Predicate::OnSale,
            ],
            &mut values,
        );

        assert_eq!(
            clause,
            format!(
                " WHERE (p.name ILIKE $1 OR p.description ILIKE $2) \
                 AND p.brand_id IN ($3) \
                 AND {} >= $4 \
                 AND (p.sale_price > 0 AND p.sale_price < p.price)",
                EFFECTIVE_PRICE
            )
        );
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_render_where_empty_brand_set_matches_nothing() {
        let mut values = Vec::new();
        let clause = PgCatalogStore::render_where(&[Predicate::BrandIn(vec![])], &mut values);
        assert_eq!(clause, " WHERE FALSE");
        assert!(values.is_empty());
    }

    #[test]
    fn test_render_where_category_uses_junction_table() {
        let category = Uuid::new_v4();
        let mut values = Vec::new();
        let clause =
            PgCatalogStore::render_where(&[Predicate::Category(category)], &mut values);

        assert!(clause.contains("EXISTS (SELECT 1 FROM product_categories pc"));
        assert!(clause.contains("pc.category_id = $1"));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_order_clause_always_tiebreaks_by_id() {
        for order in [
            SortOrder::Featured,
            SortOrder::PriceAscending,
            SortOrder::PriceDescending,
            SortOrder::RatingDescending,
        ] {
            assert!(PgCatalogStore::order_clause(order).ends_with("p.id ASC"));
        }
    }

    #[test]
    fn test_order_clause_price_uses_effective_price() {
        let clause = PgCatalogStore::order_clause(SortOrder::PriceAscending);
        assert!(clause.contains(EFFECTIVE_PRICE));
        assert!(clause.contains("ASC"));
    }
}
