//! Listing repository for SQLite operations

use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqlitePool};

use crate::data::filters::{SqlValue, build_list_query, columns};
use crate::data::sqlite::SqliteError;
use crate::data::types::{ListingFilter, ListingPatch, ListingRow, NewListing, PropertyType};

/// Column tuple in `columns::SELECT_LIST` order
type ListingTuple = (i64, String, f64, i64, i64, Option<String>);

type ListingQuery<'q> = QueryAs<'q, Sqlite, ListingTuple, SqliteArguments<'q>>;

fn bind_values(mut query: ListingQuery<'_>, values: Vec<SqlValue>) -> ListingQuery<'_> {
    for value in values {
        query = match value {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Real(v) => query.bind(v),
            SqlValue::Integer(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }
    query
}

fn row_to_listing(
    (id, address, price, bedrooms, bathrooms, category): ListingTuple,
) -> Result<ListingRow, SqliteError> {
    let category = match category {
        Some(name) => Some(PropertyType::parse(&name).ok_or_else(|| SqliteError::InvalidRow {
            table: "listings",
            reason: format!("listing {} has unknown type '{}'", id, name),
        })?),
        None => None,
    };

    Ok(ListingRow {
        id,
        address,
        price,
        bedrooms,
        bathrooms,
        category,
    })
}

/// List listings matching a validated filter, ordered by id
pub async fn list_listings(
    pool: &SqlitePool,
    filter: &ListingFilter,
) -> Result<Vec<ListingRow>, SqliteError> {
    let built = build_list_query(filter);
    let query = bind_values(sqlx::query_as::<_, ListingTuple>(&built.sql), built.params.values);

    query
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(row_to_listing)
        .collect()
}

/// Get a listing by ID
pub async fn get_listing(pool: &SqlitePool, id: i64) -> Result<Option<ListingRow>, SqliteError> {
    let sql = format!("SELECT {} FROM listings WHERE id = ?", columns::SELECT_LIST);
    let row = sqlx::query_as::<_, ListingTuple>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(row_to_listing).transpose()
}

/// Insert a listing and return it with its assigned ID
pub async fn create_listing(
    pool: &SqlitePool,
    listing: &NewListing,
) -> Result<ListingRow, SqliteError> {
    let result = sqlx::query(
        "INSERT INTO listings (address, address_lower, price, bedrooms, bathrooms, type) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&listing.address)
    .bind(listing.address.to_lowercase())
    .bind(listing.price)
    .bind(listing.bedrooms)
    .bind(listing.bathrooms)
    .bind(listing.category.map(|c| c.as_str()))
    .execute(pool)
    .await?;

    Ok(ListingRow {
        id: result.last_insert_rowid(),
        address: listing.address.clone(),
        price: listing.price,
        bedrooms: listing.bedrooms,
        bathrooms: listing.bathrooms,
        category: listing.category,
    })
}

/// Apply the supplied columns of a patch.
///
/// Returns `None` when no listing has this ID.
pub async fn update_listing(
    pool: &SqlitePool,
    id: i64,
    patch: &ListingPatch,
) -> Result<Option<ListingRow>, SqliteError> {
    let mut assignments: Vec<(&str, SqlValue)> = Vec::new();
    if let Some(ref address) = patch.address {
        assignments.push((columns::ADDRESS, SqlValue::Text(address.clone())));
        assignments.push((columns::ADDRESS_LOWER, SqlValue::Text(address.to_lowercase())));
    }
    if let Some(price) = patch.price {
        assignments.push((columns::PRICE, SqlValue::Real(price)));
    }
    if let Some(bedrooms) = patch.bedrooms {
        assignments.push((columns::BEDROOMS, SqlValue::Integer(bedrooms)));
    }
    if let Some(bathrooms) = patch.bathrooms {
        assignments.push((columns::BATHROOMS, SqlValue::Integer(bathrooms)));
    }
    if let Some(category) = patch.category {
        let value = match category {
            Some(c) => SqlValue::Text(c.as_str().to_string()),
            None => SqlValue::Null,
        };
        assignments.push((columns::CATEGORY, value));
    }

    if assignments.is_empty() {
        return get_listing(pool, id).await;
    }

    let set_clause: Vec<String> = assignments
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect();
    let sql = format!("UPDATE listings SET {} WHERE id = ?", set_clause.join(", "));

    let mut query = sqlx::query(&sql);
    for (_, value) in assignments {
        query = match value {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Real(v) => query.bind(v),
            SqlValue::Integer(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }
    let result = query.bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_listing(pool, id).await
}

/// Delete a listing, returning whether a row was removed
pub async fn delete_listing(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM listings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Total number of stored listings
pub async fn count_listings(pool: &SqlitePool) -> Result<u64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
        .fetch_one(pool)
        .await?;
    Ok(count.max(0) as u64)
}
