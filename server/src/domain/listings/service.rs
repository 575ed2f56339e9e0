//! Listing service
//!
//! Validates every candidate before the repository is touched, then hands
//! typed values to the repository. This is the only component with access to
//! persistence.

use std::sync::Arc;

use super::error::ListingError;
use super::input::{ListingInput, ListingQuery};
use super::validation::{RuleSet, ValidationContext, validate};
use crate::data::ListingRepository;
use crate::data::types::ListingRow;

#[derive(Clone)]
pub struct ListingService {
    repo: Arc<dyn ListingRepository>,
    validation: ValidationContext,
}

impl ListingService {
    /// `max_page_size` bounds `pageSize`; `None` leaves it unbounded
    pub fn new(repo: Arc<dyn ListingRepository>, max_page_size: Option<u64>) -> Self {
        Self {
            repo,
            validation: ValidationContext { max_page_size },
        }
    }

    /// Filtered page of listings, ordered by id
    pub async fn list(&self, query: &ListingQuery) -> Result<Vec<ListingRow>, ListingError> {
        validate(query, RuleSet::Filter, &self.validation)?;
        let filter = query.to_filter();

        let rows = self.repo.list_listings(&filter).await?;
        tracing::debug!(
            page = filter.page,
            page_size = filter.page_size,
            count = rows.len(),
            "Listed listings"
        );
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ListingRow, ListingError> {
        self.repo
            .get_listing(id)
            .await?
            .ok_or(ListingError::NotFound(id))
    }

    pub async fn create(&self, input: &ListingInput) -> Result<ListingRow, ListingError> {
        validate(input, RuleSet::Create, &self.validation)?;
        let new = input.to_new_listing()?;

        let row = self.repo.create_listing(&new).await?;
        tracing::debug!(id = row.id, "Created listing");
        Ok(row)
    }

    /// Apply only the supplied fields
    pub async fn update(&self, id: i64, input: &ListingInput) -> Result<ListingRow, ListingError> {
        validate(input, RuleSet::Update, &self.validation)?;
        let patch = input.to_patch();

        let row = self
            .repo
            .update_listing(id, &patch)
            .await?
            .ok_or(ListingError::NotFound(id))?;
        tracing::debug!(id, "Updated listing");
        Ok(row)
    }

    /// Idempotent; returns whether a row was removed
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, ListingError> {
        let deleted = self.repo.delete_listing(id).await?;
        tracing::debug!(id, deleted, "Deleted listing");
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<u64, ListingError> {
        Ok(self.repo.count_listings().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::data::DataError;
    use crate::data::SqliteService;
    use crate::data::types::{ListingFilter, ListingPatch, NewListing, PropertyType};
    use crate::domain::listings::validation::{ConstraintKind, Field};

    async fn service() -> ListingService {
        let repo: Arc<dyn ListingRepository> = Arc::new(SqliteService::in_memory().await);
        ListingService::new(repo, None)
    }

    fn input(value: serde_json::Value) -> ListingInput {
        serde_json::from_value(value).unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> ListingQuery {
        let encode = |v: &str| {
            v.replace('<', "%3C")
                .replace('>', "%3E")
                .replace('=', "%3D")
        };
        let qs: Vec<String> = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode(v)))
            .collect();
        let uri: axum::http::Uri = format!("http://localhost/?{}", qs.join("&"))
            .parse()
            .unwrap();
        axum::extract::Query::<ListingQuery>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    async fn seed(service: &ListingService, count: usize) {
        for i in 1..=count {
            service
                .create(&input(json!({
                    "address": format!("{} Elm St", i),
                    "price": (i * 1000) as f64,
                    "bedrooms": i % 5,
                    "bathrooms": i % 3,
                    "type": PropertyType::NAMES[i % 3],
                })))
                .await
                .unwrap();
        }
    }

    /// Repository that counts calls and always fails
    #[derive(Default)]
    struct FailingRepository {
        calls: AtomicUsize,
    }

    impl FailingRepository {
        fn fail<T>(&self) -> Result<T, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::Sqlite(sqlx::Error::PoolClosed))
        }
    }

    #[async_trait]
    impl ListingRepository for FailingRepository {
        async fn list_listings(&self, _: &ListingFilter) -> Result<Vec<ListingRow>, DataError> {
            self.fail()
        }
        async fn get_listing(&self, _: i64) -> Result<Option<ListingRow>, DataError> {
            self.fail()
        }
        async fn create_listing(&self, _: &NewListing) -> Result<ListingRow, DataError> {
            self.fail()
        }
        async fn update_listing(
            &self,
            _: i64,
            _: &ListingPatch,
        ) -> Result<Option<ListingRow>, DataError> {
            self.fail()
        }
        async fn delete_listing(&self, _: i64) -> Result<bool, DataError> {
            self.fail()
        }
        async fn count_listings(&self) -> Result<u64, DataError> {
            self.fail()
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_all_fields() {
        let service = service().await;
        let created = service
            .create(&input(json!({
                "address": "12 Harbour Rd",
                "price": 425000.5,
                "bedrooms": 3,
                "bathrooms": 2,
                "type": "Townhouse"
            })))
            .await
            .unwrap();
        assert!(created.id > 0);

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.address, "12 Harbour Rd");
        assert_eq!(fetched.price, 425000.5);
        assert_eq!(fetched.bedrooms, 3);
        assert_eq!(fetched.bathrooms, 2);
        assert_eq!(fetched.category, Some(PropertyType::Townhouse));
    }

    #[tokio::test]
    async fn test_create_without_type() {
        let service = service().await;
        let created = service
            .create(&input(json!({
                "address": "1 Main St", "price": 0, "bedrooms": 0, "bathrooms": 0
            })))
            .await
            .unwrap();
        assert_eq!(created.category, None);
    }

    #[tokio::test]
    async fn test_create_invalid_writes_nothing() {
        let service = service().await;
        let err = service
            .create(&input(json!({"address": "1 Main St", "price": -1})))
            .await
            .unwrap_err();

        let ListingError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert!(violations.contains(Field::Price, ConstraintKind::Minimum));
        assert!(violations.contains(Field::Bedrooms, ConstraintKind::Required));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_unknown_type_is_membership() {
        let service = service().await;
        let err = service
            .create(&input(json!({
                "address": "1 Main St", "price": 1, "bedrooms": 1, "bathrooms": 1,
                "type": "Houseboat"
            })))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ListingError::Validation(ref v) if v.contains(Field::Category, ConstraintKind::Membership)
        ));
    }

    #[tokio::test]
    async fn test_create_oversized_room_count_is_rejected() {
        let service = service().await;
        let err = service
            .create(&input(json!({
                "address": "1 Main St", "price": 1, "bedrooms": 1e20, "bathrooms": 1
            })))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ListingError::Validation(ref v) if v.contains(Field::Bedrooms, ConstraintKind::Maximum)
        ));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = service().await;
        let err = service.get_by_id(42).await.unwrap_err();
        assert!(matches!(err, ListingError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let service = service().await;
        seed(&service, 1).await;
        let before = service.get_by_id(1).await.unwrap();

        let after = service
            .update(1, &input(json!({"address": "X"})))
            .await
            .unwrap();
        assert_eq!(after.address, "X");
        assert_eq!(after.price, before.price);
        assert_eq!(after.bedrooms, before.bedrooms);
        assert_eq!(after.bathrooms, before.bathrooms);
        assert_eq!(after.category, before.category);
    }

    #[tokio::test]
    async fn test_update_null_type_clears_category() {
        let service = service().await;
        seed(&service, 1).await;

        let after = service.update(1, &input(json!({"type": null}))).await.unwrap();
        assert_eq!(after.category, None);
    }

    #[tokio::test]
    async fn test_update_empty_body_returns_current() {
        let service = service().await;
        seed(&service, 1).await;
        let before = service.get_by_id(1).await.unwrap();
        assert_eq!(service.update(1, &input(json!({}))).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = service().await;
        let err = service
            .update(9, &input(json!({"price": 5})))
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_update_validation_runs_before_lookup() {
        let service = service().await;
        let err = service
            .update(9, &input(json!({"bedrooms": 1.5})))
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = service().await;
        seed(&service, 1).await;

        assert!(service.delete_by_id(1).await.unwrap());
        assert!(!service.delete_by_id(1).await.unwrap());
        assert!(!service.delete_by_id(12345).await.unwrap());
        assert!(matches!(
            service.get_by_id(1).await.unwrap_err(),
            ListingError::NotFound(1)
        ));
    }

    #[tokio::test]
    async fn test_list_defaults_to_first_ten() {
        let service = service().await;
        seed(&service, 15).await;

        let rows = service.list(&query(&[])).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let service = service().await;
        seed(&service, 15).await;

        let rows = service
            .list(&query(&[("page", "3"), ("pageSize", "5")]))
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![11, 12, 13, 14, 15]);

        let beyond = service
            .list(&query(&[("page", "4"), ("pageSize", "5")]))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_list_price_operator() {
        let service = service().await;
        seed(&service, 10).await;

        let rows = service
            .list(&query(&[("price", "8000"), ("priceOperand", ">=")]))
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![8, 9, 10]);
    }

    #[tokio::test]
    async fn test_list_price_without_operand_fails() {
        let service = service().await;
        let err = service.list(&query(&[("price", "100")])).await.unwrap_err();
        let ListingError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 1);
        assert!(violations.contains(Field::PriceOperand, ConstraintKind::Required));
    }

    #[tokio::test]
    async fn test_list_operand_alone_is_ignored() {
        let service = service().await;
        seed(&service, 3).await;
        let rows = service
            .list(&query(&[("priceOperand", "<")]))
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_list_non_numeric_value() {
        let service = service().await;
        let err = service
            .list(&query(&[("bedrooms", "three"), ("bedroomsOperand", "=")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ListingError::Validation(ref v) if v.contains(Field::Bedrooms, ConstraintKind::Numeric)
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_type_and_address() {
        let service = service().await;
        seed(&service, 9).await;

        let rows = service
            .list(&query(&[("type", "Condominium"), ("address", "ELM")]))
            .await
            .unwrap();
        assert!(!rows.is_empty());
        assert!(
            rows.iter()
                .all(|r| r.category == Some(PropertyType::Condominium))
        );
    }

    #[tokio::test]
    async fn test_list_address_matches_non_ascii_case() {
        let service = service().await;
        for address in ["1 ÉCOLE Straße", "2 Ecole Road"] {
            service
                .create(&input(json!({
                    "address": address, "price": 1, "bedrooms": 1, "bathrooms": 1
                })))
                .await
                .unwrap();
        }

        // école
        let rows = service
            .list(&query(&[("address", "%C3%A9cole")]))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].address, "1 ÉCOLE Straße");
    }

    #[tokio::test]
    async fn test_list_page_size_limit() {
        let repo: Arc<dyn ListingRepository> = Arc::new(SqliteService::in_memory().await);
        let service = ListingService::new(repo, Some(50));

        let err = service
            .list(&query(&[("pageSize", "51")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ListingError::Validation(ref v) if v.contains(Field::PageSize, ConstraintKind::Maximum)
        ));
        assert!(service.list(&query(&[("pageSize", "50")])).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_repository() {
        let repo = Arc::new(FailingRepository::default());
        let service = ListingService::new(repo.clone(), None);

        assert!(matches!(
            service.list(&query(&[("page", "0")])).await,
            Err(ListingError::Validation(_))
        ));
        assert!(matches!(
            service.create(&input(json!({}))).await,
            Err(ListingError::Validation(_))
        ));
        assert!(matches!(
            service.update(1, &input(json!({"type": "Nope"}))).await,
            Err(ListingError::Validation(_))
        ));
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let repo = Arc::new(FailingRepository::default());
        let service = ListingService::new(repo.clone(), None);

        assert!(matches!(
            service.get_by_id(1).await,
            Err(ListingError::Persistence(_))
        ));
        assert!(matches!(
            service.delete_by_id(1).await,
            Err(ListingError::Persistence(_))
        ));
        assert!(matches!(
            service.list(&query(&[])).await,
            Err(ListingError::Persistence(_))
        ));
        assert_eq!(repo.calls.load(Ordering::SeqCst), 3);
    }
}
