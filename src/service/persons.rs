//! Person operations

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{CatalogService, Listing, ServiceError, ServiceResult};
use crate::model::Person;
use crate::query::parse_person_query;
use crate::store::PersonStore;
use crate::validation::{validate_person, WriteMode};

impl<S: PersonStore> CatalogService<S> {
    pub async fn create_person(&self, body: &Value) -> ServiceResult<Person> {
        let person = validate_person(body, WriteMode::Create)?.into_person()?;
        self.store.insert_person(&person).await?;
        debug!(id = %person.id, "Created person");
        Ok(person)
    }

    pub async fn get_person(&self, id: Uuid) -> ServiceResult<Person> {
        self.store
            .get_person(id)
            .await?
            .ok_or_else(ServiceError::not_found)
    }

    /// PUT when `partial` is false, PATCH when true
    pub async fn update_person(
        &self,
        id: Uuid,
        body: &Value,
        partial: bool,
    ) -> ServiceResult<Person> {
        let mut person = self.get_person(id).await?;

        let mode = if partial { WriteMode::Partial } else { WriteMode::Replace };
        validate_person(body, mode)?.apply(&mut person);

        if !self.store.update_person(&person).await? {
            return Err(ServiceError::not_found());
        }
        debug!(id = %person.id, partial, "Updated person");
        Ok(person)
    }

    pub async fn delete_person(&self, id: Uuid) -> ServiceResult<()> {
        if !self.store.delete_person(id).await? {
            return Err(ServiceError::not_found());
        }
        debug!(id = %id, "Deleted person");
        Ok(())
    }

    pub async fn list_persons(
        &self,
        params: &HashMap<String, String>,
    ) -> ServiceResult<Listing<Person>> {
        let query = parse_person_query(params, self.page_size)?;
        let page = self.store.query_persons(&query).await?;
        Listing::checked(page, query.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlStore;
    use serde_json::json;
    use std::sync::Arc;

    async fn service() -> CatalogService<SqlStore> {
        CatalogService::new(Arc::new(SqlStore::in_memory().await.unwrap()), 20)
    }

    fn jane() -> Value {
        json!({"first_name": "Jane", "last_name": "Doe", "email": "jane@example.com"})
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service().await;
        let created = service.create_person(&jane()).await.unwrap();
        let loaded = service.get_person(created.id).await.unwrap();
        assert_eq!(created, loaded);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_on_email() {
        let service = service().await;
        service.create_person(&jane()).await.unwrap();
        let err = service.create_person(&jane()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref e) if e.contains("email")));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_before_validation() {
        let service = service().await;
        let err = service
            .update_person(Uuid::new_v4(), &json!({}), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_patch_changes_only_supplied_fields() {
        let service = service().await;
        let created = service.create_person(&jane()).await.unwrap();
        let updated = service
            .update_person(created.id, &json!({"last_name": "Smith"}), true)
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.first_name, "Jane");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service().await;
        let created = service.create_person(&jane()).await.unwrap();
        service.delete_person(created.id).await.unwrap();
        assert!(matches!(
            service.delete_person(created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
