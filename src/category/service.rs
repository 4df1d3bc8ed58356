//! Category use cases, each run as one unit of work.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    category::{
        Category, CategoryCreateRequest, CategoryId, CategoryRepository, CategoryResponse,
        CategoryUpdateRequest, ValidationPolicy,
    },
    unit_of_work::in_transaction,
};

/// Validates category requests and runs them against the database, one
/// transaction per call.
#[derive(Debug, Clone)]
pub struct CategoryService<R> {
    repository: R,
    db_connection: Arc<Mutex<Connection>>,
    validation_policy: ValidationPolicy,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Create a service that uses `repository` to access the database behind
    /// `db_connection`.
    pub fn new(
        repository: R,
        db_connection: Arc<Mutex<Connection>>,
        validation_policy: ValidationPolicy,
    ) -> Self {
        Self {
            repository,
            db_connection,
            validation_policy,
        }
    }

    /// Create a category.
    ///
    /// The request is validated before the database is touched.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if the request is invalid, or a storage
    /// error if the insert fails, e.g. because the name already exists.
    pub fn create(&self, request: CategoryCreateRequest) -> Result<CategoryResponse, Error> {
        let name = self.validation_policy.validate_create(&request)?;

        let mut connection = self.lock_connection()?;
        let category = in_transaction(&mut connection, |transaction| {
            self.repository.save(transaction, name)
        })?;

        Ok(category.into())
    }

    /// Rename an existing category.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if the request is invalid, [Error::NotFound]
    /// if there is no category with the requested ID, or a storage error.
    pub fn update(&self, request: CategoryUpdateRequest) -> Result<CategoryResponse, Error> {
        let (category_id, name) = self.validation_policy.validate_update(&request)?;

        let mut connection = self.lock_connection()?;
        let category = in_transaction(&mut connection, |transaction| {
            let category = self
                .repository
                .find_by_id(transaction, category_id)?
                .ok_or(Error::NotFound)?;

            self.repository
                .update(transaction, Category { name, ..category })
        })?;

        Ok(category.into())
    }

    /// Delete an existing category.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no category with `category_id`,
    /// or a storage error.
    pub fn delete(&self, category_id: CategoryId) -> Result<(), Error> {
        let mut connection = self.lock_connection()?;

        in_transaction(&mut connection, |transaction| {
            let category = self
                .repository
                .find_by_id(transaction, category_id)?
                .ok_or(Error::NotFound)?;

            self.repository.delete(transaction, category.id)
        })
    }

    /// Get a single category.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no category with `category_id`,
    /// or a storage error.
    pub fn find_by_id(&self, category_id: CategoryId) -> Result<CategoryResponse, Error> {
        let mut connection = self.lock_connection()?;

        let category = in_transaction(&mut connection, |transaction| {
            self.repository
                .find_by_id(transaction, category_id)?
                .ok_or(Error::NotFound)
        })?;

        Ok(category.into())
    }

    /// Get all categories in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn find_all(&self) -> Result<Vec<CategoryResponse>, Error> {
        let mut connection = self.lock_connection()?;

        let categories = in_transaction(&mut connection, |transaction| {
            self.repository.find_all(transaction)
        })?;

        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

#[cfg(test)]
mod category_service_tests {
    use std::{
        cell::Cell,
        sync::{Arc, Mutex},
    };

    use rusqlite::{Connection, Transaction};

    use crate::{
        Error,
        category::{
            Category, CategoryCreateRequest, CategoryId, CategoryName, CategoryRepository,
            CategoryResponse, CategoryUpdateRequest, Rule, SQLiteCategoryRepository,
            ValidationError, ValidationPolicy, db::count_categories,
        },
        db::initialize,
    };

    use super::CategoryService;

    fn get_test_connection() -> Arc<Mutex<Connection>> {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        Arc::new(Mutex::new(connection))
    }

    fn get_test_service() -> CategoryService<SQLiteCategoryRepository> {
        CategoryService::new(
            SQLiteCategoryRepository,
            get_test_connection(),
            ValidationPolicy::default(),
        )
    }

    fn row_count<R: CategoryRepository>(service: &CategoryService<R>) -> i64 {
        count_categories(&service.db_connection.lock().unwrap())
    }

    fn create_request(name: &str) -> CategoryCreateRequest {
        CategoryCreateRequest {
            name: name.to_owned(),
        }
    }

    /// Counts every call that reaches the database.
    #[derive(Default)]
    struct CountingRepository {
        calls: Cell<usize>,
    }

    impl CountingRepository {
        fn record(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl CategoryRepository for CountingRepository {
        fn save(&self, transaction: &Transaction, name: CategoryName) -> Result<Category, Error> {
            self.record();
            SQLiteCategoryRepository.save(transaction, name)
        }

        fn update(&self, transaction: &Transaction, category: Category) -> Result<Category, Error> {
            self.record();
            SQLiteCategoryRepository.update(transaction, category)
        }

        fn delete(&self, transaction: &Transaction, category_id: CategoryId) -> Result<(), Error> {
            self.record();
            SQLiteCategoryRepository.delete(transaction, category_id)
        }

        fn find_by_id(
            &self,
            transaction: &Transaction,
            category_id: CategoryId,
        ) -> Result<Option<Category>, Error> {
            self.record();
            SQLiteCategoryRepository.find_by_id(transaction, category_id)
        }

        fn find_all(&self, transaction: &Transaction) -> Result<Vec<Category>, Error> {
            self.record();
            SQLiteCategoryRepository.find_all(transaction)
        }
    }

    /// Writes the row and then fails, as if a later step of the unit of work broke.
    struct FailAfterWriteRepository;

    impl CategoryRepository for FailAfterWriteRepository {
        fn save(&self, transaction: &Transaction, name: CategoryName) -> Result<Category, Error> {
            SQLiteCategoryRepository.save(transaction, name)?;
            Err(Error::SqlError(rusqlite::Error::InvalidQuery))
        }

        fn update(&self, transaction: &Transaction, category: Category) -> Result<Category, Error> {
            SQLiteCategoryRepository.update(transaction, category)?;
            Err(Error::SqlError(rusqlite::Error::InvalidQuery))
        }

        fn delete(&self, transaction: &Transaction, category_id: CategoryId) -> Result<(), Error> {
            SQLiteCategoryRepository.delete(transaction, category_id)?;
            Err(Error::SqlError(rusqlite::Error::InvalidQuery))
        }

        fn find_by_id(
            &self,
            transaction: &Transaction,
            category_id: CategoryId,
        ) -> Result<Option<Category>, Error> {
            SQLiteCategoryRepository.find_by_id(transaction, category_id)
        }

        fn find_all(&self, transaction: &Transaction) -> Result<Vec<Category>, Error> {
            SQLiteCategoryRepository.find_all(transaction)
        }
    }

    #[test]
    fn create_succeeds() {
        let service = get_test_service();

        let response = service.create(create_request("Komputer"));

        assert_eq!(
            response,
            Ok(CategoryResponse {
                id: 1,
                name: "Komputer".to_owned()
            })
        );
    }

    #[test]
    fn create_with_empty_name_fails_without_touching_storage() {
        let service = CategoryService::new(
            CountingRepository::default(),
            get_test_connection(),
            ValidationPolicy::default(),
        );

        let result = service.create(create_request(""));

        assert_eq!(
            result,
            Err(Error::Validation(ValidationError {
                field: "name",
                rule: Rule::Required
            }))
        );
        assert_eq!(service.repository.calls.get(), 0);
        assert_eq!(row_count(&service), 0);
    }

    #[test]
    fn update_with_empty_name_fails_without_touching_storage() {
        let service = CategoryService::new(
            CountingRepository::default(),
            get_test_connection(),
            ValidationPolicy::default(),
        );
        let created = service.create(create_request("Komputer")).unwrap();
        service.repository.calls.set(0);

        let result = service.update(CategoryUpdateRequest {
            id: created.id,
            name: "".to_owned(),
        });

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(service.repository.calls.get(), 0);
        assert_eq!(service.find_by_id(created.id), Ok(created));
    }

    #[test]
    fn create_duplicate_name_fails_and_keeps_first_row() {
        let service = get_test_service();
        service.create(create_request("Komputer")).unwrap();

        let result = service.create(create_request("Komputer"));

        assert!(matches!(result, Err(Error::SqlError(_))));
        assert_eq!(row_count(&service), 1);
    }

    #[test]
    fn failure_after_write_rolls_back_create() {
        let service = CategoryService::new(
            FailAfterWriteRepository,
            get_test_connection(),
            ValidationPolicy::default(),
        );

        let result = service.create(create_request("Komputer"));

        assert_eq!(result, Err(Error::SqlError(rusqlite::Error::InvalidQuery)));
        assert_eq!(row_count(&service), 0);
    }

    #[test]
    fn failure_after_write_rolls_back_update_and_delete() {
        let connection = get_test_connection();
        let created = CategoryService::new(
            SQLiteCategoryRepository,
            connection.clone(),
            ValidationPolicy::default(),
        )
        .create(create_request("Komputer"))
        .unwrap();
        let service =
            CategoryService::new(FailAfterWriteRepository, connection, ValidationPolicy::default());

        let update_result = service.update(CategoryUpdateRequest {
            id: created.id,
            name: "Software".to_owned(),
        });
        let delete_result = service.delete(created.id);

        assert!(update_result.is_err());
        assert!(delete_result.is_err());
        assert_eq!(service.find_by_id(created.id), Ok(created));
    }

    #[test]
    fn round_trip_create_then_find_by_id() {
        let service = get_test_service();

        let created = service.create(create_request("Komputer")).unwrap();
        let found = service.find_by_id(created.id).unwrap();

        assert_eq!(found.name, "Komputer");
    }

    #[test]
    fn update_missing_category_returns_not_found() {
        let service = get_test_service();

        let result = service.update(CategoryUpdateRequest {
            id: 999,
            name: "X".to_owned(),
        });

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(row_count(&service), 0);
    }

    #[test]
    fn update_missing_category_leaves_other_rows_unchanged() {
        let service = get_test_service();
        let created = service.create(create_request("Komputer")).unwrap();

        let result = service.update(CategoryUpdateRequest {
            id: created.id + 100,
            name: "Error".to_owned(),
        });

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(service.find_all(), Ok(vec![created]));
    }

    #[test]
    fn update_rejects_non_positive_id_before_lookup() {
        let service = CategoryService::new(
            CountingRepository::default(),
            get_test_connection(),
            ValidationPolicy::default(),
        );

        let result = service.update(CategoryUpdateRequest {
            id: 0,
            name: "Software".to_owned(),
        });

        assert_eq!(
            result,
            Err(Error::Validation(ValidationError {
                field: "id",
                rule: Rule::Positive
            }))
        );
        assert_eq!(service.repository.calls.get(), 0);
    }

    #[test]
    fn delete_missing_category_returns_not_found() {
        let service = get_test_service();
        let created = service.create(create_request("Komputer")).unwrap();

        let result = service.delete(created.id + 100);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(row_count(&service), 1);
    }

    #[test]
    fn find_by_id_missing_category_returns_not_found() {
        let service = get_test_service();
        service.create(create_request("Komputer")).unwrap();

        assert_eq!(service.find_by_id(100), Err(Error::NotFound));
    }

    #[test]
    fn find_all_is_idempotent() {
        let service = get_test_service();
        service.create(create_request("Komputer")).unwrap();
        service.create(create_request("Software")).unwrap();

        let first = service.find_all().unwrap();
        let second = service.find_all().unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn find_all_on_empty_table_returns_empty_list() {
        let service = get_test_service();

        assert_eq!(service.find_all(), Ok(Vec::new()));
    }

    #[test]
    fn create_update_delete_lifecycle() {
        let service = get_test_service();

        let created = service.create(create_request("Komputer")).unwrap();
        assert_eq!(
            created,
            CategoryResponse {
                id: 1,
                name: "Komputer".to_owned()
            }
        );

        let updated = service
            .update(CategoryUpdateRequest {
                id: 1,
                name: "Software".to_owned(),
            })
            .unwrap();
        assert_eq!(
            updated,
            CategoryResponse {
                id: 1,
                name: "Software".to_owned()
            }
        );

        assert_eq!(service.find_by_id(1), Ok(updated));

        assert_eq!(service.delete(1), Ok(()));
        assert_eq!(service.find_by_id(1), Err(Error::NotFound));
    }

    #[test]
    fn poisoned_lock_returns_lock_error() {
        let service = get_test_service();
        let connection = service.db_connection.clone();
        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(service.find_all(), Err(Error::DatabaseLockError));
    }
}
