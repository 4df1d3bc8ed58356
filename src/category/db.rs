//! Database operations for categories.
//!
//! Every operation runs inside a transaction owned by the caller, see
//! [crate::unit_of_work::in_transaction].

use rusqlite::{Connection, OptionalExtension, Row, Transaction};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Reads and writes categories within a caller-supplied transaction.
///
/// Implementations never commit or roll back the transaction, and never
/// report a missing row as an error. Existence checks belong to the caller.
pub trait CategoryRepository {
    /// Insert a category and return it with its generated ID.
    fn save(&self, transaction: &Transaction, name: CategoryName) -> Result<Category, Error>;

    /// Set the name of the category with the same ID as `category`.
    ///
    /// Updating an ID that is not in the database is a no-op.
    fn update(&self, transaction: &Transaction, category: Category) -> Result<Category, Error>;

    /// Delete the category with `category_id`.
    ///
    /// Deleting an ID that is not in the database is a no-op.
    fn delete(&self, transaction: &Transaction, category_id: CategoryId) -> Result<(), Error>;

    /// Retrieve a single category by ID, or `None` if there is no such category.
    fn find_by_id(
        &self,
        transaction: &Transaction,
        category_id: CategoryId,
    ) -> Result<Option<Category>, Error>;

    /// Retrieve all categories in insertion order.
    fn find_all(&self, transaction: &Transaction) -> Result<Vec<Category>, Error>;
}

/// Stores categories in the `category` table of a SQLite database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SQLiteCategoryRepository;

impl CategoryRepository for SQLiteCategoryRepository {
    fn save(&self, transaction: &Transaction, name: CategoryName) -> Result<Category, Error> {
        transaction.execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))?;

        let id = transaction.last_insert_rowid();

        Ok(Category { id, name })
    }

    fn update(&self, transaction: &Transaction, category: Category) -> Result<Category, Error> {
        transaction.execute(
            "UPDATE category SET name = ?1 WHERE id = ?2;",
            (category.name.as_ref(), category.id),
        )?;

        Ok(category)
    }

    fn delete(&self, transaction: &Transaction, category_id: CategoryId) -> Result<(), Error> {
        transaction.execute("DELETE FROM category WHERE id = ?1;", [category_id])?;

        Ok(())
    }

    fn find_by_id(
        &self,
        transaction: &Transaction,
        category_id: CategoryId,
    ) -> Result<Option<Category>, Error> {
        transaction
            .prepare("SELECT id, name FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], map_row)
            .optional()
            .map_err(|error| error.into())
    }

    fn find_all(&self, transaction: &Transaction) -> Result<Vec<Category>, Error> {
        transaction
            .prepare("SELECT id, name FROM category ORDER BY id ASC;")?
            .query_map([], map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

/// Count the rows in the category table.
#[cfg(test)]
pub(crate) fn count_categories(connection: &Connection) -> i64 {
    connection
        .query_row("SELECT COUNT(*) FROM category;", [], |row| row.get(0))
        .expect("Could not count categories")
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
