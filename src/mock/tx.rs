//! Mock transactions.

use super::{delete_in, find_in, update_in, MockDb, Model, StoreError};

/// MockTx is a transaction on a [`MockDb`].
///
/// Writes go to a private copy of the models, which replaces the database's
/// models on commit. Reads of queued responses go straight to the database.
/// Dropping an open transaction discards its writes.
#[derive(Debug)]
pub struct MockTx<'a, M> {
    db: &'a mut MockDb<M>,
    models: Vec<M>,
    open: bool,
}

impl<'a, M: Model> MockTx<'a, M> {
    pub(super) fn new(db: &'a mut MockDb<M>) -> Self {
        let models = db.models.clone();
        MockTx {
            db,
            models,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The transaction's view of the models.
    pub fn models(&self) -> &[M] {
        &self.models
    }

    pub fn query(&mut self, query: &str) -> Option<M> {
        self.db.query(query)
    }

    pub fn query_one(&mut self, query: &str) -> Result<M, StoreError> {
        self.db.query_one(query)
    }

    pub fn select(&self) -> Option<&M> {
        self.db.select()
    }

    pub fn insert(&mut self, models: impl IntoIterator<Item = M>) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.models.extend(models);
        Ok(())
    }

    pub fn update(&mut self, model: M) -> Result<(), StoreError> {
        self.ensure_open()?;
        update_in(&mut self.models, model)
    }

    pub fn delete(&mut self, model: &M) -> Result<M, StoreError> {
        self.ensure_open()?;
        delete_in(&mut self.models, model)
    }

    pub fn find(&self, id: &str) -> Option<&M> {
        find_in(&self.models, id)
    }

    /// Writes the transaction's models back to the database.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.db.models = std::mem::take(&mut self.models);
        self.open = false;
        Ok(())
    }

    /// Discards the transaction's writes.
    pub fn rollback(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.models.clear();
        self.open = false;
        Ok(())
    }

    /// Rolls back if the transaction is still open; a no-op otherwise.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if self.open {
            self.rollback()?;
        }
        Ok(())
    }

    /// Pretty JSON of the transaction's models.
    pub fn models_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.models)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.open {
            Ok(())
        } else {
            Err(StoreError::TransactionClosed)
        }
    }
}
