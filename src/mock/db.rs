//! The mock database.

use std::collections::VecDeque;

use super::{delete_in, find_in, update_in, Model, MockTx, StoreError};

/// MockDb stands in for a database client in unit tests.
#[derive(Debug, Clone)]
pub struct MockDb<M> {
    pub(super) responses: VecDeque<M>,
    pub(super) models: Vec<M>,
    pub(super) queries: Vec<String>,
}

impl<M> Default for MockDb<M> {
    fn default() -> Self {
        MockDb {
            responses: VecDeque::new(),
            models: Vec::new(),
            queries: Vec::new(),
        }
    }
}

impl<M: Model> MockDb<M> {
    pub fn new() -> Self {
        MockDb::default()
    }

    /// Adds responses, in order, for `query`, `query_one` and `select`.
    pub fn queue_responses(&mut self, responses: impl IntoIterator<Item = M>) {
        self.responses.extend(responses);
    }

    /// Adds models for `update`, `delete` and `find` to work on.
    pub fn queue_models(&mut self, models: impl IntoIterator<Item = M>) {
        self.models.extend(models);
    }

    pub fn models(&self) -> &[M] {
        &self.models
    }

    pub fn responses(&self) -> impl Iterator<Item = &M> {
        self.responses.iter()
    }

    /// Query text passed to `query` and `query_one`, in call order.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Pops the next queued response. The query text is recorded but not
    /// interpreted. An empty queue yields `None`.
    pub fn query(&mut self, query: &str) -> Option<M> {
        self.queries.push(query.to_string());
        self.responses.pop_front()
    }

    /// Like `query`, but an empty queue is an error.
    pub fn query_one(&mut self, query: &str) -> Result<M, StoreError> {
        self.query(query).ok_or(StoreError::NoRows)
    }

    /// Returns the next queued response without consuming it.
    pub fn select(&self) -> Option<&M> {
        self.responses.front()
    }

    pub fn insert(&mut self, models: impl IntoIterator<Item = M>) {
        self.models.extend(models);
    }

    /// Replaces the stored model with the same id.
    pub fn update(&mut self, model: M) -> Result<(), StoreError> {
        update_in(&mut self.models, model)
    }

    /// Removes and returns the stored model with the same id.
    pub fn delete(&mut self, model: &M) -> Result<M, StoreError> {
        delete_in(&mut self.models, model)
    }

    pub fn find(&self, id: &str) -> Option<&M> {
        find_in(&self.models, id)
    }

    /// Starts a transaction over a copy of the current models.
    pub fn begin(&mut self) -> MockTx<'_, M> {
        MockTx::new(self)
    }

    /// Runs `f` in a transaction. The transaction is committed when `f`
    /// returns `Ok` and rolled back otherwise.
    pub fn run_in_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut MockTx<'_, M>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut tx = self.begin();
        match f(&mut tx) {
            Ok(value) => {
                if tx.is_open() {
                    tx.commit()?;
                }
                Ok(value)
            }
            Err(err) => {
                tx.close()?;
                Err(err)
            }
        }
    }

    /// Pretty JSON of the stored models, for test failure output.
    pub fn models_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.models)
    }

    /// Pretty JSON of the queued responses, for test failure output.
    pub fn responses_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.responses)
    }
}
