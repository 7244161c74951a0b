//! Mock module - an in-memory store test double.
//!
//! [`MockDb`] holds a list of models and a queue of canned query responses.
//! Writes go through id lookups on the model list; reads pop or peek the
//! response queue. [`MockTx`] works on a copy of the models and writes it
//! back on commit. Tests typically check the store's contents with
//! [`crate::diff`].

mod db;
mod tx;

pub use db::*;
pub use tx::*;

use std::any::type_name;

use serde::Serialize;
use thiserror::Error;

/// Model is a record the mock store can hold.
pub trait Model: Clone + Serialize {
    /// Returns the identity used by update, delete and find.
    fn id(&self) -> String;
}

/// StoreError is returned by mock store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{type_name} model with ID {id} not found to {op}")]
    NotFound {
        type_name: String,
        id: String,
        op: &'static str,
    },

    #[error("no rows in result set")]
    NoRows,

    #[error("transaction has already been committed or rolled back")]
    TransactionClosed,
}

impl StoreError {
    fn not_found<M>(id: String, op: &'static str) -> Self {
        StoreError::NotFound {
            type_name: type_name::<M>().to_string(),
            id,
            op,
        }
    }
}

fn position<M: Model>(models: &[M], id: &str) -> Option<usize> {
    models.iter().position(|m| m.id() == id)
}

fn update_in<M: Model>(models: &mut [M], model: M) -> Result<(), StoreError> {
    let id = model.id();
    match position(models, &id) {
        Some(i) => {
            models[i] = model;
            Ok(())
        }
        None => Err(StoreError::not_found::<M>(id, "update")),
    }
}

fn delete_in<M: Model>(models: &mut Vec<M>, model: &M) -> Result<M, StoreError> {
    let id = model.id();
    match position(models, &id) {
        Some(i) => Ok(models.remove(i)),
        None => Err(StoreError::not_found::<M>(id, "delete")),
    }
}

fn find_in<'m, M: Model>(models: &'m [M], id: &str) -> Option<&'m M> {
    models.iter().find(|m| m.id() == id)
}
