pub mod atomic_database;
mod composition;
mod element;
pub mod mass;
pub mod mz;
pub(crate) mod periodic_table;
pub mod symbol_table;
