//! gameshelf - a videogame inventory backed by a JSON file, with a
//! persisted position-indexed hash table for lookups and deletes

pub mod catalog;
pub mod cli;
pub mod config;
pub mod covers;
pub mod index;
pub mod observability;
pub mod storage;
