//! Data persistence for the gift tracker.
//!
//! SQLite via sqlx; insertion order of records is the ROWID order, which is
//! what every "roster order" / "first match" contract below is built on.

pub mod db;

pub use db::DbConnection;
