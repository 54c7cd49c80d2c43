//! Business logic for the gift tracker.
//!
//! Services own validation and the merge semantics of partial updates; the
//! storage layer underneath them only moves records. `dates` is pure and
//! takes `today` as a parameter so everything here stays deterministic
//! under test.

pub mod checklist_service;
pub mod dates;
pub mod errors;
pub mod gift_service;
pub mod kid_service;
pub mod reminder_service;

pub use checklist_service::ChecklistService;
pub use errors::DomainError;
pub use gift_service::GiftService;
pub use kid_service::KidService;
pub use reminder_service::ReminderService;
