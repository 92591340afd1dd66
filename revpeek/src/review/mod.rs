//! Review-data loading for revpeek.
//!
//! The loader runs on a background `std::thread::spawn` thread that holds
//! the `git2::Repository` for its lifetime — Repository is !Send, so it must
//! never cross a thread boundary. All communication is via channels:
//! `ReviewRequest` in, `AppEvent::ReviewResult` out.
pub mod loader;
pub mod types;
