// Job postings: entered by hand or imported from the browser extension.

pub mod extraction;
pub mod handlers;
pub mod store;
