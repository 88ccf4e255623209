// Base resumes: the user's source-of-truth documents that tailoring starts from.

pub mod handlers;
pub mod store;
