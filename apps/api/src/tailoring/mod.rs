// Resume tailoring: prompt construction, generation with a single strict
// retry, and validation of the model's rewrite against the base resume.
// All LLM calls go through llm_client via the CandidateGenerator seam.

pub mod export;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod sections;
pub mod store;
pub mod validator;
