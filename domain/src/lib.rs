pub mod corpus;
pub mod models;
pub mod prompt;
pub mod providers;
