pub mod clone;
pub mod delete;
pub mod generated_insert;
pub mod search;
