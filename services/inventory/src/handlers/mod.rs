pub mod issue_request;
pub mod item;
pub mod taxonomy;
