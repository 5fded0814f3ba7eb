pub mod categories;
pub mod issue_requests;
pub mod items;
pub mod sub_categories;
