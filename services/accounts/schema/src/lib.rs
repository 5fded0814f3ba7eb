pub mod uploaded_files;
pub mod user_profiles;
pub mod users;
