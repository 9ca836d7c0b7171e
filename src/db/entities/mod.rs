pub mod favorite;
pub mod review;
pub mod tool;
pub mod user;
