pub mod activity;
pub mod contribution;
pub mod profile;
