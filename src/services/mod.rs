pub mod activity_aggregation;
pub mod calendar_grid;
pub mod github;
pub mod heatmap_generator;
