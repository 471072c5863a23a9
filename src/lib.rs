pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod indicator;
pub mod input;
pub mod lifecycle;
pub mod live;
pub mod model;
pub mod render;
pub mod series;
pub mod store;
pub mod strategy;
pub mod ui;
pub mod view;
