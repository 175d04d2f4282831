pub mod app;
pub mod clock;
pub mod input;
pub mod render;
pub mod score_client;
pub mod views;
