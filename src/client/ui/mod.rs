mod menu;
mod quiz;
mod render;

pub use render::render;
