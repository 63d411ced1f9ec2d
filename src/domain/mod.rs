pub mod button;
pub mod entity;
pub mod grid;
pub mod marker;
pub mod rules;
pub mod tile;
