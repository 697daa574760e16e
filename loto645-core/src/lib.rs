pub mod filters;
pub mod generator;
pub mod grid;
pub mod history;
pub mod rank;
pub mod rarity;
