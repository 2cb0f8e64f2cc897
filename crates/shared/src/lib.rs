pub mod deck;
pub mod domain;
pub mod draw;
pub mod error;
pub mod modes;
pub mod protocol;
