pub mod console;
pub mod controller;
pub mod grid;
pub mod keys;
pub mod modal;
