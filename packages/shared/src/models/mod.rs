pub mod field_mask;
pub mod game;
pub mod games;
pub mod int64;
pub mod timestamp;
