pub mod chunk;
pub mod persona;
pub mod turn;
