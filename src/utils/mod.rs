pub mod markup;
pub mod threads;
