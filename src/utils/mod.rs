pub mod hash;
pub mod token;
