pub mod hash;
pub mod uuid;
