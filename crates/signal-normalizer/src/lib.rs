pub mod normalizer;
pub mod rules;


pub use normalizer::*;
pub use rules::*;
