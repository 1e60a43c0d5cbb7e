pub mod functions;
pub mod random;
