pub mod callback;
pub mod intake;
