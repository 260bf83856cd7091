pub mod ports;
pub mod record;
