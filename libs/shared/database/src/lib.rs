pub mod memory;

pub use memory::ClinicState;
