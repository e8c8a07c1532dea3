pub mod instruction;
pub mod processor;
pub mod state;

pub use processor::process_instruction;

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);
