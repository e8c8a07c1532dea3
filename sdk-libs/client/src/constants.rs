/// Seed the target account address is derived from.
pub const DEFAULT_SEED: &str = "target";

/// Rough guess at how many signatures the workflow pays for. Funding covers
/// this many signature fees on top of the rent exemption. Also has to leave
/// the payer above its own rent-exempt minimum once the account is paid for.
pub const SIGNATURE_BUDGET_MULTIPLIER: u64 = 1000;

/// Payload written when none is configured.
pub const DEFAULT_PAYLOAD: [u32; 4] = [1, 2, 3, 4];

pub const DEFAULT_PROGRAM_KEYPAIR_PATH: &str = "dist/program/data_target-keypair.json";
pub const DEFAULT_PROGRAM_SO_PATH: &str = "dist/program/data_target.so";
