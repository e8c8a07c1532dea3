use std::io;

use borsh::BorshSerialize;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::state::TargetAccount;

/// Builds an instruction that overwrites `target` with `payload`.
///
/// Accounts:
/// 0. `[writable]` target account, owned by `program_id`.
pub fn write(
    program_id: &Pubkey,
    target: &Pubkey,
    payload: &TargetAccount,
) -> io::Result<Instruction> {
    Ok(Instruction::new_with_bytes(
        *program_id,
        &payload.try_to_vec()?,
        vec![AccountMeta::new(*target, false)],
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_write_instruction_layout() {
        let program_id = Pubkey::new_unique();
        let target = Pubkey::new_unique();
        let ix = write(&program_id, &target, &TargetAccount::new([1, 2, 3, 4])).unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts, vec![AccountMeta::new(target, false)]);
        assert_eq!(
            ix.data,
            vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0]
        );
    }
}
