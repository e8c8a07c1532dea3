use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::state::TargetAccount;

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    msg!(
        "process_instruction: {}: {} accounts, data={:?}",
        program_id,
        accounts.len(),
        instruction_data
    );

    // try_from_slice rejects trailing bytes, so instruction_data is exactly
    // the encoded payload from here on.
    let payload = TargetAccount::try_from_slice(instruction_data)
        .map_err(|_| ProgramError::InvalidInstructionData)?;

    let accounts_iter = &mut accounts.iter();
    let account = next_account_info(accounts_iter)?;

    if account.owner != program_id {
        msg!("Incorrect account owner (must be this program)");
        return Err(ProgramError::IncorrectProgramId);
    }
    if !account.is_writable {
        msg!("Target account must be writable");
        return Err(ProgramError::InvalidAccountData);
    }

    let mut data = account.try_borrow_mut_data()?;
    if data.len() != instruction_data.len() {
        msg!(
            "Target account holds {} bytes, payload needs {}",
            data.len(),
            instruction_data.len()
        );
        return Err(ProgramError::InvalidAccountData);
    }

    msg!("Writing data {:?}", payload.data);
    data.copy_from_slice(instruction_data);
    msg!("Done");

    Ok(())
}

#[cfg(test)]
mod test {
    use borsh::BorshSerialize;
    use solana_program::clock::Epoch;

    use super::*;

    fn payload_len() -> usize {
        TargetAccount::default().try_to_vec().unwrap().len()
    }

    #[test]
    fn test_write_payload() {
        let program_id = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = vec![0u8; payload_len()];
        let account = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &program_id,
            false,
            Epoch::default(),
        );
        let accounts = vec![account];
        let payload = TargetAccount::new([1, 2, 3, 4]);

        process_instruction(&program_id, &accounts, &payload.try_to_vec().unwrap()).unwrap();

        let written = TargetAccount::try_from_slice(&accounts[0].data.borrow()).unwrap();
        assert_eq!(written, payload);
    }

    #[test]
    fn test_foreign_owner_rejected() {
        let program_id = Pubkey::new_unique();
        let other_owner = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = vec![0u8; payload_len()];
        let account = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &other_owner,
            false,
            Epoch::default(),
        );
        let payload = TargetAccount::new([7, 7, 7, 7]).try_to_vec().unwrap();

        let result = process_instruction(&program_id, &[account], &payload);
        assert_eq!(result, Err(ProgramError::IncorrectProgramId));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let program_id = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = vec![0u8; payload_len() / 2];
        let account = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &program_id,
            false,
            Epoch::default(),
        );
        let payload = TargetAccount::new([1, 2, 3, 4]).try_to_vec().unwrap();

        let result = process_instruction(&program_id, &[account], &payload);
        assert_eq!(result, Err(ProgramError::InvalidAccountData));
    }

    #[test]
    fn test_malformed_instruction_data() {
        let program_id = Pubkey::new_unique();
        let result = process_instruction(&program_id, &[], &[]);
        assert_eq!(result, Err(ProgramError::InvalidInstructionData));

        let result = process_instruction(&program_id, &[], &[0u8; 4]);
        assert_eq!(result, Err(ProgramError::InvalidInstructionData));
    }

    #[test]
    fn test_missing_account() {
        let program_id = Pubkey::new_unique();
        let payload = TargetAccount::default().try_to_vec().unwrap();
        let result = process_instruction(&program_id, &[], &payload);
        assert_eq!(result, Err(ProgramError::NotEnoughAccountKeys));
    }
}
