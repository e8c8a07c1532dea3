use borsh::{BorshDeserialize, BorshSerialize};

/// Contents of a target account. The on-chain layout is the borsh encoding
/// of the four fields, little endian, without a length prefix.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TargetAccount {
    pub data: [u32; 4],
}

impl TargetAccount {
    pub fn new(data: [u32; 4]) -> Self {
        Self { data }
    }
}
