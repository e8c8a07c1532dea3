pub mod address;
pub mod constants;
pub mod errors;
pub mod funder;
pub mod keypair;
pub mod layout;
pub mod provisioner;
pub mod rpc;
pub mod target;
pub mod verifier;
pub mod workflow;

pub use errors::WorkflowError;
pub use workflow::{WorkflowConfig, WorkflowDriver, WorkflowReport, WorkflowState, WorkflowStep};
