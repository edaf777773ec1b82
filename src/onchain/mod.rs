pub mod client;
pub mod constants;
pub mod crypto;
pub mod derive;
#[cfg(test)]
pub mod fake;
pub mod ixs;
pub mod reimbursement;
pub mod rpc;
pub mod state;
pub mod tx;
pub mod typedefs;
