use solana_sdk::pubkey::Pubkey;

use super::{
    derive::{derive_group, derive_reimbursement_account},
    rpc::ChainReader,
    state::{find_table_row, Group, ReimbursementAccount, TableDecodeError, TableLookup},
};

/// Client for one reimbursement group. Constructed per session and passed to
/// whatever needs to read program state or build its instructions.
#[derive(Debug, Clone)]
pub struct ReimbursementClient {
    program_id: Pubkey,
    group_num: u32,
    group: Pubkey,
}

impl ReimbursementClient {
    pub fn new(program_id: Pubkey, group_num: u32) -> Self {
        let (group, _) = derive_group(group_num, &program_id);

        Self {
            program_id,
            group_num,
            group,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn group_num(&self) -> u32 {
        self.group_num
    }

    pub fn group_address(&self) -> &Pubkey {
        &self.group
    }

    pub fn reimbursement_account_address(&self, owner: &Pubkey) -> Pubkey {
        derive_reimbursement_account(&self.group, owner, &self.program_id).0
    }

    pub async fn fetch_group(&self, rpc: &impl ChainReader) -> eyre::Result<Group> {
        let data = rpc
            .account_data(&self.group)
            .await?
            .ok_or_else(|| eyre::eyre!("Group #{} ({}) does not exist", self.group_num, self.group))?;

        Ok(Group::decode(&data)?)
    }

    pub async fn fetch_reimbursement_account(
        &self,
        rpc: &impl ChainReader,
        owner: &Pubkey,
    ) -> eyre::Result<Option<ReimbursementAccount>> {
        let address = self.reimbursement_account_address(owner);

        match rpc.account_data(&address).await? {
            Some(data) => Ok(Some(ReimbursementAccount::decode(&data)?)),
            None => Ok(None),
        }
    }

    /// Looks up `owner`'s row in the group's claim table. A missing table account is `NotFound`.
    pub async fn find_table_row(
        &self,
        rpc: &impl ChainReader,
        group: &Group,
        owner: &Pubkey,
    ) -> eyre::Result<Result<TableLookup, TableDecodeError>> {
        match rpc.account_data(&group.table).await? {
            Some(data) => Ok(find_table_row(&data, owner)),
            None => Ok(Ok(TableLookup::NotFound)),
        }
    }

    pub fn reimbursed(account: Option<&ReimbursementAccount>, token_index: usize) -> bool {
        account.is_some_and(|account| account.is_reimbursed(token_index))
    }
}
