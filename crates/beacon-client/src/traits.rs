use async_trait::async_trait;
use pon_types::{Hash32, VersionedSignedBeaconBlock, WithVersionName, Withdrawal};

use crate::{
    error::BeaconClientError,
    types::{BlockId, GenesisData, ProposerDuty, RandaoData, StateId, SyncStatus, ValidatorData},
};

#[async_trait]
#[auto_impl::auto_impl(Arc)]
pub trait BeaconClientTrait: Send + Sync + Clone {
    async fn get_genesis(&self) -> Result<GenesisData, BeaconClientError>;
    async fn sync_status(&self) -> Result<SyncStatus, BeaconClientError>;
    async fn current_slot(&self) -> Result<u64, BeaconClientError>;

    async fn get_state_validators(
        &self,
        state_id: StateId,
    ) -> Result<Vec<ValidatorData>, BeaconClientError>;
    /// Returns the dependent root alongside the duties for `epoch`.
    async fn get_proposer_duties(
        &self,
        epoch: u64,
    ) -> Result<(Hash32, Vec<ProposerDuty>), BeaconClientError>;
    async fn get_expected_withdrawals(
        &self,
        state_id: StateId,
    ) -> Result<Vec<Withdrawal>, BeaconClientError>;
    async fn get_randao(&self, state_id: StateId) -> Result<RandaoData, BeaconClientError>;
    async fn get_block(
        &self,
        block_id: BlockId,
    ) -> Result<WithVersionName<VersionedSignedBeaconBlock>, BeaconClientError>;

    fn get_uri(&self) -> String;
}
