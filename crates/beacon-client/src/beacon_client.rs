use async_trait::async_trait;
use pon_types::{Hash32, VersionedSignedBeaconBlock, WithVersionName, Withdrawal};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{ApiError, BeaconClientError},
    traits::BeaconClientTrait,
    types::{
        ApiResult, BeaconResponse, BlockId, GenesisData, ProposerDuty, RandaoData, StateId,
        SyncStatus, ValidatorData,
    },
};

#[derive(Clone, Debug)]
pub struct BeaconClient {
    pub http: reqwest::Client,
    pub endpoint: Url,
}

impl BeaconClient {
    pub fn new(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn from_endpoint_str(endpoint: &str) -> Result<Self, BeaconClientError> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self::new(reqwest::Client::new(), endpoint))
    }

    /// Fetches `path` and decodes either `T` or an API error body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BeaconClientError> {
        let body = self.http_get(path).await?.text().await?;
        match serde_json::from_str::<ApiResult<T>>(&body)? {
            ApiResult::Ok(result) => Ok(result),
            ApiResult::Err(err) => {
                warn!(path, code = err.code(), %err, "beacon node returned an error");
                Err(err.into())
            }
        }
    }

    pub async fn http_get(&self, path: &str) -> Result<reqwest::Response, BeaconClientError> {
        let target = self.endpoint.join(path)?;
        debug!(%target, "beacon node request");
        Ok(self.http.get(target).send().await?)
    }
}

#[async_trait]
impl BeaconClientTrait for BeaconClient {
    async fn get_genesis(&self) -> Result<GenesisData, BeaconClientError> {
        let details: BeaconResponse<GenesisData> = self.get("eth/v1/beacon/genesis").await?;
        Ok(details.data)
    }

    async fn sync_status(&self) -> Result<SyncStatus, BeaconClientError> {
        let response: BeaconResponse<SyncStatus> = self.get("eth/v1/node/syncing").await?;
        Ok(response.data)
    }

    async fn current_slot(&self) -> Result<u64, BeaconClientError> {
        let sync_status = self.sync_status().await?;
        Ok(sync_status.head_slot)
    }

    async fn get_state_validators(
        &self,
        state_id: StateId,
    ) -> Result<Vec<ValidatorData>, BeaconClientError> {
        let endpoint = format!("eth/v1/beacon/states/{state_id}/validators?status=active,pending");
        let result: BeaconResponse<Vec<ValidatorData>> = self.get(&endpoint).await?;
        Ok(result.data)
    }

    async fn get_proposer_duties(
        &self,
        epoch: u64,
    ) -> Result<(Hash32, Vec<ProposerDuty>), BeaconClientError> {
        let endpoint = format!("eth/v1/validator/duties/proposer/{epoch}");
        let mut result: BeaconResponse<Vec<ProposerDuty>> = self.get(&endpoint).await?;
        let dependent_root_value = result.meta.remove("dependent_root").ok_or_else(|| {
            BeaconClientError::MissingExpectedData(
                "missing `dependent_root` in response".to_string(),
            )
        })?;
        let dependent_root: Hash32 = serde_json::from_value(dependent_root_value)?;
        Ok((dependent_root, result.data))
    }

    async fn get_expected_withdrawals(
        &self,
        state_id: StateId,
    ) -> Result<Vec<Withdrawal>, BeaconClientError> {
        let endpoint = format!("eth/v1/builder/states/{state_id}/expected_withdrawals");
        let result: BeaconResponse<Vec<Withdrawal>> = self.get(&endpoint).await?;
        Ok(result.data)
    }

    async fn get_randao(&self, state_id: StateId) -> Result<RandaoData, BeaconClientError> {
        let endpoint = format!("eth/v1/beacon/states/{state_id}/randao");
        let result: BeaconResponse<RandaoData> = self.get(&endpoint).await?;
        Ok(result.data)
    }

    /// The `version` key of the response selects the fork the block is decoded with.
    async fn get_block(
        &self,
        block_id: BlockId,
    ) -> Result<WithVersionName<VersionedSignedBeaconBlock>, BeaconClientError> {
        let body = self.http_get(&format!("eth/v2/beacon/blocks/{block_id}")).await?.text().await?;
        match WithVersionName::from_json(&body) {
            Ok(block) => Ok(block),
            Err(codec_err) => match serde_json::from_str::<ApiError>(&body) {
                Ok(api_err) => Err(api_err.into()),
                Err(_) => Err(codec_err.into()),
            },
        }
    }

    fn get_uri(&self) -> String {
        self.endpoint.to_string()
    }
}

#[cfg(test)]
mod beacon_client_tests {
    use std::sync::Arc;

    use mockito::Matcher;
    use pon_types::{ForkVersion, Version4};

    use super::*;
    use crate::types::ValidatorStatus;

    const CAPELLA_BLOCK: &str = include_str!("../../types/testdata/signed_beacon_block_capella.json");

    async fn serve(path: &str, status: usize, body: &str) -> (mockito::ServerGuard, mockito::Mock) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(format!("^{path}")))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        (server, mock)
    }

    fn client(server: &mockito::ServerGuard) -> BeaconClient {
        BeaconClient::from_endpoint_str(&server.url()).unwrap()
    }

    #[tokio::test]
    async fn test_get_sync_status_ok() {
        let (server, _mock) = serve(
            "/eth/v1/node/syncing",
            200,
            r#"{"data":{"is_syncing":false,"is_optimistic":true,"head_slot":"7222736","sync_distance":"1"}}"#,
        )
        .await;

        let client = client(&server);
        let sync_status = client.sync_status().await.unwrap();

        assert_eq!(sync_status.head_slot, 7222736);
        assert_eq!(sync_status.sync_distance, 1);
        assert!(!sync_status.is_syncing);
        assert!(sync_status.is_optimistic);
        assert_eq!(client.current_slot().await.unwrap(), 7222736);
    }

    #[tokio::test]
    async fn test_get_state_validators_ok() {
        let (server, _mock) = serve(
            "/eth/v1/beacon/states/genesis/validators",
            200,
            r#"{"execution_optimistic":false,"data":[{"index":"0","balance":"32000000000","status":"active_ongoing","validator":{"pubkey":"0x933ad9491b62059dd065b560d256d8957a8c402cc6e8d8ee7290ae11e8f7329267a8811c397529dac52ae1342ba58c95","withdrawal_credentials":"0x00f50428677c60f997aadeab24aabf7fceaef491c96a52b463ae91f95611cf71","effective_balance":"32000000000","slashed":false,"activation_eligibility_epoch":"0","activation_epoch":"0","exit_epoch":"18446744073709551615","withdrawable_epoch":"18446744073709551615"}}]}"#,
        )
        .await;

        let validators = client(&server).get_state_validators(StateId::Genesis).await.unwrap();

        assert_eq!(validators.len(), 1);
        assert_eq!(validators[0].balance, 32000000000);
        assert_eq!(validators[0].status, ValidatorStatus::ActiveOngoing);
        assert_eq!(validators[0].validator.exit_epoch, u64::MAX);
    }

    #[tokio::test]
    async fn test_get_proposer_duties_ok() {
        let (server, _mock) = serve(
            "/eth/v1/validator/duties/proposer/225740",
            200,
            r#"{"dependent_root":"0x44bff3186a234cf4fb2799c9a44dc089e33cd976a804081c652c47a8d66f11c2","execution_optimistic":false,"data":[{"pubkey":"0x926d6d7bcd4d6066d2c8a68fd2fd07f9f9eb0ac92adb3c0ddf57b63e65c078923a7cc67a17fc38cf7acb18f37795a343","validator_index":"556715","slot":"7223680"},{"pubkey":"0x8e8663c5da817c47c98099203c402e48992c4094a7e4c9b13e5ce89213b3c46a3c71613b5b3740a855c4c45493abf7ba","validator_index":"813363","slot":"7223681"},{"pubkey":"0xac3a37ae6c8047b4b467bd978590fe99825de55184f0688b4a275b92dfbe040c41b86eed25c21d43eb5a41be7e9e8e57","validator_index":"738684","slot":"7223682"}]}"#,
        )
        .await;

        let (root, proposer_duties) = client(&server).get_proposer_duties(225740).await.unwrap();
        assert_eq!(
            root.to_string(),
            "0x44bff3186a234cf4fb2799c9a44dc089e33cd976a804081c652c47a8d66f11c2"
        );
        assert_eq!(proposer_duties.len(), 3);
        assert_eq!(proposer_duties[2].validator_index, 738684);
        assert_eq!(proposer_duties[2].slot, 7223682);
    }

    #[tokio::test]
    async fn test_get_proposer_duties_missing_root() {
        let (server, _mock) = serve(
            "/eth/v1/validator/duties/proposer/1",
            200,
            r#"{"execution_optimistic":false,"data":[]}"#,
        )
        .await;

        let res = client(&server).get_proposer_duties(1).await;
        assert!(matches!(res, Err(BeaconClientError::MissingExpectedData(_))));
    }

    #[tokio::test]
    async fn test_get_genesis_ok() {
        let (server, _mock) = serve(
            "/eth/v1/beacon/genesis",
            200,
            r#"{"data":{"genesis_time":"1606824023","genesis_validators_root":"0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95","genesis_fork_version":"0x00000000"}}"#,
        )
        .await;

        let genesis = client(&server).get_genesis().await.unwrap();

        assert_eq!(genesis.genesis_time, 1606824023);
        assert_eq!(
            genesis.genesis_validators_root.to_string(),
            "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95"
        );
        assert_eq!(genesis.genesis_fork_version, Version4::from([0, 0, 0, 0]));
    }

    #[tokio::test]
    async fn test_get_genesis_malformed() {
        // three byte fork version
        let (server, _mock) = serve(
            "/eth/v1/beacon/genesis",
            200,
            r#"{"data":{"genesis_time":"1606824023","genesis_validators_root":"0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95","genesis_fork_version":"0x000000"}}"#,
        )
        .await;

        let res = client(&server).get_genesis().await;
        assert!(matches!(res, Err(BeaconClientError::Json(_))));
    }

    #[tokio::test]
    async fn test_get_expected_withdrawals_ok() {
        let (server, _mock) = serve(
            "/eth/v1/builder/states/head/expected_withdrawals",
            200,
            r#"{"execution_optimistic":false,"finalized":false,"data":[{"index":"16012063","validator_index":"508528","address":"0xc436eb8aed128275c8f224de2f1dd202c0ab5830","amount":"15605289"}]}"#,
        )
        .await;

        let withdrawals = client(&server).get_expected_withdrawals(StateId::Head).await.unwrap();
        assert_eq!(withdrawals.len(), 1);
        assert_eq!(withdrawals[0].index, 16012063);
        assert_eq!(withdrawals[0].amount, 15605289);
    }

    #[tokio::test]
    async fn test_get_randao_ok() {
        let (server, _mock) = serve(
            "/eth/v1/beacon/states/7223416/randao",
            200,
            r#"{"execution_optimistic":false,"data":{"randao":"0x22e2592817b653380160ad1bf9da05ce3a6bce99b4a337ba041976f99c052a38"}}"#,
        )
        .await;

        let randao = client(&server).get_randao(StateId::Slot(7223416)).await.unwrap();
        assert_eq!(
            randao.randao.to_string(),
            "0x22e2592817b653380160ad1bf9da05ce3a6bce99b4a337ba041976f99c052a38"
        );
    }

    #[tokio::test]
    async fn test_api_error() {
        let (server, _mock) = serve(
            "/eth/v1/beacon/states/finalized/randao",
            404,
            r#"{"code":404,"message":"State not found"}"#,
        )
        .await;

        let res = client(&server).get_randao(StateId::Finalized).await;
        match res {
            Err(BeaconClientError::Api(err)) => assert_eq!(err.code(), 404),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_block_ok() {
        let body = format!(
            r#"{{"version":"capella","execution_optimistic":false,"finalized":true,"data":{CAPELLA_BLOCK}}}"#
        );
        let (server, _mock) = serve("/eth/v2/beacon/blocks/head", 200, &body).await;

        let block = client(&server).get_block(BlockId::Head).await.unwrap();

        assert_eq!(block.version(), ForkVersion::Capella);
        assert_eq!(block.data.slot(), 7222896);
        assert_eq!(
            block.data.block_hash().to_string(),
            "0x43ab8f7f090036723a5a2fe741892e46cef8a2b97acc3bb9997d1a7083cbe4c0"
        );
    }

    #[tokio::test]
    async fn test_get_block_wrong_version() {
        // a capella block can not be read as deneb
        let body = format!(r#"{{"version":"deneb","data":{CAPELLA_BLOCK}}}"#);
        let (server, _mock) = serve("/eth/v2/beacon/blocks/7222896", 200, &body).await;

        let res = client(&server).get_block(BlockId::Slot(7222896)).await;
        assert!(matches!(res, Err(BeaconClientError::Codec(_))));
    }

    #[tokio::test]
    async fn test_get_block_api_error() {
        let (server, _mock) = serve(
            "/eth/v2/beacon/blocks/finalized",
            404,
            r#"{"code":404,"message":"Block not found"}"#,
        )
        .await;

        let res = client(&server).get_block(BlockId::Finalized).await;
        assert!(matches!(res, Err(BeaconClientError::Api(ApiError::ErrorMessage { code: 404, .. }))));
    }

    #[tokio::test]
    async fn test_shared_client() {
        let (server, _mock) = serve(
            "/eth/v1/node/syncing",
            200,
            r#"{"data":{"is_syncing":true,"head_slot":"10","sync_distance":"3"}}"#,
        )
        .await;

        let shared = Arc::new(client(&server));
        assert_eq!(shared.current_slot().await.unwrap(), 10);
        assert_eq!(shared.get_uri(), format!("{}/", server.url()));
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            BeaconClient::from_endpoint_str("not a url"),
            Err(BeaconClientError::UrlError(_))
        ));
    }
}
