pub mod beacon_client;
pub mod error;
pub mod traits;
pub mod types;

pub use beacon_client::BeaconClient;
pub use error::BeaconClientError;
pub use traits::BeaconClientTrait;
