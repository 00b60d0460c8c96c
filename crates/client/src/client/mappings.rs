//! Mapping schema, test and save endpoints.

use tower_mapping::{SaveMappingsPayload, TestMappingsRequest};
use tracing::debug;

use super::cache::{MAPPINGS_PATH, SCHEMA_PATH};
use super::{decode, encode};
use crate::client::TowerClient;
use crate::endpoints::ApiRequest;
use crate::error::Result;
use crate::models::{SaveResponse, SchemaResponse, TestResult};

const TEST_PATH: &str = "/api/mappings/test";

impl TowerClient {
    /// Fetch sample documents and saved mappings for a source/target pair.
    pub async fn get_schema(&self, source_type: &str, target_type: &str) -> Result<SchemaResponse> {
        let request = ApiRequest::get(SCHEMA_PATH)
            .query("source", source_type)
            .query("target", target_type);
        decode(self.execute(request).await?, SCHEMA_PATH)
    }

    /// Run a mapping set against the connection's sample data on the server.
    ///
    /// Does not change server state, so it never invalidates cached reads.
    pub async fn test_mappings(&self, request: &TestMappingsRequest) -> Result<TestResult> {
        debug!(
            connection = %request.connection_id,
            mappings = request.mapping_metadata.len(),
            "Testing mappings"
        );
        let call = ApiRequest::post(TEST_PATH, encode(request)?).read_only();
        decode(self.execute(call).await?, TEST_PATH)
    }

    /// Persist a mapping set. Invalidates cached schema responses.
    pub async fn save_mappings(&self, payload: &SaveMappingsPayload) -> Result<SaveResponse> {
        debug!(
            connection = %payload.connection_id,
            mappings = payload.mappings.len(),
            "Saving mappings"
        );
        let call = ApiRequest::post(MAPPINGS_PATH, encode(payload)?);
        decode(self.execute(call).await?, MAPPINGS_PATH)
    }
}
