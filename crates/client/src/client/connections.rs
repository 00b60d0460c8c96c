//! Connection endpoints.

use tracing::debug;

use super::cache::{CONNECTION_TYPES_PATH, CONNECTIONS_PATH};
use super::{decode, encode};
use crate::client::TowerClient;
use crate::endpoints::{ApiRequest, encode_path_segment};
use crate::error::{ClientError, Result};
use crate::models::{Connection, ConnectionType, ConnectionUpdate};

impl TowerClient {
    pub async fn list_connections(&self) -> Result<Vec<Connection>> {
        decode(
            self.execute(ApiRequest::get(CONNECTIONS_PATH)).await?,
            CONNECTIONS_PATH,
        )
    }

    /// Get one connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the server answers 404.
    pub async fn get_connection(&self, id: &str) -> Result<Connection> {
        let path = connection_path(id);
        let body = self
            .execute(ApiRequest::get(&path))
            .await
            .map_err(|e| not_found(e, id))?;
        decode(body, &path)
    }

    /// Change a connection's name or config. Returns the updated connection.
    pub async fn update_connection(
        &self,
        id: &str,
        update: &ConnectionUpdate,
    ) -> Result<Connection> {
        let path = connection_path(id);
        debug!(connection = %id, "Updating connection");
        let body = self
            .execute(ApiRequest::patch(&path, encode(update)?))
            .await
            .map_err(|e| not_found(e, id))?;
        decode(body, &path)
    }

    pub async fn delete_connection(&self, id: &str) -> Result<()> {
        debug!(connection = %id, "Deleting connection");
        self.execute(ApiRequest::delete(connection_path(id)))
            .await
            .map_err(|e| not_found(e, id))?;
        Ok(())
    }

    /// The connection types the server supports. Cached for an hour.
    pub async fn list_connection_types(&self) -> Result<Vec<ConnectionType>> {
        decode(
            self.execute(ApiRequest::get(CONNECTION_TYPES_PATH)).await?,
            CONNECTION_TYPES_PATH,
        )
    }
}

fn connection_path(id: &str) -> String {
    format!("{CONNECTIONS_PATH}/{}", encode_path_segment(id))
}

fn not_found(error: ClientError, id: &str) -> ClientError {
    if error.status() == Some(404) {
        ClientError::NotFound(format!("connection '{id}'"))
    } else {
        error
    }
}
