//! Login.

use campus_erp_models::auth::{LoginRequest, LoginResponse};

use super::CampusErpClient;
use crate::error::Result;

impl CampusErpClient {
    /// Logs in and keeps the returned token for later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&request)
            .send()
            .await?;
        let login: LoginResponse = self.handle_response(response).await?;
        self.token = Some(login.token.clone());
        Ok(login)
    }
}
