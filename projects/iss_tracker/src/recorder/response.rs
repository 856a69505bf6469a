use serde::{Deserialize, Serialize};

pub const SUCCESS_BODY: &str = "Data inserted successfully";
pub const FAILURE_BODY: &str = "An error occurred";

/// `{"statusCode": .., "body": ..}` as returned to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub fn success() -> Self {
        Self { status_code: 200, body: SUCCESS_BODY.to_string() }
    }

    pub fn failure() -> Self {
        Self { status_code: 500, body: FAILURE_BODY.to_string() }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
