use std::future::Future;

use interfaces_open_notify_iss_now::index::{FetchIssNowError, IssNowResult, OpenNotifyClient};

/// Where the current ISS position comes from.
pub trait PositionSource {
    fn fetch_current(&self) -> impl Future<Output = Result<IssNowResult, FetchIssNowError>> + Send;
}

impl PositionSource for OpenNotifyClient {
    fn fetch_current(&self) -> impl Future<Output = Result<IssNowResult, FetchIssNowError>> + Send {
        self.fetch_iss_now()
    }
}
