use crate::errors::*;
pub use reqwest::{Client, RequestBuilder};
use std::time::Duration;

pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("debileweb/", env!("CARGO_PKG_VERSION")))
        .read_timeout(Duration::from_secs(60))
        .build()
        .map_err(Error::from)
}
