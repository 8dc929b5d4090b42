pub mod server;

use crate::fixtures::server::{IsolatedServer, ServerHolder};
use debileweb::config::{self, ConfigFile};
use debileweb::db;
use debileweb_common::api::Client;
use debileweb_common::config::ConfigFile as ClientConfigFile;
use debileweb_common::errors::info;
use rand::distr::{Alphanumeric, SampleString};
use rstest::fixture;
use tempfile::TempDir;

fn make_client(endpoint: String, cookie: &str) -> Client {
    info!("Setting up client for {:?}", endpoint);
    let mut client = Client::new(ClientConfigFile::default(), Some(endpoint)).unwrap();
    client.auth_cookie(cookie);
    client
}

#[fixture]
pub fn isolated_server() -> IsolatedServer {
    let tempdir = TempDir::new().expect("Failed to create temp dir");
    let db_path = tempdir.path().join("debileweb.db");
    let jobs_path = tempdir.path().join("jobs");

    let pool = db::setup_pool(db_path.to_str().expect("db path is not utf-8"))
        .expect("Failed to set up database");

    let cookie = Alphanumeric.sample_string(&mut rand::rng(), 32);

    let mut config_file = ConfigFile::default();
    config_file.http.bind_addr = Some("127.0.0.1:0".to_string());
    config_file.paths.jobs_path = Some(jobs_path.clone());
    let config = config::from_struct(config_file, cookie.clone());

    let mut server = ServerHolder::new(pool, config).expect("Failed to build server");
    server.start().expect("Failed to start server");

    let client = make_client(format!("http://{}", server.address), &cookie);

    IsolatedServer::new(server, tempdir, jobs_path, client)
}
