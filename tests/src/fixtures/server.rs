use actix_web::dev::{Server, ServerHandle};
use debileweb::config::Config;
use debileweb::db::Pool;
use debileweb_common::api::Client;
use debileweb_common::errors::bail;
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

pub struct ServerHolder {
    server: Option<Server>,
    server_handle: Mutex<Option<ServerHandle>>,
    pub address: SocketAddr,
}

impl ServerHolder {
    pub fn new(pool: Pool, config: Config) -> debileweb_common::errors::Result<Self> {
        let (server, address) = debileweb::build_server(pool, config)?;

        Ok(Self {
            server: Some(server),
            server_handle: Mutex::default(),
            address,
        })
    }

    pub fn start(&mut self) -> debileweb_common::errors::Result<()> {
        if let Some(server) = self.server.take() {
            let handle = server.handle();
            self.server_handle = Mutex::new(Some(handle));

            tokio::spawn(server);

            for _ in 0..100 {
                if TcpStream::connect(self.address).is_ok() {
                    return Ok(());
                }

                thread::sleep(Duration::from_millis(100));
            }

            bail!("Failed to wait for daemon to start");
        } else {
            bail!("can't start the server more than once")
        }
    }
}

impl Drop for ServerHolder {
    fn drop(&mut self) {
        if let Some(server_handle) = self.server_handle.lock().unwrap().as_ref() {
            #[allow(clippy::let_underscore_future)]
            let _ = server_handle.stop(true);
        }
    }
}

pub struct IsolatedServer {
    _server: ServerHolder,
    _tempdir: TempDir,
    /// Where the daemon expects the farm's per-job output files.
    pub jobs_path: PathBuf,
    pub client: Client,
}

impl IsolatedServer {
    pub fn new(
        server: ServerHolder,
        tempdir: TempDir,
        jobs_path: PathBuf,
        client: Client,
    ) -> Self {
        Self {
            _server: server,
            _tempdir: tempdir,
            jobs_path,
            client,
        }
    }
}
