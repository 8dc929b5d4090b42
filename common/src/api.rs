use crate::config::ConfigFile;
use crate::errors::*;
use crate::{auth, http, JobState};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use url::Url;

pub const AUTH_COOKIE_HEADER: &str = "X-Auth-Cookie";

pub struct Client {
    endpoint: Url,
    client: http::Client,
    is_default_endpoint: bool,
    auth_cookie: Option<String>,
}

impl Client {
    pub fn new(config: ConfigFile, endpoint: Option<String>) -> Result<Client> {
        let (endpoint, auth_cookie, is_default_endpoint) = if let Some(endpoint) = endpoint {
            let cookie = config
                .endpoints
                .get(&endpoint)
                .map(|e| e.cookie.to_string());
            (endpoint, cookie, false)
        } else if let Some(endpoint) = config.http.endpoint {
            (endpoint, None, true)
        } else {
            ("http://127.0.0.1:8150".to_string(), None, true)
        };

        let mut endpoint = endpoint
            .parse::<Url>()
            .with_context(|| anyhow!("Failed to parse endpoint as url: {:?}", endpoint))?;

        // If the url ends with a slash, remove it
        endpoint
            .path_segments_mut()
            .map_err(|_| anyhow!("Given endpoint url cannot be base"))?
            .pop_if_empty();

        debug!("Setting debileweb endpoint to {:?}", endpoint.as_str());
        let client = http::client()?;
        Ok(Client {
            endpoint,
            client,
            is_default_endpoint,
            auth_cookie,
        })
    }

    pub fn with_auth_cookie(&mut self) -> Result<&mut Self> {
        if let Ok(cookie_path) = env::var("DEBILEWEB_COOKIE_PATH") {
            debug!("Found cookie path in environment: {:?}", cookie_path);
            let auth_cookie =
                auth::read_cookie_from_file(cookie_path).context("Failed to load auth cookie")?;
            Ok(self.auth_cookie(auth_cookie))
        } else if self.is_default_endpoint {
            let auth_cookie = auth::find_auth_cookie().context("Failed to load auth cookie")?;
            Ok(self.auth_cookie(auth_cookie))
        } else {
            Ok(self)
        }
    }

    pub fn auth_cookie<I: Into<String>>(&mut self, cookie: I) -> &mut Self {
        self.auth_cookie = Some(cookie.into());
        self
    }

    fn url_join(&self, route: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            // this unwrap is safe because we've called path_segments_mut in the constructor before
            let mut path = url.path_segments_mut().expect("Url cannot be base");
            for segment in route.split('/') {
                path.push(segment);
            }
        }
        url
    }

    pub fn get(&self, path: Cow<'static, str>) -> http::RequestBuilder {
        let mut req = self.client.get(self.url_join(&path));
        if let Some(auth_cookie) = &self.auth_cookie {
            req = req.header(AUTH_COOKIE_HEADER, auth_cookie);
        }
        req
    }

    pub fn post(&self, path: Cow<'static, str>) -> http::RequestBuilder {
        let mut req = self.client.post(self.url_join(&path));
        if let Some(auth_cookie) = &self.auth_cookie {
            req = req.header(AUTH_COOKIE_HEADER, auth_cookie);
        }
        req
    }

    pub async fn dashboard(&self) -> Result<DashboardResponse> {
        let dashboard = self
            .get(Cow::Borrowed("api/v0/dashboard"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(dashboard)
    }

    pub async fn list_sources(&self, list: &ListSources) -> Result<SourceList> {
        let sources = self
            .get(Cow::Borrowed("api/v0/sources"))
            .query(list)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(sources)
    }

    pub async fn get_source(
        &self,
        group: &str,
        name: &str,
        query: &SourceQuery,
    ) -> Result<SourceDetail> {
        let source = self
            .get(Cow::Owned(format!("api/v0/sources/{}/{}", group, name)))
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(source)
    }

    pub async fn list_jobs(&self, list: &ListJobs) -> Result<JobList> {
        let jobs = self
            .get(Cow::Borrowed("api/v0/jobs"))
            .query(list)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(jobs)
    }

    pub async fn get_job(&self, id: i32) -> Result<JobReport> {
        let report = self
            .get(Cow::Owned(format!("api/v0/jobs/{}", id)))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(report)
    }

    pub async fn fetch_log(&self, id: i32) -> Result<Vec<u8>> {
        let log = self
            .get(Cow::Owned(format!("api/v0/jobs/{}/log", id)))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(log.to_vec())
    }

    pub async fn fetch_firehose(&self, id: i32) -> Result<Vec<u8>> {
        let firehose = self
            .get(Cow::Owned(format!("api/v0/jobs/{}/firehose", id)))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(firehose.to_vec())
    }

    pub async fn list_builders(&self) -> Result<Vec<BuilderItem>> {
        let builders = self
            .get(Cow::Borrowed("api/v0/builders"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(builders)
    }

    pub async fn get_builder(&self, name: &str) -> Result<BuilderDetail> {
        let builder = self
            .get(Cow::Owned(format!("api/v0/builders/{}", name)))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(builder)
    }

    pub async fn get_group(&self, name: &str) -> Result<GroupDetail> {
        let group = self
            .get(Cow::Owned(format!("api/v0/groups/{}", name)))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(group)
    }

    pub async fn get_maintainer(&self, login: &str) -> Result<MaintainerDetail> {
        let maintainer = self
            .get(Cow::Owned(format!("api/v0/maintainers/{}", login)))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(maintainer)
    }

    pub async fn search_sources(&self, term: &str) -> Result<Vec<String>> {
        let names = self
            .get(Cow::Borrowed("api/v0/search/sources"))
            .query(&SearchQuery {
                q: term.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(names)
    }

    pub async fn search_maintainers(&self, term: &str) -> Result<Vec<String>> {
        let maintainers = self
            .get(Cow::Borrowed("api/v0/search/maintainers"))
            .query(&SearchQuery {
                q: term.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(maintainers)
    }

    pub async fn list_prefixes(&self) -> Result<Vec<String>> {
        let prefixes = self
            .get(Cow::Borrowed("api/v0/prefixes"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(prefixes)
    }

    pub async fn import(&self, import: &ImportRequest) -> Result<()> {
        self.post(Cow::Borrowed("api/v0/import"))
            .json(import)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(Error::from)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Success {
    Ok,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListSources {
    pub filter: Option<String>,
    pub prefix: Option<String>,
    pub maintainer: Option<String>,
    pub name: Option<String>,
    pub group: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SourceQuery {
    pub version: Option<String>,
    pub run: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListJobs {
    pub builder: Option<String>,
    pub state: Option<JobState>,
    pub check: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    pub name: String,
    pub version: String,
    pub run: i32,
    pub group: String,
    pub uploader: String,
    pub uploaded_at: NaiveDateTime,
    pub total_jobs: usize,
    pub unfinished_jobs: usize,
    pub path: String,
    pub group_path: String,
    pub uploader_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceList {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub sources: Vec<SourceItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceDetail {
    pub source: SourceItem,
    pub versions: Vec<String>,
    pub latest_version: String,
    pub runs: Vec<i32>,
    pub latest_run: i32,
    pub source_jobs: Vec<JobItem>,
    pub binary_jobs: Vec<JobItem>,
    pub binaries: Vec<BinaryItem>,
    pub total: usize,
    pub unfinished: usize,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct JobItem {
    pub id: i32,
    pub check: String,
    pub state: JobState,
    pub source: String,
    pub version: String,
    pub builder: Option<String>,
    pub assigned_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    pub failed: Option<bool>,
    pub path: String,
    pub report_path: String,
    pub builder_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobList {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub jobs: Vec<JobItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobReport {
    pub job: JobItem,
    pub runtime: Option<String>,
    pub dependencies: Vec<String>,
    pub results: Vec<ResultItem>,
    pub log_path: String,
    pub firehose_path: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub path: String,
    pub kind: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct BinaryItem {
    pub name: String,
    pub version: String,
    pub architecture: String,
    pub job_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuilderItem {
    pub name: String,
    pub address: String,
    pub status: Option<String>,
    pub last_ping: NaiveDateTime,
    pub online: bool,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuilderDetail {
    pub builder: BuilderItem,
    pub active_jobs: Vec<JobItem>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintainerItem {
    pub login: String,
    pub name: String,
    pub email: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaintainerDetail {
    pub maintainer: MaintainerItem,
    pub sources: Vec<SourceItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupDetail {
    pub name: String,
    pub maintainer: MaintainerItem,
    pub source_count: i64,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub active_jobs: Vec<JobItem>,
    pub pending_jobs: i64,
    pub groups: HashMap<String, GroupStats>,
    pub now: NaiveDateTime,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: usize,
    pub unfinished: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub group: String,
    pub maintainer: MaintainerImport,
    pub checks: Vec<CheckImport>,
    #[serde(default)]
    pub builders: Vec<BuilderImport>,
    pub sources: Vec<SourceImport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderImport {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintainerImport {
    pub login: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckImport {
    pub name: String,
    pub targets_source: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceImport {
    pub name: String,
    pub version: String,
    pub run: i32,
    pub uploader: MaintainerImport,
    pub binaries: Vec<BinaryImport>,
    /// Observed job states from the farm. When empty, one pending job is
    /// scheduled per known check instead.
    pub jobs: Vec<JobImport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryImport {
    pub name: String,
    pub version: String,
    pub architecture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobImport {
    pub check: String,
    pub builder: Option<String>,
    pub assigned_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    pub failed: Option<bool>,
}
