use crate::auth;
use crate::config::Config;
use crate::dashboard::DashboardState;
use crate::db::Pool;
use crate::links;
use crate::models::{Binary, Builder, Group, Job, JobFilter, JobResult, Maintainer, Source};
use crate::paginate::{self, ListFilter, Pagination, PER_PAGE, SEARCH_LIMIT};
use crate::status;
use crate::sync;
use crate::versions;
use crate::web;
use actix_web::{get, HttpRequest, HttpResponse, Responder};
use debileweb_common::api::*;
use debileweb_common::errors::*;
use debileweb_common::utils;
use diesel::SqliteConnection;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().body("Authentication failed\n")
}

pub(crate) fn not_found() -> HttpResponse {
    HttpResponse::NotFound().body("Not found\n")
}

fn bad_request(msg: &str) -> HttpResponse {
    HttpResponse::BadRequest().body(format!("{}\n", msg))
}

/// Decorates one page of sources with group/uploader names and the job
/// status aggregate. Jobs are fetched with a single query for the whole
/// page, groups and uploaders once per distinct id.
fn source_items(
    sources: Vec<Source>,
    connection: &mut SqliteConnection,
) -> Result<Vec<SourceItem>> {
    let ids = sources.iter().map(|s| s.id).collect::<Vec<_>>();

    let mut jobs_by_source: HashMap<i32, Vec<Job>> = HashMap::new();
    for job in Job::for_sources(&ids, connection)? {
        jobs_by_source.entry(job.source_id).or_default().push(job);
    }

    let mut groups: HashMap<i32, Group> = HashMap::new();
    let mut uploaders: HashMap<i32, Maintainer> = HashMap::new();

    let mut items = Vec::new();
    for source in sources {
        if !groups.contains_key(&source.group_id) {
            groups.insert(source.group_id, Group::get_id(source.group_id, connection)?);
        }
        if !uploaders.contains_key(&source.uploader_id) {
            uploaders.insert(
                source.uploader_id,
                Maintainer::get_id(source.uploader_id, connection)?,
            );
        }

        let summary = status::summarize(
            jobs_by_source
                .get(&source.id)
                .map(|jobs| jobs.as_slice())
                .unwrap_or_default(),
        );

        let group = &groups[&source.group_id];
        let uploader = &uploaders[&source.uploader_id];
        items.push(source.into_api_item(
            &group.name,
            &uploader.login,
            summary.total,
            summary.unfinished,
        ));
    }

    Ok(items)
}

#[get("/api/v0/dashboard")]
pub async fn get_dashboard(
    pool: web::Data<Pool>,
    lock: web::Data<Arc<RwLock<DashboardState>>>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    let stale = {
        let state = lock.read().map_err(|_| format_err!("Lock poisoned"))?;
        !state.is_fresh()
    };

    if stale {
        let mut state = lock.write().map_err(|_| format_err!("Lock poisoned"))?;
        debug!("Updating cached dashboard");
        state.update(&mut connection)?;
    }

    let state = lock.read().map_err(|_| format_err!("Lock poisoned"))?;

    let resp = state.get_response()?;
    Ok(HttpResponse::Ok().json(resp))
}

#[get("/api/v0/sources")]
pub async fn list_sources(
    query: web::Query<ListSources>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let query = query.into_inner();

    let page = query.page.unwrap_or(0);
    if page < 0 {
        return Ok(bad_request("Page number cannot be negative"));
    }
    let pagination = Pagination::new(page, PER_PAGE)?;

    let filter = if let Some(key) = &query.filter {
        ListFilter::parse(key)
    } else if let Some(group) = &query.group {
        ListFilter::Group(group.clone())
    } else if let Some(prefix) = &query.prefix {
        ListFilter::Prefix(prefix.clone())
    } else if let Some(maintainer) = &query.maintainer {
        ListFilter::Maintainer(maintainer.clone())
    } else if let Some(name) = &query.name {
        ListFilter::NameSearch(name.clone())
    } else {
        ListFilter::Recent
    };
    debug!("listing sources with filter {:?} page {}", filter, page);

    let mut connection = pool.get().map_err(Error::from)?;

    let total = Source::count(&filter, &mut connection)?;
    let sources = Source::list(&filter, &pagination, &mut connection)?;
    let sources = source_items(sources, &mut connection)?;

    Ok(HttpResponse::Ok().json(SourceList {
        total,
        page,
        per_page: PER_PAGE,
        has_prev: pagination.has_prev(),
        has_next: pagination.has_next(total),
        sources,
    }))
}

#[get("/api/v0/sources/{group}/{name}")]
pub async fn get_source(
    path: web::Path<(String, String)>,
    query: web::Query<SourceQuery>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let (group_name, name) = path.into_inner();
    if group_name.is_empty() || name.is_empty() {
        return Ok(bad_request("Source identity cannot be empty"));
    }

    let mut connection = pool.get().map_err(Error::from)?;

    let group = match Group::get(&group_name, &mut connection)? {
        Some(group) => group,
        None => return Ok(not_found()),
    };

    let mut version_list = Source::versions(group.id, &name, &mut connection)?;
    if version_list.is_empty() {
        return Ok(not_found());
    }
    versions::sort(&mut version_list);
    let latest_version = version_list
        .last()
        .cloned()
        .ok_or_else(|| format_err!("Version list cannot be empty here"))?;

    let this_version = match versions::resolve(&version_list, query.version.as_deref()) {
        Some(version) => version.clone(),
        None => return Ok(not_found()),
    };

    let runs = Source::runs(group.id, &name, &this_version, &mut connection)?;
    let latest_run = match runs.last() {
        Some(run) => *run,
        None => return Ok(not_found()),
    };
    let this_run = match query.run {
        None | Some(0) => latest_run,
        Some(run) => run,
    };

    let source = match Source::get_by_identity(
        group.id,
        &name,
        &this_version,
        this_run,
        &mut connection,
    )? {
        Some(source) => source,
        None => return Ok(not_found()),
    };

    let uploader = Maintainer::get_id(source.uploader_id, &mut connection)?;

    let job_rows = Job::for_source(source.id, &mut connection)?;
    let summary = status::summarize(job_rows.iter().map(|(job, _, _)| job));

    let mut source_jobs = Vec::new();
    let mut binary_jobs = Vec::new();
    for (job, check, builder) in job_rows {
        let targets_source = check.targets_source;
        let item = job.into_api_item(&source, &check, builder.as_ref());
        if targets_source {
            source_jobs.push(item);
        } else {
            binary_jobs.push(item);
        }
    }

    let binaries = Binary::list_for_source(source.id, &mut connection)?
        .into_iter()
        .map(|b| b.into_api_item())
        .collect();

    let source = source.into_api_item(
        &group.name,
        &uploader.login,
        summary.total,
        summary.unfinished,
    );

    Ok(HttpResponse::Ok().json(SourceDetail {
        source,
        versions: version_list,
        latest_version,
        runs,
        latest_run,
        source_jobs,
        binary_jobs,
        binaries,
        total: summary.total,
        unfinished: summary.unfinished,
    }))
}

#[get("/api/v0/jobs")]
pub async fn list_jobs(
    query: web::Query<ListJobs>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let query = query.into_inner();

    let page = query.page.unwrap_or(0);
    if page < 0 {
        return Ok(bad_request("Page number cannot be negative"));
    }
    let pagination = Pagination::new(page, PER_PAGE)?;

    let filter = JobFilter {
        builder: query.builder,
        check: query.check,
        state: query.state,
    };

    let mut connection = pool.get().map_err(Error::from)?;

    let total = Job::count(&filter, &mut connection)?;
    let jobs = Job::list(&filter, &pagination, &mut connection)?
        .into_iter()
        .map(|(job, source, check, builder)| job.into_api_item(&source, &check, builder.as_ref()))
        .collect();

    Ok(HttpResponse::Ok().json(JobList {
        total,
        page,
        per_page: PER_PAGE,
        has_prev: pagination.has_prev(),
        has_next: pagination.has_next(total),
        jobs,
    }))
}

#[get("/api/v0/jobs/{id}")]
pub async fn get_job(id: web::Path<i32>, pool: web::Data<Pool>) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    let (job, source, check, builder) = match Job::with_context(id.into_inner(), &mut connection)?
    {
        Some(row) => row,
        None => return Ok(not_found()),
    };

    let runtime = match (job.assigned_at, job.finished_at) {
        (Some(assigned_at), Some(finished_at)) => Some(utils::runtime_display(
            (finished_at - assigned_at).num_seconds(),
        )),
        _ => None,
    };

    let dependencies = Job::dependency_names(job.id, &mut connection)?;
    let results = JobResult::list_for_job(job.id, &mut connection)?
        .into_iter()
        .map(|r| r.into_api_item())
        .collect();

    let log_path = links::job_log_path(job.id);
    let firehose_path = links::job_firehose_path(job.id);

    Ok(HttpResponse::Ok().json(JobReport {
        job: job.into_api_item(&source, &check, builder.as_ref()),
        runtime,
        dependencies,
        results,
        log_path,
        firehose_path,
    }))
}

#[get("/api/v0/jobs/{id}/log")]
pub async fn get_job_log(
    id: web::Path<i32>,
    cfg: web::Data<Config>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    let id = id.into_inner();
    if Job::get_id(id, &mut connection)?.is_none() {
        return Ok(not_found());
    }

    let path = cfg.jobs_path.join(id.to_string()).join("log.txt");
    crate::api::forward_job_file(&path, "text/plain; charset=utf-8")
}

#[get("/api/v0/jobs/{id}/firehose")]
pub async fn get_job_firehose(
    id: web::Path<i32>,
    cfg: web::Data<Config>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    let id = id.into_inner();
    if Job::get_id(id, &mut connection)?.is_none() {
        return Ok(not_found());
    }

    let path = cfg.jobs_path.join(id.to_string()).join("firehose.xml");
    crate::api::forward_job_file(&path, "application/xml; charset=utf-8")
}

#[get("/api/v0/builders")]
pub async fn list_builders(pool: web::Data<Pool>) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    // mark stale builders as offline before returning any results
    Builder::mark_stale_offline(&mut connection)?;

    let builders = Builder::list(&mut connection)?
        .into_iter()
        .map(|b| b.into_api_item())
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(builders))
}

#[get("/api/v0/builders/{name}")]
pub async fn get_builder(
    name: web::Path<String>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    Builder::mark_stale_offline(&mut connection)?;

    let builder = match Builder::get(&name.into_inner(), &mut connection)? {
        Some(builder) => builder,
        None => return Ok(not_found()),
    };

    let active_jobs = Job::active_for_builder(builder.id, &mut connection)?
        .into_iter()
        .map(|(job, source, check)| job.into_api_item(&source, &check, Some(&builder)))
        .collect();

    Ok(HttpResponse::Ok().json(BuilderDetail {
        builder: builder.into_api_item(),
        active_jobs,
    }))
}

#[get("/api/v0/groups/{name}")]
pub async fn get_group(
    name: web::Path<String>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    let group = match Group::get(&name.into_inner(), &mut connection)? {
        Some(group) => group,
        None => return Ok(not_found()),
    };

    let maintainer = Maintainer::get_id(group.maintainer_id, &mut connection)?;
    let source_count = group.source_count(&mut connection)?;

    Ok(HttpResponse::Ok().json(GroupDetail {
        path: links::group_path(&group.name, 0),
        name: group.name,
        maintainer: maintainer.into_api_item(),
        source_count,
    }))
}

#[get("/api/v0/maintainers/{login}")]
pub async fn get_maintainer(
    login: web::Path<String>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;

    let maintainer = match Maintainer::get(&login.into_inner(), &mut connection)? {
        Some(maintainer) => maintainer,
        None => return Ok(not_found()),
    };

    let sources = Source::recent_for_uploader(maintainer.id, PER_PAGE, &mut connection)?;
    let sources = source_items(sources, &mut connection)?;

    Ok(HttpResponse::Ok().json(MaintainerDetail {
        maintainer: maintainer.into_api_item(),
        sources,
    }))
}

#[get("/api/v0/search/sources")]
pub async fn search_sources(
    query: web::Query<SearchQuery>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;
    let names = Source::search_names(&query.q, SEARCH_LIMIT, &mut connection)?;
    Ok(HttpResponse::Ok().json(names))
}

#[get("/api/v0/search/maintainers")]
pub async fn search_maintainers(
    query: web::Query<SearchQuery>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    let mut connection = pool.get().map_err(Error::from)?;
    let maintainers = Maintainer::search(&query.q, SEARCH_LIMIT, &mut connection)?;
    Ok(HttpResponse::Ok().json(maintainers))
}

#[get("/api/v0/prefixes")]
pub async fn list_prefixes() -> web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(paginate::default_prefixes()))
}

// this route is configured in src/lib.rs so we can reconfigure the json extractor
// #[post("/api/v0/import")]
pub async fn import(
    req: HttpRequest,
    cfg: web::Data<Config>,
    import: web::Json<ImportRequest>,
    pool: web::Data<Pool>,
) -> web::Result<impl Responder> {
    if auth::admin(&cfg, &req).is_err() {
        return Ok(forbidden());
    }

    let import = import.into_inner();
    let mut connection = pool.get().map_err(Error::from)?;

    sync::run(import, &mut connection)?;

    Ok(HttpResponse::Ok().json(()))
}
