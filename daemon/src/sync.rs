use crate::models;
use chrono::prelude::*;
use debileweb_common::api::{ImportRequest, SourceImport};
use debileweb_common::errors::*;
use diesel::SqliteConnection;
use std::collections::HashMap;

const BUILD_CHECK: &str = "build";

/// Mirrors one observed slice of the farm into the dashboard database:
/// group, maintainers, checks, builders, sources and their job states.
/// Importing the same payload twice is a no-op for identities and a refresh
/// for job lifecycle fields.
pub fn run(import: ImportRequest, connection: &mut SqliteConnection) -> Result<()> {
    info!(
        "received import for group {:?}: {} sources",
        import.group,
        import.sources.len()
    );

    let maintainer = models::NewMaintainer {
        login: import.maintainer.login.clone(),
        name: import.maintainer.name.clone(),
        email: import.maintainer.email.clone(),
    }
    .upsert(connection)?;

    let group = models::NewGroup {
        name: import.group.clone(),
        maintainer_id: maintainer.id,
    }
    .upsert(connection)?;

    for builder in &import.builders {
        debug!("registering builder {:?}", builder.name);
        models::NewBuilder::new(builder.name.clone(), builder.address.clone())
            .upsert(connection)?;
    }

    let mut checks = HashMap::new();
    for check in &import.checks {
        let row = models::NewCheck {
            name: check.name.clone(),
            targets_source: check.targets_source,
        }
        .upsert(connection)?;
        checks.insert(row.name.clone(), row);
    }
    for row in models::Check::list(connection)? {
        checks.entry(row.name.clone()).or_insert(row);
    }
    if checks.is_empty() {
        bail!("Import carries no checks and none are known yet");
    }

    for source in &import.sources {
        sync_source(source, &group, &checks, connection)
            .with_context(|| anyhow!("Failed to sync source {:?}", source.name))?;
    }

    info!("successfully synced import to database");
    Ok(())
}

fn sync_source(
    import: &SourceImport,
    group: &models::Group,
    checks: &HashMap<String, models::Check>,
    connection: &mut SqliteConnection,
) -> Result<()> {
    if import.name.is_empty() {
        bail!("Source name cannot be empty");
    }

    let uploader = models::NewMaintainer {
        login: import.uploader.login.clone(),
        name: import.uploader.name.clone(),
        email: import.uploader.email.clone(),
    }
    .upsert(connection)?;

    let source = match models::Source::get_by_identity(
        group.id,
        &import.name,
        &import.version,
        import.run,
        connection,
    )? {
        Some(source) => source,
        None => {
            debug!("inserting new source {:?} {:?}", import.name, import.version);
            models::NewSource {
                name: import.name.clone(),
                version: import.version.clone(),
                run: import.run,
                group_id: group.id,
                uploader_id: uploader.id,
                uploaded_at: Utc::now().naive_utc(),
            }
            .insert(connection)?
        }
    };

    let now = Utc::now().naive_utc();
    // (check name, job) pairs for the dependency pass below
    let mut jobs = Vec::new();

    if import.jobs.is_empty() {
        // nothing observed yet, schedule one pending job per known check
        for check in checks.values() {
            let job = models::NewJob {
                source_id: source.id,
                check_id: check.id,
                builder_id: None,
                created_at: now,
                assigned_at: None,
                finished_at: None,
                failed: None,
            }
            .upsert(connection)?;
            jobs.push((check.name.clone(), job));
        }
    } else {
        for observed in &import.jobs {
            let check = checks
                .get(&observed.check)
                .ok_or_else(|| format_err!("Unknown check in import: {:?}", observed.check))?;

            let builder_id = match &observed.builder {
                Some(name) => {
                    let builder = match models::Builder::get(name, connection)? {
                        Some(builder) => builder,
                        None => models::NewBuilder::new(name.clone(), String::new())
                            .upsert(connection)?,
                    };
                    Some(builder.id)
                }
                None => None,
            };

            let job = models::NewJob {
                source_id: source.id,
                check_id: check.id,
                builder_id,
                created_at: now,
                assigned_at: observed.assigned_at,
                finished_at: observed.finished_at,
                failed: observed.failed,
            }
            .upsert(connection)?;
            jobs.push((check.name.clone(), job));
        }
    }

    // every other check waits for the build
    let build = jobs
        .iter()
        .find(|(name, _)| name == BUILD_CHECK)
        .map(|(_, job)| (job.id, job.finished_at.is_some()));
    if let Some((build_id, _)) = build {
        for (name, job) in &jobs {
            if name != BUILD_CHECK {
                models::NewJobDependency {
                    job_id: job.id,
                    depends_on_id: build_id,
                }
                .insert(connection)?;
            }
        }
    }

    for binary in &import.binaries {
        models::NewBinary {
            source_id: source.id,
            job_id: None,
            name: binary.name.clone(),
            version: binary.version.clone(),
            architecture: binary.architecture.clone(),
        }
        .insert(connection)?;
    }

    // recorded binaries point back at the build that produced them
    if let Some((build_id, true)) = build {
        models::Binary::link_job(source.id, build_id, connection)?;
    }

    // finished jobs always leave a log and a firehose report behind
    for (_, job) in &jobs {
        if job.finished_at.is_some()
            && models::JobResult::list_for_job(job.id, connection)?.is_empty()
        {
            models::NewJobResult {
                job_id: job.id,
                path: format!("{}/log.txt", job.id),
                kind: "log".to_string(),
            }
            .insert(connection)?;
            models::NewJobResult {
                job_id: job.id,
                path: format!("{}/firehose.xml", job.id),
                kind: "firehose".to_string(),
            }
            .insert(connection)?;
        }
    }

    Ok(())
}
