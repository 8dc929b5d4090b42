use crate::links;
use crate::models::{Builder, Check, Source};
use crate::schema::*;
use crate::status;
use chrono::NaiveDateTime;
use crate::paginate::Pagination;
use debileweb_common::api::JobItem;
use debileweb_common::errors::*;
use debileweb_common::JobState;
use diesel::prelude::*;

/// Narrows the paginated job listing. All parts are optional and combine
/// with AND; unknown builder or check names simply match nothing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JobFilter {
    pub builder: Option<String>,
    pub check: Option<String>,
    pub state: Option<JobState>,
}

/// Predicates for `JobFilter` on a boxed query over the jobs join. Shared
/// between the row query and the count query.
macro_rules! apply_job_filter {
    ($query:ident, $filter:expr) => {
        if let Some(builder) = &$filter.builder {
            $query = $query.filter(builders::name.eq(builder.clone()));
        }
        if let Some(check) = &$filter.check {
            $query = $query.filter(checks::name.eq(check.clone()));
        }
        match $filter.state {
            Some(JobState::Finished) => {
                $query = $query.filter(jobs::finished_at.is_not_null());
            }
            Some(JobState::Running) => {
                $query = $query
                    .filter(jobs::finished_at.is_null())
                    .filter(jobs::builder_id.is_not_null());
            }
            Some(JobState::Pending) => {
                $query = $query
                    .filter(jobs::finished_at.is_null())
                    .filter(jobs::builder_id.is_null());
            }
            None => {}
        }
    };
}

#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(treat_none_as_null = true)]
#[diesel(table_name = jobs)]
pub struct Job {
    pub id: i32,
    pub source_id: i32,
    pub check_id: i32,
    pub builder_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub assigned_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    pub failed: Option<bool>,
}

impl Job {
    pub fn get_id(my_id: i32, connection: &mut SqliteConnection) -> Result<Option<Job>> {
        use crate::schema::jobs::dsl::*;
        let job = jobs
            .filter(id.eq(my_id))
            .first::<Job>(connection)
            .optional()?;
        Ok(job)
    }

    pub fn get_by_source_check(
        my_source_id: i32,
        my_check_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Option<Job>> {
        use crate::schema::jobs::dsl::*;
        let job = jobs
            .filter(source_id.eq(my_source_id))
            .filter(check_id.eq(my_check_id))
            .first::<Job>(connection)
            .optional()?;
        Ok(job)
    }

    /// A job with its check and (possibly absent) builder resolved in one
    /// query, for the report page.
    pub fn with_context(
        my_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Option<(Job, Source, Check, Option<Builder>)>> {
        let row = jobs::table
            .inner_join(sources::table)
            .inner_join(checks::table)
            .left_outer_join(builders::table)
            .filter(jobs::id.eq(my_id))
            .select((
                Job::as_select(),
                Source::as_select(),
                Check::as_select(),
                Option::<Builder>::as_select(),
            ))
            .first::<(Job, Source, Check, Option<Builder>)>(connection)
            .optional()?;
        Ok(row)
    }

    /// All jobs of one source with their checks and builders, ordered by
    /// check name as on the source page.
    pub fn for_source(
        my_source_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<(Job, Check, Option<Builder>)>> {
        let rows = jobs::table
            .inner_join(checks::table)
            .left_outer_join(builders::table)
            .filter(jobs::source_id.eq(my_source_id))
            .order_by(checks::name.asc())
            .then_order_by(jobs::id.asc())
            .select((
                Job::as_select(),
                Check::as_select(),
                Option::<Builder>::as_select(),
            ))
            .load::<(Job, Check, Option<Builder>)>(connection)?;
        Ok(rows)
    }

    /// All jobs belonging to any of the given sources, one query for a whole
    /// listing page.
    pub fn for_sources(
        source_ids: &[i32],
        connection: &mut SqliteConnection,
    ) -> Result<Vec<Job>> {
        use crate::schema::jobs::dsl::*;
        let results = jobs
            .filter(source_id.eq_any(source_ids))
            .order_by(id.asc())
            .load::<Job>(connection)?;
        Ok(results)
    }

    pub fn list(
        filter: &JobFilter,
        pagination: &Pagination,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<(Job, Source, Check, Option<Builder>)>> {
        let mut query = jobs::table
            .inner_join(sources::table)
            .inner_join(checks::table)
            .left_outer_join(builders::table)
            .select((
                Job::as_select(),
                Source::as_select(),
                Check::as_select(),
                Option::<Builder>::as_select(),
            ))
            .into_boxed();
        apply_job_filter!(query, filter);

        let rows = query
            .order_by(jobs::created_at.desc())
            .then_order_by(jobs::id.desc())
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load::<(Job, Source, Check, Option<Builder>)>(connection)?;
        Ok(rows)
    }

    pub fn count(filter: &JobFilter, connection: &mut SqliteConnection) -> Result<i64> {
        let mut query = jobs::table
            .inner_join(sources::table)
            .inner_join(checks::table)
            .left_outer_join(builders::table)
            .select(diesel::dsl::count_star())
            .into_boxed();
        apply_job_filter!(query, filter);
        let total = query.first::<i64>(connection)?;
        Ok(total)
    }

    /// Jobs a builder currently holds: assigned, not finished.
    pub fn active(
        connection: &mut SqliteConnection,
    ) -> Result<Vec<(Job, Source, Check, Builder)>> {
        let rows = jobs::table
            .inner_join(sources::table)
            .inner_join(checks::table)
            .inner_join(builders::table)
            .filter(jobs::finished_at.is_null())
            .order_by(jobs::assigned_at.asc())
            .then_order_by(jobs::id.asc())
            .select((
                Job::as_select(),
                Source::as_select(),
                Check::as_select(),
                Builder::as_select(),
            ))
            .load::<(Job, Source, Check, Builder)>(connection)?;
        Ok(rows)
    }

    pub fn active_for_builder(
        my_builder_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<(Job, Source, Check)>> {
        let rows = jobs::table
            .inner_join(sources::table)
            .inner_join(checks::table)
            .filter(jobs::builder_id.eq(my_builder_id))
            .filter(jobs::finished_at.is_null())
            .order_by(jobs::assigned_at.asc())
            .then_order_by(jobs::id.asc())
            .select((Job::as_select(), Source::as_select(), Check::as_select()))
            .load::<(Job, Source, Check)>(connection)?;
        Ok(rows)
    }

    /// Jobs nobody picked up yet.
    pub fn pending_count(connection: &mut SqliteConnection) -> Result<i64> {
        use crate::schema::jobs::dsl::*;
        let count = jobs
            .filter(assigned_at.is_null())
            .filter(finished_at.is_null())
            .count()
            .get_result::<i64>(connection)?;
        Ok(count)
    }

    /// Every job paired with the group name of its source, for the per-group
    /// dashboard stats.
    pub fn with_groups(connection: &mut SqliteConnection) -> Result<Vec<(String, Job)>> {
        let rows = jobs::table
            .inner_join(sources::table.inner_join(groups::table))
            .select((groups::name, Job::as_select()))
            .load::<(String, Job)>(connection)?;
        Ok(rows)
    }

    /// Check names of the jobs this job waits for.
    pub fn dependency_names(
        my_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<String>> {
        let dep_ids = job_dependencies::table
            .filter(job_dependencies::job_id.eq(my_id))
            .order_by(job_dependencies::id.asc())
            .select(job_dependencies::depends_on_id)
            .load::<i32>(connection)?;

        let names = jobs::table
            .inner_join(checks::table)
            .filter(jobs::id.eq_any(dep_ids))
            .order_by(checks::name.asc())
            .select(checks::name)
            .load::<String>(connection)?;
        Ok(names)
    }

    pub fn update(&self, connection: &mut SqliteConnection) -> Result<()> {
        use crate::schema::jobs::columns::*;
        diesel::update(jobs::table.filter(id.eq(self.id)))
            .set(self)
            .execute(connection)?;
        Ok(())
    }

    pub fn into_api_item(self, source: &Source, check: &Check, builder: Option<&Builder>) -> JobItem {
        let state = status::job_state(&self);
        JobItem {
            path: links::job_path(self.id),
            report_path: links::job_report_path(&check.name, self.id),
            builder_path: builder.map(|b| links::builder_path(&b.name)),
            id: self.id,
            check: check.name.clone(),
            state,
            source: source.name.clone(),
            version: source.version.clone(),
            builder: builder.map(|b| b.name.clone()),
            assigned_at: self.assigned_at,
            finished_at: self.finished_at,
            failed: self.failed,
        }
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = jobs)]
pub struct NewJob {
    pub source_id: i32,
    pub check_id: i32,
    pub builder_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub assigned_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    pub failed: Option<bool>,
}

impl NewJob {
    /// Inserts the job, or refreshes the observed lifecycle fields when the
    /// (source, check) pair is already scheduled. Returns the stored row.
    pub fn upsert(&self, connection: &mut SqliteConnection) -> Result<Job> {
        if let Some(mut job) = Job::get_by_source_check(self.source_id, self.check_id, connection)? {
            job.builder_id = self.builder_id;
            job.assigned_at = self.assigned_at;
            job.finished_at = self.finished_at;
            job.failed = self.failed;
            job.update(connection)?;
            return Ok(job);
        }

        diesel::insert_into(jobs::table)
            .values(self)
            .execute(connection)?;

        Job::get_by_source_check(self.source_id, self.check_id, connection)?
            .ok_or_else(|| format_err!("Job vanished after insert"))
    }
}

#[derive(Identifiable, Queryable, Clone, PartialEq, Eq, Debug)]
#[diesel(table_name = job_dependencies)]
pub struct JobDependency {
    pub id: i32,
    pub job_id: i32,
    pub depends_on_id: i32,
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = job_dependencies)]
pub struct NewJobDependency {
    pub job_id: i32,
    pub depends_on_id: i32,
}

impl NewJobDependency {
    pub fn insert(&self, connection: &mut SqliteConnection) -> Result<()> {
        diesel::insert_or_ignore_into(job_dependencies::table)
            .values(self)
            .execute(connection)?;
        Ok(())
    }
}
