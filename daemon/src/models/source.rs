use crate::links;
use crate::paginate::{ListFilter, Pagination, SourceOrder};
use crate::schema::*;
use chrono::NaiveDateTime;
use debileweb_common::api::SourceItem;
use debileweb_common::errors::*;
use diesel::dsl::{exists, not};
use diesel::prelude::*;

/// Translates a `ListFilter` into predicates on a boxed sources query. Used
/// for both the row query and the matching-count query, so the two always
/// agree.
macro_rules! apply_list_filter {
    ($query:ident, $filter:expr) => {
        match $filter {
            ListFilter::Recent => {}
            ListFilter::Unfinished => {
                $query = $query.filter(exists(
                    jobs::table
                        .filter(jobs::source_id.eq(sources::id))
                        .filter(jobs::finished_at.is_null()),
                ));
            }
            ListFilter::Queued => {
                $query = $query.filter(exists(
                    jobs::table
                        .filter(jobs::source_id.eq(sources::id))
                        .filter(jobs::finished_at.is_null())
                        .filter(jobs::builder_id.is_null()),
                ));
            }
            ListFilter::Unbuilt => {
                $query = $query.filter(not(exists(
                    binaries::table.filter(binaries::source_id.eq(sources::id)),
                )));
            }
            ListFilter::Failed => {
                $query = $query.filter(exists(
                    jobs::table
                        .filter(jobs::source_id.eq(sources::id))
                        .filter(jobs::failed.eq(true)),
                ));
            }
            ListFilter::Group(name) => {
                $query = $query.filter(
                    sources::group_id.eq_any(
                        groups::table
                            .filter(groups::name.eq(name.clone()))
                            .select(groups::id),
                    ),
                );
            }
            ListFilter::Prefix(prefix) => {
                $query = $query.filter(sources::name.like(format!("{}%", prefix)));
                // "l" has its own prefix page, lib* has 26 more
                if prefix.as_str() == "l" {
                    $query = $query.filter(sources::name.not_like("lib%"));
                }
            }
            ListFilter::Maintainer(term) => {
                let pattern = format!("%{}%", term);
                $query = $query.filter(
                    sources::uploader_id.eq_any(
                        maintainers::table
                            .filter(
                                maintainers::name
                                    .like(pattern.clone())
                                    .or(maintainers::email.like(pattern.clone()))
                                    .or(maintainers::login.like(pattern)),
                            )
                            .select(maintainers::id),
                    ),
                );
            }
            ListFilter::NameSearch(term) => {
                $query = $query.filter(sources::name.like(format!("{}%", term)));
            }
        }
    };
}

#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(table_name = sources)]
pub struct Source {
    pub id: i32,
    pub name: String,
    pub version: String,
    pub run: i32,
    pub group_id: i32,
    pub uploader_id: i32,
    pub uploaded_at: NaiveDateTime,
}

impl Source {
    pub fn get_id(my_id: i32, connection: &mut SqliteConnection) -> Result<Source> {
        use crate::schema::sources::dsl::*;
        let source = sources.filter(id.eq(my_id)).first::<Source>(connection)?;
        Ok(source)
    }

    pub fn get_by_identity(
        my_group_id: i32,
        my_name: &str,
        my_version: &str,
        my_run: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Option<Source>> {
        use crate::schema::sources::dsl::*;
        let source = sources
            .filter(group_id.eq(my_group_id))
            .filter(name.eq(my_name))
            .filter(version.eq(my_version))
            .filter(run.eq(my_run))
            .first::<Source>(connection)
            .optional()?;
        Ok(source)
    }

    /// One page of sources for a listing, in the filter's deterministic
    /// order with the id as tiebreak.
    pub fn list(
        filter: &ListFilter,
        pagination: &Pagination,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<Source>> {
        let mut query = sources::table.into_boxed();
        apply_list_filter!(query, filter);

        query = match filter.order() {
            SourceOrder::UploadedDesc => query
                .order_by(sources::uploaded_at.desc())
                .then_order_by(sources::id.desc()),
            SourceOrder::UploadedAsc => query
                .order_by(sources::uploaded_at.asc())
                .then_order_by(sources::id.asc()),
            SourceOrder::NameAsc => query
                .order_by(sources::name.asc())
                .then_order_by(sources::id.asc()),
        };

        let results = query
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load::<Source>(connection)?;
        Ok(results)
    }

    /// Total number of sources the filter matches, for has_next.
    pub fn count(filter: &ListFilter, connection: &mut SqliteConnection) -> Result<i64> {
        let mut query = sources::table.select(diesel::dsl::count_star()).into_boxed();
        apply_list_filter!(query, filter);
        let total = query.first::<i64>(connection)?;
        Ok(total)
    }

    /// All versions this source name was uploaded with in a group, in
    /// database order. Callers sort with the Debian comparator.
    pub fn versions(
        my_group_id: i32,
        my_name: &str,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<String>> {
        use crate::schema::sources::dsl::*;
        let results = sources
            .select(version)
            .distinct()
            .filter(group_id.eq(my_group_id))
            .filter(name.eq(my_name))
            .load::<String>(connection)?;
        Ok(results)
    }

    pub fn runs(
        my_group_id: i32,
        my_name: &str,
        my_version: &str,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<i32>> {
        use crate::schema::sources::dsl::*;
        let results = sources
            .select(run)
            .filter(group_id.eq(my_group_id))
            .filter(name.eq(my_name))
            .filter(version.eq(my_version))
            .order_by(run.asc())
            .load::<i32>(connection)?;
        Ok(results)
    }

    pub fn recent_for_uploader(
        my_uploader_id: i32,
        limit: i64,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<Source>> {
        use crate::schema::sources::dsl::*;
        let results = sources
            .filter(uploader_id.eq(my_uploader_id))
            .order_by(uploaded_at.desc())
            .then_order_by(id.desc())
            .limit(limit)
            .load::<Source>(connection)?;
        Ok(results)
    }

    /// Autocomplete over source names: distinct names starting with the
    /// search term.
    pub fn search_names(
        term: &str,
        limit: i64,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<String>> {
        use crate::schema::sources::dsl::*;
        let results = sources
            .select(name)
            .distinct()
            .filter(name.like(format!("{}%", term)))
            .order_by(name.asc())
            .limit(limit)
            .load::<String>(connection)?;
        Ok(results)
    }

    pub fn into_api_item(
        self,
        group: &str,
        uploader: &str,
        total_jobs: usize,
        unfinished_jobs: usize,
    ) -> SourceItem {
        SourceItem {
            path: links::source_path(group, &self.name, &self.version, self.run),
            group_path: links::group_path(group, 0),
            uploader_path: links::maintainer_path(uploader),
            name: self.name,
            version: self.version,
            run: self.run,
            group: group.to_string(),
            uploader: uploader.to_string(),
            uploaded_at: self.uploaded_at,
            total_jobs,
            unfinished_jobs,
        }
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = sources)]
pub struct NewSource {
    pub name: String,
    pub version: String,
    pub run: i32,
    pub group_id: i32,
    pub uploader_id: i32,
    pub uploaded_at: NaiveDateTime,
}

impl NewSource {
    pub fn insert(&self, connection: &mut SqliteConnection) -> Result<Source> {
        diesel::insert_into(sources::table)
            .values(self)
            .execute(connection)?;

        Source::get_by_identity(self.group_id, &self.name, &self.version, self.run, connection)?
            .ok_or_else(|| format_err!("Source vanished after insert: {:?}", self.name))
    }
}
