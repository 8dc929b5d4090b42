use crate::schema::*;
use debileweb_common::api::ResultItem;
use debileweb_common::errors::*;
use diesel::prelude::*;

/// An artifact a job left behind: a log, a firehose report, a browsable
/// analyzer directory. Paths are relative to the farm's job output tree.
#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(table_name = results)]
pub struct JobResult {
    pub id: i32,
    pub job_id: i32,
    pub path: String,
    pub kind: String,
}

impl JobResult {
    pub fn list_for_job(
        my_job_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<JobResult>> {
        use crate::schema::results::dsl::*;
        let rows = results
            .filter(job_id.eq(my_job_id))
            .order_by(id.asc())
            .load::<JobResult>(connection)?;
        Ok(rows)
    }

    pub fn into_api_item(self) -> ResultItem {
        ResultItem {
            path: self.path,
            kind: self.kind,
        }
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = results)]
pub struct NewJobResult {
    pub job_id: i32,
    pub path: String,
    pub kind: String,
}

impl NewJobResult {
    pub fn insert(&self, connection: &mut SqliteConnection) -> Result<()> {
        diesel::insert_into(results::table)
            .values(self)
            .execute(connection)?;
        Ok(())
    }
}
