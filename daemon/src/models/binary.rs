use crate::schema::*;
use debileweb_common::api::BinaryItem;
use debileweb_common::errors::*;
use diesel::prelude::*;

#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(table_name = binaries)]
pub struct Binary {
    pub id: i32,
    pub source_id: i32,
    pub job_id: Option<i32>,
    pub name: String,
    pub version: String,
    pub architecture: String,
}

impl Binary {
    pub fn list_for_source(
        my_source_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<Vec<Binary>> {
        use crate::schema::binaries::dsl::*;
        let results = binaries
            .filter(source_id.eq(my_source_id))
            .order_by((name, architecture))
            .load::<Binary>(connection)?;
        Ok(results)
    }

    pub fn link_job(
        my_source_id: i32,
        my_job_id: i32,
        connection: &mut SqliteConnection,
    ) -> Result<()> {
        use crate::schema::binaries::columns::*;
        diesel::update(binaries::table.filter(source_id.eq(my_source_id)))
            .set(job_id.eq(Some(my_job_id)))
            .execute(connection)?;
        Ok(())
    }

    pub fn into_api_item(self) -> BinaryItem {
        BinaryItem {
            name: self.name,
            version: self.version,
            architecture: self.architecture,
            job_id: self.job_id,
        }
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = binaries)]
pub struct NewBinary {
    pub source_id: i32,
    pub job_id: Option<i32>,
    pub name: String,
    pub version: String,
    pub architecture: String,
}

impl NewBinary {
    pub fn insert(&self, connection: &mut SqliteConnection) -> Result<()> {
        // (source_id, name, architecture) is unique, re-imports are no-ops
        diesel::insert_or_ignore_into(binaries::table)
            .values(self)
            .execute(connection)?;
        Ok(())
    }
}
