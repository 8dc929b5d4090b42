use crate::links;
use crate::schema::*;
use chrono::prelude::*;
use chrono::Duration;
use debileweb_common::api::BuilderItem;
use debileweb_common::config::PING_DEADLINE;
use debileweb_common::errors::*;
use diesel::prelude::*;

#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(treat_none_as_null = true)]
#[diesel(table_name = builders)]
pub struct Builder {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub status: Option<String>,
    pub last_ping: NaiveDateTime,
    pub online: bool,
}

impl Builder {
    pub fn get_id(my_id: i32, connection: &mut SqliteConnection) -> Result<Builder> {
        use crate::schema::builders::dsl::*;
        let builder = builders.filter(id.eq(my_id)).first::<Builder>(connection)?;
        Ok(builder)
    }

    pub fn get(my_name: &str, connection: &mut SqliteConnection) -> Result<Option<Builder>> {
        use crate::schema::builders::dsl::*;
        let builder = builders
            .filter(name.eq(my_name))
            .first::<Builder>(connection)
            .optional()?;
        Ok(builder)
    }

    pub fn list(connection: &mut SqliteConnection) -> Result<Vec<Builder>> {
        use crate::schema::builders::dsl::*;
        let results = builders.order_by(name.asc()).load::<Builder>(connection)?;
        Ok(results)
    }

    /// Flips builders offline that haven't pinged within the deadline. Run
    /// before returning builder listings so the dashboard never shows a dead
    /// agent as online.
    pub fn mark_stale_offline(connection: &mut SqliteConnection) -> Result<()> {
        let now = Utc::now().naive_utc();
        let deadline = now - Duration::seconds(PING_DEADLINE);

        diesel::update(builders::table.filter(builders::last_ping.lt(deadline)))
            .set((
                builders::online.eq(false),
                builders::status.eq(None as Option<String>),
            ))
            .execute(connection)?;

        Ok(())
    }

    pub fn update(&self, connection: &mut SqliteConnection) -> Result<()> {
        use crate::schema::builders::columns::*;
        diesel::update(builders::table.filter(id.eq(self.id)))
            .set(self)
            .execute(connection)?;
        Ok(())
    }

    pub fn into_api_item(self) -> BuilderItem {
        BuilderItem {
            path: links::builder_path(&self.name),
            name: self.name,
            address: self.address,
            status: self.status,
            last_ping: self.last_ping,
            online: self.online,
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = builders)]
pub struct NewBuilder {
    pub name: String,
    pub address: String,
    pub status: Option<String>,
    pub last_ping: NaiveDateTime,
    pub online: bool,
}

impl NewBuilder {
    pub fn new(name: String, address: String) -> NewBuilder {
        let now: DateTime<Utc> = Utc::now();
        NewBuilder {
            name,
            address,
            status: None,
            last_ping: now.naive_utc(),
            online: true,
        }
    }

    pub fn upsert(&self, connection: &mut SqliteConnection) -> Result<Builder> {
        if let Some(mut builder) = Builder::get(&self.name, connection)? {
            builder.last_ping = self.last_ping;
            builder.online = true;
            builder.update(connection)?;
            return Ok(builder);
        }

        diesel::insert_into(builders::table)
            .values(self)
            .execute(connection)?;

        Builder::get(&self.name, connection)?
            .ok_or_else(|| format_err!("Builder vanished after upsert: {:?}", self.name))
    }
}
