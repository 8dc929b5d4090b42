use crate::schema::*;
use debileweb_common::errors::*;
use diesel::prelude::*;

#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(table_name = groups)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub maintainer_id: i32,
}

impl Group {
    pub fn get_id(my_id: i32, connection: &mut SqliteConnection) -> Result<Group> {
        use crate::schema::groups::dsl::*;
        let group = groups.filter(id.eq(my_id)).first::<Group>(connection)?;
        Ok(group)
    }

    pub fn get(my_name: &str, connection: &mut SqliteConnection) -> Result<Option<Group>> {
        use crate::schema::groups::dsl::*;
        let group = groups
            .filter(name.eq(my_name))
            .first::<Group>(connection)
            .optional()?;
        Ok(group)
    }

    pub fn source_count(&self, connection: &mut SqliteConnection) -> Result<i64> {
        use crate::schema::sources::dsl::*;
        let count = sources
            .filter(group_id.eq(self.id))
            .count()
            .get_result::<i64>(connection)?;
        Ok(count)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = groups)]
pub struct NewGroup {
    pub name: String,
    pub maintainer_id: i32,
}

impl NewGroup {
    pub fn upsert(&self, connection: &mut SqliteConnection) -> Result<Group> {
        if let Some(existing) = Group::get(&self.name, connection)? {
            diesel::update(groups::table.filter(groups::id.eq(existing.id)))
                .set(groups::maintainer_id.eq(self.maintainer_id))
                .execute(connection)?;
        } else {
            diesel::insert_into(groups::table)
                .values(self)
                .execute(connection)?;
        }

        Group::get(&self.name, connection)?
            .ok_or_else(|| format_err!("Group vanished after upsert: {:?}", self.name))
    }
}
