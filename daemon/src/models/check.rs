use crate::schema::*;
use debileweb_common::errors::*;
use diesel::prelude::*;

#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(table_name = checks)]
pub struct Check {
    pub id: i32,
    pub name: String,
    /// Whether the check runs against the source itself or against the
    /// binaries built from it.
    pub targets_source: bool,
}

impl Check {
    pub fn get_id(my_id: i32, connection: &mut SqliteConnection) -> Result<Check> {
        use crate::schema::checks::dsl::*;
        let check = checks.filter(id.eq(my_id)).first::<Check>(connection)?;
        Ok(check)
    }

    pub fn get(my_name: &str, connection: &mut SqliteConnection) -> Result<Option<Check>> {
        use crate::schema::checks::dsl::*;
        let check = checks
            .filter(name.eq(my_name))
            .first::<Check>(connection)
            .optional()?;
        Ok(check)
    }

    pub fn list(connection: &mut SqliteConnection) -> Result<Vec<Check>> {
        use crate::schema::checks::dsl::*;
        let results = checks.order_by(name.asc()).load::<Check>(connection)?;
        Ok(results)
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = checks)]
pub struct NewCheck {
    pub name: String,
    pub targets_source: bool,
}

impl NewCheck {
    pub fn upsert(&self, connection: &mut SqliteConnection) -> Result<Check> {
        if let Some(existing) = Check::get(&self.name, connection)? {
            diesel::update(checks::table.filter(checks::id.eq(existing.id)))
                .set(checks::targets_source.eq(self.targets_source))
                .execute(connection)?;
        } else {
            diesel::insert_into(checks::table)
                .values(self)
                .execute(connection)?;
        }

        Check::get(&self.name, connection)?
            .ok_or_else(|| format_err!("Check vanished after upsert: {:?}", self.name))
    }
}
