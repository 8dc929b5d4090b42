use crate::links;
use crate::schema::*;
use debileweb_common::api::MaintainerItem;
use debileweb_common::errors::*;
use diesel::prelude::*;

#[derive(Identifiable, Queryable, Selectable, AsChangeset, Clone, PartialEq, Eq, Debug)]
#[diesel(table_name = maintainers)]
pub struct Maintainer {
    pub id: i32,
    pub login: String,
    pub name: String,
    pub email: String,
}

impl Maintainer {
    pub fn get_id(my_id: i32, connection: &mut SqliteConnection) -> Result<Maintainer> {
        use crate::schema::maintainers::dsl::*;
        let maintainer = maintainers
            .filter(id.eq(my_id))
            .first::<Maintainer>(connection)?;
        Ok(maintainer)
    }

    pub fn get(my_login: &str, connection: &mut SqliteConnection) -> Result<Option<Maintainer>> {
        use crate::schema::maintainers::dsl::*;
        let maintainer = maintainers
            .filter(login.eq(my_login))
            .first::<Maintainer>(connection)
            .optional()?;
        Ok(maintainer)
    }

    /// Autocomplete over maintainers: matches login, name or email and
    /// returns `Name <email>` strings like the upload metadata carries.
    pub fn search(term: &str, limit: i64, connection: &mut SqliteConnection) -> Result<Vec<String>> {
        use crate::schema::maintainers::dsl::*;
        let pattern = format!("%{}%", term);
        let matches = maintainers
            .filter(
                name.like(pattern.clone())
                    .or(email.like(pattern.clone()))
                    .or(login.like(pattern)),
            )
            .order_by(name.asc())
            .limit(limit)
            .load::<Maintainer>(connection)?;
        Ok(matches.into_iter().map(|m| m.display()).collect())
    }

    pub fn display(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn into_api_item(self) -> MaintainerItem {
        MaintainerItem {
            path: links::maintainer_path(&self.login),
            login: self.login,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Insertable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = maintainers)]
pub struct NewMaintainer {
    pub login: String,
    pub name: String,
    pub email: String,
}

impl NewMaintainer {
    /// Inserts the maintainer if the login is new, otherwise refreshes name
    /// and email. Returns the stored row either way.
    pub fn upsert(&self, connection: &mut SqliteConnection) -> Result<Maintainer> {
        if let Some(existing) = Maintainer::get(&self.login, connection)? {
            diesel::update(maintainers::table.filter(maintainers::id.eq(existing.id)))
                .set((
                    maintainers::name.eq(&self.name),
                    maintainers::email.eq(&self.email),
                ))
                .execute(connection)?;
        } else {
            diesel::insert_into(maintainers::table)
                .values(self)
                .execute(connection)?;
        }

        Maintainer::get(&self.login, connection)?
            .ok_or_else(|| format_err!("Maintainer vanished after upsert: {:?}", self.login))
    }
}
