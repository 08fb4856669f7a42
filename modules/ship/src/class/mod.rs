#[cfg(test)]
mod test;

use crate::Error;
use pal_common::db::{Database, DatabaseErrors};
use pal_entity::ship_class;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, NotSet, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const NAME_REQUIRED: &str = "Ship class name is required.";
pub const NAME_EXISTS: &str = "Ship class name already exists. Use another name.";
pub const CLASS_IN_USE: &str = "Ship class is still used by a project.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipClass {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<ship_class::Model> for ShipClass {
    fn from(value: ship_class::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            note: value.note,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShipClass {
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// The ship class master data.
#[derive(Clone, Debug)]
pub struct ShipClassService {
    db: Database,
}

impl ShipClassService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All ship classes, ordered by name.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<ShipClass>, Error> {
        Ok(ship_class::Entity::find()
            .order_by_asc(ship_class::Column::Name)
            .order_by_asc(ship_class::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(ShipClass::from)
            .collect())
    }

    #[instrument(skip(self), err)]
    pub async fn create(&self, class: NewShipClass) -> Result<ShipClass, Error> {
        let name = class.name.trim();
        if name.is_empty() {
            return Err(Error::BadRequest(NAME_REQUIRED.into()));
        }

        let result = ship_class::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            note: Set(class
                .note
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty())),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(model.into()),
            Err(err) if err.is_duplicate() => Err(Error::Conflict(NAME_EXISTS.into())),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a ship class. Fails with a conflict while projects still reference it.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: i32) -> Result<bool, Error> {
        match ship_class::Entity::delete_by_id(id).exec(&self.db).await {
            Ok(result) => Ok(result.rows_affected > 0),
            Err(err) if err.is_foreign_key_violation() => {
                Err(Error::Conflict(CLASS_IN_USE.into()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
