
use crate::{
    Error,
    model::{
        Asset, AssetFilter, AssetInput, LOCATION_EXISTS, LOCATION_NAME_REQUIRED,
        LOCATION_NOT_FOUND, Location, LocationChoice, NewLocation, Validation,
    },
};
use pal_common::db::{Database, DatabaseErrors};
use pal_entity::{asset, location};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel, NotSet, QueryFilter, QueryOrder, TransactionTrait,
};
use sea_query::{BinOper, Expr, Func, SimpleExpr};
use tracing::instrument;

/// The locations assets are kept at.
#[derive(Clone, Debug)]
pub struct LocationService {
    db: Database,
}

impl LocationService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Active locations, ordered by name. These are the ones offered for selection.
    #[instrument(skip(self), err)]
    pub async fn list_active(&self) -> Result<Vec<Location>, Error> {
        Ok(location::Entity::find()
            .filter(location::Column::Active.eq(true))
            .order_by_asc(location::Column::Name)
            .order_by_asc(location::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Location::from)
            .collect())
    }

    #[instrument(skip(self), err)]
    pub async fn create(&self, location: NewLocation) -> Result<Location, Error> {
        let name = location.name.trim();
        if name.is_empty() {
            return Err(Error::BadRequest(LOCATION_NAME_REQUIRED.into()));
        }
        if find_active_by_name(&self.db, name).await?.is_some() {
            return Err(Error::Conflict(LOCATION_EXISTS.into()));
        }

        Ok(insert_location(&self.db, name, location.code, location.note)
            .await?
            .into())
    }
}

/// The active location of that name, ignoring case.
async fn find_active_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<location::Model>, Error> {
    Ok(location::Entity::find()
        .filter(location::Column::Active.eq(true))
        .filter(
            Expr::expr(Func::lower(Expr::col((
                location::Entity,
                location::Column::Name,
            ))))
            .eq(Func::lower(Expr::val(name.trim()))),
        )
        .order_by_asc(location::Column::Id)
        .one(db)
        .await?)
}

async fn insert_location<C: ConnectionTrait>(
    db: &C,
    name: &str,
    code: Option<String>,
    note: Option<String>,
) -> Result<location::Model, Error> {
    let result = location::ActiveModel {
        id: NotSet,
        name: Set(name.trim().to_string()),
        code: Set(non_blank(code)),
        active: Set(true),
        note: Set(non_blank(note)),
    }
    .insert(db)
    .await;

    match result {
        Ok(model) => Ok(model),
        // the unique index on active names caught a concurrent insert
        Err(err) if err.is_duplicate() => Err(Error::Conflict(LOCATION_EXISTS.into())),
        Err(err) => Err(err.into()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Turn a search term into a `LIKE` prefix pattern, matching the term literally.
pub(crate) fn prefix_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 1);
    for c in query.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// The asset register.
#[derive(Clone, Debug)]
pub struct AssetService {
    db: Database,
}

impl AssetService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Assets matching the filter, newest first.
    #[instrument(skip(self), err)]
    pub async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>, Error> {
        let mut select = asset::Entity::find().find_also_related(location::Entity);

        if !filter.query.trim().is_empty() {
            let pattern = prefix_pattern(&filter.query);
            // both sides lowered by the database, so they agree on what a case is
            let like = |column: Expr| {
                Expr::expr(Func::lower(column)).binary(
                    BinOper::Like,
                    Expr::expr(Func::lower(Expr::val(pattern.clone())))
                        .binary(BinOper::Escape, SimpleExpr::Constant('\\'.into())),
                )
            };
            select = select.filter(
                Condition::any()
                    .add(like(Expr::col((asset::Entity, asset::Column::Name))))
                    .add(like(Expr::col((asset::Entity, asset::Column::Code))))
                    .add(like(Expr::col((location::Entity, location::Column::Name)))),
            );
        }
        if let Some(condition) = filter.condition {
            select = select.filter(asset::Column::Condition.eq(condition));
        }
        if let Some(location_id) = filter.location_id {
            select = select.filter(asset::Column::LocationId.eq(location_id));
        }

        Ok(select
            .order_by_desc(asset::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(asset, location)| Asset::new(asset, location))
            .collect())
    }

    #[instrument(skip(self), err)]
    pub async fn fetch(&self, id: i32) -> Result<Option<Asset>, Error> {
        Ok(asset::Entity::find_by_id(id)
            .find_also_related(location::Entity)
            .one(&self.db)
            .await?
            .map(|(asset, location)| Asset::new(asset, location)))
    }

    /// Check that a selected location exists.
    #[instrument(skip(self), err)]
    pub async fn validate(&self, input: AssetInput) -> Result<Validation<AssetInput>, Error> {
        if let LocationChoice::Existing(id) = input.location {
            if location::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .is_none()
            {
                return Ok(Err(LOCATION_NOT_FOUND));
            }
        }
        Ok(Ok(input))
    }

    #[instrument(skip(self), err)]
    pub async fn create(&self, input: AssetInput) -> Result<asset::Model, Error> {
        let tx = self.db.begin().await?;

        let location_id = resolve_location(&tx, input.location).await?;
        let model = asset::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            code: Set(input.code),
            location_id: Set(location_id),
            condition: Set(input.condition),
            purchase_date: Set(input.purchase_date),
        }
        .insert(&tx)
        .await?;

        tx.commit().await?;

        log::info!("created asset {} ({})", model.id, model.code);
        Ok(model)
    }

    /// Update an asset. Returns `None` if it doesn't exist.
    #[instrument(skip(self), err)]
    pub async fn update(&self, id: i32, input: AssetInput) -> Result<Option<asset::Model>, Error> {
        let tx = self.db.begin().await?;

        let Some(existing) = asset::Entity::find_by_id(id).one(&tx).await? else {
            return Ok(None);
        };

        let location_id = resolve_location(&tx, input.location).await?;
        let mut model = existing.into_active_model();
        model.name = Set(input.name);
        model.code = Set(input.code);
        model.location_id = Set(location_id);
        model.condition = Set(input.condition);
        model.purchase_date = Set(input.purchase_date);
        let model = model.update(&tx).await?;

        tx.commit().await?;

        Ok(Some(model))
    }

    /// Delete an asset. Returns `false` if it didn't exist.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: i32) -> Result<bool, Error> {
        let result = asset::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

async fn resolve_location<C: ConnectionTrait>(
    db: &C,
    choice: LocationChoice,
) -> Result<Option<i32>, Error> {
    Ok(match choice {
        LocationChoice::None => None,
        LocationChoice::Existing(id) => Some(id),
        LocationChoice::ByName(name) => match find_active_by_name(db, &name).await? {
            Some(existing) => Some(existing.id),
            None => {
                let created = insert_location(db, &name, None, None).await?;
                log::info!("created location {} ({})", created.id, created.name);
                Some(created.id)
            }
        },
    })
}
