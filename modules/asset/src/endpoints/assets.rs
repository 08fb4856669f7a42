use super::view::{SelectOption, html, redirect};
use crate::{
    Error,
    model::{Asset, AssetFilter, AssetValues, Location, NewLocation},
    service::{AssetService, LocationService},
};
use actix_web::{HttpResponse, get, post, web};
use askama::Template;
use pal_common::form::{parse_id, trimmed};
use pal_entity::asset::AssetCondition;
use serde::Deserialize;

const PAGE: &str = "/pal/assets";

#[get("/pal/theme")]
pub async fn theme() -> HttpResponse {
    redirect(PAGE)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AssetsQuery {
    q: Option<String>,
    condition: Option<String>,
    location_id: Option<String>,
}

impl AssetsQuery {
    fn filter(&self) -> AssetFilter {
        AssetFilter {
            query: trimmed(self.q.as_deref()),
            condition: self
                .condition
                .as_deref()
                .map(str::trim)
                .and_then(AssetCondition::parse),
            location_id: parse_id(self.location_id.as_deref()),
        }
    }
}

/// List assets, narrowed down by search and filters, with the forms to add assets and locations
#[get("/pal/assets")]
pub async fn list(
    assets: web::Data<AssetService>,
    locations: web::Data<LocationService>,
    web::Query(query): web::Query<AssetsQuery>,
) -> Result<HttpResponse, Error> {
    let page = AssetsPage::new(&assets, &locations, query.filter(), AssetValues::default())
        .await?;
    html(&page)
}

/// Both forms of the asset page post here, told apart by `form_type`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AssetsForm {
    form_type: Option<String>,

    name: Option<String>,
    code: Option<String>,
    location_id: Option<String>,
    new_location_name: Option<String>,
    condition: Option<String>,
    purchase_date: Option<String>,

    location_name: Option<String>,
    location_code: Option<String>,
}

impl AssetsForm {
    fn asset_values(&self) -> AssetValues {
        AssetValues {
            name: trimmed(self.name.as_deref()),
            code: trimmed(self.code.as_deref()),
            location_id: parse_id(self.location_id.as_deref()),
            new_location_name: trimmed(self.new_location_name.as_deref()),
            condition: trimmed(self.condition.as_deref()),
            purchase_date: trimmed(self.purchase_date.as_deref()),
        }
    }

    fn new_location(&self) -> NewLocation {
        NewLocation {
            name: trimmed(self.location_name.as_deref()),
            code: self.location_code.clone(),
            note: None,
        }
    }
}

/// Create an asset, or a location
#[post("/pal/assets")]
pub async fn submit(
    assets: web::Data<AssetService>,
    locations: web::Data<LocationService>,
    web::Form(form): web::Form<AssetsForm>,
) -> Result<HttpResponse, Error> {
    if form.form_type.as_deref().map(str::trim) == Some("location") {
        let location = form.new_location();
        let error = match locations.create(location.clone()).await {
            Ok(_) => return Ok(redirect(PAGE)),
            Err(Error::BadRequest(msg) | Error::Conflict(msg)) => msg,
            Err(err) => return Err(err),
        };

        let mut page = AssetsPage::new(
            &assets,
            &locations,
            AssetFilter::default(),
            AssetValues::default(),
        )
        .await?;
        page.location_error = Some(error);
        page.location_name = location.name;
        page.location_code = location.code.unwrap_or_default();
        return html(&page);
    }

    let values = form.asset_values();
    let validated = match values.validate() {
        Ok(input) => assets.validate(input).await?,
        Err(message) => Err(message),
    };

    match validated {
        Ok(input) => {
            assets.create(input).await?;
            Ok(redirect(PAGE))
        }
        Err(message) => {
            let mut page =
                AssetsPage::new(&assets, &locations, AssetFilter::default(), values).await?;
            page.asset_error = Some(message.to_string());
            html(&page)
        }
    }
}

/// Show the form to edit an asset
#[get("/pal/assets/{id}/edit")]
pub async fn edit_page(
    assets: web::Data<AssetService>,
    locations: web::Data<LocationService>,
    id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    let Some(asset) = assets.fetch(id).await? else {
        return Ok(redirect(PAGE));
    };

    let page = AssetEditPage::new(&locations, &asset, AssetValues::from(&asset)).await?;
    html(&page)
}

/// Update an asset
#[post("/pal/assets/{id}/edit")]
pub async fn edit(
    assets: web::Data<AssetService>,
    locations: web::Data<LocationService>,
    id: web::Path<i32>,
    web::Form(form): web::Form<AssetsForm>,
) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    let Some(asset) = assets.fetch(id).await? else {
        return Ok(redirect(PAGE));
    };

    let values = form.asset_values();
    let validated = match values.validate() {
        Ok(input) => assets.validate(input).await?,
        Err(message) => Err(message),
    };

    match validated {
        Ok(input) => {
            // a concurrent delete lands on the list as well
            assets.update(id, input).await?;
            Ok(redirect(PAGE))
        }
        Err(message) => {
            let mut page = AssetEditPage::new(&locations, &asset, values).await?;
            page.error = Some(message.to_string());
            html(&page)
        }
    }
}

/// Delete an asset
#[post("/pal/assets/{id}/delete")]
pub async fn delete(
    assets: web::Data<AssetService>,
    id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    if !assets.delete(id).await? {
        log::debug!("asset {id} was already gone");
    }
    Ok(redirect(PAGE))
}

struct AssetRow {
    id: i32,
    name: String,
    code: String,
    location: String,
    condition: &'static str,
    purchase_date: String,
}

impl From<Asset> for AssetRow {
    fn from(value: Asset) -> Self {
        Self {
            id: value.id,
            name: value.name,
            code: value.code,
            location: value.location_name.unwrap_or_else(|| "-".into()),
            condition: value.condition.label(),
            purchase_date: value
                .purchase_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".into()),
        }
    }
}

fn condition_options(selected: Option<AssetCondition>) -> Vec<SelectOption> {
    AssetCondition::ALL
        .into_iter()
        .map(|c| SelectOption::new(c.as_str(), c.label(), Some(c) == selected))
        .collect()
}

fn location_options(locations: &[Location], selected: Option<i32>) -> Vec<SelectOption> {
    locations
        .iter()
        .map(|location| {
            let label = match &location.code {
                Some(code) => format!("{} ({code})", location.name),
                None => location.name.clone(),
            };
            SelectOption::new(location.id, label, Some(location.id) == selected)
        })
        .collect()
}

#[derive(Template)]
#[template(path = "assets.html")]
struct AssetsPage {
    assets: Vec<AssetRow>,

    query: String,
    filter_conditions: Vec<SelectOption>,
    filter_locations: Vec<SelectOption>,

    values: AssetValues,
    conditions: Vec<SelectOption>,
    locations: Vec<SelectOption>,
    asset_error: Option<String>,

    location_name: String,
    location_code: String,
    location_error: Option<String>,
}

impl AssetsPage {
    async fn new(
        assets: &AssetService,
        locations: &LocationService,
        filter: AssetFilter,
        values: AssetValues,
    ) -> Result<Self, Error> {
        let available = locations.list_active().await?;

        Ok(Self {
            assets: assets
                .list(&filter)
                .await?
                .into_iter()
                .map(AssetRow::from)
                .collect(),
            filter_conditions: condition_options(filter.condition),
            filter_locations: location_options(&available, filter.location_id),
            query: filter.query,
            conditions: condition_options(AssetCondition::parse(&values.condition)),
            locations: location_options(&available, values.location_id),
            values,
            asset_error: None,
            location_name: String::new(),
            location_code: String::new(),
            location_error: None,
        })
    }
}

#[derive(Template)]
#[template(path = "asset_edit.html")]
struct AssetEditPage {
    id: i32,
    code: String,
    values: AssetValues,
    conditions: Vec<SelectOption>,
    locations: Vec<SelectOption>,
    error: Option<String>,
}

impl AssetEditPage {
    async fn new(
        locations: &LocationService,
        asset: &Asset,
        values: AssetValues,
    ) -> Result<Self, Error> {
        let mut available = locations.list_active().await?;
        // keep showing the current location, even if it got deactivated meanwhile
        if let (Some(id), Some(name)) = (asset.location_id, &asset.location_name) {
            if !available.iter().any(|location| location.id == id) {
                available.push(Location {
                    id,
                    name: name.clone(),
                    code: None,
                    active: false,
                    note: None,
                });
            }
        }

        Ok(Self {
            id: asset.id,
            code: asset.code.clone(),
            conditions: condition_options(AssetCondition::parse(&values.condition)),
            locations: location_options(&available, values.location_id),
            values,
            error: None,
        })
    }
}
