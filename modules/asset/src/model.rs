use pal_entity::{
    asset::{self, AssetCondition},
    location,
};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::FormatItem, macros::format_description};

/// The outcome of validating user input: either the checked value, or the message to show.
pub type Validation<T> = Result<T, &'static str>;

pub const ASSET_REQUIRED: &str = "Asset name and asset code are required.";
pub const CONDITION_INVALID: &str = "Asset condition is not valid.";
pub const PURCHASE_DATE_INVALID: &str = "Purchase date must be a date (YYYY-MM-DD).";
pub const LOCATION_NOT_FOUND: &str = "Selected location was not found.";
pub const LOCATION_NAME_REQUIRED: &str = "Location name is required.";
pub const LOCATION_EXISTS: &str = "Location name already exists, use another name.";

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a date input value (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), DATE_FORMAT).ok()
}

/// An asset, with the name of its location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub location_id: Option<i32>,
    pub location_name: Option<String>,
    pub condition: AssetCondition,
    pub purchase_date: Option<Date>,
}

impl Asset {
    pub fn new(asset: asset::Model, location: Option<location::Model>) -> Self {
        Self {
            id: asset.id,
            name: asset.name,
            code: asset.code,
            location_id: asset.location_id,
            location_name: location.map(|location| location.name),
            condition: asset.condition,
            purchase_date: asset.purchase_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
    pub active: bool,
    pub note: Option<String>,
}

impl From<location::Model> for Location {
    fn from(value: location::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            code: value.code,
            active: value.active,
            note: value.note,
        }
    }
}

/// Narrowing down the asset list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetFilter {
    /// prefix of the asset name, the asset code or the location name, ignoring case
    pub query: String,
    pub condition: Option<AssetCondition>,
    pub location_id: Option<i32>,
}

/// Asset data, as entered into a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetValues {
    pub name: String,
    pub code: String,
    pub location_id: Option<i32>,
    /// a location to use when none got selected, created unless it exists already
    pub new_location_name: String,
    pub condition: String,
    pub purchase_date: String,
}

impl Default for AssetValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            location_id: None,
            new_location_name: String::new(),
            condition: AssetCondition::default().as_str().to_string(),
            purchase_date: String::new(),
        }
    }
}

impl From<&asset::Model> for AssetValues {
    fn from(value: &asset::Model) -> Self {
        Self {
            name: value.name.clone(),
            code: value.code.clone(),
            location_id: value.location_id,
            new_location_name: String::new(),
            condition: value.condition.as_str().to_string(),
            purchase_date: value
                .purchase_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
        }
    }
}

impl AssetValues {
    /// Check the values which don't need the store.
    pub fn validate(&self) -> Validation<AssetInput> {
        let name = self.name.trim();
        let code = self.code.trim();
        if name.is_empty() || code.is_empty() {
            return Err(ASSET_REQUIRED);
        }

        let condition = match self.condition.trim() {
            "" => AssetCondition::default(),
            value => AssetCondition::parse(value).ok_or(CONDITION_INVALID)?,
        };

        let purchase_date = match self.purchase_date.trim() {
            "" => None,
            value => Some(parse_date(value).ok_or(PURCHASE_DATE_INVALID)?),
        };

        let new_location_name = self.new_location_name.trim();
        let location = match self.location_id {
            Some(id) => LocationChoice::Existing(id),
            None if !new_location_name.is_empty() => {
                LocationChoice::ByName(new_location_name.to_string())
            }
            None => LocationChoice::None,
        };

        Ok(AssetInput {
            name: name.to_string(),
            code: code.to_string(),
            location,
            condition,
            purchase_date,
        })
    }
}

/// Where an asset is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocationChoice {
    None,
    Existing(i32),
    /// an active location with that name, ignoring case, or a new one
    ByName(String),
}

/// Asset data which passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetInput {
    pub name: String,
    pub code: String,
    pub location: LocationChoice,
    pub condition: AssetCondition,
    pub purchase_date: Option<Date>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
