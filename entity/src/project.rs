use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The root aggregate of the cover sheet wizard: one ship, under one project number.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ship_name: String,
    pub project_number: String,
    pub ship_class_id: i32,
    pub owner_delegate: String,
    pub test_type: TestType,
    /// the optional project symbol image, as uploaded
    pub symbol: Option<Vec<u8>>,
    pub created_at: TimeDateTimeWithTimeZone,
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Harbour acceptance test
    #[default]
    #[sea_orm(string_value = "hat")]
    Hat,
    /// Sea acceptance test
    #[sea_orm(string_value = "sat")]
    Sat,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hat => "hat",
            Self::Sat => "sat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hat => "HAT",
            Self::Sat => "SAT",
        }
    }

    /// Accepts both the form value and the label, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hat" => Some(Self::Hat),
            "sat" => Some(Self::Sat),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ship_class::Entity",
        from = "Column::ShipClassId",
        to = "super::ship_class::Column::Id",
        on_delete = "Restrict"
    )]
    ShipClass,
    #[sea_orm(has_many = "super::test_location::Entity")]
    TestLocation,
    #[sea_orm(has_many = "super::supporting_document::Entity")]
    SupportingDocument,
    #[sea_orm(has_many = "super::review_approval::Entity")]
    ReviewApproval,
    #[sea_orm(has_one = "super::cover_sheet::Entity")]
    CoverSheet,
}

impl Related<super::ship_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipClass.def()
    }
}

impl Related<super::test_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestLocation.def()
    }
}

impl Related<super::supporting_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupportingDocument.def()
    }
}

impl Related<super::review_approval::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewApproval.def()
    }
}

impl Related<super::cover_sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoverSheet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
