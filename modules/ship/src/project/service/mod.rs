#[cfg(test)]
mod test;

use crate::{
    Error,
    cover_sheet::CoverSheetService,
    project::model::{
        OWNER_DELEGATE_REQUIRED, PROJECT_NUMBER_REQUIRED, ProjectDataValues, ProjectDetails,
        ProjectInput, ProjectSummary, ReviewInput, SHIP_CLASS_NOT_FOUND, SHIP_CLASS_REQUIRED,
        SHIP_NAME_REQUIRED, SupportingDocumentValues, TEST_TYPE_INVALID, TestLocationValues,
        Validation, test_location_name,
    },
    wizard::Progress,
};
use pal_common::{db::Database, form::non_empty};
use pal_entity::{
    project::{self, TestType},
    review_approval, ship_class, supporting_document, test_location,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, NotSet,
    PrimaryKeyTrait, QueryFilter, QueryOrder,
};
use time::OffsetDateTime;
use tracing::instrument;

/// A record owned by a project, which feeds into the project's cover sheet.
pub trait ProjectChild: EntityTrait {
    fn project_id(model: &Self::Model) -> i32;
}

impl ProjectChild for test_location::Entity {
    fn project_id(model: &Self::Model) -> i32 {
        model.project_id
    }
}

impl ProjectChild for supporting_document::Entity {
    fn project_id(model: &Self::Model) -> i32 {
        model.project_id
    }
}

impl ProjectChild for review_approval::Entity {
    fn project_id(model: &Self::Model) -> i32 {
        model.project_id
    }
}

#[derive(Clone, Debug)]
pub struct ProjectService {
    db: Database,
    cover_sheets: CoverSheetService,
}

impl ProjectService {
    pub fn new(db: Database, cover_sheets: CoverSheetService) -> Self {
        Self { db, cover_sheets }
    }

    /// All projects, newest first.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<ProjectSummary>, Error> {
        let projects = project::Entity::find()
            .find_also_related(ship_class::Entity)
            .order_by_desc(project::Column::Id)
            .all(&self.db)
            .await?;

        Ok(projects
            .into_iter()
            .map(|(project, class)| ProjectSummary {
                id: project.id,
                ship_name: project.ship_name,
                project_number: project.project_number,
                ship_class_id: project.ship_class_id,
                class_name: class.map(|class| class.name),
                owner_delegate: project.owner_delegate,
                test_type: project.test_type,
            })
            .collect())
    }

    pub async fn fetch(&self, id: i32) -> Result<Option<project::Model>, Error> {
        Ok(project::Entity::find_by_id(id).one(&self.db).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn fetch_details(&self, id: i32) -> Result<Option<ProjectDetails>, Error> {
        load_details(&self.db, id).await
    }

    /// Check project data in the order the form presents it, stopping at the first problem.
    pub async fn validate(
        &self,
        values: &ProjectDataValues,
    ) -> Result<Validation<ProjectInput>, Error> {
        let ship_name = values.ship_name.trim();
        if ship_name.is_empty() {
            return Ok(Err(SHIP_NAME_REQUIRED));
        }
        let project_number = values.project_number.trim();
        if project_number.is_empty() {
            return Ok(Err(PROJECT_NUMBER_REQUIRED));
        }
        let Some(ship_class_id) = values.ship_class_id else {
            return Ok(Err(SHIP_CLASS_REQUIRED));
        };
        if ship_class::Entity::find_by_id(ship_class_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Ok(Err(SHIP_CLASS_NOT_FOUND));
        }
        let owner_delegate = values.owner_delegate.trim();
        if owner_delegate.is_empty() {
            return Ok(Err(OWNER_DELEGATE_REQUIRED));
        }
        let Some(test_type) = TestType::parse(values.test_type.trim()) else {
            return Ok(Err(TEST_TYPE_INVALID));
        };

        Ok(Ok(ProjectInput {
            ship_name: ship_name.to_string(),
            project_number: project_number.to_string(),
            ship_class_id,
            owner_delegate: owner_delegate.to_string(),
            test_type,
        }))
    }

    #[instrument(skip(self, symbol), err)]
    pub async fn create(
        &self,
        input: ProjectInput,
        symbol: Option<Vec<u8>>,
    ) -> Result<project::Model, Error> {
        let model = project::ActiveModel {
            id: NotSet,
            ship_name: Set(input.ship_name),
            project_number: Set(input.project_number),
            ship_class_id: Set(input.ship_class_id),
            owner_delegate: Set(input.owner_delegate),
            test_type: Set(input.test_type),
            symbol: Set(symbol.filter(|symbol| !symbol.is_empty())),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&self.db)
        .await?;

        log::info!("created project {} ({})", model.id, model.project_number);

        Ok(model)
    }

    /// Update a project in place. An absent or empty symbol keeps the stored one.
    #[instrument(skip(self, symbol), err)]
    pub async fn update(
        &self,
        id: i32,
        input: ProjectInput,
        symbol: Option<Vec<u8>>,
    ) -> Result<Option<project::Model>, Error> {
        let Some(current) = self.fetch(id).await? else {
            return Ok(None);
        };

        let mut model: project::ActiveModel = current.into();
        model.ship_name = Set(input.ship_name);
        model.project_number = Set(input.project_number);
        model.ship_class_id = Set(input.ship_class_id);
        model.owner_delegate = Set(input.owner_delegate);
        model.test_type = Set(input.test_type);
        if let Some(symbol) = symbol.filter(|symbol| !symbol.is_empty()) {
            model.symbol = Set(Some(symbol));
        }
        let model = model.update(&self.db).await?;

        self.cover_sheets.refresh(model.id).await;

        Ok(Some(model))
    }

    /// Delete a project, including all of its children and its cover sheet.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: i32) -> Result<bool, Error> {
        let result = project::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self, project, values), fields(project = project.id), err)]
    pub async fn add_test_location(
        &self,
        project: &project::Model,
        values: &TestLocationValues,
    ) -> Result<test_location::Model, Error> {
        let test_site = values.test_site.trim();
        let model = test_location::ActiveModel {
            id: NotSet,
            project_id: Set(project.id),
            name: Set(test_location_name(test_site, &project.project_number)),
            test_site: Set(test_site.to_string()),
            sign_class: Set(values.sign_class),
            note: Set(non_blank(&values.note)),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&self.db)
        .await?;

        self.cover_sheets.refresh(project.id).await;

        Ok(model)
    }

    #[instrument(skip(self, values), err)]
    pub async fn update_test_location(
        &self,
        id: i32,
        values: &TestLocationValues,
    ) -> Result<Option<test_location::Model>, Error> {
        values
            .validate()
            .map_err(|message| Error::BadRequest(message.into()))?;

        let Some(current) = test_location::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: test_location::ActiveModel = current.into();
        model.test_site = Set(values.test_site.trim().to_string());
        model.sign_class = Set(values.sign_class);
        model.note = Set(non_blank(&values.note));
        let model = model.update(&self.db).await?;

        self.cover_sheets.refresh(model.project_id).await;

        Ok(Some(model))
    }

    #[instrument(skip(self, values), err)]
    pub async fn add_supporting_document(
        &self,
        project_id: i32,
        values: &SupportingDocumentValues,
    ) -> Result<supporting_document::Model, Error> {
        let model = supporting_document::ActiveModel {
            id: NotSet,
            project_id: Set(project_id),
            design_reference: Set(values.design_reference.trim().to_string()),
            maker_document: Set(values.maker_document.trim().to_string()),
            remarks: Set(non_blank(&values.remarks)),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&self.db)
        .await?;

        self.cover_sheets.refresh(project_id).await;

        Ok(model)
    }

    #[instrument(skip(self, values), err)]
    pub async fn update_supporting_document(
        &self,
        id: i32,
        values: &SupportingDocumentValues,
    ) -> Result<Option<supporting_document::Model>, Error> {
        values
            .validate()
            .map_err(|message| Error::BadRequest(message.into()))?;

        let Some(current) = supporting_document::Entity::find_by_id(id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut model: supporting_document::ActiveModel = current.into();
        model.design_reference = Set(values.design_reference.trim().to_string());
        model.maker_document = Set(values.maker_document.trim().to_string());
        model.remarks = Set(non_blank(&values.remarks));
        let model = model.update(&self.db).await?;

        self.cover_sheets.refresh(model.project_id).await;

        Ok(Some(model))
    }

    #[instrument(skip(self), err)]
    pub async fn add_review_approval(
        &self,
        project_id: i32,
        input: ReviewInput,
    ) -> Result<review_approval::Model, Error> {
        let model = review_approval::ActiveModel {
            id: NotSet,
            project_id: Set(project_id),
            internal_review_status: Set(input.internal_review_status),
            class_owner_review_status: Set(input.class_owner_review_status),
            shipyard_signed: Set(input.shipyard_signed),
            class_signed: Set(input.class_signed),
            owner_delegate_signed: Set(input.owner_delegate_signed),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&self.db)
        .await?;

        self.cover_sheets.refresh(project_id).await;

        Ok(model)
    }

    #[instrument(skip(self), err)]
    pub async fn update_review_approval(
        &self,
        id: i32,
        input: ReviewInput,
    ) -> Result<Option<review_approval::Model>, Error> {
        let Some(current) = review_approval::Entity::find_by_id(id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut model: review_approval::ActiveModel = current.into();
        model.internal_review_status = Set(input.internal_review_status);
        model.class_owner_review_status = Set(input.class_owner_review_status);
        model.shipyard_signed = Set(input.shipyard_signed);
        model.class_signed = Set(input.class_signed);
        model.owner_delegate_signed = Set(input.owner_delegate_signed);
        let model = model.update(&self.db).await?;

        self.cover_sheets.refresh(model.project_id).await;

        Ok(Some(model))
    }

    /// Delete a single child row of a project, and refresh the project's cover sheet.
    pub async fn delete_child<E>(&self, id: i32) -> Result<bool, Error>
    where
        E: ProjectChild,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        let Some(current) = E::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };
        let project_id = E::project_id(&current);

        let result = E::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Ok(false);
        }

        log::debug!("deleted child {id} of project {project_id}");
        self.cover_sheets.refresh(project_id).await;

        Ok(true)
    }
}

/// Load a project and evaluate its children.
///
/// The current child of each collection is the one with the greatest `(created_at, id)`.
pub(crate) async fn load_details<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<ProjectDetails>, Error> {
    let Some((project, ship_class)) = project::Entity::find_by_id(id)
        .find_also_related(ship_class::Entity)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let test_locations = test_location::Entity::find()
        .filter(test_location::Column::ProjectId.eq(id))
        .all(db)
        .await?;
    let supporting_documents = supporting_document::Entity::find()
        .filter(supporting_document::Column::ProjectId.eq(id))
        .all(db)
        .await?;
    let mut review_approvals = review_approval::Entity::find()
        .filter(review_approval::Column::ProjectId.eq(id))
        .all(db)
        .await?;

    let progress = Progress {
        test_locations: test_locations.len() as u64,
        supporting_documents: supporting_documents.len() as u64,
        review_approvals: review_approvals.len() as u64,
    };

    review_approvals.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

    Ok(Some(ProjectDetails {
        project,
        ship_class,
        progress,
        test_location: test_locations
            .into_iter()
            .max_by_key(|row| (row.created_at, row.id)),
        supporting_document: supporting_documents
            .into_iter()
            .max_by_key(|row| (row.created_at, row.id)),
        review_approvals,
    }))
}

fn non_blank(value: &str) -> Option<String> {
    non_empty(value.trim().to_string())
}
