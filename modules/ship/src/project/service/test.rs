use super::*;
use crate::{
    project::model::{ReviewValues, SupportingDocumentValues, TestLocationValues},
    test::{FakeRenderer, Services, review},
};
use pal_entity::{cover_sheet, review_approval::ReviewStatus};
use pal_test_context::PalContext;
use sea_orm::PaginatorTrait;
use std::sync::Arc;
use test_context::test_context;
use test_log::test;

#[test]
fn location_names() {
    assert_eq!("Dock 1 - P-7", test_location_name(" Dock 1 ", "P-7"));
    assert_eq!("Dock 1", test_location_name("Dock 1", "  "));
    assert_eq!("Test location", test_location_name("", "P-7"));
}

#[test]
fn review_validation() {
    let values = ReviewValues {
        internal_review_status: "yes".into(),
        ..Default::default()
    };
    let input = values.validate().expect("valid");
    assert_eq!(ReviewStatus::Yes, input.internal_review_status);
    assert_eq!(ReviewStatus::No, input.class_owner_review_status);

    let values = ReviewValues {
        internal_review_status: "Yes".into(),
        ..Default::default()
    };
    assert!(values.validate().is_err());
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn list_newest_first(ctx: &PalContext) -> anyhow::Result<()> {
    let services = Services::new(&ctx.db, Arc::new(FakeRenderer::default()));
    let class = services.ship_class("Frigate").await;
    services.project(class.id, "P-1").await;
    services.project(class.id, "P-2").await;

    let projects = services.projects.list().await?;
    let numbers: Vec<_> = projects.iter().map(|p| p.project_number.as_str()).collect();
    assert_eq!(vec!["P-2", "P-1"], numbers);
    assert_eq!(Some("Frigate"), projects[0].class_name.as_deref());

    Ok(())
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn delete_cascades(ctx: &PalContext) -> anyhow::Result<()> {
    let services = Services::new(&ctx.db, Arc::new(FakeRenderer::default()));
    let class = services.ship_class("Frigate").await;
    let project = services.project(class.id, "P-1").await;
    let other = services.project(class.id, "P-2").await;
    let projects = &services.projects;

    for id in [project.id, other.id] {
        let model = projects.fetch(id).await?.expect("exists");
        projects
            .add_test_location(
                &model,
                &TestLocationValues {
                    test_site: "Dock".into(),
                    ..Default::default()
                },
            )
            .await?;
        projects
            .add_supporting_document(
                id,
                &SupportingDocumentValues {
                    design_reference: "DR".into(),
                    maker_document: "MK".into(),
                    remarks: String::new(),
                },
            )
            .await?;
        projects
            .add_review_approval(id, review(ReviewStatus::Yes, true))
            .await?;
    }

    assert_eq!(2, cover_sheet::Entity::find().count(&ctx.db).await?);

    assert!(projects.delete(project.id).await?);
    assert!(!projects.delete(project.id).await?);

    assert!(projects.fetch_details(project.id).await?.is_none());
    assert_eq!(1, test_location::Entity::find().count(&ctx.db).await?);
    assert_eq!(1, supporting_document::Entity::find().count(&ctx.db).await?);
    assert_eq!(1, review_approval::Entity::find().count(&ctx.db).await?);
    assert_eq!(1, cover_sheet::Entity::find().count(&ctx.db).await?);

    let remaining = projects.fetch_details(other.id).await?.expect("untouched");
    assert_eq!(1, remaining.progress.test_locations);

    Ok(())
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn child_maintenance_refreshes(ctx: &PalContext) -> anyhow::Result<()> {
    let renderer = Arc::new(FakeRenderer::default());
    let services = Services::new(&ctx.db, renderer.clone());
    let class = services.ship_class("Frigate").await;
    let project = services.project(class.id, "P-1").await;
    let projects = &services.projects;

    let location = projects
        .add_test_location(
            &project,
            &TestLocationValues {
                test_site: "Dock 1".into(),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(1, renderer.calls());
    assert_eq!(Some("Dock 1".into()), renderer.last("test_site"));

    let updated = projects
        .update_test_location(
            location.id,
            &TestLocationValues {
                test_site: "Dock 4".into(),
                sign_class: true,
                note: " wet ".into(),
            },
        )
        .await?
        .expect("exists");
    assert_eq!("Dock 4", updated.test_site);
    assert_eq!(Some("wet".into()), updated.note);
    assert_eq!(2, renderer.calls());
    assert_eq!(Some("Dock 4".into()), renderer.last("test_site"));

    let approval = projects
        .add_review_approval(project.id, review(ReviewStatus::No, false))
        .await?;
    let approval = projects
        .update_review_approval(approval.id, review(ReviewStatus::Yes, true))
        .await?
        .expect("exists");
    assert_eq!(ReviewStatus::Yes, approval.internal_review_status);
    assert_eq!(4, renderer.calls());
    assert_eq!(Some("YES".into()), renderer.last("shipyard_signed"));

    assert!(
        projects
            .delete_child::<test_location::Entity>(location.id)
            .await?
    );
    assert_eq!(5, renderer.calls());
    assert_eq!(Some("-".into()), renderer.last("test_site"));

    // unknown rows neither fail nor render
    assert!(
        !projects
            .delete_child::<review_approval::Entity>(approval.id + 10)
            .await?
    );
    assert!(
        projects
            .update_supporting_document(4711, &SupportingDocumentValues::default())
            .await?
            .is_none()
    );
    assert_eq!(5, renderer.calls());

    Ok(())
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn render_failures_do_not_block_writes(ctx: &PalContext) -> anyhow::Result<()> {
    let renderer = Arc::new(FakeRenderer::failing());
    let services = Services::new(&ctx.db, renderer.clone());
    let class = services.ship_class("Frigate").await;
    let project = services.project(class.id, "P-1").await;

    services
        .projects
        .add_supporting_document(
            project.id,
            &SupportingDocumentValues {
                design_reference: "DR".into(),
                maker_document: "MK".into(),
                remarks: String::new(),
            },
        )
        .await?;

    assert_eq!(1, renderer.calls());
    let details = services
        .projects
        .fetch_details(project.id)
        .await?
        .expect("exists");
    assert_eq!(1, details.progress.supporting_documents);
    assert!(services.cover_sheets.fetch(project.id).await?.is_none());

    Ok(())
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn child_updates_keep_required_fields(ctx: &PalContext) -> anyhow::Result<()> {
    use crate::project::model::{DOCUMENTS_REQUIRED, TEST_SITE_REQUIRED};

    let renderer = Arc::new(FakeRenderer::default());
    let services = Services::new(&ctx.db, renderer.clone());
    let class = services.ship_class("Frigate").await;
    let project = services.project(class.id, "P-1").await;
    let projects = &services.projects;

    let location = projects
        .add_test_location(
            &project,
            &TestLocationValues {
                test_site: "Dock".into(),
                ..Default::default()
            },
        )
        .await?;
    let document = projects
        .add_supporting_document(
            project.id,
            &SupportingDocumentValues {
                design_reference: "DR-01".into(),
                maker_document: "MK-02".into(),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(2, renderer.calls());

    let err = projects
        .update_test_location(
            location.id,
            &TestLocationValues {
                test_site: "   ".into(),
                ..Default::default()
            },
        )
        .await
        .expect_err("blank test site");
    assert!(matches!(err, Error::BadRequest(msg) if msg == TEST_SITE_REQUIRED));

    for values in [
        SupportingDocumentValues::default(),
        SupportingDocumentValues {
            design_reference: "DR-01".into(),
            maker_document: " ".into(),
            ..Default::default()
        },
    ] {
        let err = projects
            .update_supporting_document(document.id, &values)
            .await
            .expect_err("blank references");
        assert!(matches!(err, Error::BadRequest(msg) if msg == DOCUMENTS_REQUIRED));
    }

    // nothing got written, or rendered
    let stored = test_location::Entity::find_by_id(location.id)
        .one(&ctx.db)
        .await?
        .expect("test location");
    assert_eq!("Dock", stored.test_site);
    let stored = supporting_document::Entity::find_by_id(document.id)
        .one(&ctx.db)
        .await?
        .expect("supporting document");
    assert_eq!("DR-01", stored.design_reference);
    assert_eq!("MK-02", stored.maker_document);
    assert_eq!(2, renderer.calls());

    Ok(())
}
