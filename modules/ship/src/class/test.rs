use super::*;
use crate::test::{FakeRenderer, Services};
use pal_test_context::PalContext;
use std::sync::Arc;
use test_context::test_context;
use test_log::test;

#[test_context(PalContext)]
#[test(tokio::test)]
async fn ordered_by_name(ctx: &PalContext) -> anyhow::Result<()> {
    let service = ShipClassService::new(ctx.db.clone());

    for name in ["Landing Platform Dock", "Corvette", "Frigate"] {
        service
            .create(NewShipClass {
                name: name.into(),
                note: None,
            })
            .await?;
    }

    let names: Vec<_> = service.list().await?.into_iter().map(|c| c.name).collect();
    assert_eq!(vec!["Corvette", "Frigate", "Landing Platform Dock"], names);

    Ok(())
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn unique_names(ctx: &PalContext) -> anyhow::Result<()> {
    let service = ShipClassService::new(ctx.db.clone());

    let created = service
        .create(NewShipClass {
            name: " Frigate ".into(),
            note: Some("  ".into()),
        })
        .await?;
    assert_eq!("Frigate", created.name);
    assert_eq!(None, created.note);

    let result = service
        .create(NewShipClass {
            name: "Frigate".into(),
            note: None,
        })
        .await;
    assert!(matches!(result, Err(Error::Conflict(msg)) if msg == NAME_EXISTS));

    let result = service.create(NewShipClass::default()).await;
    assert!(matches!(result, Err(Error::BadRequest(msg)) if msg == NAME_REQUIRED));

    Ok(())
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn delete_is_restricted(ctx: &PalContext) -> anyhow::Result<()> {
    let services = Services::new(&ctx.db, Arc::new(FakeRenderer::default()));
    let used = services.ship_class("Frigate").await;
    let unused = services.ship_class("Corvette").await;
    services.project(used.id, "P-1").await;

    let result = services.classes.delete(used.id).await;
    assert!(matches!(result, Err(Error::Conflict(msg)) if msg == CLASS_IN_USE));

    assert!(services.classes.delete(unused.id).await?);
    assert!(!services.classes.delete(unused.id).await?);
    assert_eq!(1, services.classes.list().await?.len());

    Ok(())
}
