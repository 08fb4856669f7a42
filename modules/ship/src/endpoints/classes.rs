use crate::class::{NewShipClass, ShipClassService};
use actix_web::{HttpResponse, Responder, delete, get, post, web};

/// List ship classes, ordered by name
#[get("/api/v1/ship-class")]
pub async fn all(service: web::Data<ShipClassService>) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(service.list().await?))
}

/// Create a ship class
#[post("/api/v1/ship-class")]
pub async fn create(
    service: web::Data<ShipClassService>,
    web::Json(class): web::Json<NewShipClass>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Created().json(service.create(class).await?))
}

/// Delete a ship class, which must no longer be used by any project
#[delete("/api/v1/ship-class/{id}")]
pub async fn delete(
    service: web::Data<ShipClassService>,
    id: web::Path<i32>,
) -> actix_web::Result<impl Responder> {
    Ok(match service.delete(id.into_inner()).await? {
        true => HttpResponse::NoContent().finish(),
        false => HttpResponse::NotFound().finish(),
    })
}
