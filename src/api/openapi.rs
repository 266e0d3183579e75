use super::handlers::{health, logout, me, signin, signup};
use utoipa::openapi::{Contact, Info, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Endpoints added here via `.routes(routes!(...))` are both served and
/// documented. `OPTIONS /health` and the document route itself are added
/// outside and stay undocumented.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(signup::signup))
        .routes(routes!(signin::signin))
        .routes(routes!(me::me))
        .routes(routes!(logout::logout));

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Liveness and database status".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Signup, signin, session check and logout".to_string());

    router.get_openapi_mut().tags = Some(vec![health_tag, auth_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let mut info = Info::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info.description = non_empty(env!("CARGO_PKG_DESCRIPTION")).map(str::to_string);
    info.contact = env!("CARGO_PKG_AUTHORS").split(';').find_map(author_contact);
    info.license = non_empty(env!("CARGO_PKG_LICENSE")).map(|spdx| {
        let mut license = License::new(spdx);
        license.identifier = Some(spdx.to_string());
        license
    });

    OpenApiBuilder::new().info(info).build()
}

/// Contact from a Cargo author entry: `Name <email>`, `Name` or `<email>`.
fn author_contact(author: &str) -> Option<Contact> {
    let author = author.trim();
    let (name, email) = match author.strip_suffix('>').and_then(|a| a.split_once('<')) {
        Some((name, email)) => (non_empty(name), non_empty(email)),
        None => (non_empty(author), None),
    };
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
