//! OpenAPI documentation for the HTTP surface.
//!
//! [`ApiDoc`] collects every annotated handler path and DTO schema. The
//! generated document is served as JSON at `GET /schema/`; `GET /api/docs/`
//! serves a small Swagger UI page that renders it.

use axum::response::{Html, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::protected::users::{DetailMessage, UserView};
use crate::handlers::protected::users::assign::AssignMentorRequest;
use crate::handlers::protected::users::detail::UserUpdateRequest;
use crate::handlers::public::login::{LoginRequest, TokenPairResponse};
use crate::handlers::public::registration::{RegisteredUser, RegistrationRequest};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the user-management API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mentors API",
        description = "User management with JWT authentication and mentor assignment."
    ),
    paths(
        crate::handlers::public::registration::register,
        crate::handlers::public::login::login,
        crate::handlers::protected::logout::logout,
        crate::handlers::protected::users::list::list,
        crate::handlers::protected::users::assign::assign_mentor,
        crate::handlers::protected::users::detail::detail,
        crate::handlers::protected::users::detail::update,
    ),
    components(schemas(
        RegistrationRequest,
        RegisteredUser,
        LoginRequest,
        TokenPairResponse,
        AssignMentorRequest,
        UserUpdateRequest,
        UserView,
        DetailMessage,
    )),
    tags(
        (name = "auth", description = "Registration, login, and logout"),
        (name = "users", description = "User listing, detail, update, and mentor assignment")
    )
)]
pub struct ApiDoc;

/// GET /schema/ - machine-readable OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /api/docs/ - human-readable Swagger UI rendering of /schema/
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_PAGE)
}

const SWAGGER_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Mentors API docs</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      SwaggerUIBundle({ url: "/schema/", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_registers_all_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/registration/",
            "/login/",
            "/logout/",
            "/users/",
            "/users/{id}/",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_document_registers_user_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("UserView"));
        assert!(schemas.contains_key("RegistrationRequest"));
    }
}
