use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::announcements::{dtos as announcements_dtos, handlers as announcements_handlers};
use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::faqs::{dtos as faqs_dtos, handlers as faqs_handlers};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::moderation::{dtos as moderation_dtos, models as moderation_models};
use crate::features::offices::{handlers as offices_handlers, models as offices_models};
use crate::features::portals::{dtos as portals_dtos, handlers as portals_handlers};
use crate::features::quick_links::{dtos as quick_links_dtos, handlers as quick_links_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::get_current,
        // Users
        users_handlers::register,
        users_handlers::create_user,
        users_handlers::list_users,
        users_handlers::get_user,
        users_handlers::update_user,
        users_handlers::update_user_role,
        users_handlers::delete_user,
        // Offices
        offices_handlers::list_offices,
        offices_handlers::list_office_workspace_files,
        offices_handlers::list_office_workspace_faqs,
        // Files
        files_handlers::upload_file,
        files_handlers::list_approved_files,
        files_handlers::list_unapproved_files,
        files_handlers::list_pending_files,
        files_handlers::list_my_files,
        files_handlers::list_office_files,
        files_handlers::get_file,
        files_handlers::download_file,
        files_handlers::update_file,
        files_handlers::delete_file,
        files_handlers::approve_file,
        files_handlers::reject_file,
        files_handlers::add_file_version,
        files_handlers::list_office_categories,
        files_handlers::add_office_category,
        // Announcements
        announcements_handlers::list_announcements,
        announcements_handlers::latest_announcements,
        announcements_handlers::list_unapproved_announcements,
        announcements_handlers::list_my_announcements,
        announcements_handlers::create_announcement,
        announcements_handlers::update_announcement,
        announcements_handlers::delete_announcement,
        announcements_handlers::approve_announcement,
        announcements_handlers::reject_announcement,
        // Quick links
        quick_links_handlers::list_quick_links,
        quick_links_handlers::list_pinned_quick_links,
        quick_links_handlers::list_unapproved_quick_links,
        quick_links_handlers::list_my_quick_links,
        quick_links_handlers::create_quick_link,
        quick_links_handlers::update_quick_link,
        quick_links_handlers::delete_quick_link,
        quick_links_handlers::pin_quick_link,
        quick_links_handlers::unpin_quick_link,
        quick_links_handlers::approve_quick_link,
        quick_links_handlers::reject_quick_link,
        // Portals
        portals_handlers::list_portals,
        portals_handlers::list_pinned_portals,
        portals_handlers::list_unapproved_portals,
        portals_handlers::create_portal,
        portals_handlers::update_portal,
        portals_handlers::delete_portal,
        portals_handlers::toggle_portal_pin,
        portals_handlers::approve_portal,
        portals_handlers::reject_portal,
        // FAQs
        faqs_handlers::list_faqs,
        faqs_handlers::list_office_faqs,
        faqs_handlers::search_faqs,
        faqs_handlers::search_similar_faqs,
        faqs_handlers::create_faq,
        faqs_handlers::update_faq,
        faqs_handlers::delete_faq,
    ),
    components(
        schemas(
            // Shared
            Meta,
            offices_models::Office,
            moderation_models::ModerationStatus,
            moderation_models::CommentDto,
            moderation_dtos::RejectRequestDto,
            // Auth
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_model::AuthenticatedUser>,
            // Users
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::AddVersionDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<Vec<files_dtos::FileResponseDto>>,
            ApiResponse<files_dtos::OfficeCategoriesDto>,
            // Announcements
            announcements_dtos::CreateAnnouncementDto,
            announcements_dtos::UpdateAnnouncementDto,
            ApiResponse<announcements_dtos::AnnouncementResponseDto>,
            ApiResponse<Vec<announcements_dtos::AnnouncementResponseDto>>,
            // Quick links
            ApiResponse<quick_links_dtos::QuickLinkResponseDto>,
            ApiResponse<Vec<quick_links_dtos::QuickLinkResponseDto>>,
            // Portals
            ApiResponse<portals_dtos::PortalResponseDto>,
            ApiResponse<Vec<portals_dtos::PortalResponseDto>>,
            // FAQs
            ApiResponse<faqs_dtos::FaqResponseDto>,
            ApiResponse<Vec<faqs_dtos::FaqResponseDto>>,
            ApiResponse<Vec<faqs_dtos::ScoredFaqDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Login, logout and current session"),
        (name = "users", description = "User accounts and roles"),
        (name = "offices", description = "Offices and the per-office admin workspace"),
        (name = "files", description = "File archive with versions and review"),
        (name = "announcements", description = "Office announcements"),
        (name = "quicklinks", description = "Dashboard quick links"),
        (name = "portals", description = "Portal shortcuts"),
        (name = "faqs", description = "Frequently asked questions and keyword search"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Office Portal API",
        version = "0.1.0",
        description = "API documentation for the office intranet portal",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_moderation_endpoints() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/files/{id}/approve",
            "/api/announcements/{id}/reject",
            "/api/quicklinks/{id}/pin",
            "/api/portals/{id}/pin",
            "/api/faqs/search-similar",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
