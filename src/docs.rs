use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use boscocare_core::Role;
use boscocare_models::{
    ActivitySchedule, ActivityScheduleForm, AuthScreen, CompleteScheduleRequest, MessageResponse,
    PastoralActivity, PastoralActivityForm, SacramentDocument, SacramentDocumentForm,
    ScheduleHistoryForm, ScheduleHistoryRecord, SessionResponse, SignInRequest, SignUpRequest,
    StudentRecord, StudentRecordForm,
};

use crate::middleware::tab::TAB_HEADER;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::home::model::{HomeResponse, HomeSection, HubLink, HubResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::auth_screen,
        crate::modules::auth::controller::sign_up,
        crate::modules::auth::controller::sign_in,
        crate::modules::auth::controller::sign_out,
        crate::modules::auth::controller::current_session,
        crate::modules::home::controller::home,
        crate::modules::guidance::controller::guidance_hub,
        crate::modules::guidance::controller::list_schedules,
        crate::modules::guidance::controller::create_schedule,
        crate::modules::guidance::controller::update_schedule,
        crate::modules::guidance::controller::delete_schedule,
        crate::modules::guidance::controller::complete_schedule,
        crate::modules::guidance::controller::list_history,
        crate::modules::guidance::controller::create_history,
        crate::modules::guidance::controller::update_history,
        crate::modules::guidance::controller::delete_history,
        crate::modules::pastoral::controller::pastoral_hub,
        crate::modules::pastoral::controller::list_activities,
        crate::modules::pastoral::controller::create_activity,
        crate::modules::pastoral::controller::update_activity,
        crate::modules::pastoral::controller::delete_activity,
        crate::modules::pastoral::controller::list_documents,
        crate::modules::pastoral::controller::create_document,
        crate::modules::pastoral::controller::update_document,
        crate::modules::pastoral::controller::delete_document,
        crate::modules::student_records::controller::list_records,
        crate::modules::student_records::controller::create_record,
        crate::modules::student_records::controller::update_record,
        crate::modules::student_records::controller::delete_record,
    ),
    components(
        schemas(
            Role,
            AuthScreen,
            SignUpRequest,
            SignInRequest,
            MessageResponse,
            SessionResponse,
            ErrorResponse,
            HomeResponse,
            HomeSection,
            HubResponse,
            HubLink,
            ActivitySchedule,
            ActivityScheduleForm,
            CompleteScheduleRequest,
            ScheduleHistoryRecord,
            ScheduleHistoryForm,
            PastoralActivity,
            PastoralActivityForm,
            SacramentDocument,
            SacramentDocumentForm,
            StudentRecord,
            StudentRecordForm,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, sign-in and the tab's session"),
        (name = "Screens", description = "Home screen"),
        (name = "Guidance", description = "Activity schedule and schedule history"),
        (name = "Pastoral", description = "Pastoral activities and sacrament documents"),
        (name = "Student Records", description = "Student records by education level")
    ),
    info(
        title = "Boscocare API",
        version = "0.1.0",
        description = "Role-gated school administration: guidance, pastoral care and student records, backed by a hosted auth and data service.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

#[cfg(feature = "dev-role-override")]
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::set_role_override,
        crate::modules::auth::controller::clear_role_override,
    ),
    components(schemas(boscocare_models::DevRoleOverrideRequest)),
    tags(
        (name = "Development", description = "Per-tab role override for local testing")
    )
)]
struct DevApiDoc;

/// The API document, including the development routes when they are
/// compiled in.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    #[allow(unused_mut)]
    let mut doc = ApiDoc::openapi();
    #[cfg(feature = "dev-role-override")]
    doc.merge(DevApiDoc::openapi());
    doc
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "tab_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(TAB_HEADER))),
            )
        }
    }
}
