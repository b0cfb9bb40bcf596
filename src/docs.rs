use crate::analytics::result::{
    AnalyticsResult, DateCount, HourCount, LabelCount, MonthCount, WeekCount,
};
use crate::analytics::window::{AnalyticsParams, AnalyticsQuery};
use crate::api::attendance::{CheckInRequest, CheckOutRequest};
use crate::api::users::{CreateUser, UpdateUser};
use crate::model::attendance::{AttendanceRecord, UserCategory};
use crate::model::user::User;
use crate::models::{LoginReqDto, LoginResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Register API",
        version = "1.0.0",
        description = r#"
## Attendance Register

Visitors and staff check in and out of the facility; staff review attendance analytics.

### Key Features
- **Attendance**
  - Daily check-in and check-out per user, with purpose of visit and comments
- **Analytics**
  - Today's counters, totals, and breakdowns by category, date, hour, purpose, week and month
  - Average visit duration in minutes
- **Users**
  - Create, view, update and delete visitor profiles

### Security
Endpoints under `/api` require a JWT bearer token from `/auth/login`.
Analytics and user management are limited to **Staff** and **Admin** accounts.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_today,

        crate::api::analytics::analytics_dashboard,

        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            CheckInRequest,
            CheckOutRequest,
            AttendanceRecord,
            UserCategory,
            AnalyticsParams,
            AnalyticsQuery,
            AnalyticsResult,
            LabelCount,
            DateCount,
            HourCount,
            WeekCount,
            MonthCount,
            CreateUser,
            UpdateUser,
            User
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Staff authentication"),
        (name = "Attendance", description = "Check-in and check-out APIs"),
        (name = "Analytics", description = "Attendance analytics APIs"),
        (name = "Users", description = "User management APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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
