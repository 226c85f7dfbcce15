use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::visibility::{SatellitesResponse, VisibilityResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::visibility::visibility,
        super::api::visibility::list_satellites,
    ),
    components(
        schemas(
            VisibilityResponse,
            SatellitesResponse,
            ErrorResponse,
            crate::visibility::VisibilityWindow,
            crate::visibility::TopocentricSample,
        )
    ),
    info(
        title = "Sategazer Visibility API",
        description = "Field-of-view transit checks for catalogued satellites",
        version = "0.1.0"
    ),
    tags(
        (name = "visibility", description = "Satellite visibility scans")
    )
)]
pub struct ApiDoc;
