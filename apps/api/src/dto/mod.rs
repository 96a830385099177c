mod access;
mod common;

pub use access::{
    GroupAssignmentValidationResponse, GroupListQuery, GroupResponse, MenuItemResponse,
    MenuSectionResponse, NavigationResponse, PermissionsResponse,
    ValidateGroupAssignmentRequest,
};
pub use common::{HealthResponse, MeResponse};
