pub mod entitlement;
pub mod holiday;
pub mod leave_request;
pub mod role;
