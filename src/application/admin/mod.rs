mod members;
mod session;

#[allow(unused_imports)]
pub use members::MembersPage;
#[allow(unused_imports)]
pub use session::require_admin_session;
