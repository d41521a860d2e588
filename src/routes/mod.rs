/// Router Module Index
///
/// Organizes routing into modules by who may reach them. Page access is decided
/// by the Session Gate inside each page handler; the API module carries its own
/// CORS and panic layers.

/// Pages and endpoints open to every visitor (anonymous or signed in).
pub mod public;

/// Pages that require a signed-in visitor with a permitted role.
pub mod protected;

/// Pages restricted to the 'admin' role.
pub mod admin;

/// The Resource Proxy endpoints under `/api`.
pub mod api;
