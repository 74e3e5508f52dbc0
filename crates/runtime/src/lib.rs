mod app;
mod location;
mod router;

pub use app::{App, AppError};
pub use location::Location;
pub use router::{RouteComponent, RouteTable, Router, RouterState};
