mod backend;
mod estimator;
mod transport;

pub use backend::{BackendClient, PaymentIntent};
pub use estimator::RouteEstimator;
pub use transport::{DynTransport, HttpTransport, RouteTransport};
